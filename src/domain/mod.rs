// ==========================================
// OTIF 交付风险分析 - 领域模型层
// ==========================================
// 职责: 定义订单实体、枚举类型、导入质量报告
// 红线: 不含文件读取逻辑,不含查询引擎逻辑
// ==========================================

pub mod order;
pub mod types;

// 重导出核心类型
pub use order::{
    DqIssue, DqIssueKind, DqReport, ImportOutcome, OrderRecord, RawOrderRecord, SIGNAL_SEPARATOR,
};
pub use types::{CategoricalColumn, OtifStatus, RangeField, SortDirection, SortField};
