// ==========================================
// OTIF 交付风险分析 - 核心库
// ==========================================
// 定位: 订单级 OTIF 风险评估的内存表格查询引擎
// 流程: 导出文件 → 规范化订单 → 过滤 / 排序 / 分页 → 渲染 / 导出
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 订单与类型
pub mod domain;

// 导入层 - 外部导出文件
pub mod importer;

// 引擎层 - 查询引擎
pub mod engine;

// 配置层 - 视图配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 视图会话
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CategoricalColumn, OtifStatus, RangeField, SortDirection, SortField};

// 领域实体
pub use domain::{DqReport, ImportOutcome, OrderRecord};

// 引擎
pub use engine::{
    DateRange, FacetIndex, NumericRange, PredicateSet, QueryEngine, SummaryMetrics, ViewExporter,
};

// 导入
pub use importer::{ImportError, OrderImporter, OrderImporterImpl};

// 配置
pub use config::{ConfigManager, ViewConfig};

// API
pub use api::{ApiError, OrderViewApi, ViewIntent, ViewSnapshot};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "OTIF 交付风险分析";
