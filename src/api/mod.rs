// ==========================================
// OTIF 交付风险分析 - API 层
// ==========================================
// 职责: 视图会话接口，供渲染层 / 命令行调用
// ==========================================

pub mod error;
pub mod order_view_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use order_view_api::{
    ActiveFilters, ExportArtifact, IntentOutcome, OrderViewApi, ViewIntent, ViewRow, ViewSnapshot,
    EMPTY_VIEW_MESSAGE,
};
