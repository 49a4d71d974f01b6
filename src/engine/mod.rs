// ==========================================
// OTIF 交付风险分析 - 引擎层
// ==========================================
// 职责: 内存表格查询引擎（过滤 / 排序 / 分页 / 分面 / 导出 / 汇总）
// 红线: 引擎无状态、纯函数，订单集合只读
// ==========================================

pub mod exporter;
pub mod facet;
pub mod predicate;
pub mod query;
pub mod summary;

// 重导出核心引擎
pub use exporter::{ViewExporter, EXPORT_CONTENT_TYPE, EXPORT_HEADERS};
pub use facet::{FacetIndex, EMPTY_BOUNDS};
pub use predicate::{DateRange, NumericRange, PredicateSet, PredicateStage};
pub use query::{compare_by_field, QueryEngine, QueryResult, ViewState};
pub use summary::SummaryMetrics;
