// ==========================================
// OTIF 交付风险分析 - 订单视图 API
// ==========================================
// 职责: 持有单个视图会话的全部状态（订单集合 / 分面 / 筛选 / 排序 / 分页）
// 流程: 意图 → 更新状态 → render() 调用 过滤 → 排序 → 分页
// 红线: 任一筛选变更重置页码为 1；排序变更不重置页码
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ViewConfig;
use crate::domain::order::{DqReport, OrderRecord};
use crate::domain::types::{CategoricalColumn, RangeField, SortDirection, SortField};
use crate::engine::{
    DateRange, FacetIndex, NumericRange, PredicateSet, QueryEngine, SummaryMetrics, ViewExporter,
    ViewState, EXPORT_CONTENT_TYPE,
};
use crate::importer::OrderImporter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 当前页无记录时的提示
pub const EMPTY_VIEW_MESSAGE: &str = "No orders found matching your search or filters.";

// ==========================================
// 渲染快照
// ==========================================

/// 表格行（复合行键 + 展示文本）
#[derive(Debug, Clone, Serialize)]
pub struct ViewRow {
    pub row_key: String,
    pub record: OrderRecord,
    pub status_label: &'static str,
    pub signals_text: String,
}

/// 筛选激活状态（驱动列头高亮与"清除全部筛选"入口）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveFilters {
    pub columns: BTreeMap<CategoricalColumn, bool>,
    pub date_range: bool,
    pub lead_time: bool,
    pub risk_score: bool,
    pub any: bool,
}

/// 单次渲染所需的全部数据
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub rows: Vec<ViewRow>,
    pub total_filtered: usize,
    pub page_index: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub search_query: String,
    pub predicates: PredicateSet,
    pub active_filters: ActiveFilters,
    pub facets: FacetIndex,
    pub summary: SummaryMetrics,
    pub showing_label: String,
    pub page_label: String,
    pub empty_message: Option<&'static str>,
}

/// 导出产物（交给文件保存方）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub content: String,
}

// ==========================================
// ViewIntent - 渲染层回传的用户意图
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewIntent {
    SetSearch { query: String },
    ToggleFilter { column: CategoricalColumn, value: String },
    ClearColumnFilter { column: CategoricalColumn },
    SetDateRange { from: Option<String>, to: Option<String> },
    ClearDateRange,
    SetNumericRange { field: RangeField, min: i64, max: i64 },
    ClearNumericRange { field: RangeField },
    ClearAllFilters,
    SortBy { field: SortField },
    GoToPage { page: usize },
    NextPage,
    PreviousPage,
    Export,
}

/// 意图处理结果
#[derive(Debug, Clone)]
pub enum IntentOutcome {
    Rendered(Box<ViewSnapshot>),
    Exported(ExportArtifact),
}

// ==========================================
// OrderViewApi - 订单视图会话
// ==========================================
pub struct OrderViewApi {
    config: ViewConfig,
    records: Vec<OrderRecord>,
    facets: FacetIndex,
    predicates: PredicateSet,
    state: ViewState,
    summary: SummaryMetrics,
    engine: QueryEngine,
}

impl OrderViewApi {
    /// 创建空会话（尚未加载数据）
    ///
    /// # 返回
    /// - Err(ApiError::ConfigError): 配置值非法
    pub fn new(config: ViewConfig) -> ApiResult<Self> {
        config.validate()?;

        let facets = FacetIndex::build_with_limit(&[], config.facet_value_limit);
        let predicates = PredicateSet::new(&facets);
        let state = ViewState::new(
            config.default_sort_field,
            config.default_sort_direction,
            config.page_size,
        );

        Ok(Self {
            config,
            records: Vec::new(),
            facets,
            predicates,
            state,
            summary: SummaryMetrics::default(),
            engine: QueryEngine::new(),
        })
    }

    // ==========================================
    // 数据加载
    // ==========================================

    /// 替换订单集合: 整体重建分面与汇总，筛选恢复为新边界，页码回到 1，排序保持
    pub fn load(&mut self, records: Vec<OrderRecord>) {
        self.facets = FacetIndex::build_with_limit(&records, self.config.facet_value_limit);
        self.predicates = PredicateSet::new(&self.facets);
        self.summary = SummaryMetrics::compute(&records);
        self.records = records;
        self.state.page_index = 1;

        info!(
            total = self.summary.total,
            miss = self.summary.miss,
            "订单视图已加载"
        );
    }

    /// 导入文件并加载（结构性拒绝时保持原会话不变）
    pub async fn import_and_load<I, P>(&mut self, importer: &I, file_path: P) -> ApiResult<DqReport>
    where
        I: OrderImporter,
        P: AsRef<Path> + Send,
    {
        let outcome = importer.import_file(file_path).await?;
        self.load(outcome.records);
        Ok(outcome.dq_report)
    }

    // ==========================================
    // 筛选意图（均重置页码）
    // ==========================================

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.predicates.set_search(query);
        self.reset_page();
    }

    pub fn toggle_filter(&mut self, column: CategoricalColumn, value: &str) {
        debug!(column = %column, value, "切换分类筛选");
        self.predicates.toggle_categorical_value(column, value);
        self.reset_page();
    }

    pub fn clear_column_filter(&mut self, column: CategoricalColumn) {
        self.predicates.clear_column(column);
        self.reset_page();
    }

    /// 设置日期区间（空字符串视为开放端）
    pub fn set_date_range(&mut self, from: Option<&str>, to: Option<&str>) {
        self.predicates.set_date_range(DateRange::new(from, to));
        self.reset_page();
    }

    pub fn clear_date_range(&mut self) {
        self.predicates.clear_date_range();
        self.reset_page();
    }

    pub fn set_numeric_range(&mut self, field: RangeField, range: NumericRange) {
        debug!(field = %field, range = %range, "设置数值区间");
        self.predicates.set_numeric_range(field, range);
        self.reset_page();
    }

    pub fn clear_numeric_range(&mut self, field: RangeField) {
        self.predicates.clear_numeric_range(field, &self.facets);
        self.reset_page();
    }

    /// 清除全部筛选（检索词保留）
    pub fn clear_all_filters(&mut self) {
        self.predicates.clear_filters(&self.facets);
        self.reset_page();
    }

    // ==========================================
    // 排序 / 分页意图
    // ==========================================

    /// 同列切换方向，新列从升序开始
    pub fn sort_by(&mut self, field: SortField) {
        if field == self.state.sort_field {
            self.state.sort_direction = self.state.sort_direction.toggled();
        } else {
            self.state.sort_field = field;
            self.state.sort_direction = SortDirection::Asc;
        }
        debug!(field = %field, direction = %self.state.sort_direction, "切换排序");
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.state.page_index = self.engine.clamp_page_index(
            page,
            self.total_filtered(),
            self.state.page_size,
        );
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.state.page_index.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.state.page_index.saturating_sub(1));
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn facets(&self) -> &FacetIndex {
        &self.facets
    }

    pub fn predicates(&self) -> &PredicateSet {
        &self.predicates
    }

    pub fn view_state(&self) -> &ViewState {
        &self.state
    }

    pub fn summary(&self) -> &SummaryMetrics {
        &self.summary
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// 过滤后记录数
    pub fn total_filtered(&self) -> usize {
        self.engine.filter(&self.records, &self.predicates).len()
    }

    /// 过滤 + 排序后的完整视图（导出口径）
    pub fn sorted_view(&self) -> Vec<&OrderRecord> {
        self.engine
            .sorted_view(&self.records, &self.predicates, &self.state)
    }

    /// 渲染当前页
    pub fn render(&self) -> ViewSnapshot {
        let result = self.engine.run(&self.records, &self.predicates, &self.state);

        let rows: Vec<ViewRow> = result
            .page
            .iter()
            .enumerate()
            .map(|(idx, record)| ViewRow {
                row_key: record.row_key(idx),
                record: (*record).clone(),
                status_label: record.otif_status.badge_label(),
                signals_text: record.signals_joined(),
            })
            .collect();

        let mut columns = BTreeMap::new();
        for column in CategoricalColumn::ALL {
            columns.insert(column, self.predicates.is_column_active(column));
        }
        let active_filters = ActiveFilters {
            columns,
            date_range: !self.predicates.date_range().is_open(),
            lead_time: self
                .predicates
                .is_numeric_range_active(RangeField::LeadTime, &self.facets),
            risk_score: self
                .predicates
                .is_numeric_range_active(RangeField::RiskScore, &self.facets),
            any: self.predicates.has_active_filters(&self.facets),
        };

        let showing_label = format!(
            "Showing {} of {} orders",
            rows.len(),
            result.total_filtered
        );
        let page_label = format!("Page {} of {}", result.page_index, result.total_pages);
        let empty_message = rows.is_empty().then_some(EMPTY_VIEW_MESSAGE);

        ViewSnapshot {
            has_previous: result.page_index > 1,
            has_next: result.page_index < result.total_pages,
            rows,
            total_filtered: result.total_filtered,
            page_index: result.page_index,
            total_pages: result.total_pages,
            sort_field: self.state.sort_field,
            sort_direction: self.state.sort_direction,
            search_query: self.predicates.search_query().to_string(),
            predicates: self.predicates.clone(),
            active_filters,
            facets: self.facets.clone(),
            summary: self.summary,
            showing_label,
            page_label,
            empty_message,
        }
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 导出过滤 + 排序后的完整视图（不受分页影响）
    pub fn export(&self) -> ExportArtifact {
        let view = self.sorted_view();
        info!(rows = view.len(), "导出订单视图");

        ExportArtifact {
            file_name: self.config.export_file_name.clone(),
            content_type: EXPORT_CONTENT_TYPE,
            content: ViewExporter::serialize(view),
        }
    }

    /// 导出并写入目录，返回文件路径
    pub fn export_to_dir<P: AsRef<Path>>(&self, dir: P) -> ApiResult<PathBuf> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ApiError::InvalidInput(format!(
                "导出目录不存在: {}",
                dir.display()
            )));
        }

        let artifact = self.export();
        let path = dir.join(&artifact.file_name);
        std::fs::write(&path, artifact.content.as_bytes())?;
        info!(path = %path.display(), "导出文件已写入");
        Ok(path)
    }

    // ==========================================
    // 统一入口
    // ==========================================

    /// 处理渲染层意图（导出返回产物，其余返回最新快照）
    pub fn dispatch(&mut self, intent: ViewIntent) -> IntentOutcome {
        debug!(?intent, "处理视图意图");
        match intent {
            ViewIntent::SetSearch { query } => self.set_search(query),
            ViewIntent::ToggleFilter { column, value } => self.toggle_filter(column, &value),
            ViewIntent::ClearColumnFilter { column } => self.clear_column_filter(column),
            ViewIntent::SetDateRange { from, to } => {
                self.set_date_range(from.as_deref(), to.as_deref())
            }
            ViewIntent::ClearDateRange => self.clear_date_range(),
            ViewIntent::SetNumericRange { field, min, max } => {
                self.set_numeric_range(field, NumericRange::new(min, max))
            }
            ViewIntent::ClearNumericRange { field } => self.clear_numeric_range(field),
            ViewIntent::ClearAllFilters => self.clear_all_filters(),
            ViewIntent::SortBy { field } => self.sort_by(field),
            ViewIntent::GoToPage { page } => self.go_to_page(page),
            ViewIntent::NextPage => self.next_page(),
            ViewIntent::PreviousPage => self.previous_page(),
            ViewIntent::Export => return IntentOutcome::Exported(self.export()),
        }
        IntentOutcome::Rendered(Box::new(self.render()))
    }

    fn reset_page(&mut self) {
        self.state.page_index = 1;
    }
}
