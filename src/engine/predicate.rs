// ==========================================
// OTIF 交付风险分析 - 筛选条件集
// ==========================================
// 职责: 全文检索 + 分类多选 + 日期区间 + 数值区间，统一判定 passes(record)
// 判定顺序（短路）: 检索 → 分类 → 日期 → 提前期 → 风险分
// ==========================================

use crate::domain::order::OrderRecord;
use crate::domain::types::{CategoricalColumn, RangeField};
use crate::engine::facet::FacetIndex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ==========================================
// NumericRange - 闭区间
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: i64,
    pub max: i64,
}

impl NumericRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// 两端均包含；min > max 时为空区间
    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

// ==========================================
// DateRange - 日期闭区间（任一端可开放）
// ==========================================
// ISO 定长日期按字典序比较即等价于时间顺序
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl DateRange {
    /// 构造区间，空字符串视为开放端
    pub fn new(from: Option<&str>, to: Option<&str>) -> Self {
        let bound = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            from: bound(from),
            to: bound(to),
        }
    }

    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, date: &str) -> bool {
        if let Some(from) = &self.from {
            if date < from.as_str() {
                return false;
            }
        }
        if let Some(to) = &self.to {
            if date > to.as_str() {
                return false;
            }
        }
        true
    }
}

// ==========================================
// PredicateStage - 判定阶段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredicateStage {
    Search,
    Categorical(CategoricalColumn),
    DateRange,
    LeadTimeRange,
    RiskScoreRange,
}

// ==========================================
// PredicateSet - 筛选条件集
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateSet {
    search_query: String,
    categorical_filters: BTreeMap<CategoricalColumn, BTreeSet<String>>,
    date_range: DateRange,
    lead_time_range: NumericRange,
    risk_score_range: NumericRange,
}

impl PredicateSet {
    /// 以分面索引的观测上下界初始化（此时不过滤任何记录）
    pub fn new(facets: &FacetIndex) -> Self {
        Self {
            search_query: String::new(),
            categorical_filters: BTreeMap::new(),
            date_range: DateRange::default(),
            lead_time_range: facets.bounds(RangeField::LeadTime),
            risk_score_range: facets.bounds(RangeField::RiskScore),
        }
    }

    // ==========================================
    // 判定
    // ==========================================

    /// 记录是否通过全部条件
    pub fn passes(&self, record: &OrderRecord) -> bool {
        self.first_failing_stage(record).is_none()
    }

    /// 第一个未通过的阶段（按固定顺序短路）
    pub fn first_failing_stage(&self, record: &OrderRecord) -> Option<PredicateStage> {
        if !self.matches_search(record) {
            return Some(PredicateStage::Search);
        }

        for (column, selected) in &self.categorical_filters {
            if !selected.is_empty() && !selected.contains(record.categorical_value(*column)) {
                return Some(PredicateStage::Categorical(*column));
            }
        }

        if !self.date_range.contains(&record.req_delivery_date) {
            return Some(PredicateStage::DateRange);
        }
        if !self
            .lead_time_range
            .contains(record.range_value(RangeField::LeadTime))
        {
            return Some(PredicateStage::LeadTimeRange);
        }
        if !self
            .risk_score_range
            .contains(record.range_value(RangeField::RiskScore))
        {
            return Some(PredicateStage::RiskScoreRange);
        }
        None
    }

    /// 检索: 不区分大小写子串匹配，任一列命中即可
    fn matches_search(&self, record: &OrderRecord) -> bool {
        if self.search_query.is_empty() {
            return true;
        }
        let needle = self.search_query.to_lowercase();
        [
            &record.sales_order,
            &record.customer,
            &record.material_description,
            &record.plant,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    // ==========================================
    // 变更（整体替换子状态）
    // ==========================================

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// 切换分类取值: 不存在则加入，存在则移除；集合为空时移除整列
    pub fn toggle_categorical_value(&mut self, column: CategoricalColumn, value: &str) {
        let mut selected = self
            .categorical_filters
            .get(&column)
            .cloned()
            .unwrap_or_default();

        if !selected.remove(value) {
            selected.insert(value.to_string());
        }

        if selected.is_empty() {
            self.categorical_filters.remove(&column);
        } else {
            self.categorical_filters.insert(column, selected);
        }
    }

    /// 整体设置列的选中取值（空集合等价于清除）
    pub fn set_categorical_values<I, S>(&mut self, column: CategoricalColumn, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selected: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if selected.is_empty() {
            self.categorical_filters.remove(&column);
        } else {
            self.categorical_filters.insert(column, selected);
        }
    }

    pub fn clear_column(&mut self, column: CategoricalColumn) {
        self.categorical_filters.remove(&column);
    }

    pub fn clear_all_columns(&mut self) {
        self.categorical_filters = BTreeMap::new();
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
    }

    pub fn clear_date_range(&mut self) {
        self.date_range = DateRange::default();
    }

    pub fn set_numeric_range(&mut self, field: RangeField, range: NumericRange) {
        match field {
            RangeField::LeadTime => self.lead_time_range = range,
            RangeField::RiskScore => self.risk_score_range = range,
        }
    }

    /// 恢复为分面索引的观测上下界
    pub fn clear_numeric_range(&mut self, field: RangeField, facets: &FacetIndex) {
        self.set_numeric_range(field, facets.bounds(field));
    }

    /// 清除全部筛选（分类 / 日期 / 数值区间），不含检索词
    pub fn clear_filters(&mut self, facets: &FacetIndex) {
        self.clear_all_columns();
        self.clear_date_range();
        self.clear_numeric_range(RangeField::LeadTime, facets);
        self.clear_numeric_range(RangeField::RiskScore, facets);
    }

    // ==========================================
    // 查询（供渲染层显示"已激活"状态）
    // ==========================================

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn selected_values(&self, column: CategoricalColumn) -> Option<&BTreeSet<String>> {
        self.categorical_filters.get(&column)
    }

    pub fn categorical_filters(&self) -> &BTreeMap<CategoricalColumn, BTreeSet<String>> {
        &self.categorical_filters
    }

    pub fn date_range(&self) -> &DateRange {
        &self.date_range
    }

    pub fn numeric_range(&self, field: RangeField) -> NumericRange {
        match field {
            RangeField::LeadTime => self.lead_time_range,
            RangeField::RiskScore => self.risk_score_range,
        }
    }

    pub fn is_column_active(&self, column: CategoricalColumn) -> bool {
        self.categorical_filters
            .get(&column)
            .is_some_and(|selected| !selected.is_empty())
    }

    /// 与观测上下界不同即视为激活（仅用于展示，不影响判定）
    pub fn is_numeric_range_active(&self, field: RangeField, facets: &FacetIndex) -> bool {
        self.numeric_range(field) != facets.bounds(field)
    }

    /// 是否存在任何筛选（不含检索词），驱动"清除全部筛选"入口
    pub fn has_active_filters(&self, facets: &FacetIndex) -> bool {
        !self.categorical_filters.is_empty()
            || !self.date_range.is_open()
            || self.is_numeric_range_active(RangeField::LeadTime, facets)
            || self.is_numeric_range_active(RangeField::RiskScore, facets)
    }
}
