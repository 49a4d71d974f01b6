// ==========================================
// OTIF 交付风险分析 - 查询引擎
// ==========================================
// 职责: 过滤 → 排序 → 分页
// 输入: 只读订单集合 + 筛选条件集 + 排序 / 分页状态
// 输出: 过滤后的有序视图（借用原集合，不复制记录）
// 红线: 排序必须稳定，等值记录保持输入相对顺序
// ==========================================

use crate::domain::order::OrderRecord;
use crate::domain::types::{SortDirection, SortField};
use crate::engine::predicate::PredicateSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ==========================================
// ViewState - 排序 / 分页状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub page_index: usize, // 从 1 开始
    pub page_size: usize,
}

impl ViewState {
    pub fn new(sort_field: SortField, sort_direction: SortDirection, page_size: usize) -> Self {
        assert!(page_size > 0, "page_size must be positive");
        Self {
            sort_field,
            sort_direction,
            page_index: 1,
            page_size,
        }
    }
}

// ==========================================
// QueryResult - 查询结果（当前页）
// ==========================================
#[derive(Debug, Clone)]
pub struct QueryResult<'a> {
    pub page: Vec<&'a OrderRecord>,
    pub total_filtered: usize,
    pub page_index: usize, // 已钳制后的页码
    pub total_pages: usize,
}

// ==========================================
// QueryEngine - 查询引擎
// ==========================================
pub struct QueryEngine {
    // 无状态引擎，不持有数据
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryEngine {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 过滤（单次遍历，保持原相对顺序）
    pub fn filter<'a>(
        &self,
        records: &'a [OrderRecord],
        predicates: &PredicateSet,
    ) -> Vec<&'a OrderRecord> {
        records.iter().filter(|r| predicates.passes(r)).collect()
    }

    /// 稳定排序（降序仅反转比较结果，等值记录顺序不变）
    pub fn sort<'a>(
        &self,
        mut records: Vec<&'a OrderRecord>,
        field: SortField,
        direction: SortDirection,
    ) -> Vec<&'a OrderRecord> {
        // slice::sort_by 为稳定排序
        records.sort_by(|a, b| {
            let ordering = compare_by_field(a, b, field);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        records
    }

    /// 分页（page_index 从 1 开始，越界返回空页）
    ///
    /// # Panics
    /// page_size 或 page_index 为 0 时（调用方契约违反）
    pub fn paginate<'s, T>(
        &self,
        records: &'s [T],
        page_index: usize,
        page_size: usize,
    ) -> &'s [T] {
        assert!(page_size > 0, "page_size must be positive");
        assert!(page_index >= 1, "page_index is 1-based");

        let start = (page_index - 1).saturating_mul(page_size);
        if start >= records.len() {
            return &[];
        }
        let end = start.saturating_add(page_size).min(records.len());
        &records[start..end]
    }

    /// 总页数（至少 1 页）
    pub fn total_pages(&self, total: usize, page_size: usize) -> usize {
        assert!(page_size > 0, "page_size must be positive");
        total.div_ceil(page_size).max(1)
    }

    /// 钳制页码到 [1, total_pages]
    pub fn clamp_page_index(&self, page_index: usize, total: usize, page_size: usize) -> usize {
        page_index.clamp(1, self.total_pages(total, page_size))
    }

    // ==========================================
    // 组合流程
    // ==========================================

    /// 过滤 → 排序（导出视图，不分页）
    pub fn sorted_view<'a>(
        &self,
        records: &'a [OrderRecord],
        predicates: &PredicateSet,
        state: &ViewState,
    ) -> Vec<&'a OrderRecord> {
        let filtered = self.filter(records, predicates);
        self.sort(filtered, state.sort_field, state.sort_direction)
    }

    /// 过滤 → 排序 → 分页
    pub fn run<'a>(
        &self,
        records: &'a [OrderRecord],
        predicates: &PredicateSet,
        state: &ViewState,
    ) -> QueryResult<'a> {
        let sorted = self.sorted_view(records, predicates, state);
        let total_filtered = sorted.len();
        let page_index = self.clamp_page_index(state.page_index, total_filtered, state.page_size);
        let page = self
            .paginate(&sorted, page_index, state.page_size)
            .to_vec();

        QueryResult {
            page,
            total_filtered,
            page_index,
            total_pages: self.total_pages(total_filtered, state.page_size),
        }
    }
}

/// 按列自然顺序比较（字符串 / ISO 日期按字典序，整数按数值）
pub fn compare_by_field(a: &OrderRecord, b: &OrderRecord, field: SortField) -> Ordering {
    match field {
        SortField::SalesOrder => a.sales_order.cmp(&b.sales_order),
        SortField::Customer => a.customer.cmp(&b.customer),
        SortField::MaterialDescription => a.material_description.cmp(&b.material_description),
        SortField::ReqDeliveryDate => a.req_delivery_date.cmp(&b.req_delivery_date),
        SortField::LeadTime => a.lead_time_days.cmp(&b.lead_time_days),
        SortField::RiskScore => a.risk_score_percent.cmp(&b.risk_score_percent),
    }
}
