// ==========================================
// OTIF 交付风险分析 - 分面索引
// ==========================================
// 职责: 每个分类列的去重取值（筛选菜单）+ 数值列观测上下界（区间默认值）
// 生命周期: 订单集合替换时整体重建，不做增量修补
// ==========================================

use crate::domain::order::OrderRecord;
use crate::domain::types::{CategoricalColumn, RangeField};
use crate::engine::predicate::NumericRange;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// 空集合时数值列的默认上下界
pub const EMPTY_BOUNDS: NumericRange = NumericRange { min: 0, max: 100 };

// ==========================================
// FacetIndex - 分面索引
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetIndex {
    distinct_values: BTreeMap<CategoricalColumn, Vec<String>>,
    truncated: BTreeSet<CategoricalColumn>,
    lead_time_bounds: NumericRange,
    risk_score_bounds: NumericRange,
}

impl Default for FacetIndex {
    fn default() -> Self {
        Self::build(&[])
    }
}

impl FacetIndex {
    /// 构建完整分面索引（不限取值数量）
    pub fn build(records: &[OrderRecord]) -> Self {
        Self::build_with_limit(records, None)
    }

    /// 构建分面索引，每列最多保留 `limit` 个取值（按字典序取前 N 个）
    ///
    /// # 复杂度
    /// O(n · k)，k 为分类列数
    pub fn build_with_limit(records: &[OrderRecord], limit: Option<usize>) -> Self {
        let mut distinct_values = BTreeMap::new();
        let mut truncated = BTreeSet::new();

        for column in CategoricalColumn::ALL {
            let values: BTreeSet<&str> = records
                .iter()
                .map(|record| record.categorical_value(column))
                .collect();

            let total = values.len();
            let keep = limit.unwrap_or(total).min(total);
            if keep < total {
                truncated.insert(column);
                debug!(column = %column, total, keep, "分面取值超出上限，已截断");
            }
            distinct_values.insert(
                column,
                values.into_iter().take(keep).map(str::to_string).collect(),
            );
        }

        Self {
            distinct_values,
            truncated,
            lead_time_bounds: observed_bounds(records, RangeField::LeadTime),
            risk_score_bounds: observed_bounds(records, RangeField::RiskScore),
        }
    }

    /// 列的去重取值（升序）
    pub fn values(&self, column: CategoricalColumn) -> &[String] {
        self.distinct_values
            .get(&column)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 列取值是否因上限被截断
    pub fn is_truncated(&self, column: CategoricalColumn) -> bool {
        self.truncated.contains(&column)
    }

    /// 数值列观测上下界
    pub fn bounds(&self, field: RangeField) -> NumericRange {
        match field {
            RangeField::LeadTime => self.lead_time_bounds,
            RangeField::RiskScore => self.risk_score_bounds,
        }
    }
}

/// 观测上下界，空集合返回 EMPTY_BOUNDS
fn observed_bounds(records: &[OrderRecord], field: RangeField) -> NumericRange {
    let mut values = records.iter().map(|record| record.range_value(field));
    let Some(first) = values.next() else {
        return EMPTY_BOUNDS;
    };

    let (min, max) = values.fold((first, first), |(min, max), v| (min.min(v), max.max(v)));
    NumericRange { min, max }
}
