// ==========================================
// OTIF 交付风险分析 - 汇总指标
// ==========================================
// 职责: 全量订单集合的 OTIF 命中 / 未命中统计（不受筛选影响）
// ==========================================

use crate::domain::order::OrderRecord;
use crate::domain::types::OtifStatus;
use serde::Serialize;

// ==========================================
// SummaryMetrics - 汇总指标
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total: usize,
    pub miss: usize,
    pub hit: usize,
    pub miss_rate: f64, // 百分比，空集合为 0
}

impl SummaryMetrics {
    /// 统计订单集合
    pub fn compute(records: &[OrderRecord]) -> Self {
        let total = records.len();
        let miss = records
            .iter()
            .filter(|r| r.otif_status == OtifStatus::Miss)
            .count();
        let hit = total - miss;
        let miss_rate = if total == 0 {
            0.0
        } else {
            miss as f64 / total as f64 * 100.0
        };

        Self {
            total,
            miss,
            hit,
            miss_rate,
        }
    }

    /// 未命中率展示文本（一位小数）
    pub fn miss_rate_display(&self) -> String {
        format!("{:.1}%", self.miss_rate)
    }

    /// 状态分布（图表数据）
    pub fn distribution(&self) -> [(&'static str, usize); 2] {
        [
            (OtifStatus::Miss.badge_label(), self.miss),
            (OtifStatus::Hit.badge_label(), self.hit),
        ]
    }
}
