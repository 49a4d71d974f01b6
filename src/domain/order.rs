// ==========================================
// OTIF 交付风险分析 - 订单领域模型
// ==========================================
// 职责: 订单记录（规范化后不可变）+ 导入中间结构 + DQ 报告
// ==========================================

use crate::domain::types::{CategoricalColumn, OtifStatus, RangeField};
use serde::{Deserialize, Serialize};

/// 风险信号拼接分隔符（表格展示 / 导出共用）
pub const SIGNAL_SEPARATOR: &str = "; ";

// ==========================================
// OrderRecord - 订单记录
// ==========================================
// 每个输入行对应一条；规范化后整个会话内只读
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub sales_order: String,          // 销售订单号（不保证唯一）
    pub customer: String,             // 客户名称
    pub material_description: String, // 物料描述
    pub plant: String,                // 工厂
    pub req_delivery_date: String,    // 要求交货日期（ISO 字符串，按字典序比较）
    pub lead_time_days: u32,          // 提前期（天，派生，>= 0）
    pub risk_score_percent: u8,       // 风险分（0-100，派生）
    pub otif_status: OtifStatus,      // OTIF 状态（派生）
    pub top_risk_signals: Vec<String>, // 风险信号（派生，非空）
    pub source_create_date: String,   // 订单创建日期（仅用于提前期派生）
}

impl OrderRecord {
    /// 分类列的字符串化取值（筛选 / 分面共用口径）
    pub fn categorical_value(&self, column: CategoricalColumn) -> &str {
        match column {
            CategoricalColumn::SalesOrder => &self.sales_order,
            CategoricalColumn::Customer => &self.customer,
            CategoricalColumn::MaterialDescription => &self.material_description,
            CategoricalColumn::Plant => &self.plant,
            CategoricalColumn::OtifStatus => self.otif_status.as_str(),
        }
    }

    /// 数值区间列取值
    pub fn range_value(&self, field: RangeField) -> i64 {
        match field {
            RangeField::LeadTime => i64::from(self.lead_time_days),
            RangeField::RiskScore => i64::from(self.risk_score_percent),
        }
    }

    /// 风险信号拼接文本
    pub fn signals_joined(&self) -> String {
        self.top_risk_signals.join(SIGNAL_SEPARATOR)
    }

    /// 渲染用复合行键（订单号可能重复，需拼接行位置）
    pub fn row_key(&self, position: usize) -> String {
        format!("{}-{}", self.sales_order, position)
    }
}

// ==========================================
// RawOrderRecord - 导入中间结构
// ==========================================
// 用途: 字段映射后的原始值（未派生），缺失列 / 空单元格为 None
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOrderRecord {
    pub sales_order: Option<String>,
    pub customer_name: Option<String>,
    pub material_description: Option<String>,
    pub plant: Option<String>,
    pub requested_delivery_date: Option<String>,
    pub so_create_date: Option<String>,
    pub prob_miss: Option<String>,
    pub otif_hit_miss: Option<String>,

    // 元信息
    pub row_number: usize,
}

// ==========================================
// DQ 问题（降级记录，不阻断导入）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqIssueKind {
    MissingField,       // 字段缺失，使用默认值
    InvalidDate,        // 日期无法解析，提前期回退为 0
    InvalidProbability, // 概率无法解析，风险分回退为 0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DqIssue {
    pub row_number: usize,
    pub kind: DqIssueKind,
    pub field: String,
    pub raw_value: Option<String>,
}

// ==========================================
// DqReport - 导入质量汇总
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DqReport {
    pub total_rows: usize,        // 总行数
    pub degraded_rows: usize,     // 存在降级字段的行数
    pub missing_fields: usize,    // 缺失字段次数
    pub invalid_dates: usize,     // 日期解析失败次数
    pub invalid_probabilities: usize, // 概率解析失败次数
    pub issues: Vec<DqIssue>,     // 明细
}

impl DqReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// 合并单行问题
    pub fn absorb_row(&mut self, issues: Vec<DqIssue>) {
        self.total_rows += 1;
        if issues.is_empty() {
            return;
        }
        self.degraded_rows += 1;
        for issue in &issues {
            match issue.kind {
                DqIssueKind::MissingField => self.missing_fields += 1,
                DqIssueKind::InvalidDate => self.invalid_dates += 1,
                DqIssueKind::InvalidProbability => self.invalid_probabilities += 1,
            }
        }
        self.issues.extend(issues);
    }
}

// ==========================================
// ImportOutcome - 导入结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub source: String,             // 来源文件
    pub records: Vec<OrderRecord>,  // 规范化订单（保持文件行序）
    pub dq_report: DqReport,        // 质量汇总
    pub elapsed_time: std::time::Duration, // 导入耗时
}
