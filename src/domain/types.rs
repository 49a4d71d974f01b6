// ==========================================
// OTIF 交付风险分析 - 领域类型定义
// ==========================================
// 职责: 订单视图使用的枚举类型（状态 / 排序 / 筛选列）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// OTIF 状态 (OTIF Status)
// ==========================================
// 二值: 源字段仅字面量 "Hit" 映射为 Hit，其余一律 Miss
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OtifStatus {
    Hit,
    Miss,
}

impl OtifStatus {
    /// 源字段字面量（区分大小写）
    pub const HIT_LITERAL: &'static str = "Hit";
    pub const MISS_LITERAL: &'static str = "Miss";

    pub fn as_str(&self) -> &'static str {
        match self {
            OtifStatus::Hit => Self::HIT_LITERAL,
            OtifStatus::Miss => Self::MISS_LITERAL,
        }
    }

    /// 展示标签（徽章文本）
    pub fn badge_label(&self) -> &'static str {
        match self {
            OtifStatus::Hit => "OTIF Hit",
            OtifStatus::Miss => "OTIF Miss",
        }
    }
}

impl fmt::Display for OtifStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 排序方向 (Sort Direction)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

// ==========================================
// 可排序列 (Sort Field)
// ==========================================
// Plant / OTIFStatus 只可筛选，不可排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    SalesOrder,
    Customer,
    MaterialDescription,
    ReqDeliveryDate,
    LeadTime,
    RiskScore,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::SalesOrder,
        SortField::Customer,
        SortField::MaterialDescription,
        SortField::ReqDeliveryDate,
        SortField::LeadTime,
        SortField::RiskScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::SalesOrder => "SalesOrder",
            SortField::Customer => "Customer",
            SortField::MaterialDescription => "MaterialDescription",
            SortField::ReqDeliveryDate => "ReqDeliveryDate",
            SortField::LeadTime => "LeadTime",
            SortField::RiskScore => "RiskScore",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("未知排序列: {}", s))
    }
}

// ==========================================
// 分类筛选列 (Categorical Column)
// ==========================================
// 多选筛选菜单对应的列，取值按字符串比较
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoricalColumn {
    SalesOrder,
    Customer,
    MaterialDescription,
    Plant,
    OtifStatus,
}

impl CategoricalColumn {
    pub const ALL: [CategoricalColumn; 5] = [
        CategoricalColumn::SalesOrder,
        CategoricalColumn::Customer,
        CategoricalColumn::MaterialDescription,
        CategoricalColumn::Plant,
        CategoricalColumn::OtifStatus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoricalColumn::SalesOrder => "SalesOrder",
            CategoricalColumn::Customer => "Customer",
            CategoricalColumn::MaterialDescription => "MaterialDescription",
            CategoricalColumn::Plant => "Plant",
            CategoricalColumn::OtifStatus => "OTIFStatus",
        }
    }
}

impl fmt::Display for CategoricalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CategoricalColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoricalColumn::ALL
            .iter()
            .copied()
            .find(|column| column.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("未知筛选列: {}", s))
    }
}

// ==========================================
// 数值区间列 (Range Field)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RangeField {
    LeadTime,
    RiskScore,
}

impl fmt::Display for RangeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeField::LeadTime => write!(f, "LeadTime"),
            RangeField::RiskScore => write!(f, "RiskScore"),
        }
    }
}
