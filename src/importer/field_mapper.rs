// ==========================================
// OTIF 交付风险分析 - 字段映射器实现
// ==========================================
// 职责: 源列名 → RawOrderRecord（不做类型转换）
// ==========================================

use crate::domain::order::RawOrderRecord;
use crate::importer::order_importer_trait::{FieldMapper as FieldMapperTrait, RawRow};

/// OTIF 导出文件的源列名
pub mod source_columns {
    pub const SALES_ORDER: &str = "Sales order";
    pub const CUSTOMER_NAME: &str = "Customer Name";
    pub const MATERIAL_DESCRIPTION: &str = "Material description";
    pub const PLANT: &str = "Plant";
    pub const REQUESTED_DELIVERY_DATE: &str = "Requested Delivery Date";
    pub const SO_CREATE_DATE: &str = "SO create date";
    pub const PROB_MISS: &str = "prob_miss";
    pub const OTIF_HIT_MISS: &str = "OTIF_HIT/MISS";

    /// 判定"是否为 OTIF 模板"的最小标识列
    pub const REQUIRED: &[&str] = &[SALES_ORDER];
}

use source_columns::*;

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn map_to_raw_order(&self, row: &RawRow, row_number: usize) -> RawOrderRecord {
        RawOrderRecord {
            sales_order: self.get_string(row, SALES_ORDER),
            customer_name: self.get_string(row, CUSTOMER_NAME),
            material_description: self.get_string(row, MATERIAL_DESCRIPTION),
            plant: self.get_string(row, PLANT),
            requested_delivery_date: self.get_string(row, REQUESTED_DELIVERY_DATE),
            so_create_date: self.get_string(row, SO_CREATE_DATE),
            prob_miss: self.get_string(row, PROB_MISS),
            otif_hit_miss: self.get_string(row, OTIF_HIT_MISS),
            row_number,
        }
    }
}

impl FieldMapper {
    /// 提取字符串字段，空单元格视为缺失
    fn get_string(&self, row: &RawRow, key: &str) -> Option<String> {
        row.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}
