// ==========================================
// OTIF 交付风险分析 - 视图导出
// ==========================================
// 职责: 过滤 + 排序后的完整视图 → 逗号分隔文本（非当前页）
// 格式: 固定表头 + 固定列序，行分隔符 "\n"，无结尾换行
// ==========================================
// 引号规则: 仅包裹，不转义内部双引号（下游按字节比对，保持原格式）
// ==========================================

use crate::domain::order::OrderRecord;

/// 导出文件的内容类型声明
pub const EXPORT_CONTENT_TYPE: &str = "text/csv;charset=utf-8;";

/// 固定表头（列序即导出列序）
pub const EXPORT_HEADERS: [&str; 9] = [
    "Sales Order",
    "Customer",
    "Material Description",
    "Plant",
    "Req. Delivery",
    "Lead Time",
    "Risk Score",
    "OTIF Status",
    "Top Risk Signals",
];

const DELIMITER: char = ',';
const LINE_SEPARATOR: &str = "\n";

/// 无条件包裹双引号（自由文本列）
fn quoted(value: &str) -> String {
    format!("\"{}\"", value)
}

/// 含分隔符 / 引号 / 换行时才包裹
fn quoted_if_needed(value: &str) -> String {
    if value.contains(&[DELIMITER, '"', '\n', '\r'][..]) {
        quoted(value)
    } else {
        value.to_string()
    }
}

// ==========================================
// ViewExporter - 视图导出
// ==========================================
pub struct ViewExporter;

impl ViewExporter {
    /// 单行序列化
    pub fn serialize_row(record: &OrderRecord) -> String {
        let fields = [
            quoted_if_needed(&record.sales_order),
            quoted(&record.customer),
            quoted(&record.material_description),
            quoted_if_needed(&record.plant),
            quoted_if_needed(&record.req_delivery_date),
            record.lead_time_days.to_string(),
            record.risk_score_percent.to_string(),
            record.otif_status.to_string(),
            quoted(&record.signals_joined()),
        ];
        fields.join(&DELIMITER.to_string())
    }

    /// 序列化完整视图（表头 + 每条记录一行）
    pub fn serialize<'a, I>(records: I) -> String
    where
        I: IntoIterator<Item = &'a OrderRecord>,
    {
        let header = EXPORT_HEADERS.join(&DELIMITER.to_string());
        std::iter::once(header)
            .chain(records.into_iter().map(Self::serialize_row))
            .collect::<Vec<_>>()
            .join(LINE_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::OtifStatus;

    fn order(so: &str, customer: &str, plant: &str) -> OrderRecord {
        OrderRecord {
            sales_order: so.to_string(),
            customer: customer.to_string(),
            material_description: "Coil 2mm".to_string(),
            plant: plant.to_string(),
            req_delivery_date: "2024-06-30".to_string(),
            lead_time_days: 4,
            risk_score_percent: 88,
            otif_status: OtifStatus::Miss,
            top_risk_signals: vec![
                "High probability of delay".to_string(),
                "Tight lead time".to_string(),
            ],
            source_create_date: "2024-06-26".to_string(),
        }
    }

    #[test]
    fn test_header_only_for_empty_view() {
        let text = ViewExporter::serialize(std::iter::empty());
        assert_eq!(
            text,
            "Sales Order,Customer,Material Description,Plant,Req. Delivery,Lead Time,Risk Score,OTIF Status,Top Risk Signals"
        );
    }

    #[test]
    fn test_row_layout() {
        let record = order("SO-1", "Acme", "P1");
        assert_eq!(
            ViewExporter::serialize_row(&record),
            "SO-1,\"Acme\",\"Coil 2mm\",P1,2024-06-30,4,88,Miss,\"High probability of delay; Tight lead time\""
        );
    }

    #[test]
    fn test_delimiter_in_plain_column_is_quoted() {
        let record = order("SO,1", "Acme", "Plant, North");
        let row = ViewExporter::serialize_row(&record);
        assert!(row.starts_with("\"SO,1\",\"Acme\""));
        assert!(row.contains(",\"Plant, North\","));
    }

    #[test]
    fn test_embedded_quote_is_wrapped_not_escaped() {
        let record = order("SO-1", "The \"Best\" Co", "P1");
        let row = ViewExporter::serialize_row(&record);
        assert!(row.contains(",\"The \"Best\" Co\","));
    }

    #[test]
    fn test_rows_joined_without_trailing_newline() {
        let records = [order("SO-1", "A", "P1"), order("SO-2", "B", "P2")];
        let text = ViewExporter::serialize(records.iter());
        assert_eq!(text.lines().count(), 3);
        assert!(!text.ends_with('\n'));
    }
}
