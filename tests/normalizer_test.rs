// ==========================================
// 订单规范化集成测试
// ==========================================
// 测试范围: 原始行 → 字段映射 → 派生字段 → DQ 汇总
// ==========================================

mod helpers;

use helpers::test_data_builder::*;
use otif_risk::config::RiskSignalRules;
use otif_risk::domain::order::DqIssueKind;
use otif_risk::domain::types::OtifStatus;
use otif_risk::importer::{
    FieldMapper, FieldMapperImpl, OrderImporterImpl, OrderNormalizer, RecordNormalizer,
};
use std::sync::Arc;

fn normalize(pairs: &[(&str, &str)]) -> otif_risk::OrderRecord {
    let raw = FieldMapperImpl.map_to_raw_order(&raw_row(pairs), 1);
    OrderNormalizer::default().normalize(&raw).0
}

#[test]
fn test_row_missing_every_optional_field_keeps_invariants() {
    let raw = FieldMapperImpl.map_to_raw_order(&raw_row(&[("Sales order", "")]), 1);
    let (record, issues) = OrderNormalizer::default().normalize(&raw);

    assert_eq!(record.sales_order, "N/A");
    assert_eq!(record.customer, "Unknown");
    assert_eq!(record.material_description, "N/A");
    assert_eq!(record.plant, "Unknown");
    assert_eq!(record.req_delivery_date, "");
    assert_eq!(record.lead_time_days, 0);
    assert_eq!(record.risk_score_percent, 0);
    assert_eq!(record.otif_status, OtifStatus::Miss);
    assert_eq!(record.top_risk_signals, ["No significant risk factors"]);
    assert!(issues.iter().all(|i| i.kind == DqIssueKind::MissingField));
    assert_eq!(issues.len(), 8);
}

#[test]
fn test_full_row_derivation() {
    let record = normalize(&[
        ("Sales order", "SO-77"),
        ("Customer Name", "Acme"),
        ("Material description", "Coil"),
        ("Plant", "P100"),
        ("Requested Delivery Date", "2024-03-05"),
        ("SO create date", "2024-03-01"),
        ("prob_miss", "0.86"),
        ("OTIF_HIT/MISS", "Miss"),
    ]);

    assert_eq!(record.lead_time_days, 4);
    assert_eq!(record.risk_score_percent, 86);
    assert_eq!(record.otif_status, OtifStatus::Miss);
    assert_eq!(
        record.top_risk_signals,
        ["High probability of delay", "Tight lead time", "Historical Miss pattern"]
    );
}

#[test]
fn test_lowercase_hit_normalizes_to_miss() {
    let record = normalize(&[("Sales order", "SO-1"), ("OTIF_HIT/MISS", "hit")]);
    assert_eq!(record.otif_status, OtifStatus::Miss);
    // 非字面量 "Miss"，不触发历史未命中信号
    assert!(!record
        .top_risk_signals
        .iter()
        .any(|s| s == "Historical Miss pattern"));
}

#[test]
fn test_negative_lead_time_clamps_to_zero() {
    let record = normalize(&[
        ("Sales order", "SO-2"),
        ("Requested Delivery Date", "2024-01-01"),
        ("SO create date", "2024-01-10"),
        ("prob_miss", "0.1"),
        ("OTIF_HIT/MISS", "Hit"),
    ]);
    assert_eq!(record.lead_time_days, 0);
    assert_eq!(record.top_risk_signals, ["Tight lead time"]);
}

#[test]
fn test_partial_day_rounds_up() {
    let record = normalize(&[
        ("Sales order", "SO-3"),
        ("Requested Delivery Date", "2024-01-11 06:00:00"),
        ("SO create date", "2024-01-01"),
        ("OTIF_HIT/MISS", "Hit"),
    ]);
    assert_eq!(record.lead_time_days, 11);
}

#[test]
fn test_unparseable_values_degrade_with_issues() {
    let raw = FieldMapperImpl.map_to_raw_order(
        &raw_row(&[
            ("Sales order", "SO-4"),
            ("Requested Delivery Date", "next week"),
            ("SO create date", "2024-01-01"),
            ("prob_miss", "unknown"),
            ("OTIF_HIT/MISS", "Hit"),
        ]),
        9,
    );
    let (record, issues) = OrderNormalizer::default().normalize(&raw);

    assert_eq!(record.lead_time_days, 0);
    assert_eq!(record.risk_score_percent, 0);
    assert_eq!(record.req_delivery_date, "next week");
    assert!(issues
        .iter()
        .any(|i| i.kind == DqIssueKind::InvalidDate && i.row_number == 9));
    assert!(issues.iter().any(|i| i.kind == DqIssueKind::InvalidProbability));
}

#[test]
fn test_probability_prefix_and_bounds() {
    let score =
        |prob: &str| normalize(&[("Sales order", "SO"), ("prob_miss", prob)]).risk_score_percent;
    assert_eq!(score("0.42xyz"), 42);
    assert_eq!(score("1.7"), 100);
    assert_eq!(score("-0.3"), 0);
    assert_eq!(score("1"), 100);
}

#[test]
fn test_custom_thresholds() {
    let normalizer = OrderNormalizer::new(RiskSignalRules {
        high_risk_threshold: 50,
        tight_lead_time_days: 2,
    });
    let raw = FieldMapperImpl.map_to_raw_order(
        &raw_row(&[
            ("Sales order", "SO-5"),
            ("Requested Delivery Date", "2024-01-04"),
            ("SO create date", "2024-01-01"),
            ("prob_miss", "0.6"),
            ("OTIF_HIT/MISS", "Hit"),
        ]),
        1,
    );
    let (record, _) = normalizer.normalize(&raw);
    assert_eq!(record.top_risk_signals, ["High probability of delay"]);
}

#[test]
fn test_import_rows_keeps_row_order_and_reports_dq() {
    let importer = OrderImporterImpl::new(
        Arc::new(FieldMapperImpl),
        Arc::new(OrderNormalizer::default()),
    );
    let rows = vec![
        raw_row(&[("Sales order", "SO-B"), ("prob_miss", "0.2"), ("OTIF_HIT/MISS", "Hit")]),
        raw_row(&[("Sales order", "SO-A"), ("prob_miss", "bad"), ("OTIF_HIT/MISS", "Hit")]),
    ];

    let (records, dq_report) = importer.import_rows(rows).unwrap();
    assert_eq!(records[0].sales_order, "SO-B");
    assert_eq!(records[1].sales_order, "SO-A");
    assert_eq!(dq_report.total_rows, 2);
    assert_eq!(dq_report.degraded_rows, 2);
    assert_eq!(dq_report.invalid_probabilities, 1);
}
