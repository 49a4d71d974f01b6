// ==========================================
// OTIF 交付风险分析 - 订单规范化（字段派生）
// ==========================================
// 职责: lead_time_days / risk_score_percent / otif_status / top_risk_signals 派生
// 红线: 永不失败，缺失 / 非法字段降级为默认值
// ==========================================

use crate::config::RiskSignalRules;
use crate::domain::order::{DqIssue, DqIssueKind, OrderRecord, RawOrderRecord};
use crate::domain::types::OtifStatus;
use crate::importer::field_mapper::source_columns;
use crate::importer::order_importer_trait::RecordNormalizer;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

// 风险信号文本
pub const SIGNAL_HIGH_PROBABILITY: &str = "High probability of delay";
pub const SIGNAL_TIGHT_LEAD_TIME: &str = "Tight lead time";
pub const SIGNAL_HISTORICAL_MISS: &str = "Historical Miss pattern";
pub const SIGNAL_NONE: &str = "No significant risk factors";

// 缺失字段默认值
pub const DEFAULT_IDENTIFIER: &str = "N/A";
pub const DEFAULT_NAME: &str = "Unknown";

const MILLIS_PER_DAY: i64 = 86_400_000;

// ==========================================
// 日期解析
// ==========================================

/// 解析日期或日期时间（日期按 00:00:00 处理）
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// 按前缀解析浮点数（"0.42abc" → 0.42），无数字前缀返回 None
pub fn parse_float_prefix(value: &str) -> Option<f64> {
    let s = value.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }

    // 指数部分仅在完整时纳入
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

// ==========================================
// OrderNormalizer - 订单规范化
// ==========================================
pub struct OrderNormalizer {
    rules: RiskSignalRules,
}

impl Default for OrderNormalizer {
    fn default() -> Self {
        Self::new(RiskSignalRules::default())
    }
}

impl OrderNormalizer {
    pub fn new(rules: RiskSignalRules) -> Self {
        Self { rules }
    }

    /// 派生原始提前期（天，向上取整，未截断）
    ///
    /// # 返回
    /// - Some(days): 两个日期均可解析
    /// - None: 任一日期缺失或非法
    pub fn derive_raw_lead_time(
        &self,
        create_date: Option<&str>,
        req_date: Option<&str>,
    ) -> Option<i64> {
        let create = parse_datetime(create_date?)?;
        let req = parse_datetime(req_date?)?;
        let millis = (req - create).num_milliseconds();

        let days = millis.div_euclid(MILLIS_PER_DAY);
        if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
            Some(days + 1)
        } else {
            Some(days)
        }
    }

    /// 截断为非负提前期（无法计算时为 0）
    pub fn clamp_lead_time(raw: Option<i64>) -> u32 {
        raw.map(|days| u32::try_from(days.max(0)).unwrap_or(u32::MAX))
            .unwrap_or(0)
    }

    /// 派生风险分: round(prob × 100)，截断到 [0, 100]
    ///
    /// 四舍五入采用"半数向上"口径（与表格展示一致）
    pub fn derive_risk_score(probability: f64) -> u8 {
        if !probability.is_finite() {
            return 0;
        }
        let score = (probability * 100.0 + 0.5).floor();
        score.clamp(0.0, 100.0) as u8
    }

    /// 派生 OTIF 状态（仅字面量 "Hit" → Hit）
    pub fn derive_otif_status(flag: Option<&str>) -> OtifStatus {
        match flag {
            Some(OtifStatus::HIT_LITERAL) => OtifStatus::Hit,
            _ => OtifStatus::Miss,
        }
    }

    /// 派生风险信号（按规则顺序收集，全部未触发时使用兜底信号）
    ///
    /// # 规则
    /// 1. risk_score > high_risk_threshold → High probability of delay
    /// 2. 提前期 < tight_lead_time_days → Tight lead time（提前期无法计算时不触发）
    /// 3. 源状态字面量 "Miss" → Historical Miss pattern
    pub fn derive_risk_signals(
        &self,
        risk_score: u8,
        raw_lead_time: Option<i64>,
        flag: Option<&str>,
    ) -> Vec<String> {
        let mut signals = Vec::new();

        if risk_score > self.rules.high_risk_threshold {
            signals.push(SIGNAL_HIGH_PROBABILITY.to_string());
        }
        if matches!(raw_lead_time, Some(days) if days < self.rules.tight_lead_time_days) {
            signals.push(SIGNAL_TIGHT_LEAD_TIME.to_string());
        }
        if flag == Some(OtifStatus::MISS_LITERAL) {
            signals.push(SIGNAL_HISTORICAL_MISS.to_string());
        }

        if signals.is_empty() {
            signals.push(SIGNAL_NONE.to_string());
        }
        signals
    }
}

impl RecordNormalizer for OrderNormalizer {
    fn normalize(&self, raw: &RawOrderRecord) -> (OrderRecord, Vec<DqIssue>) {
        let mut issues = Vec::new();
        let row = raw.row_number;

        let mut text_or = |value: &Option<String>, field: &str, default: &str| -> String {
            match value {
                Some(v) => v.clone(),
                None => {
                    issues.push(DqIssue {
                        row_number: row,
                        kind: DqIssueKind::MissingField,
                        field: field.to_string(),
                        raw_value: None,
                    });
                    default.to_string()
                }
            }
        };

        let sales_order = text_or(
            &raw.sales_order,
            source_columns::SALES_ORDER,
            DEFAULT_IDENTIFIER,
        );
        let customer = text_or(&raw.customer_name, source_columns::CUSTOMER_NAME, DEFAULT_NAME);
        let material_description = text_or(
            &raw.material_description,
            source_columns::MATERIAL_DESCRIPTION,
            DEFAULT_IDENTIFIER,
        );
        let plant = text_or(&raw.plant, source_columns::PLANT, DEFAULT_NAME);
        let req_delivery_date = text_or(
            &raw.requested_delivery_date,
            source_columns::REQUESTED_DELIVERY_DATE,
            "",
        );
        let source_create_date = text_or(&raw.so_create_date, source_columns::SO_CREATE_DATE, "");

        // 日期存在但无法解析 → DQ 问题
        for (value, field) in [
            (&raw.so_create_date, source_columns::SO_CREATE_DATE),
            (&raw.requested_delivery_date, source_columns::REQUESTED_DELIVERY_DATE),
        ] {
            if let Some(v) = value {
                if parse_datetime(v).is_none() {
                    issues.push(DqIssue {
                        row_number: row,
                        kind: DqIssueKind::InvalidDate,
                        field: field.to_string(),
                        raw_value: Some(v.clone()),
                    });
                }
            }
        }

        let raw_lead_time = self.derive_raw_lead_time(
            raw.so_create_date.as_deref(),
            raw.requested_delivery_date.as_deref(),
        );
        let lead_time_days = Self::clamp_lead_time(raw_lead_time);

        let probability = match raw.prob_miss.as_deref() {
            Some(v) => parse_float_prefix(v).unwrap_or_else(|| {
                issues.push(DqIssue {
                    row_number: row,
                    kind: DqIssueKind::InvalidProbability,
                    field: source_columns::PROB_MISS.to_string(),
                    raw_value: Some(v.to_string()),
                });
                0.0
            }),
            None => {
                issues.push(DqIssue {
                    row_number: row,
                    kind: DqIssueKind::MissingField,
                    field: source_columns::PROB_MISS.to_string(),
                    raw_value: None,
                });
                0.0
            }
        };
        let risk_score_percent = Self::derive_risk_score(probability);

        if raw.otif_hit_miss.is_none() {
            issues.push(DqIssue {
                row_number: row,
                kind: DqIssueKind::MissingField,
                field: source_columns::OTIF_HIT_MISS.to_string(),
                raw_value: None,
            });
        }
        let flag = raw.otif_hit_miss.as_deref();
        let otif_status = Self::derive_otif_status(flag);
        let top_risk_signals = self.derive_risk_signals(risk_score_percent, raw_lead_time, flag);

        let record = OrderRecord {
            sales_order,
            customer,
            material_description,
            plant,
            req_delivery_date,
            lead_time_days,
            risk_score_percent,
            otif_status,
            top_risk_signals,
            source_create_date,
        };
        (record, issues)
    }
}
