// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use otif_risk::domain::order::OrderRecord;
use otif_risk::domain::types::OtifStatus;
use otif_risk::importer::source_columns;
use otif_risk::importer::RawRow;
use std::io::Write;
use std::path::{Path, PathBuf};

// ==========================================
// OrderRecord 构建器
// ==========================================

pub struct OrderBuilder {
    sales_order: String,
    customer: String,
    material_description: String,
    plant: String,
    req_delivery_date: String,
    lead_time_days: u32,
    risk_score_percent: u8,
    otif_status: OtifStatus,
    top_risk_signals: Vec<String>,
}

impl OrderBuilder {
    pub fn new(sales_order: &str) -> Self {
        Self {
            sales_order: sales_order.to_string(),
            customer: "Acme Industrial".to_string(),
            material_description: "Hot rolled coil".to_string(),
            plant: "P100".to_string(),
            req_delivery_date: "2024-06-01".to_string(),
            lead_time_days: 10,
            risk_score_percent: 20,
            otif_status: OtifStatus::Hit,
            top_risk_signals: vec!["No significant risk factors".to_string()],
        }
    }

    pub fn customer(mut self, customer: &str) -> Self {
        self.customer = customer.to_string();
        self
    }

    pub fn material(mut self, material: &str) -> Self {
        self.material_description = material.to_string();
        self
    }

    pub fn plant(mut self, plant: &str) -> Self {
        self.plant = plant.to_string();
        self
    }

    pub fn req_date(mut self, date: &str) -> Self {
        self.req_delivery_date = date.to_string();
        self
    }

    pub fn lead_time(mut self, days: u32) -> Self {
        self.lead_time_days = days;
        self
    }

    pub fn risk(mut self, score: u8) -> Self {
        self.risk_score_percent = score;
        self
    }

    pub fn status(mut self, status: OtifStatus) -> Self {
        self.otif_status = status;
        self
    }

    pub fn signals(mut self, signals: &[&str]) -> Self {
        self.top_risk_signals = signals.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn build(self) -> OrderRecord {
        OrderRecord {
            sales_order: self.sales_order,
            customer: self.customer,
            material_description: self.material_description,
            plant: self.plant,
            req_delivery_date: self.req_delivery_date,
            lead_time_days: self.lead_time_days,
            risk_score_percent: self.risk_score_percent,
            otif_status: self.otif_status,
            top_risk_signals: self.top_risk_signals,
            source_create_date: String::new(),
        }
    }
}

// ==========================================
// 场景数据集
// ==========================================

/// 混合数据集: 3 个客户 / 2 个工厂，含重复订单号与等值风险分
pub fn sample_orders() -> Vec<OrderRecord> {
    vec![
        OrderBuilder::new("SO-1001")
            .customer("Acme Industrial")
            .plant("P100")
            .req_date("2024-05-02")
            .lead_time(3)
            .risk(90)
            .status(OtifStatus::Miss)
            .build(),
        OrderBuilder::new("SO-1002")
            .customer("Globex Corp")
            .plant("P200")
            .req_date("2024-05-10")
            .lead_time(12)
            .risk(45)
            .build(),
        OrderBuilder::new("SO-1003")
            .customer("Initech")
            .plant("P100")
            .req_date("2024-05-15")
            .lead_time(20)
            .risk(45)
            .build(),
        OrderBuilder::new("SO-1004")
            .customer("Acme Industrial")
            .plant("P200")
            .req_date("2024-06-01")
            .lead_time(7)
            .risk(70)
            .status(OtifStatus::Miss)
            .build(),
        OrderBuilder::new("SO-1002")
            .customer("Globex Corp")
            .plant("P100")
            .req_date("2024-06-20")
            .lead_time(1)
            .risk(45)
            .build(),
        OrderBuilder::new("SO-1006")
            .customer("Initech")
            .plant("P200")
            .req_date("2024-07-04")
            .lead_time(30)
            .risk(5)
            .build(),
    ]
}

/// 批量订单（订单号递增，风险分循环）
pub fn numbered_orders(count: usize) -> Vec<OrderRecord> {
    (0..count)
        .map(|i| {
            OrderBuilder::new(&format!("SO-{:04}", i))
                .customer(["Acme", "Globex", "Initech"][i % 3])
                .lead_time((i % 25) as u32)
                .risk((i * 7 % 101) as u8)
                .status(if i % 4 == 0 { OtifStatus::Miss } else { OtifStatus::Hit })
                .build()
        })
        .collect()
}

// ==========================================
// 原始行 / 文件构建
// ==========================================

/// 以源列名构建原始行
pub fn raw_row(pairs: &[(&str, &str)]) -> RawRow {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// 源导出表头
pub fn source_header() -> Vec<&'static str> {
    vec![
        source_columns::SALES_ORDER,
        source_columns::CUSTOMER_NAME,
        source_columns::MATERIAL_DESCRIPTION,
        source_columns::PLANT,
        source_columns::REQUESTED_DELIVERY_DATE,
        source_columns::SO_CREATE_DATE,
        source_columns::PROB_MISS,
        source_columns::OTIF_HIT_MISS,
    ]
}

/// 在目录下写入 CSV 文件（首行为表头）
pub fn write_csv(dir: &Path, name: &str, header: &[&str], rows: &[&[&str]]) -> PathBuf {
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path).expect("create csv");
    writer.write_record(header).expect("write header");
    for row in rows {
        writer.write_record(*row).expect("write row");
    }
    writer.flush().expect("flush csv");
    path
}

/// 原样写入文本文件
pub fn write_text(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("create file");
    file.write_all(content.as_bytes()).expect("write file");
    path
}
