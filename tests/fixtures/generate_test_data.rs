// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成 OTIF 预测导出样例（与上游导出同列名）
// 输出: tests/fixtures/datasets/*.csv
// 用法: cargo run --bin generate_test_data -- [rows]
// ==========================================

use chrono::{Duration, Local, NaiveDate};
use csv::Writer;
use std::error::Error;
use std::fs::{self, File};

const OUTPUT_DIR: &str = "tests/fixtures/datasets";
const DEFAULT_ROWS: usize = 200;

// CSV 表头（上游导出列名）
const CSV_HEADER: &[&str] = &[
    "Sales order",
    "Customer Name",
    "Material description",
    "Plant",
    "Requested Delivery Date",
    "SO create date",
    "prob_miss",
    "OTIF_HIT/MISS",
];

const CUSTOMERS: &[&str] = &[
    "Acme Industrial",
    "Globex Corp",
    "Initech, Ltd",
    "Umbrella Supply",
    "Stark Components",
];

const MATERIALS: &[&str] = &[
    "Hot rolled coil 2.0mm",
    "Cold rolled sheet 1.2mm",
    "Galvanized strip 0.8mm",
    "Steel plate 12mm",
];

const PLANTS: &[&str] = &["P100", "P200", "P300"];

// 订单样例行
struct OrderRow {
    sales_order: String,
    customer: String,
    material: String,
    plant: String,
    req_date: String,
    create_date: String,
    prob_miss: String,
    otif: String,
}

impl OrderRow {
    fn to_row(&self) -> [&str; 8] {
        [
            self.sales_order.as_str(),
            self.customer.as_str(),
            self.material.as_str(),
            self.plant.as_str(),
            self.req_date.as_str(),
            self.create_date.as_str(),
            self.prob_miss.as_str(),
            self.otif.as_str(),
        ]
    }
}

// 伪随机（可复现）
fn pseudo(index: usize, salt: usize) -> usize {
    index.wrapping_mul(2654435761).wrapping_add(salt.wrapping_mul(40503)) % 10007
}

fn generate_normal_row(index: usize, base: NaiveDate) -> OrderRow {
    let create = base + Duration::days((pseudo(index, 1) % 60) as i64);
    let lead = (pseudo(index, 2) % 30) as i64;
    let prob = (pseudo(index, 3) % 1000) as f64 / 1000.0;
    let otif = if prob > 0.5 { "Miss" } else { "Hit" };

    OrderRow {
        sales_order: format!("SO{:07}", 4500000 + index),
        customer: CUSTOMERS[pseudo(index, 4) % CUSTOMERS.len()].to_string(),
        material: MATERIALS[pseudo(index, 5) % MATERIALS.len()].to_string(),
        plant: PLANTS[pseudo(index, 6) % PLANTS.len()].to_string(),
        req_date: (create + Duration::days(lead)).format("%Y-%m-%d").to_string(),
        create_date: create.format("%Y-%m-%d").to_string(),
        prob_miss: format!("{:.3}", prob),
        otif: otif.to_string(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let rows = std::env::args()
        .nth(1)
        .map(|raw| raw.parse::<usize>())
        .transpose()?
        .unwrap_or(DEFAULT_ROWS);

    println!("开始生成测试数据集...");
    fs::create_dir_all(OUTPUT_DIR)?;

    // 1. 正常数据
    generate_normal_data(rows)?;

    // 2. 降级字段数据（缺失 / 非法日期 / 非法概率）
    generate_degraded_data()?;

    // 3. 缺少订单号列（结构性拒绝）
    generate_missing_sales_order_column()?;

    println!("✓ 所有测试数据集生成完成！");
    Ok(())
}

fn generate_normal_data(rows: usize) -> Result<(), Box<dyn Error>> {
    let path = format!("{}/01_normal_orders.csv", OUTPUT_DIR);
    let mut wtr = Writer::from_writer(File::create(&path)?);
    let base = Local::now().date_naive() - Duration::days(90);

    wtr.write_record(CSV_HEADER)?;
    for i in 0..rows {
        wtr.write_record(generate_normal_row(i, base).to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 01_normal_orders.csv ({}条)", rows);
    Ok(())
}

fn generate_degraded_data() -> Result<(), Box<dyn Error>> {
    let path = format!("{}/02_degraded_orders.csv", OUTPUT_DIR);
    let mut wtr = Writer::from_writer(File::create(&path)?);

    wtr.write_record(CSV_HEADER)?;
    // 全部可选字段缺失
    wtr.write_record(["SO9000001", "", "", "", "", "", "", ""])?;
    // 日期无法解析
    wtr.write_record([
        "SO9000002", "Acme Industrial", "Steel plate 12mm", "P100", "soon", "2024-01-01", "0.4",
        "Hit",
    ])?;
    // 概率无法解析
    wtr.write_record([
        "SO9000003", "Globex Corp", "Hot rolled coil 2.0mm", "P200", "2024-02-10", "2024-02-01",
        "n/a", "Miss",
    ])?;
    // 小写状态（按字面量规则为 Miss）
    wtr.write_record([
        "SO9000004", "Initech, Ltd", "Cold rolled sheet 1.2mm", "P300", "2024-03-20",
        "2024-03-01", "0.1", "hit",
    ])?;

    wtr.flush()?;
    println!("✓ 生成 02_degraded_orders.csv (4条)");
    Ok(())
}

fn generate_missing_sales_order_column() -> Result<(), Box<dyn Error>> {
    let path = format!("{}/03_missing_sales_order.csv", OUTPUT_DIR);
    let mut wtr = Writer::from_writer(File::create(&path)?);

    wtr.write_record(&CSV_HEADER[1..])?;
    wtr.write_record([
        "Acme Industrial", "Steel plate 12mm", "P100", "2024-01-10", "2024-01-01", "0.2", "Hit",
    ])?;

    wtr.flush()?;
    println!("✓ 生成 03_missing_sales_order.csv (1条)");
    Ok(())
}
