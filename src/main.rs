// ==========================================
// OTIF 交付风险分析 - 命令行入口
// ==========================================
// 用法:
//   otif-risk <file> [page] [--sort <field>] [--filter <column>=<value>]...
//
// 导入导出文件，打印汇总指标与视图的指定页
// --sort 可重复（同列再次指定即切换方向），--filter 可重复
// ==========================================

use anyhow::{anyhow, bail};
use otif_risk::api::OrderViewApi;
use otif_risk::config::{default_config_path, ConfigManager};
use otif_risk::domain::types::{CategoricalColumn, SortField};
use otif_risk::importer::OrderImporterImpl;
use otif_risk::logging;

const USAGE: &str = "用法: otif-risk <file> [page] [--sort <field>] [--filter <column>=<value>]...";

/// 命令行参数
#[derive(Debug, PartialEq)]
struct CliArgs {
    file_path: String,
    page: usize,
    sorts: Vec<SortField>,
    filters: Vec<(CategoricalColumn, String)>,
}

fn parse_filter(raw: &str) -> anyhow::Result<(CategoricalColumn, String)> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("筛选条件格式应为 <column>=<value>: {}", raw))?;
    let column = column.parse::<CategoricalColumn>().map_err(|e| anyhow!(e))?;
    Ok((column, value.to_string()))
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<CliArgs> {
    let mut file_path = None;
    let mut page = None;
    let mut sorts = Vec::new();
    let mut filters = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sort" => {
                let raw = args.next().ok_or_else(|| anyhow!("--sort 缺少列名"))?;
                sorts.push(raw.parse::<SortField>().map_err(|e| anyhow!(e))?);
            }
            "--filter" => {
                let raw = args.next().ok_or_else(|| anyhow!("--filter 缺少条件"))?;
                filters.push(parse_filter(&raw)?);
            }
            _ if file_path.is_none() => file_path = Some(arg),
            _ if page.is_none() => {
                let parsed = arg
                    .trim()
                    .parse::<usize>()
                    .map_err(|e| anyhow!("页码无效 ({}): {}", arg, e))?;
                page = Some(parsed);
            }
            _ => bail!("多余的参数: {}", arg),
        }
    }

    let file_path = file_path.ok_or_else(|| anyhow!("缺少输入文件"))?;
    Ok(CliArgs {
        file_path,
        page: page.unwrap_or(1),
        sorts,
        filters,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    tracing::info!("{} v{}", otif_risk::APP_NAME, otif_risk::VERSION);

    let config_path = default_config_path();
    tracing::info!("使用配置: {}", config_path.display());
    let config = ConfigManager::load_or_default(&config_path)?;

    let importer = OrderImporterImpl::with_rules(config.risk_rules);
    let mut api = OrderViewApi::new(config)?;
    let dq_report = api.import_and_load(&importer, &cli.file_path).await?;
    if !dq_report.is_clean() {
        println!(
            "注意: {} 行存在降级字段（缺失 {} / 日期 {} / 概率 {}）",
            dq_report.degraded_rows,
            dq_report.missing_fields,
            dq_report.invalid_dates,
            dq_report.invalid_probabilities
        );
    }

    let summary = api.summary();
    println!("==================================================");
    println!("Total Orders: {}", summary.total);
    println!("OTIF Miss:    {}", summary.miss);
    println!("OTIF Hit:     {}", summary.hit);
    println!("Miss Rate:    {}", summary.miss_rate_display());
    println!("==================================================");

    for (column, value) in &cli.filters {
        api.toggle_filter(*column, value);
    }
    for field in &cli.sorts {
        api.sort_by(*field);
    }
    api.go_to_page(cli.page);
    let snapshot = api.render();
    println!("{}", snapshot.showing_label);
    for row in &snapshot.rows {
        let record = &row.record;
        println!(
            "{:<14} {:<24} {:<28} {:<8} {:<12} {:>4} days {:>4}% {:<10} {}",
            record.sales_order,
            record.customer,
            record.material_description,
            record.plant,
            record.req_delivery_date,
            record.lead_time_days,
            record.risk_score_percent,
            row.status_label,
            row.signals_text
        );
    }
    if let Some(message) = snapshot.empty_message {
        println!("{}", message);
    }
    println!("{}", snapshot.page_label);

    Ok(())
}
