// ==========================================
// OTIF 交付风险分析 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::order_importer_trait::{FileParser, RawRow};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 校验文件存在且扩展名在允许列表内
fn check_file(path: &Path, allowed: &[&str]) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if !allowed.contains(&ext.as_str()) {
        return Err(ImportError::UnsupportedFormat(ext));
    }
    Ok(())
}

/// 按表头组装行，跳过全空白行
fn push_row<I, S>(headers: &[String], cells: I, records: &mut Vec<RawRow>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut row_map = RawRow::new();
    for (col_idx, value) in cells.into_iter().enumerate() {
        if let Some(header) = headers.get(col_idx) {
            row_map.insert(header.clone(), value.as_ref().trim().to_string());
        }
    }

    if row_map.values().all(|v| v.is_empty()) {
        return;
    }
    records.push(row_map);
}

/// 非 UTF-8 字节（如 Latin-1 导出）替换为 U+FFFD，不中断整个文件
fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 从任意 Reader 解析（首行为表头）
    pub fn parse_reader<R: Read>(&self, reader: R) -> ImportResult<Vec<RawRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(reader);

        let headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| decode_lossy(h).trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.byte_records() {
            let record = result?;
            push_row(&headers, record.iter().map(decode_lossy), &mut records);
        }

        Ok(records)
    }
}

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        check_file(file_path, &["csv"])?;
        let file = File::open(file_path)?;
        self.parse_reader(file)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 单元格转文本（日期单元格转 ISO 日期）
    fn cell_to_string(cell: &Data) -> String {
        match cell {
            Data::DateTime(dt) => excel_serial_to_iso(dt.as_f64()),
            Data::DateTimeIso(s) => s.clone(),
            Data::Empty => String::new(),
            other => other.to_string(),
        }
    }
}

/// Excel 序列日期（1900 日期系统）→ ISO 日期 / 日期时间
///
/// 超出可表示范围的序列值原样输出为数字文本，由规范化阶段记为非法日期
fn excel_serial_to_iso(serial: f64) -> String {
    serial_to_datetime(serial)
        .map(|(datetime, has_time)| {
            if has_time {
                datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
            } else {
                datetime.date().format("%Y-%m-%d").to_string()
            }
        })
        .unwrap_or_else(|| serial.to_string())
}

fn serial_to_datetime(serial: f64) -> Option<(NaiveDateTime, bool)> {
    if !serial.is_finite() {
        return None;
    }
    let midnight = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = Duration::try_days(serial.trunc() as i64)?;
    let seconds = ((serial - serial.trunc()) * 86_400.0).round() as i64;
    let datetime = midnight
        .checked_add_signed(days)?
        .checked_add_signed(Duration::try_seconds(seconds)?)?;
    Some((datetime, seconds != 0))
}

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        check_file(file_path, &["xlsx", "xls"])?;

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut records = Vec::new();
        for data_row in rows {
            push_row(
                &headers,
                data_row.iter().map(Self::cell_to_string),
                &mut records,
            );
        }

        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_records(file_path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_records(file_path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
