// ==========================================
// OTIF 交付风险分析 - 订单导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 流程: 解析 → 结构校验 → 字段映射 → 规范化派生
// ==========================================

use crate::domain::order::{DqIssue, ImportOutcome, OrderRecord, RawOrderRecord};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

/// 原始行: 列名 → 单元格文本
pub type RawRow = HashMap<String, String>;

// ==========================================
// OrderImporter Trait
// ==========================================
// 用途: 订单导入主接口（唯一的异步边界）
// 实现者: OrderImporterImpl
#[async_trait]
pub trait OrderImporter: Send + Sync {
    /// 从 CSV 文件导入订单
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 规范化订单 + DQ 报告
    /// - Err: 文件错误或结构性拒绝（空数据集 / 缺少订单号列）
    async fn import_from_csv<P: AsRef<Path> + Send>(&self, file_path: P)
        -> ImportResult<ImportOutcome>;

    /// 从 Excel 文件导入订单（读取第一个工作表）
    async fn import_from_excel<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportOutcome>;

    /// 根据扩展名自动选择解析器
    async fn import_file<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportResult<ImportOutcome>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录（跳过全空白行，单元格已 TRIM）
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 源列名 → RawOrderRecord（阶段 1）
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 映射单行（不失败，缺失列为 None）
    fn map_to_raw_order(&self, row: &RawRow, row_number: usize) -> RawOrderRecord;
}

// ==========================================
// RecordNormalizer Trait
// ==========================================
// 用途: RawOrderRecord → OrderRecord（阶段 2）
// 实现者: OrderNormalizer
// 红线: 永不失败，异常字段降级为默认值并记录 DQ 问题
pub trait RecordNormalizer: Send + Sync {
    fn normalize(&self, raw: &RawOrderRecord) -> (OrderRecord, Vec<DqIssue>);
}
