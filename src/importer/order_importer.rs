// ==========================================
// OTIF 交付风险分析 - 订单导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到规范化订单集合
// 流程: 解析 → 结构校验 → 映射 → 规范化 → DQ 汇总
// ==========================================

use crate::config::RiskSignalRules;
use crate::domain::order::{DqReport, ImportOutcome, OrderRecord};
use crate::importer::derivation::OrderNormalizer;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{source_columns, FieldMapper as FieldMapperImpl};
use crate::importer::file_parser::{CsvParser, ExcelParser, UniversalFileParser};
use crate::importer::order_importer_trait::{
    FieldMapper, FileParser, OrderImporter, RawRow, RecordNormalizer,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// 解析器选择
#[derive(Debug, Clone, Copy)]
enum ParserKind {
    Csv,
    Excel,
    Auto,
}

impl ParserKind {
    fn parse(self, path: &Path) -> ImportResult<Vec<RawRow>> {
        match self {
            ParserKind::Csv => CsvParser.parse_to_raw_records(path),
            ParserKind::Excel => ExcelParser.parse_to_raw_records(path),
            ParserKind::Auto => UniversalFileParser.parse_to_raw_records(path),
        }
    }
}

// ==========================================
// OrderImporterImpl - 订单导入器实现
// ==========================================
pub struct OrderImporterImpl {
    field_mapper: Arc<dyn FieldMapper>,
    normalizer: Arc<dyn RecordNormalizer>,
}

impl Default for OrderImporterImpl {
    fn default() -> Self {
        Self::new(Arc::new(FieldMapperImpl), Arc::new(OrderNormalizer::default()))
    }
}

impl OrderImporterImpl {
    /// 创建新的 OrderImporter 实例
    ///
    /// # 参数
    /// - field_mapper: 字段映射器
    /// - normalizer: 订单规范化器（风险信号阈值在其中配置）
    pub fn new(field_mapper: Arc<dyn FieldMapper>, normalizer: Arc<dyn RecordNormalizer>) -> Self {
        Self {
            field_mapper,
            normalizer,
        }
    }

    /// 按风险信号阈值创建（默认字段映射）
    pub fn with_rules(rules: RiskSignalRules) -> Self {
        Self::new(Arc::new(FieldMapperImpl), Arc::new(OrderNormalizer::new(rules)))
    }

    /// 内存行 → 规范化订单（同步，供文件导入与测试复用）
    ///
    /// # 返回
    /// - Ok((records, dq_report)): 订单保持输入行序
    /// - Err(EmptyDataset / MissingRequiredColumn): 结构性拒绝
    pub fn import_rows(&self, raw_rows: Vec<RawRow>) -> ImportResult<(Vec<OrderRecord>, DqReport)> {
        validate_structure(&raw_rows)?;

        let mut records = Vec::with_capacity(raw_rows.len());
        let mut dq_report = DqReport::default();
        for (idx, row) in raw_rows.iter().enumerate() {
            let raw = self.field_mapper.map_to_raw_order(row, idx + 1);
            let (record, issues) = self.normalizer.normalize(&raw);
            dq_report.absorb_row(issues);
            records.push(record);
        }

        if !dq_report.is_clean() {
            warn!(
                degraded_rows = dq_report.degraded_rows,
                missing_fields = dq_report.missing_fields,
                invalid_dates = dq_report.invalid_dates,
                invalid_probabilities = dq_report.invalid_probabilities,
                "部分字段已降级为默认值"
            );
        }

        Ok((records, dq_report))
    }

    async fn import_with(&self, path: PathBuf, kind: ParserKind) -> ImportResult<ImportOutcome> {
        let start_time = Instant::now();
        let source = path.display().to_string();
        info!(file_path = %source, "开始导入订单数据");

        // === 步骤 1: 解析文件（阻塞 IO 移出异步线程）===
        debug!("步骤 1: 解析文件");
        let raw_rows = tokio::task::spawn_blocking(move || kind.parse(&path))
            .await
            .map_err(|e| ImportError::InternalError(format!("解析任务异常终止: {}", e)))?
            .map_err(|e| {
                error!(error = %e, "文件解析失败");
                e
            })?;
        info!(total_rows = raw_rows.len(), "文件解析完成");

        // === 步骤 2-4: 校验 / 映射 / 规范化 ===
        debug!("步骤 2: 结构校验与规范化");
        let (records, dq_report) = self.import_rows(raw_rows).map_err(|e| {
            error!(error = %e, "文件不符合 OTIF 模板");
            e
        })?;

        let elapsed_time = start_time.elapsed();
        info!(
            records = records.len(),
            elapsed_ms = elapsed_time.as_millis() as u64,
            "订单导入完成"
        );

        Ok(ImportOutcome {
            source,
            records,
            dq_report,
            elapsed_time,
        })
    }
}

/// 结构校验: 非空 + 包含订单号列
fn validate_structure(raw_rows: &[RawRow]) -> ImportResult<()> {
    if raw_rows.is_empty() {
        return Err(ImportError::EmptyDataset);
    }

    for column in source_columns::REQUIRED {
        if !raw_rows.iter().any(|row| row.contains_key(*column)) {
            return Err(ImportError::MissingRequiredColumn(column.to_string()));
        }
    }
    Ok(())
}

#[async_trait::async_trait]
impl OrderImporter for OrderImporterImpl {
    #[instrument(skip(self, file_path))]
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportOutcome> {
        self.import_with(file_path.as_ref().to_path_buf(), ParserKind::Csv)
            .await
    }

    #[instrument(skip(self, file_path))]
    async fn import_from_excel<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportOutcome> {
        self.import_with(file_path.as_ref().to_path_buf(), ParserKind::Excel)
            .await
    }

    #[instrument(skip(self, file_path))]
    async fn import_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportOutcome> {
        self.import_with(file_path.as_ref().to_path_buf(), ParserKind::Auto)
            .await
    }
}
