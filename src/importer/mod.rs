// ==========================================
// OTIF 交付风险分析 - 导入层
// ==========================================
// 职责: 外部导出文件 → 规范化订单集合
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod derivation;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod order_importer;
pub mod order_importer_trait;

// 重导出核心类型
pub use derivation::OrderNormalizer;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{source_columns, FieldMapper as FieldMapperImpl};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use order_importer::OrderImporterImpl;

// 重导出 Trait 接口
pub use order_importer_trait::{FieldMapper, FileParser, OrderImporter, RawRow, RecordNormalizer};
