// ==========================================
// OTIF 交付风险分析 - 配置层
// ==========================================
// 职责: 视图配置加载、校验、默认路径解析
// 存储: JSON 文件
// ==========================================

pub mod view_config;

// 重导出核心配置类型
pub use view_config::{
    default_config_path, ConfigError, ConfigManager, RiskSignalRules, ViewConfig,
    CONFIG_PATH_ENV, DEFAULT_EXPORT_FILE_NAME,
};
