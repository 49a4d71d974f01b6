// ==========================================
// OTIF 交付风险分析 - 视图配置
// ==========================================
// 职责: 分页 / 分面上限 / 默认排序 / 风险信号阈值
// 存储: JSON 文件（缺失时使用默认值）
// ==========================================

use crate::domain::types::{SortDirection, SortField};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// 环境变量: 显式指定配置文件路径
pub const CONFIG_PATH_ENV: &str = "OTIF_RISK_CONFIG_PATH";

/// 默认导出文件名
pub const DEFAULT_EXPORT_FILE_NAME: &str = "order_risk_analysis.csv";

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件格式错误: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("配置值非法 (key: {key}): {message}")]
    Invalid { key: String, message: String },
}

// ==========================================
// RiskSignalRules - 风险信号阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSignalRules {
    /// 风险分严格大于该值 → "High probability of delay"
    pub high_risk_threshold: u8,
    /// 提前期严格小于该值 → "Tight lead time"
    pub tight_lead_time_days: i64,
}

impl Default for RiskSignalRules {
    fn default() -> Self {
        Self {
            high_risk_threshold: 80,
            tight_lead_time_days: 5,
        }
    }
}

// ==========================================
// ViewConfig - 订单视图配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub page_size: usize,
    /// 每列分面取值上限（None = 不限）
    pub facet_value_limit: Option<usize>,
    pub default_sort_field: SortField,
    pub default_sort_direction: SortDirection,
    pub export_file_name: String,
    pub risk_rules: RiskSignalRules,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            facet_value_limit: Some(1000),
            default_sort_field: SortField::RiskScore,
            default_sort_direction: SortDirection::Desc,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            risk_rules: RiskSignalRules::default(),
        }
    }
}

impl ViewConfig {
    /// 校验配置值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "page_size".to_string(),
                message: "分页大小必须大于 0".to_string(),
            });
        }
        if self.facet_value_limit == Some(0) {
            return Err(ConfigError::Invalid {
                key: "facet_value_limit".to_string(),
                message: "分面上限必须大于 0（不限请置空）".to_string(),
            });
        }
        if self.export_file_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "export_file_name".to_string(),
                message: "导出文件名不能为空".to_string(),
            });
        }
        if self.risk_rules.high_risk_threshold > 100 {
            return Err(ConfigError::Invalid {
                key: "risk_rules.high_risk_threshold".to_string(),
                message: format!("阈值 {} 超出范围 [0, 100]", self.risk_rules.high_risk_threshold),
            });
        }
        Ok(())
    }
}

// ==========================================
// ConfigManager - 配置加载
// ==========================================
pub struct ConfigManager;

impl ConfigManager {
    /// 从 JSON 文件加载配置（未出现的字段取默认值）
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ViewConfig, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: ViewConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        debug!(path = %path.as_ref().display(), "配置加载完成");
        Ok(config)
    }

    /// 加载配置，文件不存在时返回默认配置
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<ViewConfig, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Ok(ViewConfig::default());
        }
        Self::load(path)
    }

    /// 保存配置（格式化 JSON）
    pub fn save<P: AsRef<Path>>(path: P, config: &ViewConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path.as_ref(), serde_json::to_string_pretty(config)?)?;
        Ok(())
    }
}

/// 获取默认配置文件路径
///
/// # 返回
/// - 环境变量 OTIF_RISK_CONFIG_PATH（非空时）
/// - 用户配置目录/otif-risk/config.json
/// - 回退: ./otif_risk_config.json
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::config_dir() {
        Some(dir) => dir.join("otif-risk").join("config.json"),
        None => PathBuf::from("./otif_risk_config.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ViewConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.default_sort_field, SortField::RiskScore);
        assert_eq!(config.default_sort_direction, SortDirection::Desc);
        assert_eq!(config.export_file_name, "order_risk_analysis.csv");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_json_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"page_size": 25, "risk_rules": {{"high_risk_threshold": 70}}}}"#
        )
        .unwrap();

        let config = ConfigManager::load(file.path()).unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.risk_rules.high_risk_threshold, 70);
        assert_eq!(config.risk_rules.tight_lead_time_days, 5);
        assert_eq!(config.facet_value_limit, Some(1000));
    }

    #[test]
    fn test_load_rejects_zero_page_size() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"page_size": 0}}"#).unwrap();

        let err = ConfigManager::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "page_size"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigManager::load_or_default(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, ViewConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = ViewConfig {
            page_size: 50,
            facet_value_limit: None,
            ..ViewConfig::default()
        };

        ConfigManager::save(&path, &config).unwrap();
        assert_eq!(ConfigManager::load(&path).unwrap(), config);
    }

    #[test]
    fn test_default_config_path_not_empty() {
        let path = default_config_path();
        assert!(path.to_string_lossy().ends_with(".json"));
    }
}
