// ==========================================
// 周排班推荐引擎 - 配置管理器
// ==========================================
// 职责: 配置文件定位、加载、校验、快照/恢复
// 查找顺序: 显式路径 → 环境变量 → 用户配置目录 → 内置默认值
// ==========================================

use crate::config::engine_config::EngineConfig;
use crate::config::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config: EngineConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 使用内置默认值
    pub fn new() -> Self {
        Self::default()
    }

    /// 按查找顺序加载配置
    ///
    /// # 参数
    /// - explicit: 命令行显式指定的配置文件
    ///
    /// # 返回
    /// - 显式路径或环境变量指向的文件不存在时返回 Io 错误
    /// - 用户配置目录下没有文件时使用默认值
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }

        if let Ok(raw) = std::env::var(config_keys::ENV_CONFIG_PATH) {
            let raw = raw.trim();
            if !raw.is_empty() {
                debug!(env = config_keys::ENV_CONFIG_PATH, path = raw, "从环境变量定位配置文件");
                return Self::from_path(Path::new(raw));
            }
        }

        if let Some(path) = Self::default_config_path() {
            if path.is_file() {
                return Self::from_path(&path);
            }
            debug!(path = %path.display(), "用户配置文件不存在，使用默认配置");
        }

        Ok(Self::new())
    }

    /// 从指定文件加载并校验
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&raw)?;
        config.validate()?;

        info!(path = %path.display(), locale = %config.locale, "配置加载完成");

        Ok(Self {
            config,
            source: Some(path.to_path_buf()),
        })
    }

    /// 从已有配置创建（调用方自行组装参数时使用）
    pub fn from_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            source: None,
        })
    }

    /// 用户配置目录下的默认配置文件路径
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(config_keys::APP_DIR).join(config_keys::FILE_NAME))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn into_config(self) -> EngineConfig {
        self.config
    }

    /// 配置来源文件（None = 内置默认值）
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 获取当前配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 调用方记录"用哪套参数生成了这个方案", 以便复现
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(&self.config)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 注意
    /// - 快照校验失败时保持原配置不变
    pub fn restore_config_from_snapshot(&mut self, snapshot_json: &str) -> Result<(), ConfigError> {
        let config: EngineConfig = serde_json::from_str(snapshot_json)?;
        config.validate()?;
        self.config = config;
        Ok(())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 环境变量: 配置文件路径
    pub const ENV_CONFIG_PATH: &str = "ROSTER_ENGINE_CONFIG";

    // 用户配置目录
    pub const APP_DIR: &str = "roster-engine";
    pub const FILE_NAME: &str = "config.json";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_from_path_partial_config() {
        let file = write_temp(r#"{"locale": "en", "planner": {"alternativesLimit": 3}}"#);
        let manager = ConfigManager::from_path(file.path()).unwrap();

        assert_eq!(manager.config().locale, "en");
        assert_eq!(manager.config().planner.alternatives_limit, 3);
        assert_eq!(manager.config().planner.streak_exclusion_threshold, 2);
        assert_eq!(manager.source(), Some(file.path()));
    }

    #[test]
    fn test_from_path_rejects_invalid() {
        let file = write_temp(r#"{"fairness": {"weights": {"opportunity": 0.1}}}"#);
        let result = ConfigManager::from_path(file.path());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let broken = write_temp("{not json");
        assert!(matches!(
            ConfigManager::from_path(broken.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_explicit_missing_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(
            ConfigManager::load(Some(&missing)),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut manager = ConfigManager::new();
        let mut tuned = EngineConfig::default();
        tuned.rules.rotation_window = 8;
        let snapshot = serde_json::to_string(&tuned).unwrap();

        manager.restore_config_from_snapshot(&snapshot).unwrap();
        assert_eq!(manager.config().rules.rotation_window, 8);

        let again = manager.get_config_snapshot().unwrap();
        let parsed: EngineConfig = serde_json::from_str(&again).unwrap();
        assert_eq!(parsed, tuned);
    }

    #[test]
    fn test_restore_invalid_snapshot_keeps_config() {
        let mut manager = ConfigManager::new();
        let result = manager.restore_config_from_snapshot(r#"{"locale": "fr"}"#);
        assert!(result.is_err());
        assert_eq!(manager.config().locale, "ko");
    }
}
