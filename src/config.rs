use crate::Result;
use crate::error::DiagrunError;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 报告输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = DiagrunError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(DiagrunError::ConfigError(format!(
                "unknown report format '{}', expected text or json",
                other
            ))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// `[report]` 段
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub format: ReportFormat,
    pub verbose: bool,
}

/// `[log]` 段
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// 完整配置文件
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub report: ReportConfig,
    pub log: LogConfig,
}

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    pub const CONFIG_FILE: &'static str = "diagrun.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<RunnerConfig> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&content)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded config");
        Ok(config)
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录及父目录
    /// 2. 用户配置目录 ~/.config/diagrun/
    ///
    /// 找到但解析失败时返回错误，而不是静默忽略
    pub fn find_and_load() -> Result<Option<RunnerConfig>> {
        match Self::locate() {
            Some(path) => Self::load_from_path(path).map(Some),
            None => Ok(None),
        }
    }

    /// 找到第一个存在的配置文件路径
    pub fn locate() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok();
        cwd.and_then(|dir| Self::search_upwards(&dir))
            .or_else(Self::user_config_path)
    }

    /// 从 `start` 开始向上逐级查找
    pub fn search_upwards(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.is_file() {
                return Some(config_path);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    fn user_config_path() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        let config_path = home.join(".config").join("diagrun").join(Self::CONFIG_FILE);

        config_path.is_file().then_some(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config: RunnerConfig = toml::from_str("").unwrap();
        assert_eq!(config.report.format, ReportFormat::Text);
        assert!(!config.report.verbose);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_document() {
        let config: RunnerConfig = toml::from_str(
            r#"
[report]
format = "json"
"#,
        )
        .unwrap();

        assert_eq!(config.report.format, ReportFormat::Json);
        assert!(!config.report.verbose);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
