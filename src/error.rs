use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiagrunError {
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("配置文件解析失败: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for diagrun crate
pub type Result<T> = std::result::Result<T, DiagrunError>;
