use thiserror::Error;

/// 脚本校验失败，携带全部（有序的）错误信息
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .messages.join("; "))]
pub struct ValidationError {
    messages: Vec<String>,
}

impl ValidationError {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    /// 按发现顺序返回所有错误信息
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("脚本校验失败: {0}")]
    Validation(#[from] ValidationError),

    #[error("无效的 URL: {0}")]
    InvalidUrl(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML 解析错误: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for ForgeError {
    fn from(err: anyhow::Error) -> Self {
        ForgeError::Other(err.to_string())
    }
}

/// Result type for k6forge crate
pub type Result<T> = std::result::Result<T, ForgeError>;
