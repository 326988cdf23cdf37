use thiserror::Error;

pub type Result<T> = std::result::Result<T, KeeperError>;

#[derive(Error, Debug)]
pub enum KeeperError {
    #[error("配置错误: {0}")]
    Config(#[from] toml::de::Error),

    #[error("HTTP 请求错误: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("响应 JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("服务端响应无效: {0}")]
    InvalidResponse(String),

    #[error("响应缺少必需字段: {0}")]
    MissingField(String),

    #[error("异步请求 id 冲突，服务端已存在同 id 的任务")]
    RequestIdCollision,

    #[error("Solr 拒绝了请求: {0}")]
    RemoteRejected(String),

    #[error("异步操作进入未知状态: {0}")]
    UnknownState(String),

    #[error("备份时间戳格式错误: {0}")]
    TimestampParse(String),

    #[error("等待异步操作超时，已等待 {0} 秒")]
    PollTimeout(u64),

    #[error("异步操作等待被取消")]
    Cancelled,

    #[error("配置文件未找到")]
    ConfigNotFound,

    #[error("自定义错误: {0}")]
    Custom(String),
}

impl KeeperError {
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }
}
