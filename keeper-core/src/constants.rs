/// Solr Collections Admin API 相关常量
pub mod solr {
    /// Collections API 路径
    pub const COLLECTION_API_PATH: &str = "/solr/admin/collections";

    /// 异步请求标签前缀，完整格式为 sb-{requestId}
    pub const ASYNC_TAG_PREFIX: &str = "sb";

    /// Solr 在异步请求 id 重复时返回的错误文案，整串匹配
    pub const DUPLICATE_REQUEST_ID_ERROR: &str = "Task with the same requestid already exists.";

    /// 备份记录 startTime 字段的固定格式：微秒精度加字面 Z 后缀
    pub const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";
}

/// 异步操作生命周期相关常量
pub mod lifecycle {
    /// 默认的状态轮询间隔（秒）
    pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
}

/// 配置文件相关常量
pub mod config {
    /// 默认配置文件查找顺序
    pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
        ["config.toml", "solr-keeper.toml", ".solr-keeper.toml"];

    /// 默认写出的配置文件名
    pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

    /// 默认的 Solr 地址
    pub const DEFAULT_ENDPOINT: &str = "http://localhost:8983";

    /// 默认的备份存储根路径
    pub const DEFAULT_LOCATION: &str = "/var/solr/backups";

    /// 默认的备份保留天数
    pub const DEFAULT_RETENTION_DAYS: i64 = 7;

    /// 配置允许的保留天数上限，约一百年
    pub const MAX_RETENTION_DAYS: i64 = 36500;
}
