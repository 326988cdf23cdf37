use crate::constants::{config as config_consts, lifecycle as lifecycle_consts};
use crate::error::{KeeperError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 应用配置结构
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub solr: SolrConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
}

/// Solr 集群与备份目标配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SolrConfig {
    /// Solr 基础地址，例如 http://solr:8983
    pub endpoint: String,
    /// 按序号寻址的 collection 列表
    pub collections: Vec<String>,
    /// 备份存储根路径，Solr 端可见的 location
    pub location: String,
    /// 备份保留天数
    pub retention_days: i64,
}

/// 异步操作等待相关配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LifecycleConfig {
    /// 状态轮询间隔（秒）
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// 单个异步操作的最长等待时间（秒），不设置则一直等待
    #[serde(default)]
    pub max_wait_secs: Option<u64>,
}

fn default_poll_interval_secs() -> u64 {
    lifecycle_consts::DEFAULT_POLL_INTERVAL_SECS
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            max_wait_secs: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            solr: SolrConfig {
                endpoint: config_consts::DEFAULT_ENDPOINT.to_string(),
                collections: Vec::new(),
                location: config_consts::DEFAULT_LOCATION.to_string(),
                retention_days: config_consts::DEFAULT_RETENTION_DAYS,
            },
            lifecycle: LifecycleConfig::default(),
        }
    }
}

impl AppConfig {
    /// 按优先级查找并加载配置文件
    /// 查找顺序：config.toml -> solr-keeper.toml -> .solr-keeper.toml
    pub fn find_and_load_config() -> Result<Self> {
        for config_file in &config_consts::CONFIG_FILE_CANDIDATES {
            if Path::new(config_file).exists() {
                tracing::info!("找到配置文件: {}", config_file);
                return Self::load_from_file(config_file);
            }
        }

        Err(KeeperError::ConfigNotFound)
    }

    /// 从指定文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_with_comments();
        fs::write(&path, content)?;
        Ok(())
    }

    /// 生成带注释的TOML配置
    fn to_toml_with_comments(&self) -> String {
        const TEMPLATE: &str = include_str!("../templates/config.toml.template");

        TEMPLATE
            .replace("{endpoint}", &self.solr.endpoint)
            .replace("{location}", &self.solr.location)
            .replace("{retention_days}", &self.solr.retention_days.to_string())
            .replace(
                "{poll_interval_secs}",
                &self.lifecycle.poll_interval_secs.to_string(),
            )
    }

    /// 校验配置内容
    pub fn validate(&self) -> Result<()> {
        if self.solr.endpoint.trim().is_empty() {
            return Err(KeeperError::custom("solr.endpoint 不能为空"));
        }
        if self.solr.retention_days < 0 {
            return Err(KeeperError::custom(format!(
                "solr.retention_days 不能为负数: {}",
                self.solr.retention_days
            )));
        }
        if self.solr.retention_days > config_consts::MAX_RETENTION_DAYS {
            return Err(KeeperError::custom(format!(
                "solr.retention_days 超出上限 {}: {}",
                config_consts::MAX_RETENTION_DAYS,
                self.solr.retention_days
            )));
        }
        if self.lifecycle.poll_interval_secs == 0 {
            return Err(KeeperError::custom("lifecycle.poll_interval_secs 不能为 0"));
        }
        Ok(())
    }

    /// 配置中的 collection 数量
    pub fn collection_count(&self) -> usize {
        self.solr.collections.len()
    }

    /// 按下标取 collection 名称，越界属于调用方缺陷
    pub fn collection_name(&self, index: usize) -> &str {
        &self.solr.collections[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[solr]
endpoint = "http://solr:8983"
collections = ["products", "authors"]
location = "/backups"
retention_days = 14

[lifecycle]
poll_interval_secs = 2
max_wait_secs = 600
"#,
        )
        .unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.solr.endpoint, "http://solr:8983");
        assert_eq!(config.collection_count(), 2);
        assert_eq!(config.collection_name(1), "authors");
        assert_eq!(config.solr.retention_days, 14);
        assert_eq!(config.lifecycle.poll_interval_secs, 2);
        assert_eq!(config.lifecycle.max_wait_secs, Some(600));
        config.validate().unwrap();
    }

    #[test]
    fn test_lifecycle_section_is_optional() {
        let config: AppConfig = toml::from_str(
            r#"
[solr]
endpoint = "http://solr:8983"
collections = ["products"]
location = "/backups"
retention_days = 7
"#,
        )
        .unwrap();

        assert_eq!(config.lifecycle.poll_interval_secs, 5);
        assert_eq!(config.lifecycle.max_wait_secs, None);
    }

    #[test]
    fn test_validate_rejects_negative_retention() {
        let mut config = AppConfig::default();
        config.solr.retention_days = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_retention() {
        // 天数离谱大的配置会让截止时间计算溢出，必须在加载阶段拦下
        let mut config = AppConfig::default();
        config.solr.retention_days = i64::MAX;
        assert!(config.validate().is_err());

        config.solr.retention_days = 40000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_saved_default_config_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        AppConfig::default().save_to_file(&path).unwrap();
        let reloaded = AppConfig::load_from_file(&path).unwrap();

        assert_eq!(reloaded.solr.endpoint, "http://localhost:8983");
        assert!(reloaded.solr.collections.is_empty());
        assert_eq!(reloaded.solr.retention_days, 7);
        assert_eq!(reloaded.lifecycle.poll_interval_secs, 5);
    }
}
