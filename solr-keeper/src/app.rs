use keeper_core::api::SolrAdminClient;
use keeper_core::backup::BackupManager;
use keeper_core::config::AppConfig;
use keeper_core::error::{KeeperError, Result};
use keeper_core::lifecycle::{LifecycleController, LifecycleOptions};
use keeper_core::retention::RetentionEngine;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::cli::{CollectionTarget, Commands};
use crate::commands;

#[derive(Clone)]
pub struct CliApp {
    pub config: AppConfig,
    pub backup_manager: BackupManager,
    pub retention_engine: RetentionEngine,
}

impl CliApp {
    /// 按配置装配 CLI 应用
    pub fn new(config: AppConfig, cancel: CancellationToken) -> Self {
        let api = SolrAdminClient::new(&config.solr.endpoint);
        let options = LifecycleOptions {
            poll_interval: Duration::from_secs(config.lifecycle.poll_interval_secs),
            max_wait: config.lifecycle.max_wait_secs.map(Duration::from_secs),
            cancel,
        };
        let controller = LifecycleController::new(api, options);

        let backup_manager = BackupManager::new(controller.clone(), config.clone());
        let retention_engine = RetentionEngine::new(controller, config.clone());

        Self {
            config,
            backup_manager,
            retention_engine,
        }
    }

    /// 加载配置并装配应用
    ///
    /// 指定了 --config 时只读该文件，否则按默认顺序查找。
    pub fn load(config_path: Option<&Path>, cancel: CancellationToken) -> Result<Self> {
        let config = match config_path {
            Some(path) => AppConfig::load_from_file(path)?,
            None => AppConfig::find_and_load_config()?,
        };
        config.validate()?;

        Ok(Self::new(config, cancel))
    }

    /// 运行应用命令
    pub async fn run_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Init { .. } => unreachable!(), // 已经在 main.rs 中处理
            Commands::Backup { target } => commands::run_backup(self, target).await,
            Commands::Restore { target } => commands::run_restore(self, target).await,
            Commands::List { target } => commands::run_list(self, target).await,
            Commands::Prune { target } => commands::run_prune(self, target).await,
            Commands::Status => commands::run_status(self),
        }
    }

    /// 将命令目标解析为待处理的 collection 下标列表
    ///
    /// 核心库按下标直接寻址，越界校验必须发生在这里。
    pub fn resolve_target(&self, target: &CollectionTarget) -> Result<Vec<usize>> {
        match target {
            CollectionTarget::All => Ok((0..self.config.collection_count()).collect()),
            CollectionTarget::Index(index) => {
                if *index >= self.config.collection_count() {
                    return Err(KeeperError::custom(format!(
                        "collection 序号 {} 超出范围，配置中共有 {} 个 collection",
                        index,
                        self.config.collection_count()
                    )));
                }
                Ok(vec![*index])
            }
        }
    }
}
