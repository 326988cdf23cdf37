use crate::api::BackupRecord;
use crate::config::AppConfig;
use crate::error::Result;
use crate::lifecycle::{LifecycleController, OperationKind};
use tracing::info;

/// 备份与恢复操作入口
///
/// 所有操作按配置中的 collection 下标寻址，跨 collection 严格顺序执行，
/// 任何一个 collection 失败即中止整个批次。
#[derive(Debug, Clone)]
pub struct BackupManager {
    controller: LifecycleController,
    config: AppConfig,
}

impl BackupManager {
    pub fn new(controller: LifecycleController, config: AppConfig) -> Self {
        Self { controller, config }
    }

    /// 对单个 collection 执行增量备份
    pub async fn backup_collection(&self, index: usize) -> Result<()> {
        let collection = self.config.collection_name(index);
        self.controller
            .run_to_completion(&OperationKind::Backup, collection, &self.config.solr.location)
            .await
    }

    /// 依次备份全部 collection
    pub async fn backup_all(&self) -> Result<()> {
        for index in 0..self.config.collection_count() {
            self.backup_collection(index).await?;
        }
        Ok(())
    }

    /// 将单个 collection 原地恢复至其最近一次备份
    pub async fn restore_collection(&self, index: usize) -> Result<()> {
        let collection = self.config.collection_name(index);
        self.controller
            .run_to_completion(
                &OperationKind::RestoreInPlace,
                collection,
                &self.config.solr.location,
            )
            .await
    }

    /// 依次原地恢复全部 collection
    pub async fn restore_all(&self) -> Result<()> {
        for index in 0..self.config.collection_count() {
            self.restore_collection(index).await?;
        }
        Ok(())
    }

    /// 列出单个 collection 的备份记录，backupId 升序
    pub async fn list_backups(&self, index: usize) -> Result<Vec<BackupRecord>> {
        let collection = self.config.collection_name(index);
        let records = self
            .controller
            .api()
            .list_backups(collection, &self.config.solr.location)
            .await?;

        info!("collection {} 共有 {} 个备份", collection, records.len());
        Ok(records)
    }
}
