use crate::api::BackupRecord;
use crate::config::AppConfig;
use crate::constants::solr;
use crate::error::{KeeperError, Result};
use crate::lifecycle::{LifecycleController, OperationKind};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use tracing::info;

/// 解析备份记录的 startTime 字段
///
/// 格式必须严格匹配微秒精度加字面 Z 后缀，任何偏差都按解析失败处理。
pub fn parse_backup_time(value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, solr::BACKUP_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|err| KeeperError::TimestampParse(format!("{value}: {err}")))
}

/// 按保留截止时间挑选待删除的备份
///
/// 先解析全部时间戳再做筛选，任何一条解析失败都在删除动作发生前中止；
/// 候选按 backupId 升序返回，保证部分失败行为可复现。
pub fn select_prune_candidates(
    records: &[BackupRecord],
    cutoff: DateTime<Utc>,
) -> Result<Vec<BackupRecord>> {
    let mut candidates = Vec::new();
    for record in records {
        let start_time = parse_backup_time(&record.start_time)?;
        if start_time < cutoff {
            candidates.push(record.clone());
        }
    }

    candidates.sort_by_key(|record| record.backup_id);
    Ok(candidates)
}

/// 基于保留天数的备份清理引擎
#[derive(Debug, Clone)]
pub struct RetentionEngine {
    controller: LifecycleController,
    config: AppConfig,
}

impl RetentionEngine {
    pub fn new(controller: LifecycleController, config: AppConfig) -> Self {
        Self { controller, config }
    }

    /// 计算当前的保留截止时间，纯时长减法，不做日历对齐
    pub fn cutoff(&self) -> DateTime<Utc> {
        Utc::now() - Duration::days(self.config.solr.retention_days)
    }

    /// 清理单个 collection 的超龄备份
    ///
    /// 逐条顺序删除，任一失败立即中止，不跳过后续候选；
    /// 全部删除成功后固定追加一次 purgeUnused，即使本轮没有候选。
    pub async fn prune_collection(&self, index: usize) -> Result<()> {
        let collection = self.config.collection_name(index);
        let location = &self.config.solr.location;

        let records = self.controller.api().list_backups(collection, location).await?;
        let cutoff = self.cutoff();
        let candidates = select_prune_candidates(&records, cutoff)?;

        info!(
            "collection {} 共 {} 个备份，其中 {} 个早于保留截止时间 {}",
            collection,
            records.len(),
            candidates.len(),
            cutoff.format("%Y-%m-%d %H:%M:%S")
        );

        for candidate in &candidates {
            self.controller
                .run_to_completion(
                    &OperationKind::DeleteBackup {
                        backup_id: candidate.backup_id,
                    },
                    collection,
                    location,
                )
                .await?;
        }

        // 回收不再被任何备份引用的存储，每轮 prune 固定执行一次
        self.controller
            .run_to_completion(&OperationKind::PurgeUnused, collection, location)
            .await
    }

    /// 依次清理全部 collection
    pub async fn prune_all(&self) -> Result<()> {
        for index in 0..self.config.collection_count() {
            self.prune_collection(index).await?;
        }
        Ok(())
    }
}
