use crate::api::{OperationState, SolrAdminClient};
use crate::constants::{lifecycle as lifecycle_consts, solr};
use crate::error::{KeeperError, Result};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 单次异步操作的种类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationKind {
    /// 增量备份
    Backup,
    /// 原地恢复，恢复到同名 collection
    RestoreInPlace,
    /// 删除指定 backupId 的备份
    DeleteBackup { backup_id: i64 },
    /// 清理不再被任何备份引用的存储
    PurgeUnused,
}

impl OperationKind {
    /// 操作名称，用于日志输出
    pub fn display_name(&self) -> &'static str {
        match self {
            OperationKind::Backup => "备份",
            OperationKind::RestoreInPlace => "原地恢复",
            OperationKind::DeleteBackup { .. } => "删除备份",
            OperationKind::PurgeUnused => "清理未引用数据",
        }
    }

    /// 构造该操作的提交请求 query 串
    fn submit_query(&self, collection: &str, location: &str, request_tag: &str) -> String {
        match self {
            OperationKind::Backup => format!(
                "action=BACKUP&async={request_tag}&collection={collection}&name={collection}&location={location}&incremental=true"
            ),
            OperationKind::RestoreInPlace => format!(
                "action=RESTORE&async={request_tag}&collection={collection}&name={collection}&location={location}"
            ),
            OperationKind::DeleteBackup { backup_id } => format!(
                "action=DELETEBACKUP&async={request_tag}&name={collection}&location={location}&backupId={backup_id}"
            ),
            OperationKind::PurgeUnused => format!(
                "action=DELETEBACKUP&async={request_tag}&name={collection}&location={location}&purgeUnused=true"
            ),
        }
    }
}

/// 异步操作等待策略
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    /// 状态轮询间隔
    pub poll_interval: Duration,
    /// 单个操作的最长等待时间，None 表示一直等待
    pub max_wait: Option<Duration>,
    /// 外部取消信号
    pub cancel: CancellationToken,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(lifecycle_consts::DEFAULT_POLL_INTERVAL_SECS),
            max_wait: None,
            cancel: CancellationToken::new(),
        }
    }
}

/// 轮询对单次状态观察的裁决
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollDecision {
    /// 操作仍在执行，稍后重试
    Wait,
    /// 操作完成
    Done,
    /// 进入了既非完成也非执行中的状态
    Abort(String),
}

/// 根据观察到的状态决定轮询走向
///
/// 只有 submitted / running 继续等待、completed 算成功，
/// 其余状态（包括 failed 和任何未知值）立即中止，绝不重试为成功。
pub fn poll_decision(state: &OperationState) -> PollDecision {
    match state {
        OperationState::Submitted | OperationState::Running => PollDecision::Wait,
        OperationState::Completed => PollDecision::Done,
        OperationState::Failed => PollDecision::Abort("failed".to_string()),
        OperationState::Unknown(other) => PollDecision::Abort(other.clone()),
    }
}

static LAST_REQUEST_ID: AtomicI64 = AtomicI64::new(0);

/// 生成进程内严格递增的请求 id
///
/// 以当前毫秒时间为基准，与上一次取值相同或时钟回退时顺延 1。
/// 跨进程并发仍依赖服务端的同 id 任务冲突检测。
pub fn next_request_id() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    let updated = LAST_REQUEST_ID.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
        Some(if now > last { now } else { last + 1 })
    });

    match updated {
        Ok(last) if now > last => now,
        Ok(last) => last + 1,
        // 闭包恒返回 Some，fetch_update 不会失败
        Err(last) => last,
    }
}

/// 将请求 id 包装成 Solr 要求的异步标签
pub fn request_tag(request_id: i64) -> String {
    format!("{}-{}", solr::ASYNC_TAG_PREFIX, request_id)
}

/// 异步操作生命周期控制器
///
/// 封装 submit -> poll -> release 状态机，备份、恢复、删除共用。
#[derive(Debug, Clone)]
pub struct LifecycleController {
    api: SolrAdminClient,
    options: LifecycleOptions,
}

impl LifecycleController {
    pub fn new(api: SolrAdminClient, options: LifecycleOptions) -> Self {
        Self { api, options }
    }

    pub fn api(&self) -> &SolrAdminClient {
        &self.api
    }

    /// 提交操作
    ///
    /// 请求 id 冲突与其它服务端拒绝在信封判定中区分，
    /// 冲突时调用方需要换新 id 重新发起整个操作。
    pub async fn submit(
        &self,
        kind: &OperationKind,
        collection: &str,
        location: &str,
        request_tag: &str,
    ) -> Result<()> {
        let uri = self
            .api
            .collections_url(&kind.submit_query(collection, location, request_tag));
        let value = self.api.send_request(&uri).await?;
        SolrAdminClient::classify_envelope(&value)?;

        debug!("{} 提交成功: {}", kind.display_name(), request_tag);
        Ok(())
    }

    /// 轮询直到操作到达终态
    pub async fn wait_for_completion(&self, request_tag: &str) -> Result<()> {
        let started = Instant::now();

        loop {
            let status = self.api.request_status(request_tag).await?;

            match poll_decision(&status.state()) {
                PollDecision::Done => {
                    debug!("操作 {} 已完成", request_tag);
                    return Ok(());
                }
                PollDecision::Abort(state) => {
                    let detail = match &status.msg {
                        Some(msg) => format!("{state}: {msg}"),
                        None => state,
                    };
                    return Err(KeeperError::UnknownState(detail));
                }
                PollDecision::Wait => {}
            }

            if let Some(max_wait) = self.options.max_wait {
                if started.elapsed() >= max_wait {
                    return Err(KeeperError::PollTimeout(max_wait.as_secs()));
                }
            }

            debug!(
                "操作 {} 仍在执行，{} 秒后重试",
                request_tag,
                self.options.poll_interval.as_secs()
            );

            tokio::select! {
                _ = self.options.cancel.cancelled() => return Err(KeeperError::Cancelled),
                _ = tokio::time::sleep(self.options.poll_interval) => {}
            }
        }
    }

    /// 释放服务端的请求 id 记录
    pub async fn release(&self, request_tag: &str) -> Result<()> {
        self.api.delete_status(request_tag).await
    }

    /// 完整执行一次 submit -> poll -> release
    ///
    /// 提交失败立即短路。轮询失败时仍尽力释放请求 id，
    /// 避免状态记录在服务端泄漏；释放失败只记日志，原始错误原样返回。
    pub async fn run_to_completion(
        &self,
        kind: &OperationKind,
        collection: &str,
        location: &str,
    ) -> Result<()> {
        let request_tag = request_tag(next_request_id());
        info!(
            "开始{}: collection={} requestid={}",
            kind.display_name(),
            collection,
            request_tag
        );

        self.submit(kind, collection, location, &request_tag).await?;

        match self.wait_for_completion(&request_tag).await {
            Ok(()) => {
                self.release(&request_tag).await?;
                info!("{}完成: collection={}", kind.display_name(), collection);
                Ok(())
            }
            Err(wait_error) => {
                if let Err(release_error) = self.release(&request_tag).await {
                    warn!("释放请求 id {} 失败: {}", request_tag, release_error);
                }
                Err(wait_error)
            }
        }
    }
}
