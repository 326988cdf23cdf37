use crate::constants::solr;
use crate::error::{KeeperError, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

/// Solr Collections Admin API 客户端
///
/// 只负责发出单次 GET 并解码 JSON 对象，不做重试也不做退避，
/// "仍在执行" 的重试语义完全由生命周期控制器的轮询承担。
#[derive(Debug, Clone)]
pub struct SolrAdminClient {
    client: Client,
    endpoint: String,
}

/// 一次 REQUESTSTATUS 查询解码出的状态
#[derive(Debug, Clone, Deserialize)]
pub struct OperationStatus {
    pub state: String,
    #[serde(default)]
    pub msg: Option<String>,
}

/// 异步操作状态机可见的状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationState {
    Submitted,
    Running,
    Completed,
    Failed,
    Unknown(String),
}

impl OperationStatus {
    /// 将服务端返回的 state 字符串归类
    pub fn state(&self) -> OperationState {
        match self.state.as_str() {
            "submitted" => OperationState::Submitted,
            "running" => OperationState::Running,
            "completed" => OperationState::Completed,
            "failed" => OperationState::Failed,
            other => OperationState::Unknown(other.to_string()),
        }
    }
}

/// LISTBACKUP 返回的单条备份记录
#[derive(Debug, Clone, Deserialize)]
pub struct BackupRecord {
    #[serde(rename = "backupId")]
    pub backup_id: i64,
    #[serde(rename = "collection.configName", default)]
    pub config_name: String,
    #[serde(rename = "collectionAlias", default)]
    pub collection_alias: String,
    #[serde(rename = "startTime")]
    pub start_time: String,
}

impl SolrAdminClient {
    /// 创建新的 API 客户端
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    /// 拼接 Collections API 请求地址
    pub(crate) fn collections_url(&self, query: &str) -> String {
        format!("{}{}?{}", self.endpoint, solr::COLLECTION_API_PATH, query)
    }

    /// 发送一次 GET 请求并解码为 JSON 对象
    ///
    /// 非 2xx 状态码不在这里特殊处理：Solr 的请求级错误通过
    /// 响应体里的 "error" 字段表达，由调用方判定。
    pub(crate) async fn send_request(&self, uri: &str) -> Result<Value> {
        debug!("请求 Solr Admin API: {}", uri);

        let response = self.client.get(uri).send().await?;
        let body = response.text().await?;
        debug!("响应体: {}", body);

        let value: Value = serde_json::from_str(&body)?;
        if !value.is_object() {
            return Err(KeeperError::InvalidResponse(format!(
                "响应不是 JSON 对象: {body}"
            )));
        }

        Ok(value)
    }

    /// 判定响应信封中的 "error" 字段
    ///
    /// 请求 id 冲突的固定文案单独归类，其余错误文本一律视为服务端拒绝。
    pub(crate) fn classify_envelope(value: &Value) -> Result<()> {
        let Some(remote_error) = value.get("error") else {
            return Ok(());
        };

        match remote_error.as_str() {
            Some(message) if message == solr::DUPLICATE_REQUEST_ID_ERROR => {
                error!("异步请求 id 冲突: {}", message);
                Err(KeeperError::RequestIdCollision)
            }
            Some(message) => {
                error!("Solr 拒绝请求: {}", message);
                Err(KeeperError::RemoteRejected(message.to_string()))
            }
            None => {
                error!("Solr 拒绝请求: {}", remote_error);
                Err(KeeperError::RemoteRejected(remote_error.to_string()))
            }
        }
    }

    /// 查询异步请求状态
    pub async fn request_status(&self, request_tag: &str) -> Result<OperationStatus> {
        let uri = self.collections_url(&format!("action=REQUESTSTATUS&requestid={request_tag}"));
        let value = self.send_request(&uri).await?;
        Self::classify_envelope(&value)?;

        let status = value
            .get("status")
            .ok_or_else(|| KeeperError::missing_field("status"))?;
        let status: OperationStatus = serde_json::from_value(status.clone())?;

        Ok(status)
    }

    /// 删除服务端的异步请求状态记录
    ///
    /// 响应内容只用于调试，传输与解码成功即视为释放完成。
    pub async fn delete_status(&self, request_tag: &str) -> Result<()> {
        let uri = self.collections_url(&format!("action=DELETESTATUS&requestid={request_tag}"));
        let value = self.send_request(&uri).await?;
        debug!("DELETESTATUS 响应: {}", value);
        Ok(())
    }

    /// 列出 collection 在指定 location 下的全部备份
    ///
    /// Solr 返回的条目顺序不保证，这里统一按 backupId 升序排列。
    pub async fn list_backups(&self, collection: &str, location: &str) -> Result<Vec<BackupRecord>> {
        let uri = self.collections_url(&format!(
            "action=LISTBACKUP&name={collection}&location={location}"
        ));
        let value = self.send_request(&uri).await?;
        Self::classify_envelope(&value)?;

        let backups = value
            .get("backups")
            .ok_or_else(|| KeeperError::missing_field("backups"))?;
        let mut records: Vec<BackupRecord> = serde_json::from_value(backups.clone())?;
        records.sort_by_key(|record| record.backup_id);

        Ok(records)
    }
}
