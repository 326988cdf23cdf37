use httpmock::prelude::*;
use keeper_core::KeeperError;
use keeper_core::api::SolrAdminClient;
use keeper_core::backup::BackupManager;
use keeper_core::config::AppConfig;
use keeper_core::lifecycle::{LifecycleController, LifecycleOptions, OperationKind};
use serde_json::json;
use std::time::Duration;

const COLLECTIONS_PATH: &str = "/solr/admin/collections";
const LOCATION: &str = "/backups";

fn fast_options() -> LifecycleOptions {
    LifecycleOptions {
        poll_interval: Duration::from_millis(10),
        ..Default::default()
    }
}

fn controller(server: &MockServer) -> LifecycleController {
    controller_with(server, fast_options())
}

fn controller_with(server: &MockServer, options: LifecycleOptions) -> LifecycleController {
    LifecycleController::new(SolrAdminClient::new(server.base_url()), options)
}

#[tokio::test]
async fn backup_runs_submit_poll_release() {
    let server = MockServer::start_async().await;

    let submit = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(COLLECTIONS_PATH)
                .query_param("action", "BACKUP")
                .query_param("collection", "products")
                .query_param("name", "products")
                .query_param("location", LOCATION)
                .query_param("incremental", "true");
            then.status(200)
                .json_body(json!({ "responseHeader": { "status": 0 } }));
        })
        .await;

    let status = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(COLLECTIONS_PATH)
                .query_param("action", "REQUESTSTATUS");
            then.status(200)
                .json_body(json!({ "status": { "state": "completed" } }));
        })
        .await;

    let release = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(COLLECTIONS_PATH)
                .query_param("action", "DELETESTATUS");
            then.status(200)
                .json_body(json!({ "responseHeader": { "status": 0 } }));
        })
        .await;

    controller(&server)
        .run_to_completion(&OperationKind::Backup, "products", LOCATION)
        .await
        .unwrap();

    submit.assert_async().await;
    status.assert_async().await;
    release.assert_async().await;
}

#[tokio::test]
async fn request_id_collision_stops_before_polling() {
    let server = MockServer::start_async().await;

    let submit = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(COLLECTIONS_PATH)
                .query_param("action", "BACKUP");
            then.status(200)
                .json_body(json!({ "error": "Task with the same requestid already exists." }));
        })
        .await;

    let status = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(COLLECTIONS_PATH)
                .query_param("action", "REQUESTSTATUS");
            then.status(200)
                .json_body(json!({ "status": { "state": "completed" } }));
        })
        .await;

    let release = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(COLLECTIONS_PATH)
                .query_param("action", "DELETESTATUS");
            then.status(200).json_body(json!({}));
        })
        .await;

    let result = controller(&server)
        .run_to_completion(&OperationKind::Backup, "products", LOCATION)
        .await;

    assert!(matches!(result, Err(KeeperError::RequestIdCollision)));
    submit.assert_async().await;
    assert_eq!(status.hits_async().await, 0);
    assert_eq!(release.hits_async().await, 0);
}

#[tokio::test]
async fn remote_rejection_carries_message() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(COLLECTIONS_PATH)
                .query_param("action", "RESTORE");
            then.status(200)
                .json_body(json!({ "error": "Collection not found: products" }));
        })
        .await;

    let result = controller(&server)
        .run_to_completion(&OperationKind::RestoreInPlace, "products", LOCATION)
        .await;

    match result {
        Err(KeeperError::RemoteRejected(message)) => {
            assert_eq!(message, "Collection not found: products");
        }
        other => panic!("预期 RemoteRejected，实际: {other:?}"),
    }
}

#[tokio::test]
async fn unknown_state_fails_fast_but_still_releases() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(COLLECTIONS_PATH)
                .query_param("action", "BACKUP");
            then.status(200)
                .json_body(json!({ "responseHeader": { "status": 0 } }));
        })
        .await;

    let status = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(COLLECTIONS_PATH)
                .query_param("action", "REQUESTSTATUS");
            then.status(200)
                .json_body(json!({ "status": { "state": "notfound" } }));
        })
        .await;

    let release = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(COLLECTIONS_PATH)
                .query_param("action", "DELETESTATUS");
            then.status(200).json_body(json!({}));
        })
        .await;

    let result = controller(&server)
        .run_to_completion(&OperationKind::Backup, "products", LOCATION)
        .await;

    match result {
        Err(KeeperError::UnknownState(state)) => assert_eq!(state, "notfound"),
        other => panic!("预期 UnknownState，实际: {other:?}"),
    }

    // 状态异常后不再继续轮询，但请求 id 仍被释放一次
    assert_eq!(status.hits_async().await, 1);
    assert_eq!(release.hits_async().await, 1);
}

#[tokio::test]
async fn missing_status_field_is_reported() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(COLLECTIONS_PATH)
                .query_param("action", "REQUESTSTATUS");
            then.status(200)
                .json_body(json!({ "responseHeader": { "status": 0 } }));
        })
        .await;

    let result = controller(&server).wait_for_completion("sb-1").await;

    match result {
        Err(KeeperError::MissingField(field)) => assert_eq!(field, "status"),
        other => panic!("预期 MissingField，实际: {other:?}"),
    }
}

#[tokio::test]
async fn bounded_wait_times_out_on_long_running_operation() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(COLLECTIONS_PATH)
                .query_param("action", "REQUESTSTATUS");
            then.status(200)
                .json_body(json!({ "status": { "state": "running" } }));
        })
        .await;

    let options = LifecycleOptions {
        poll_interval: Duration::from_millis(10),
        max_wait: Some(Duration::from_millis(30)),
        ..Default::default()
    };

    let result = controller_with(&server, options)
        .wait_for_completion("sb-1")
        .await;

    assert!(matches!(result, Err(KeeperError::PollTimeout(_))));
}

#[tokio::test]
async fn cancellation_aborts_the_poll_loop() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(COLLECTIONS_PATH)
                .query_param("action", "REQUESTSTATUS");
            then.status(200)
                .json_body(json!({ "status": { "state": "running" } }));
        })
        .await;

    let options = fast_options();
    options.cancel.cancel();

    let result = controller_with(&server, options)
        .wait_for_completion("sb-1")
        .await;

    assert!(matches!(result, Err(KeeperError::Cancelled)));
}

#[tokio::test]
async fn failed_collection_aborts_backup_sweep() {
    let server = MockServer::start_async().await;

    let first = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(COLLECTIONS_PATH)
                .query_param("action", "BACKUP")
                .query_param("collection", "products");
            then.status(200)
                .json_body(json!({ "error": "Collection not found: products" }));
        })
        .await;

    let second = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(COLLECTIONS_PATH)
                .query_param("action", "BACKUP")
                .query_param("collection", "authors");
            then.status(200)
                .json_body(json!({ "responseHeader": { "status": 0 } }));
        })
        .await;

    let mut config = AppConfig::default();
    config.solr.endpoint = server.base_url();
    config.solr.collections = vec!["products".to_string(), "authors".to_string()];
    config.solr.location = LOCATION.to_string();

    let manager = BackupManager::new(controller(&server), config);
    let result = manager.backup_all().await;

    // 第一个 collection 失败即中止批次，后一个 collection 不再提交
    assert!(matches!(result, Err(KeeperError::RemoteRejected(_))));
    first.assert_async().await;
    assert_eq!(second.hits_async().await, 0);
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path(COLLECTIONS_PATH);
            then.status(500).body("Internal Server Error");
        })
        .await;

    let result = controller(&server)
        .run_to_completion(&OperationKind::Backup, "products", LOCATION)
        .await;

    assert!(matches!(result, Err(KeeperError::Json(_))));
}
