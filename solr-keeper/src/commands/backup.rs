use crate::app::CliApp;
use crate::cli::CollectionTarget;
use keeper_core::error::Result;
use tracing::info;

/// 触发增量备份
pub async fn run_backup(app: &CliApp, target: CollectionTarget) -> Result<()> {
    info!("💾 触发增量备份");
    info!("===============");

    let indices = app.resolve_target(&target)?;
    if indices.is_empty() {
        info!("📦 配置中没有 collection，无事可做");
        info!("💡 请编辑配置文件的 solr.collections 列表");
        return Ok(());
    }

    for index in indices {
        let name = app.config.collection_name(index).to_string();
        info!("📦 备份 collection [{}] {}", index, name);
        app.backup_manager.backup_collection(index).await?;
        info!("   ✅ {} 备份完成", name);
    }

    Ok(())
}
