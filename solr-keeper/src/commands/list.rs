use crate::app::CliApp;
use crate::cli::CollectionTarget;
use keeper_core::error::Result;
use tracing::info;

/// 列出已有备份
pub async fn run_list(app: &CliApp, target: CollectionTarget) -> Result<()> {
    let indices = app.resolve_target(&target)?;
    if indices.is_empty() {
        info!("📦 配置中没有 collection");
        return Ok(());
    }

    for index in indices {
        let name = app.config.collection_name(index).to_string();
        let backups = app.backup_manager.list_backups(index).await?;

        info!("📦 collection [{}] {} 的备份列表", index, name);
        info!("============");

        if backups.is_empty() {
            info!("   暂无备份记录");
            info!("   💡 使用 'solr-keeper backup {}' 创建备份", index);
            continue;
        }

        // 按 backupId 升序逐行输出
        info!(
            "{:<6} {:<24} {:<16} {}",
            "ID", "Config Name", "Alias", "Backup Time"
        );
        info!("{}", "-".repeat(76));

        for backup in &backups {
            let alias = if backup.collection_alias.is_empty() {
                "-"
            } else {
                backup.collection_alias.as_str()
            };
            info!(
                "{:<6} {:<24} {:<16} {}",
                backup.backup_id, backup.config_name, alias, backup.start_time
            );
        }
    }

    Ok(())
}
