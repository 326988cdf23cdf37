use crate::app::CliApp;
use crate::cli::CollectionTarget;
use keeper_core::error::Result;
use tracing::{info, warn};

/// 将 collection 原地恢复至最近一次备份
///
/// 恢复会用备份内容覆盖同名 collection 的当前数据。
pub async fn run_restore(app: &CliApp, target: CollectionTarget) -> Result<()> {
    info!("♻️  原地恢复");
    info!("===========");
    warn!("⚠️  恢复会用最近一次备份覆盖 collection 的当前内容");

    let indices = app.resolve_target(&target)?;
    if indices.is_empty() {
        info!("📦 配置中没有 collection，无事可做");
        return Ok(());
    }

    for index in indices {
        let name = app.config.collection_name(index).to_string();
        info!("📦 恢复 collection [{}] {}", index, name);
        app.backup_manager.restore_collection(index).await?;
        info!("   ✅ {} 恢复完成", name);
    }

    Ok(())
}
