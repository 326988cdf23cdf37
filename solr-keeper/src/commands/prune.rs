use crate::app::CliApp;
use crate::cli::CollectionTarget;
use keeper_core::error::Result;
use tracing::info;

/// 删除超过保留期的备份并清理存储
pub async fn run_prune(app: &CliApp, target: CollectionTarget) -> Result<()> {
    info!("🧹 清理过期备份");
    info!("===============");
    info!(
        "保留天数: {} 天（截止 {}）",
        app.config.solr.retention_days,
        app.retention_engine.cutoff().format("%Y-%m-%d %H:%M:%S")
    );

    let indices = app.resolve_target(&target)?;
    if indices.is_empty() {
        info!("📦 配置中没有 collection，无事可做");
        return Ok(());
    }

    for index in indices {
        let name = app.config.collection_name(index).to_string();
        info!("📦 清理 collection [{}] {}", index, name);
        app.retention_engine.prune_collection(index).await?;
        info!("   ✅ {} 清理完成", name);
    }

    Ok(())
}
