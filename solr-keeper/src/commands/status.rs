use crate::app::CliApp;
use keeper_core::error::Result;
use tracing::info;

/// 显示当前配置与目标 collection
pub fn run_status(app: &CliApp) -> Result<()> {
    info!("🗂️  Solr Keeper 状态");
    info!("==================");
    info!("📋 基本信息:");
    info!("   客户端版本: v{}", env!("CARGO_PKG_VERSION"));
    info!("   Solr 地址: {}", app.config.solr.endpoint);
    info!("   备份存储路径: {}", app.config.solr.location);
    info!("   备份保留天数: {} 天", app.config.solr.retention_days);
    info!(
        "   轮询间隔: {} 秒",
        app.config.lifecycle.poll_interval_secs
    );
    match app.config.lifecycle.max_wait_secs {
        Some(secs) => info!("   单操作最长等待: {} 秒", secs),
        None => info!("   单操作最长等待: 无限制"),
    }

    info!("📦 目标 collection:");
    if app.config.collection_count() == 0 {
        info!("   （空）请编辑配置文件的 solr.collections 列表");
        return Ok(());
    }
    for (index, name) in app.config.solr.collections.iter().enumerate() {
        info!("   [{}] {}", index, name);
    }

    Ok(())
}
