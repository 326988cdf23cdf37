use keeper_core::config::AppConfig;
use keeper_core::constants::config as config_consts;
use keeper_core::error::Result;
use std::path::Path;
use tracing::{info, warn};

/// 运行独立的初始化流程，生成默认配置文件
pub fn run_init(force: bool) -> Result<()> {
    info!("🗂️  Solr Keeper 初始化");
    info!("======================");

    // 检查是否已经初始化过
    let existing = config_consts::CONFIG_FILE_CANDIDATES
        .iter()
        .find(|candidate| Path::new(candidate).exists());

    if let Some(found) = existing {
        if !force {
            warn!("⚠️  检测到已存在的配置文件: {}", found);
            info!("如果您要重新初始化，请使用 --force 参数");
            info!("示例: solr-keeper init --force");
            return Ok(());
        }
        warn!("--force 已指定，将覆盖 {}", config_consts::DEFAULT_CONFIG_FILE);
    }

    let config = AppConfig::default();
    config.save_to_file(config_consts::DEFAULT_CONFIG_FILE)?;
    info!("✅ 创建配置文件: {}", config_consts::DEFAULT_CONFIG_FILE);

    info!("📋 下一步:");
    info!("   1. 编辑 {} 填入 Solr 地址与 collection 列表", config_consts::DEFAULT_CONFIG_FILE);
    info!("   2. 运行 'solr-keeper status' 确认配置");
    info!("   3. 运行 'solr-keeper backup all' 触发首次备份");

    Ok(())
}
