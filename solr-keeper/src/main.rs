use clap::Parser;
use keeper_core::KeeperError;
use solr_keeper::{Cli, CliApp, Commands, run_init, setup_logging};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    // 解析命令行参数
    let cli = Cli::parse();

    // 设置日志记录
    setup_logging(cli.verbose);

    // `init` 命令是特例，它不需要预先加载配置
    if let Commands::Init { force } = cli.command {
        if let Err(e) = run_init(force) {
            error!("❌ 初始化失败: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // Ctrl-C 只取消轮询等待，已提交的远端操作会继续执行
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("收到中断信号，停止等待当前异步操作...");
                cancel.cancel();
            }
        });
    }

    // 对于其他所有命令，需要加载配置并装配应用
    let app = match CliApp::load(cli.config.as_deref(), cancel) {
        Ok(app) => app,
        Err(KeeperError::ConfigNotFound) => {
            error!("❌ 未找到配置文件。");
            error!("👉 请先运行 'solr-keeper init' 命令来创建配置文件。");
            std::process::exit(1);
        }
        Err(e) => {
            error!("❌ 应用初始化失败: {}", e);
            std::process::exit(1);
        }
    };

    // 运行命令
    if let Err(e) = app.run_command(cli.command).await {
        error!("❌ 操作失败: {}", e);
        std::process::exit(1);
    }
}
