use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// 命令作用目标：单个 collection 序号，或配置中的全部 collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionTarget {
    All,
    Index(usize),
}

impl FromStr for CollectionTarget {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("all") {
            return Ok(CollectionTarget::All);
        }
        value
            .parse::<usize>()
            .map(CollectionTarget::Index)
            .map_err(|_| format!("无效的 collection 目标 '{value}'，请使用序号或 all"))
    }
}

/// Solr Keeper - SolrCloud 备份 / 恢复 / 保留清理工具
#[derive(Parser)]
#[command(name = "solr-keeper")]
#[command(version)]
#[command(about = "SolrCloud 备份 / 恢复 / 保留清理工具")]
#[command(
    long_about = "驱动 Solr Collections API 的异步备份、恢复与删除操作，\
并按保留天数清理过期备份。适合放进定时任务运行。"
)]
pub struct Cli {
    /// 配置文件路径，不指定时按默认顺序查找
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 详细输出
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 首次使用时初始化，生成默认配置文件
    Init {
        /// 如果配置文件已存在，强制覆盖
        #[arg(long)]
        force: bool,
    },
    /// 对 collection 执行增量备份
    Backup {
        /// collection 序号，或 all 表示全部
        #[arg(default_value = "all")]
        target: CollectionTarget,
    },
    /// 将 collection 原地恢复至最近一次备份
    Restore {
        /// collection 序号，或 all 表示全部
        #[arg(default_value = "all")]
        target: CollectionTarget,
    },
    /// 列出已有备份
    List {
        /// collection 序号，或 all 表示全部
        #[arg(default_value = "all")]
        target: CollectionTarget,
    },
    /// 删除超过保留期的备份并清理存储
    Prune {
        /// collection 序号，或 all 表示全部
        #[arg(default_value = "all")]
        target: CollectionTarget,
    },
    /// 显示当前配置与目标 collection
    Status,
}
