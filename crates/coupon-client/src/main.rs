//! Coupon Client CLI
//!
//! 优惠券发放服务客户端的命令行入口点。
//! 提供端到端演示和并发压测两种运行模式。

use clap::Parser;
use coupon_client::cli::{Cli, CommandRunner, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化 tracing 日志
    // 优先使用环境变量 RUST_LOG，否则使用命令行参数指定的级别
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .init();

    let runner = CommandRunner::new(cli.server_url);

    match cli.command {
        Commands::Demo => {
            runner.run_demo().await?;
        }
        Commands::Loadtest {
            workers,
            requests,
            limit,
        } => {
            runner.run_loadtest(workers, requests, limit).await?;
        }
    }

    Ok(())
}
