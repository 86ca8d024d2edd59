//! CLI 命令定义
//!
//! 使用 clap derive 宏定义命令行接口结构。
//! 两个子命令分别覆盖功能演示与并发压测场景。

use clap::{Parser, Subcommand};

/// 优惠券客户端命令行工具
///
/// 通过 HTTP 调用优惠券发放服务，提供演示与压测功能。
/// 使用 `--help` 查看各子命令的详细说明。
#[derive(Parser, Debug)]
#[command(name = "coupon-client")]
#[command(version, about = "优惠券发放服务演示与压测客户端")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// 服务端地址
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    pub server_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// 子命令枚举
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 端到端演示
    ///
    /// 创建一个 2 秒后开始的小容量活动，观察未开始状态，
    /// 等待活动激活后领取一张优惠券，最后核对发放记录与计数。
    Demo,

    /// 并发压测
    ///
    /// 多个并发 worker 分摊一个共享请求队列，对同一活动发起领取，
    /// 统计吞吐并核对发放数据的一致性。
    Loadtest {
        /// 并发 worker 数量
        #[arg(short, long, default_value = "100")]
        workers: usize,

        /// 请求总数
        #[arg(short, long, default_value = "1000")]
        requests: usize,

        /// 活动发放总量
        #[arg(long, default_value = "50")]
        limit: u32,
    },
}

// ============================================================================
// 单元测试
// ============================================================================
