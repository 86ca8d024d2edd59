//! CLI 模块
//!
//! 提供命令行接口，支持以下功能：
//!
//! - `demo` - 端到端演示活动创建、激活与领取流程
//! - `loadtest` - 并发压测单个活动的发放能力
//!
//! # 使用示例
//!
//! ```bash
//! # 端到端演示
//! coupon-client demo
//!
//! # 并发压测（100 个 worker 发起 1000 次请求，抢 50 张券）
//! coupon-client loadtest -w 100 -r 1000 --limit 50
//!
//! # 指定服务端地址
//! coupon-client --server-url http://127.0.0.1:9090 demo
//! ```

pub mod commands;
pub mod runner;

pub use commands::{Cli, Commands};
pub use runner::CommandRunner;
