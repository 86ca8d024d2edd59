//! Coupon Client
//!
//! 优惠券发放服务的命令行客户端，用于端到端演示和并发压测。
//!
//! # 主要模块
//!
//! - `cli`: 命令行定义与命令执行器

pub mod cli;
