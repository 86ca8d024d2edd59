//! 统一可观测性模块
//!
//! 提供日志初始化和 HTTP 请求日志中间件。
//! 单进程部署，无外部采集器，所有诊断信息通过结构化日志输出。

pub mod middleware;
pub mod tracing;

pub use self::tracing::init;
