//! 测试工具模块
//!
//! 提供测试所需的辅助函数，简化测试代码编写。

use uuid::Uuid;

// ==================== 测试数据辅助 ====================

/// 生成唯一的测试用户 ID
pub fn test_user_id() -> String {
    format!("test-user-{}", Uuid::new_v4())
}

/// 生成唯一的测试活动名称
pub fn test_campaign_name(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

// ==================== 测试日志 ====================

/// 初始化测试日志
///
/// 重复初始化时静默忽略，便于多个测试共用。
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}
