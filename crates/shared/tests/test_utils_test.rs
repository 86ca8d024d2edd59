//! test_utils 模块的集成测试
//!
//! 验证测试工具模块的功能正确性

use coupon_shared::test_utils::*;

// ==================== 辅助函数测试 ====================

#[test]
fn test_user_id_uniqueness() {
    let ids: Vec<String> = (0..100).map(|_| test_user_id()).collect();
    let unique_count = ids
        .iter()
        .collect::<std::collections::HashSet<_>>()
        .len();

    assert_eq!(unique_count, 100, "生成的用户 ID 应该唯一");
}

#[test]
fn test_user_id_prefix() {
    let id = test_user_id();
    assert!(id.starts_with("test-user-"));
}

#[test]
fn test_campaign_name_generation() {
    let name = test_campaign_name("flash");
    assert!(name.starts_with("flash-"));

    // 同一前缀的两个名称互不相同
    assert_ne!(test_campaign_name("flash"), test_campaign_name("flash"));
}

// ==================== 测试日志 ====================

#[test]
fn test_init_test_tracing_idempotent() {
    // 重复初始化不应 panic
    init_test_tracing();
    init_test_tracing();
    init_test_tracing();
}
