//! 请求 DTO 定义
//!
//! 所有 REST API 的请求体结构，字段级校验交给 validator 派生宏。

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

/// 创建活动请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCampaignRequest {
    /// 活动名称（同时作为券码前缀的来源）
    #[validate(length(min = 1, max = 100, message = "活动名称长度必须在 1-100 个字符之间"))]
    pub name: String,

    /// 开始时间（RFC 3339）
    pub start_time: DateTime<Utc>,

    /// 发放总量
    #[validate(range(min = 1, message = "发放总量必须大于 0"))]
    pub total_quantity: u32,
}

/// 发放优惠券请求
#[derive(Debug, Deserialize, Validate)]
pub struct IssueCouponRequest {
    /// 领取用户 ID
    #[validate(length(min = 1, message = "用户 ID 不能为空"))]
    pub user_id: String,
}
