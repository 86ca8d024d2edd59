//! 响应 DTO 定义
//!
//! 所有 REST API 的响应体结构

use serde::{Deserialize, Serialize};

use crate::models::{Campaign, Coupon};

/// API 统一响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default = "Option::default")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }

    /// 创建成功响应（自定义消息）
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }

    /// 创建失败响应
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }
}

/// 活动详情响应：活动与已发放的优惠券列表
#[derive(Debug, Serialize, Deserialize)]
pub struct CampaignDetailResponse {
    pub campaign: Campaign,
    pub issued_coupons: Vec<Coupon>,
}
