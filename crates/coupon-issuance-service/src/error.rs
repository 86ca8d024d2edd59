//! 发放服务错误类型定义
//!
//! 售罄、活动未开始等发放被拒场景不是错误，由发放结果表达；
//! 这里只定义真正的失败路径。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// 发放服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum CouponError {
    // 验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),

    // 资源不存在
    #[error("活动不存在: {0}")]
    CampaignNotFound(String),
    #[error("优惠券不存在: {0}")]
    CouponNotFound(String),

    // 系统错误
    #[error("券码生成失败: 连续 {attempts} 次与已有券码冲突")]
    CodeGenerationExhausted { attempts: u32 },
    #[error("内部错误: {0}")]
    Internal(String),
}

impl CouponError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,

            Self::CampaignNotFound(_) | Self::CouponNotFound(_) => StatusCode::NOT_FOUND,

            Self::CodeGenerationExhausted { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::CampaignNotFound(_) => "CAMPAIGN_NOT_FOUND",
            Self::CouponNotFound(_) => "COUPON_NOT_FOUND",
            Self::CodeGenerationExhausted { .. } => "CODE_GENERATION_EXHAUSTED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for CouponError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志，防止信息泄露
        let message = match &self {
            Self::CodeGenerationExhausted { attempts } => {
                tracing::error!(attempts, "券码生成重试耗尽");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for CouponError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, CouponError>;
