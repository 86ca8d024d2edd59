//! 路由配置

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers::{campaign, coupon};
use crate::state::AppState;

/// 活动与优惠券 API 路由（挂载在 /api 下）
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/campaigns", post(campaign::create_campaign))
        .route("/campaigns/{id}", get(campaign::get_campaign))
        .route("/campaigns/{id}/issue", post(coupon::issue_coupon))
        .route("/coupons/{code}", get(coupon::get_coupon))
}
