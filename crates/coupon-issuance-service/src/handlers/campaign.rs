//! 活动管理 API 处理器
//!
//! 实现活动的创建与详情查询

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;
use validator::Validate;

use crate::{
    dto::{ApiResponse, CampaignDetailResponse, CreateCampaignRequest},
    error::CouponError,
    models::Campaign,
    state::AppState,
};

/// 创建活动
///
/// POST /api/campaigns
pub async fn create_campaign(
    State(state): State<AppState>,
    Json(req): Json<CreateCampaignRequest>,
) -> Result<Json<ApiResponse<Campaign>>, CouponError> {
    req.validate()?;

    let campaign = state
        .service
        .create_campaign(&req.name, req.start_time, req.total_quantity)?;

    info!(campaign_id = %campaign.id, name = %campaign.name, "活动创建成功");
    Ok(Json(ApiResponse::success(campaign)))
}

/// 查询活动详情（含已发放的优惠券列表）
///
/// GET /api/campaigns/{id}
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> Result<Json<ApiResponse<CampaignDetailResponse>>, CouponError> {
    let (campaign, issued_coupons) = state.service.get_campaign(&campaign_id)?;

    Ok(Json(ApiResponse::success(CampaignDetailResponse {
        campaign,
        issued_coupons,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes;
    use crate::service::CouponService;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::{Duration, Utc};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn test_app() -> (Router, AppState) {
        let state = AppState::new(Arc::new(CouponService::new()));
        let app = Router::new()
            .nest("/api", routes::api_routes())
            .with_state(state.clone());
        (app, state)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_campaign_endpoint() {
        let (app, state) = test_app();

        let start_time = (Utc::now() + Duration::hours(1)).to_rfc3339();
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/campaigns",
                serde_json::json!({
                    "name": "春节抢券",
                    "start_time": start_time,
                    "total_quantity": 100
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["name"], "春节抢券");
        assert_eq!(body["data"]["status"], "PENDING");
        assert_eq!(state.service.store().len(), 1);
    }

    #[tokio::test]
    async fn test_create_campaign_rejects_invalid_body() {
        let (app, _state) = test_app();

        let start_time = (Utc::now() + Duration::hours(1)).to_rfc3339();
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/campaigns",
                serde_json::json!({
                    "name": "",
                    "start_time": start_time,
                    "total_quantity": 100
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_get_campaign_endpoint() {
        let (app, state) = test_app();
        let campaign = state
            .service
            .create_campaign("查询活动", Utc::now() + Duration::hours(1), 10)
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/campaigns/{}", campaign.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["data"]["campaign"]["id"], campaign.id);
        assert!(body["data"]["issued_coupons"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_campaign_not_found() {
        let (app, _state) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/campaigns/CMP-missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response_json(response).await;
        assert_eq!(body["code"], "CAMPAIGN_NOT_FOUND");
    }
}
