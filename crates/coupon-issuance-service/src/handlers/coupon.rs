//! 优惠券发放与查询 API 处理器

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::{
    dto::{ApiResponse, IssueCouponRequest},
    error::CouponError,
    models::Coupon,
    state::AppState,
};

/// 发放优惠券
///
/// POST /api/campaigns/{id}/issue
///
/// 售罄与未开始返回 200 的失败信封（抢券的正常竞争结果），
/// 活动不存在返回 404。
pub async fn issue_coupon(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
    Json(req): Json<IssueCouponRequest>,
) -> Result<Json<ApiResponse<Coupon>>, CouponError> {
    req.validate()?;

    let reply = state.service.issue_coupon(&campaign_id, &req.user_id)?;

    let response = match reply.coupon {
        Some(coupon) => ApiResponse::success_with_message(coupon, reply.message),
        None => ApiResponse::failure(reply.code, reply.message),
    };
    Ok(Json(response))
}

/// 按券码查询优惠券
///
/// GET /api/coupons/{code}
pub async fn get_coupon(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Coupon>>, CouponError> {
    let coupon = state.service.get_coupon(&code)?;
    Ok(Json(ApiResponse::success(coupon)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Campaign;
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

    fn seeded_active_campaign(state: &AppState, quantity: u32) -> String {
        let campaign = Campaign::new("秒杀活动", Utc::now() - Duration::seconds(60), quantity);
        let id = campaign.id.clone();
        state.service.store().create(campaign);
        id
    }

    fn issue_request(campaign_id: &str, user_id: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/campaigns/{campaign_id}/issue"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "user_id": user_id }).to_string(),
            ))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_issue_coupon_success() {
        let (app, state) = test_app();
        let campaign_id = seeded_active_campaign(&state, 5);

        let response = app
            .oneshot(issue_request(&campaign_id, "user-001"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["campaign_id"], campaign_id);
        assert_eq!(body["data"]["user_id"], "user-001");
        assert_eq!(body["data"]["code"].as_str().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_issue_coupon_sold_out_envelope() {
        let (app, state) = test_app();
        let campaign_id = seeded_active_campaign(&state, 1);

        let first = app
            .clone()
            .oneshot(issue_request(&campaign_id, "user-1"))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(issue_request(&campaign_id, "user-2"))
            .await
            .unwrap();

        // 售罄是正常竞争结果：HTTP 200，信封里报失败
        assert_eq!(second.status(), StatusCode::OK);
        let body = response_json(second).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "SOLD_OUT");
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_issue_coupon_not_active_envelope() {
        let (app, state) = test_app();
        let campaign = state
            .service
            .create_campaign("未开始", Utc::now() + Duration::hours(1), 5)
            .unwrap();

        let response = app
            .oneshot(issue_request(&campaign.id, "user-1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "NOT_ACTIVE");
    }

    #[tokio::test]
    async fn test_issue_coupon_unknown_campaign() {
        let (app, _state) = test_app();

        let response = app
            .oneshot(issue_request("CMP-missing", "user-1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response_json(response).await;
        assert_eq!(body["code"], "CAMPAIGN_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_issue_coupon_empty_user_id() {
        let (app, state) = test_app();
        let campaign_id = seeded_active_campaign(&state, 5);

        let response = app
            .oneshot(issue_request(&campaign_id, ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_get_coupon_by_code() {
        let (app, state) = test_app();
        let campaign_id = seeded_active_campaign(&state, 5);

        let reply = state.service.issue_coupon(&campaign_id, "user-9").unwrap();
        let code = reply.coupon.unwrap().code;

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/coupons/{code}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["data"]["code"], code);
        assert_eq!(body["data"]["user_id"], "user-9");
    }

    #[tokio::test]
    async fn test_get_coupon_not_found() {
        let (app, _state) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/coupons/CPNXX00000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response_json(response).await;
        assert_eq!(body["code"], "COUPON_NOT_FOUND");
    }
}
