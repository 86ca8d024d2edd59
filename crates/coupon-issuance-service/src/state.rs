//! 应用状态

use std::sync::Arc;

use crate::service::CouponService;

/// HTTP 处理器共享的应用状态
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CouponService>,
}

impl AppState {
    /// 创建应用状态
    pub fn new(service: Arc<CouponService>) -> Self {
        Self { service }
    }
}
