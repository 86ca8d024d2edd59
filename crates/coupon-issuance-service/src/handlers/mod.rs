//! HTTP API 处理器

pub mod campaign;
pub mod coupon;
