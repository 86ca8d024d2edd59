//! 领域模型定义

pub mod campaign;
pub mod coupon;

pub use campaign::{Campaign, CampaignStatus};
pub use coupon::Coupon;
