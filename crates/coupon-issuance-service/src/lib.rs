//! 优惠券发放服务
//!
//! 抢券场景下的活动管理与优惠券发放：活动状态按时间与库存惰性流转，
//! 发放路径按活动分锁串行化，保证库存恰好发完、永不超发。

pub mod codegen;
pub mod dto;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod lock;
pub mod models;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use codegen::CodeGenerator;
pub use engine::{IssuanceEngine, IssueOutcome};
pub use error::{CouponError, Result};
pub use lock::CampaignLocks;
pub use models::{Campaign, CampaignStatus, Coupon};
pub use service::{CouponService, IssueReply};
pub use store::CampaignStore;
