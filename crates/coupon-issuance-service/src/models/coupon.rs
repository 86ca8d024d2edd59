//! 优惠券模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 已发放的优惠券
///
/// 券码即身份：进程内全局唯一，发放后不可变更、不会删除。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    /// 券码，固定 10 位
    pub code: String,
    /// 所属活动 ID
    pub campaign_id: String,
    /// 领取用户 ID
    pub user_id: String,
    /// 发放时间
    pub issued_at: DateTime<Utc>,
}

impl Coupon {
    /// 创建优惠券
    ///
    /// 发放时间由调用方给定，与发放临界区的库存判定使用同一时刻。
    pub fn new(
        code: impl Into<String>,
        campaign_id: impl Into<String>,
        user_id: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code: code.into(),
            campaign_id: campaign_id.into(),
            user_id: user_id.into(),
            issued_at,
        }
    }
}
