//! 发放活动模型
//!
//! 活动状态不依赖后台定时器，而是在每次读取或发放时根据当前时间与
//! 库存重新推导，未到开始时间的活动在第一次跨过时间点的访问中自动激活。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 活动状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    /// 未开始：当前时间早于开始时间
    Pending,
    /// 进行中：已到开始时间且仍有库存
    Active,
    /// 已结束：库存已全部发完
    Completed,
}

impl CampaignStatus {
    /// 状态的线上表示，与 JSON 序列化结果一致
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
        }
    }
}

/// 优惠券发放活动
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    /// 活动 ID，创建时生成，格式 `CMP-<uuid>`
    pub id: String,
    /// 活动名称，同时作为券码前缀的来源
    pub name: String,
    /// 开始时间
    pub start_time: DateTime<Utc>,
    /// 发放总量
    pub total_quantity: u32,
    /// 已发放数量，只增不减
    pub issued_quantity: u32,
    /// 当前状态（推导值）
    pub status: CampaignStatus,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    /// 创建活动
    ///
    /// 开始时间已到的活动直接进入 `Active`，否则为 `Pending`。
    pub fn new(name: impl Into<String>, start_time: DateTime<Utc>, total_quantity: u32) -> Self {
        let now = Utc::now();
        let mut campaign = Self {
            id: format!("CMP-{}", Uuid::new_v4()),
            name: name.into(),
            start_time,
            total_quantity,
            issued_quantity: 0,
            status: CampaignStatus::Pending,
            created_at: now,
        };
        campaign.refresh_status(now);
        campaign
    }

    /// 按当前时间与库存重新推导状态，返回状态是否发生变化
    ///
    /// 库存耗尽优先于时间判断：发完的活动不会因为任何输入回到
    /// `Active` 或 `Pending`。
    pub fn refresh_status(&mut self, now: DateTime<Utc>) -> bool {
        let next = self.derived_status(now);
        if next == self.status {
            return false;
        }
        self.status = next;
        true
    }

    fn derived_status(&self, now: DateTime<Utc>) -> CampaignStatus {
        if self.issued_quantity >= self.total_quantity {
            CampaignStatus::Completed
        } else if now >= self.start_time {
            CampaignStatus::Active
        } else {
            CampaignStatus::Pending
        }
    }

    /// 剩余可发放数量
    pub fn remaining(&self) -> u32 {
        self.total_quantity.saturating_sub(self.issued_quantity)
    }

    /// 登记一次发放：已发放数 +1 并立即重推状态
    ///
    /// 仅允许在活动级互斥锁内调用，增量与状态流转必须是同一个临界区。
    pub fn record_issue(&mut self, now: DateTime<Utc>) {
        self.issued_quantity += 1;
        self.refresh_status(now);
    }
}
