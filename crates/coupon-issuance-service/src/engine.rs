//! 发放引擎
//!
//! 发放的临界区按活动加锁：状态重推、库存校验、铸券、计数自增在
//! 同一个锁内完成，任何并发交错下已发放数都不会越过总量。

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::error::{CouponError, Result};
use crate::lock::CampaignLocks;
use crate::models::{Campaign, CampaignStatus, Coupon};

/// 单次发放的结果
///
/// 售罄与未开始是抢券的常态而不是错误，用独立变体表达。
#[derive(Debug, Clone)]
pub enum IssueOutcome {
    /// 发放成功，携带新铸的优惠券
    Issued(Coupon),
    /// 库存已发完
    SoldOut,
    /// 活动不在可发放状态（未开始）
    NotActive,
    /// 活动不存在
    NotFound,
}

/// 发放引擎
///
/// 活动映射与 `CampaignStore` 共享同一份数据；优惠券列表与
/// 券码索引由引擎独占持有。
#[derive(Clone)]
pub struct IssuanceEngine {
    campaigns: Arc<DashMap<String, Campaign>>,
    /// 按活动聚合的已发放优惠券
    coupons: Arc<DashMap<String, Vec<Coupon>>>,
    /// 券码到优惠券的全局索引
    by_code: Arc<DashMap<String, Coupon>>,
    locks: CampaignLocks,
}

impl IssuanceEngine {
    /// 创建发放引擎，持有与存储共享的活动映射
    pub fn new(campaigns: Arc<DashMap<String, Campaign>>) -> Self {
        Self {
            campaigns,
            coupons: Arc::new(DashMap::new()),
            by_code: Arc::new(DashMap::new()),
            locks: CampaignLocks::new(),
        }
    }

    /// 发放一张优惠券
    ///
    /// 持有活动锁期间：重推状态 → 校验可发放 → 铸券入账 → 计数自增 →
    /// 再次重推状态（本次发放耗尽库存时恰好流转到 `Completed`）。
    /// 锁在所有返回路径上随守卫释放。
    #[instrument(skip(self, code))]
    pub fn issue(&self, campaign_id: &str, user_id: &str, code: String) -> IssueOutcome {
        let lock = self.locks.acquire(campaign_id);
        let _guard = lock.lock();

        let now = Utc::now();
        let Some(mut campaign) = self.campaigns.get_mut(campaign_id) else {
            debug!("发放目标活动不存在");
            return IssueOutcome::NotFound;
        };

        // 不信任缓存状态：本临界区是已发放数唯一的修改方，
        // 但时间驱动的流转可能尚未被任何读取触发过
        campaign.refresh_status(now);

        match campaign.status {
            CampaignStatus::Pending => {
                debug!("活动未开始，拒绝发放");
                IssueOutcome::NotActive
            }
            _ if campaign.issued_quantity >= campaign.total_quantity => {
                debug!("库存已发完，拒绝发放");
                IssueOutcome::SoldOut
            }
            CampaignStatus::Completed => {
                debug!("活动已结束，拒绝发放");
                IssueOutcome::NotActive
            }
            CampaignStatus::Active => {
                let coupon = Coupon::new(code, campaign_id, user_id, now);

                self.coupons
                    .entry(campaign_id.to_string())
                    .or_default()
                    .push(coupon.clone());
                self.by_code.insert(coupon.code.clone(), coupon.clone());

                campaign.record_issue(now);
                info!(
                    code = %coupon.code,
                    issued = campaign.issued_quantity,
                    total = campaign.total_quantity,
                    "优惠券发放成功"
                );

                IssueOutcome::Issued(coupon)
            }
        }
    }

    /// 查询活动已发放的全部优惠券（无记录时返回空列表）
    pub fn get_by_campaign(&self, campaign_id: &str) -> Vec<Coupon> {
        self.coupons
            .get(campaign_id)
            .map(|coupons| coupons.clone())
            .unwrap_or_default()
    }

    /// 按券码查询优惠券
    pub fn get_by_code(&self, code: &str) -> Result<Coupon> {
        self.by_code
            .get(code)
            .map(|coupon| coupon.clone())
            .ok_or_else(|| CouponError::CouponNotFound(code.to_string()))
    }

    /// 券码是否已被占用（券码生成器的查重谓词）
    pub fn code_exists(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// 活动已发放的优惠券数量
    pub fn issued_count(&self, campaign_id: &str) -> usize {
        self.coupons
            .get(campaign_id)
            .map(|coupons| coupons.len())
            .unwrap_or(0)
    }
}
