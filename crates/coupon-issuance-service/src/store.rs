//! 活动存储
//!
//! 使用 DashMap 提供线程安全的活动缓存。活动映射通过 `campaigns()`
//! 与发放引擎共享，引擎在临界区内的增量对后续读取立即可见。

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::error::{CouponError, Result};
use crate::models::Campaign;

/// 活动存储
#[derive(Clone)]
pub struct CampaignStore {
    campaigns: Arc<DashMap<String, Campaign>>,
}

impl CampaignStore {
    /// 创建新的活动存储
    pub fn new() -> Self {
        Self {
            campaigns: Arc::new(DashMap::new()),
        }
    }

    /// 暴露共享的活动映射（供发放引擎持有同一份数据）
    pub fn campaigns(&self) -> Arc<DashMap<String, Campaign>> {
        Arc::clone(&self.campaigns)
    }

    /// 当前存储的活动数量
    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    /// 检查存储是否为空
    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }

    /// 保存活动
    #[instrument(skip(self, campaign), fields(campaign_id = %campaign.id, campaign_name = %campaign.name))]
    pub fn create(&self, campaign: Campaign) {
        let campaign_id = campaign.id.clone();
        self.campaigns.insert(campaign_id.clone(), campaign);
        info!("活动已保存: {}", campaign_id);
    }

    /// 获取活动
    ///
    /// 读取前在分片写锁内重推状态，调用方永远不会在开始时间之后
    /// 观察到过期的 `Pending`。
    pub fn get(&self, campaign_id: &str) -> Result<Campaign> {
        let mut entry = self
            .campaigns
            .get_mut(campaign_id)
            .ok_or_else(|| CouponError::CampaignNotFound(campaign_id.to_string()))?;

        if entry.refresh_status(Utc::now()) {
            info!(
                campaign_id = %campaign_id,
                status = ?entry.status,
                "活动状态已流转"
            );
        }

        Ok(entry.clone())
    }

    /// 更新活动
    #[instrument(skip(self, campaign), fields(campaign_id = %campaign.id))]
    pub fn update(&self, campaign: Campaign) -> Result<()> {
        if !self.campaigns.contains_key(&campaign.id) {
            warn!("更新不存在的活动: {}", campaign.id);
            return Err(CouponError::CampaignNotFound(campaign.id.clone()));
        }

        self.campaigns.insert(campaign.id.clone(), campaign);
        Ok(())
    }

    /// 删除活动
    #[instrument(skip(self))]
    pub fn delete(&self, campaign_id: &str) -> Result<()> {
        if self.campaigns.remove(campaign_id).is_some() {
            info!("活动已删除: {}", campaign_id);
            Ok(())
        } else {
            warn!("删除不存在的活动: {}", campaign_id);
            Err(CouponError::CampaignNotFound(campaign_id.to_string()))
        }
    }
}

impl Default for CampaignStore {
    fn default() -> Self {
        Self::new()
    }
}
