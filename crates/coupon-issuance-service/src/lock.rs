//! 活动级互斥锁注册表
//!
//! 发放临界区按活动分锁：同一活动的发放严格串行，不同活动互不阻塞。

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// 按活动 ID 划分的互斥锁注册表
///
/// 锁按需懒创建，并发的首次获取由 DashMap 的分片写锁串行化，
/// 保证同一活动只会创建一把锁。
#[derive(Clone, Default)]
pub struct CampaignLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl CampaignLocks {
    /// 创建空的锁注册表
    pub fn new() -> Self {
        Self {
            locks: Arc::new(DashMap::new()),
        }
    }

    /// 获取活动对应的锁句柄，不存在则创建
    ///
    /// 返回句柄而不是守卫：分片锁只在查找或插入期间持有，
    /// 调用方自行 `lock()`，临界区不会阻塞其他活动的锁查找。
    pub fn acquire(&self, campaign_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(campaign_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    /// 已登记的锁数量
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
