//! 发放服务编排层
//!
//! 串联活动存储、券码生成器与发放引擎，对外提供活动创建、
//! 查询与发放三个入口。

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::codegen::CodeGenerator;
use crate::engine::{IssuanceEngine, IssueOutcome};
use crate::error::{CouponError, Result};
use crate::models::{Campaign, Coupon};
use crate::store::CampaignStore;

/// 发放请求的应答
///
/// 成功与优惠券同在：`success` 为 true 时 `coupon` 必有值，
/// 拒绝时只携带原因。
#[derive(Debug, Clone)]
pub struct IssueReply {
    pub success: bool,
    pub coupon: Option<Coupon>,
    /// 结果码，供 API 信封直接使用
    pub code: &'static str,
    pub message: String,
}

/// 优惠券发放服务
#[derive(Clone)]
pub struct CouponService {
    store: CampaignStore,
    engine: IssuanceEngine,
    generator: CodeGenerator,
}

impl CouponService {
    /// 创建服务：存储与引擎共享同一份活动映射
    pub fn new() -> Self {
        let store = CampaignStore::new();
        let engine = IssuanceEngine::new(store.campaigns());
        Self {
            store,
            engine,
            generator: CodeGenerator::new(),
        }
    }

    /// 活动存储句柄
    pub fn store(&self) -> &CampaignStore {
        &self.store
    }

    /// 发放引擎句柄
    pub fn engine(&self) -> &IssuanceEngine {
        &self.engine
    }

    /// 创建活动
    ///
    /// 校验：名称去空白后非空、总量至少 1、开始时间不早于当前时间。
    #[instrument(skip(self, name), fields(campaign_name = %name))]
    pub fn create_campaign(
        &self,
        name: &str,
        start_time: DateTime<Utc>,
        total_quantity: u32,
    ) -> Result<Campaign> {
        if name.trim().is_empty() {
            return Err(CouponError::Validation("活动名称不能为空".to_string()));
        }
        if total_quantity == 0 {
            return Err(CouponError::Validation(
                "发放总量必须大于 0".to_string(),
            ));
        }
        if start_time < Utc::now() {
            return Err(CouponError::Validation(
                "开始时间不能早于当前时间".to_string(),
            ));
        }

        let campaign = Campaign::new(name, start_time, total_quantity);
        self.store.create(campaign.clone());

        info!(
            campaign_id = %campaign.id,
            total_quantity,
            status = ?campaign.status,
            "活动创建成功"
        );
        Ok(campaign)
    }

    /// 查询活动及其已发放的优惠券
    pub fn get_campaign(&self, campaign_id: &str) -> Result<(Campaign, Vec<Coupon>)> {
        let campaign = self.store.get(campaign_id)?;
        let coupons = self.engine.get_by_campaign(campaign_id);
        Ok((campaign, coupons))
    }

    /// 按券码查询优惠券
    pub fn get_coupon(&self, code: &str) -> Result<Coupon> {
        self.engine.get_by_code(code)
    }

    /// 发放一张优惠券
    ///
    /// 先从活动名生成不冲突的券码，再交给引擎在活动锁内完成发放。
    /// 售罄与未开始按正常应答返回，不走错误路径。
    #[instrument(skip(self))]
    pub fn issue_coupon(&self, campaign_id: &str, user_id: &str) -> Result<IssueReply> {
        if campaign_id.trim().is_empty() {
            return Err(CouponError::Validation("活动 ID 不能为空".to_string()));
        }
        if user_id.trim().is_empty() {
            return Err(CouponError::Validation("用户 ID 不能为空".to_string()));
        }

        // 先取活动：不存在直接 404，同时拿到活动名供券码前缀使用
        let campaign = self.store.get(campaign_id)?;
        let code = self
            .generator
            .generate_unique(&campaign.name, |code| self.engine.code_exists(code))?;

        match self.engine.issue(campaign_id, user_id, code) {
            IssueOutcome::Issued(coupon) => Ok(IssueReply {
                success: true,
                coupon: Some(coupon),
                code: "SUCCESS",
                message: "优惠券发放成功".to_string(),
            }),
            IssueOutcome::SoldOut => Ok(IssueReply {
                success: false,
                coupon: None,
                code: "SOLD_OUT",
                message: "优惠券已全部发完".to_string(),
            }),
            IssueOutcome::NotActive => Ok(IssueReply {
                success: false,
                coupon: None,
                code: "NOT_ACTIVE",
                message: "活动尚未开始，暂不可领取".to_string(),
            }),
            IssueOutcome::NotFound => {
                // 取活动和发放之间被并发删除
                warn!("活动在发放过程中被删除: {}", campaign_id);
                Err(CouponError::CampaignNotFound(campaign_id.to_string()))
            }
        }
    }
}

impl Default for CouponService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CampaignStatus;
    use chrono::Duration;

    fn seeded_active_campaign(service: &CouponService, quantity: u32) -> String {
        // 通过存储直接写入已开始的活动，绕过创建接口的"开始时间不能是过去"校验
        let campaign = Campaign::new("秒杀活动", Utc::now() - Duration::seconds(60), quantity);
        let id = campaign.id.clone();
        service.store().create(campaign);
        id
    }

    #[test]
    fn test_create_campaign_success() {
        let service = CouponService::new();
        let start = Utc::now() + Duration::hours(1);

        let campaign = service.create_campaign("春节抢券", start, 100).unwrap();

        assert!(campaign.id.starts_with("CMP-"));
        assert_eq!(campaign.status, CampaignStatus::Pending);
        assert_eq!(service.store().len(), 1);
    }

    #[test]
    fn test_create_campaign_rejects_blank_name() {
        let service = CouponService::new();
        let start = Utc::now() + Duration::hours(1);

        for name in ["", "   ", "\t\n"] {
            let result = service.create_campaign(name, start, 10);
            assert!(
                matches!(result, Err(CouponError::Validation(_))),
                "name={name:?}"
            );
        }
    }

    #[test]
    fn test_create_campaign_rejects_zero_quantity() {
        let service = CouponService::new();
        let result = service.create_campaign("零库存", Utc::now() + Duration::hours(1), 0);
        assert!(matches!(result, Err(CouponError::Validation(_))));
    }

    #[test]
    fn test_create_campaign_rejects_past_start_time() {
        let service = CouponService::new();
        let result = service.create_campaign("过期活动", Utc::now() - Duration::seconds(10), 10);
        assert!(matches!(result, Err(CouponError::Validation(_))));
    }

    #[test]
    fn test_get_campaign_returns_coupons() {
        let service = CouponService::new();
        let id = seeded_active_campaign(&service, 5);

        service.issue_coupon(&id, "user-1").unwrap();
        service.issue_coupon(&id, "user-2").unwrap();

        let (campaign, coupons) = service.get_campaign(&id).unwrap();
        assert_eq!(campaign.issued_quantity, 2);
        assert_eq!(coupons.len(), 2);
    }

    #[test]
    fn test_get_campaign_not_found() {
        let service = CouponService::new();
        let result = service.get_campaign("CMP-missing");
        assert!(matches!(result, Err(CouponError::CampaignNotFound(_))));
    }

    #[test]
    fn test_issue_coupon_success_carries_coupon() {
        let service = CouponService::new();
        let id = seeded_active_campaign(&service, 5);

        let reply = service.issue_coupon(&id, "user-1").unwrap();

        assert!(reply.success);
        assert_eq!(reply.code, "SUCCESS");
        let coupon = reply.coupon.expect("成功应答必须携带优惠券");
        assert_eq!(coupon.campaign_id, id);
        assert_eq!(coupon.user_id, "user-1");
        assert_eq!(coupon.code.len(), 10);
    }

    #[test]
    fn test_issue_coupon_sold_out_reply() {
        let service = CouponService::new();
        let id = seeded_active_campaign(&service, 1);

        assert!(service.issue_coupon(&id, "user-1").unwrap().success);

        let reply = service.issue_coupon(&id, "user-2").unwrap();
        assert!(!reply.success);
        assert_eq!(reply.code, "SOLD_OUT");
        assert!(reply.coupon.is_none());
        assert!(!reply.message.is_empty());
    }

    #[test]
    fn test_issue_coupon_not_active_reply() {
        let service = CouponService::new();
        let campaign = service
            .create_campaign("未开始", Utc::now() + Duration::hours(1), 5)
            .unwrap();

        let reply = service.issue_coupon(&campaign.id, "user-1").unwrap();
        assert!(!reply.success);
        assert_eq!(reply.code, "NOT_ACTIVE");
        assert!(reply.coupon.is_none());
    }

    #[test]
    fn test_issue_coupon_validation() {
        let service = CouponService::new();
        let id = seeded_active_campaign(&service, 5);

        assert!(matches!(
            service.issue_coupon("", "user-1"),
            Err(CouponError::Validation(_))
        ));
        assert!(matches!(
            service.issue_coupon(&id, "  "),
            Err(CouponError::Validation(_))
        ));
    }

    #[test]
    fn test_issue_coupon_unknown_campaign() {
        let service = CouponService::new();
        let result = service.issue_coupon("CMP-missing", "user-1");
        assert!(matches!(result, Err(CouponError::CampaignNotFound(_))));
    }

    #[test]
    fn test_get_coupon_by_code() {
        let service = CouponService::new();
        let id = seeded_active_campaign(&service, 5);

        let reply = service.issue_coupon(&id, "user-1").unwrap();
        let code = reply.coupon.unwrap().code;

        let coupon = service.get_coupon(&code).unwrap();
        assert_eq!(coupon.user_id, "user-1");

        assert!(matches!(
            service.get_coupon("CPNXX00000"),
            Err(CouponError::CouponNotFound(_))
        ));
    }

    #[test]
    fn test_issued_codes_are_unique() {
        use std::collections::HashSet;

        let service = CouponService::new();
        let id = seeded_active_campaign(&service, 30);

        let mut codes = HashSet::new();
        for i in 0..30 {
            let reply = service.issue_coupon(&id, &format!("user-{i}")).unwrap();
            codes.insert(reply.coupon.unwrap().code);
        }

        assert_eq!(codes.len(), 30, "券码必须全局唯一");
    }
}
