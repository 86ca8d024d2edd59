//! 命令执行器
//!
//! 负责执行各 CLI 子命令的具体逻辑。
//! 将命令行参数转化为对优惠券发放服务的 HTTP 调用。

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use tracing::info;

use coupon_issuance_service::dto::{ApiResponse, CampaignDetailResponse};
use coupon_issuance_service::{Campaign, Coupon};

/// 命令执行器
///
/// 封装 HTTP 客户端与服务端地址，各命令的执行逻辑。
/// 作为 CLI 与发放服务之间的桥梁，简化 main 函数的复杂度。
pub struct CommandRunner {
    client: reqwest::Client,
    base_url: String,
}

impl CommandRunner {
    /// 创建命令执行器
    pub fn new(server_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    /// 执行 demo 命令
    ///
    /// 创建一个 2 秒后开始的小容量活动，展示状态从未开始到进行中的
    /// 自动流转，领取一张优惠券并核对发放记录与计数的一致性。
    pub async fn run_demo(&self) -> Result<()> {
        info!(server = %self.base_url, "开始演示流程");

        println!("\n优惠券发放演示:");
        println!("{}", "-".repeat(50));

        // 创建 2 秒后开始的活动
        println!("创建 2 秒后开始的演示活动...");
        let start_time = Utc::now() + chrono::Duration::seconds(2);
        let campaign = self.create_campaign("演示活动", start_time, 3).await?;
        println!("活动创建完成 (ID: {})", campaign.id);

        // 开始时间未到，此时查询应看到未开始状态
        let detail = self.get_campaign(&campaign.id).await?;
        println!("当前状态: {}", detail.campaign.status.as_str());

        println!("等待活动开始...");
        tokio::time::sleep(Duration::from_secs(3)).await;

        // 领取优惠券
        println!("领取优惠券...");
        let reply = self.issue_coupon(&campaign.id, "demo-user").await?;
        match reply.data {
            Some(coupon) => println!("领取成功 (券码: {})", coupon.code),
            None => bail!("领取失败: {}", reply.message),
        }

        // 核对最终状态：发放记录条数必须等于活动计数
        let detail = self.get_campaign(&campaign.id).await?;
        if detail.issued_coupons.len() != detail.campaign.issued_quantity as usize {
            bail!(
                "发放记录与计数不一致: issued_quantity {} vs 记录 {} 条",
                detail.campaign.issued_quantity,
                detail.issued_coupons.len()
            );
        }
        println!(
            "最终状态: {} (发放 {}/{})",
            detail.campaign.status.as_str(),
            detail.campaign.issued_quantity,
            detail.campaign.total_quantity
        );
        println!("{}", "-".repeat(50));
        println!("演示完成");

        Ok(())
    }

    /// 执行 loadtest 命令
    ///
    /// 创建指定容量的活动，多个并发 worker 分摊共享请求队列发起领取，
    /// 统计吞吐后核对服务端数据一致性。
    pub async fn run_loadtest(&self, workers: usize, requests: usize, limit: u32) -> Result<()> {
        info!(workers, requests, limit, "开始压测");

        println!("\n优惠券发放压测:");
        println!(
            "配置: {} 个 worker 发起 {} 次请求，抢 {} 张券",
            workers, requests, limit
        );
        println!("{}", "-".repeat(50));

        // 创建活动并等待激活
        println!("创建压测活动...");
        let start_time = Utc::now() + chrono::Duration::seconds(1);
        let campaign = self.create_campaign("压测活动", start_time, limit).await?;
        println!("活动创建完成 (ID: {})", campaign.id);

        println!("等待活动开始...");
        tokio::time::sleep(Duration::from_secs(2)).await;

        // 并发发起领取请求：worker 从共享队列领取请求编号，队列耗尽后退出
        println!("{} 个 worker 开始发起请求...", workers);
        let next = Arc::new(AtomicUsize::new(0));
        let success = Arc::new(AtomicUsize::new(0));
        let failure = Arc::new(AtomicUsize::new(0));
        let start = Instant::now();

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let client = self.client.clone();
            let base_url = self.base_url.clone();
            let campaign_id = campaign.id.clone();
            let next = next.clone();
            let success = success.clone();
            let failure = failure.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    let request_id = next.fetch_add(1, Ordering::Relaxed);
                    if request_id >= requests {
                        break;
                    }

                    let user_id = format!("user-{}-{}", worker_id, request_id);
                    if try_issue(&client, &base_url, &campaign_id, &user_id).await {
                        success.fetch_add(1, Ordering::Relaxed);
                    } else {
                        failure.fetch_add(1, Ordering::Relaxed);
                    }

                    // 每 100 个请求打印一次进度
                    let done =
                        success.load(Ordering::Relaxed) + failure.load(Ordering::Relaxed);
                    if done % 100 == 0 {
                        println!(
                            "   进度: {}/{} (成功: {})",
                            done,
                            requests,
                            success.load(Ordering::Relaxed)
                        );
                    }
                }
            }));
        }

        for handle in handles {
            handle.await.context("压测 worker 异常退出")?;
        }
        let elapsed = start.elapsed();

        let success_count = success.load(Ordering::Relaxed);
        let failure_count = failure.load(Ordering::Relaxed);
        println!("\n压测完成:");
        println!("   耗时: {:.2}s", elapsed.as_secs_f64());
        println!("   成功: {}", success_count);
        println!("   失败: {}", failure_count);
        println!("   RPS: {:.0}", requests as f64 / elapsed.as_secs_f64());

        // 核对服务端数据一致性
        self.check_results(&campaign.id, expected_issued(limit, requests))
            .await
    }

    /// 核对压测后的服务端数据
    ///
    /// 发放记录条数必须等于活动的 issued_quantity，且发放数量
    /// 必须恰好等于预期（库存与请求数中的较小者）。
    async fn check_results(&self, campaign_id: &str, expected: u32) -> Result<()> {
        let detail = self.get_campaign(campaign_id).await?;
        let campaign = &detail.campaign;
        let coupons = &detail.issued_coupons;

        println!("\n结果确认:");
        println!(
            "   已发放优惠券: {} 张 (预期: {} 张)",
            coupons.len(),
            expected
        );
        println!("   活动状态: {}", campaign.status.as_str());

        if campaign.issued_quantity as usize != coupons.len() {
            bail!(
                "数据不一致: issued_quantity ({}) vs 发放记录 ({} 条)",
                campaign.issued_quantity,
                coupons.len()
            );
        }
        if campaign.issued_quantity != expected {
            bail!(
                "发放数量异常: 预期 {} 实际 {}",
                expected,
                campaign.issued_quantity
            );
        }
        println!("数据一致性确认通过");

        Ok(())
    }

    // ========================================================================
    // HTTP 调用
    // ========================================================================

    /// 创建活动
    async fn create_campaign(
        &self,
        name: &str,
        start_time: DateTime<Utc>,
        total_quantity: u32,
    ) -> Result<Campaign> {
        let response = self
            .client
            .post(self.endpoint("/api/campaigns"))
            .json(&serde_json::json!({
                "name": name,
                "start_time": start_time,
                "total_quantity": total_quantity,
            }))
            .send()
            .await
            .context("创建活动请求失败")?;

        let body: ApiResponse<Campaign> =
            response.json().await.context("解析创建活动响应失败")?;
        body.data
            .ok_or_else(|| anyhow::anyhow!("创建活动失败: {}", body.message))
    }

    /// 查询活动详情（含已发放的优惠券列表）
    async fn get_campaign(&self, campaign_id: &str) -> Result<CampaignDetailResponse> {
        let response = self
            .client
            .get(self.endpoint(&format!("/api/campaigns/{}", campaign_id)))
            .send()
            .await
            .context("查询活动请求失败")?;

        let body: ApiResponse<CampaignDetailResponse> =
            response.json().await.context("解析活动详情响应失败")?;
        body.data
            .ok_or_else(|| anyhow::anyhow!("查询活动失败: {}", body.message))
    }

    /// 领取优惠券
    ///
    /// 返回完整响应信封：售罄、未开始等业务失败也是合法结果，
    /// 由调用方根据 `data` 是否存在决定后续处理。
    async fn issue_coupon(
        &self,
        campaign_id: &str,
        user_id: &str,
    ) -> Result<ApiResponse<Coupon>> {
        let response = self
            .client
            .post(self.endpoint(&format!("/api/campaigns/{}/issue", campaign_id)))
            .json(&serde_json::json!({ "user_id": user_id }))
            .send()
            .await
            .context("领取优惠券请求失败")?;

        response.json().await.context("解析领取响应失败")
    }

    /// 拼接请求地址
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// ============================================================================
// 辅助函数
// ============================================================================

/// 发起一次领取请求，返回是否领取成功
///
/// 网络错误、响应解析失败与业务失败统一计为失败。
async fn try_issue(
    client: &reqwest::Client,
    base_url: &str,
    campaign_id: &str,
    user_id: &str,
) -> bool {
    let response = client
        .post(format!("{}/api/campaigns/{}/issue", base_url, campaign_id))
        .json(&serde_json::json!({ "user_id": user_id }))
        .send()
        .await;

    match response {
        Ok(resp) => resp
            .json::<ApiResponse<Coupon>>()
            .await
            .map(|body| body.success)
            .unwrap_or(false),
        Err(_) => false,
    }
}

/// 压测预期发放数量：请求数少于库存时不可能发满
fn expected_issued(limit: u32, requests: usize) -> u32 {
    limit.min(requests as u32)
}

// ============================================================================
// 单元测试
// ============================================================================
