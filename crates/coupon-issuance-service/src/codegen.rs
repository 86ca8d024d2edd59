//! 优惠券码生成
//!
//! 券码固定 10 位：前缀取自活动名中的字母（2~3 位），其余由
//! 密码学强随机的大写字母与数字补齐，保证券码不可预测。

use rand::Rng;
use rand::rngs::OsRng;
use tracing::{debug, warn};

use crate::error::{CouponError, Result};

/// 券码固定总长度
const CODE_LENGTH: usize = 10;
/// 后缀中开头的大写字母数量，其余为数字
const SUFFIX_LETTER_COUNT: usize = 2;
/// 活动名中没有可用字母时的兜底前缀
const FALLBACK_PREFIX: &str = "CPN";
/// 活动名只有一个字母时的补位字符
const PAD_CHAR: char = 'P';
/// 唯一性冲突的最大重试次数
const MAX_RETRIES: u32 = 100;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

/// 券码生成器
///
/// 无内部状态，随机源直接使用操作系统熵池（`OsRng`）。
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeGenerator;

impl CodeGenerator {
    /// 创建生成器
    pub fn new() -> Self {
        Self
    }

    /// 生成一个券码（不保证全局唯一）
    ///
    /// 任何活动名（包括空串与非 ASCII 名称）都能生成合法券码，不会 panic。
    pub fn generate(&self, campaign_name: &str) -> String {
        let prefix = Self::prefix_from_name(campaign_name);

        let mut rng = OsRng;
        let mut code = String::with_capacity(CODE_LENGTH);
        code.push_str(&prefix);

        let remaining = CODE_LENGTH - prefix.len();
        for i in 0..remaining {
            let pool = if i < SUFFIX_LETTER_COUNT {
                UPPERCASE
            } else {
                DIGITS
            };
            let idx = rng.gen_range(0..pool.len());
            code.push(pool[idx] as char);
        }

        code
    }

    /// 生成一个与已有券码不冲突的券码
    ///
    /// `is_duplicate` 返回 true 表示券码已被占用；连续 `MAX_RETRIES` 次
    /// 冲突后放弃并返回 `CodeGenerationExhausted`。
    pub fn generate_unique<F>(&self, campaign_name: &str, is_duplicate: F) -> Result<String>
    where
        F: Fn(&str) -> bool,
    {
        for attempt in 1..=MAX_RETRIES {
            let code = self.generate(campaign_name);
            if !is_duplicate(&code) {
                return Ok(code);
            }
            debug!(attempt, code = %code, "券码冲突，重新生成");
        }

        warn!("连续 {} 次生成的券码均与已有券码冲突", MAX_RETRIES);
        Err(CouponError::CodeGenerationExhausted {
            attempts: MAX_RETRIES,
        })
    }

    /// 从活动名推导券码前缀
    ///
    /// 过滤出 ASCII 字母并转大写：3 个以上取前 3 个；恰好 2 个全取；
    /// 只有 1 个补一位固定字符；一个都没有用兜底前缀。
    fn prefix_from_name(name: &str) -> String {
        let letters: Vec<char> = name
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match letters.len() {
            0 => FALLBACK_PREFIX.to_string(),
            1 => format!("{}{}", letters[0], PAD_CHAR),
            2 => letters.iter().collect(),
            _ => letters[..3].iter().collect(),
        }
    }
}
