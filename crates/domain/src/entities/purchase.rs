//! 购买记录实体
//!
//! 一条购买记录对应一个用户对一条内容的一次购买。
//! 免费内容也会落一条 0 金额的已完成记录，用于访问判定。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// 购买状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    /// 待支付
    Pending,
    /// 已完成
    Completed,
    /// 已退款
    Refunded,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Completed => "completed",
            PurchaseStatus::Refunded => "refunded",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PurchaseStatus::Pending),
            "completed" => Some(PurchaseStatus::Completed),
            "refunded" => Some(PurchaseStatus::Refunded),
            _ => None,
        }
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 购买记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_id: Uuid,
    /// 成交金额（分）
    pub amount_cents: i64,
    pub status: PurchaseStatus,
    pub created_at: DateTime<Utc>,
    /// 完成时间（完成后存在）
    pub completed_at: Option<DateTime<Utc>>,
}

impl Purchase {
    /// 创建一条已完成的购买记录
    pub fn completed(
        user_id: Uuid,
        content_id: Uuid,
        amount_cents: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if amount_cents < 0 {
            return Err(DomainError::validation_error("amount", "金额不能为负数"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            content_id,
            amount_cents,
            status: PurchaseStatus::Completed,
            created_at: now,
            completed_at: Some(now),
        })
    }

    /// 退款
    pub fn refund(&mut self) -> DomainResult<()> {
        if self.status != PurchaseStatus::Completed {
            return Err(DomainError::business_rule_violation(
                "只有已完成的购买才能退款",
            ));
        }
        self.status = PurchaseStatus::Refunded;
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status == PurchaseStatus::Completed
    }
}
