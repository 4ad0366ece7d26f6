// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Equity,
    Bond,
    Fund,
    Cash,
    Other,
}

impl AssetClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equity => "equity",
            Self::Bond => "bond",
            Self::Fund => "fund",
            Self::Cash => "cash",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "equity" => Some(Self::Equity),
            "bond" => Some(Self::Bond),
            "fund" => Some(Self::Fund),
            "cash" => Some(Self::Cash),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "buy" => Some(Self::Buy),
            "sell" => Some(Self::Sell),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Settled,
    Cancelled,
}

impl TransactionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Settled => "settled",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "settled" => Some(Self::Settled),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    Securities,
    Accounts,
    Funds,
    Transactions,
}

impl TabKind {
    pub const ALL: [Self; 4] = [
        Self::Securities,
        Self::Accounts,
        Self::Funds,
        Self::Transactions,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Securities => "securities",
            Self::Accounts => "accounts",
            Self::Funds => "funds",
            Self::Transactions => "transactions",
        }
    }

    /// REST collection path segment for this tab.
    pub const fn path(self) -> &'static str {
        self.label()
    }

    /// Whether rows on this tab expose the deactivate action.
    pub const fn supports_deactivate(self) -> bool {
        !matches!(self, Self::Transactions)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    pub id: SecurityId,
    pub ticker: String,
    pub name: String,
    pub asset_class: AssetClass,
    pub exchange: String,
    pub currency: String,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub code: String,
    pub name: String,
    pub owner: String,
    pub base_currency: String,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    pub id: FundId,
    pub code: String,
    pub name: String,
    pub manager: String,
    pub base_currency: String,
    pub nav_cents: Option<i64>,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub trade_ref: String,
    pub fund_code: String,
    pub ticker: String,
    pub side: TradeSide,
    pub quantity: i64,
    pub amount_cents: i64,
    pub trade_date: Date,
    pub status: TransactionStatus,
}

/// One page of server results. Replaced wholesale on every successful
/// fetch; `total_count` is the number of matching rows, not the page
/// length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub limit: u32,
    pub offset: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            limit: 0,
            offset: 0,
        }
    }
}

impl<T> Page<T> {
    pub fn page_count(&self, page_size: u32) -> u32 {
        if page_size == 0 || self.total_count == 0 {
            return 1;
        }
        self.total_count.div_ceil(u64::from(page_size)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::{AssetClass, Page, SortDirection, TabKind, TransactionStatus};

    #[test]
    fn enum_string_round_trips() {
        for asset in [
            AssetClass::Equity,
            AssetClass::Bond,
            AssetClass::Fund,
            AssetClass::Cash,
            AssetClass::Other,
        ] {
            assert_eq!(AssetClass::parse(asset.as_str()), Some(asset));
        }
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Settled,
            TransactionStatus::Cancelled,
        ] {
            assert_eq!(TransactionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SortDirection::parse("asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("up"), None);
    }

    #[test]
    fn transactions_tab_has_no_deactivate() {
        assert!(TabKind::Securities.supports_deactivate());
        assert!(TabKind::Accounts.supports_deactivate());
        assert!(TabKind::Funds.supports_deactivate());
        assert!(!TabKind::Transactions.supports_deactivate());
    }

    #[test]
    fn page_count_rounds_up_and_never_hits_zero() {
        let page = Page::<i64> {
            items: Vec::new(),
            total_count: 31,
            limit: 15,
            offset: 0,
        };
        assert_eq!(page.page_count(15), 3);
        assert_eq!(page.page_count(0), 1);
        assert_eq!(Page::<i64>::default().page_count(15), 1);
    }
}
