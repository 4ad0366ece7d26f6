// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use funddesk_app::{
    Account, AccountId, AssetClass, Fund, FundId, Page, PageQuery, Security, SecurityId,
    SortDirection, TabKind, TradeSide, Transaction, TransactionId, TransactionStatus,
};
use std::cmp::Ordering;
use time::{Date, Duration, Month, OffsetDateTime};

const TICKERS: [(&str, &str, AssetClass); 24] = [
    ("AAPL", "Apple Inc", AssetClass::Equity),
    ("MSFT", "Microsoft Corp", AssetClass::Equity),
    ("GOOG", "Alphabet Inc", AssetClass::Equity),
    ("AMZN", "Amazon.com Inc", AssetClass::Equity),
    ("NVDA", "NVIDIA Corp", AssetClass::Equity),
    ("BRK.B", "Berkshire Hathaway", AssetClass::Equity),
    ("JPM", "JPMorgan Chase", AssetClass::Equity),
    ("V", "Visa Inc", AssetClass::Equity),
    ("SAP", "SAP SE", AssetClass::Equity),
    ("ASML", "ASML Holding", AssetClass::Equity),
    ("NESN", "Nestle SA", AssetClass::Equity),
    ("VTI", "Vanguard Total Stock Market ETF", AssetClass::Fund),
    ("VWRL", "Vanguard FTSE All-World ETF", AssetClass::Fund),
    ("IWDA", "iShares Core MSCI World ETF", AssetClass::Fund),
    ("AGG", "iShares Core US Aggregate Bond ETF", AssetClass::Bond),
    ("BND", "Vanguard Total Bond Market ETF", AssetClass::Bond),
    ("TLT", "iShares 20+ Year Treasury Bond ETF", AssetClass::Bond),
    ("LQD", "iShares Investment Grade Corporate Bond ETF", AssetClass::Bond),
    ("SHV", "iShares Short Treasury Bond ETF", AssetClass::Cash),
    ("BIL", "SPDR 1-3 Month T-Bill ETF", AssetClass::Cash),
    ("GLD", "SPDR Gold Shares", AssetClass::Other),
    ("SLV", "iShares Silver Trust", AssetClass::Other),
    ("DBC", "Invesco DB Commodity Index", AssetClass::Other),
    ("VNQ", "Vanguard Real Estate ETF", AssetClass::Other),
];

const EXCHANGES: [&str; 6] = ["NYSE", "NASDAQ", "LSE", "XETRA", "SIX", "AMS"];
const CURRENCIES: [&str; 5] = ["USD", "EUR", "GBP", "CHF", "JPY"];

const OWNER_FIRST: [&str; 12] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Robin", "Rowan",
];
const OWNER_LAST: [&str; 12] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Turner", "Bennett",
];

const FUND_ADJECTIVES: [&str; 8] = [
    "Global", "Balanced", "Dynamic", "Core", "Select", "Strategic", "Prime", "Heritage",
];
const FUND_THEMES: [&str; 8] = [
    "Equity", "Income", "Growth", "Bond", "Allocation", "Opportunities", "Value", "Markets",
];
const MANAGERS: [&str; 6] = [
    "Northgate Capital",
    "Harbourview AM",
    "Stonefield Partners",
    "Meridian Advisors",
    "Lakeshore IM",
    "Crestline Management",
];

fn reference_now() -> OffsetDateTime {
    // Fixed anchor so seeded datasets are stable across runs.
    Date::from_calendar_date(2026, Month::January, 2)
        .expect("valid reference date")
        .midnight()
        .assume_utc()
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn int_range_i64(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        low + (self.next_u64() % ((high - low) as u64)) as i64
    }
}

/// Seeded generator for master-data fixtures.
#[derive(Debug, Clone)]
pub struct MarketFaker {
    rng: DeterministicRng,
}

impl MarketFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    fn pick<'a>(&mut self, values: &[&'a str]) -> &'a str {
        values[self.rng.int_n(values.len())]
    }

    fn timestamps(&mut self) -> (OffsetDateTime, OffsetDateTime) {
        let created = reference_now() - Duration::days(self.rng.int_range_i64(30, 900));
        let updated = created + Duration::days(self.rng.int_range_i64(0, 29));
        (created, updated)
    }

    pub fn security(&mut self, id: i64) -> Security {
        let (ticker, name, asset_class) = TICKERS[(id as usize - 1) % TICKERS.len()];
        let (created_at, updated_at) = self.timestamps();
        Security {
            id: SecurityId::new(id),
            ticker: ticker.to_owned(),
            name: name.to_owned(),
            asset_class,
            exchange: self.pick(&EXCHANGES).to_owned(),
            currency: self.pick(&CURRENCIES).to_owned(),
            active: self.rng.int_n(10) != 0,
            created_at,
            updated_at,
        }
    }

    pub fn account(&mut self, id: i64) -> Account {
        let first = self.pick(&OWNER_FIRST);
        let last = self.pick(&OWNER_LAST);
        let (created_at, updated_at) = self.timestamps();
        Account {
            id: AccountId::new(id),
            code: format!("ACC-{id:04}"),
            name: format!("{first} {last} Portfolio"),
            owner: format!("{first} {last}"),
            base_currency: self.pick(&CURRENCIES).to_owned(),
            active: self.rng.int_n(12) != 0,
            created_at,
            updated_at,
        }
    }

    pub fn fund(&mut self, id: i64) -> Fund {
        let adjective = self.pick(&FUND_ADJECTIVES);
        let theme = self.pick(&FUND_THEMES);
        let (created_at, updated_at) = self.timestamps();
        Fund {
            id: FundId::new(id),
            code: format!("FND-{id:03}"),
            name: format!("{adjective} {theme} Fund"),
            manager: self.pick(&MANAGERS).to_owned(),
            base_currency: self.pick(&CURRENCIES).to_owned(),
            nav_cents: Some(self.rng.int_range_i64(90_000, 35_000_000)),
            active: self.rng.int_n(10) != 0,
            created_at,
            updated_at,
        }
    }

    pub fn transaction(&mut self, id: i64, fund: &Fund, security: &Security) -> Transaction {
        let quantity = self.rng.int_range_i64(1, 5_000);
        let price_cents = self.rng.int_range_i64(1_000, 90_000);
        let status = match self.rng.int_n(10) {
            0 => TransactionStatus::Cancelled,
            1 | 2 => TransactionStatus::Pending,
            _ => TransactionStatus::Settled,
        };
        Transaction {
            id: TransactionId::new(id),
            trade_ref: format!("TRD-{id:06}"),
            fund_code: fund.code.clone(),
            ticker: security.ticker.clone(),
            side: if self.rng.int_n(2) == 0 {
                TradeSide::Buy
            } else {
                TradeSide::Sell
            },
            quantity,
            amount_cents: quantity * price_cents,
            trade_date: (reference_now() - Duration::days(self.rng.int_range_i64(0, 400))).date(),
            status,
        }
    }
}

/// In-memory dataset with the same paging contract as the backend.
/// Backs the offline mode and the mock-server tests.
#[derive(Debug, Clone)]
pub struct SampleData {
    pub securities: Vec<Security>,
    pub accounts: Vec<Account>,
    pub funds: Vec<Fund>,
    pub transactions: Vec<Transaction>,
}

impl SampleData {
    pub fn seeded(seed: u64) -> Self {
        let mut faker = MarketFaker::new(seed);
        let securities: Vec<Security> = (1..=24).map(|id| faker.security(id)).collect();
        let accounts: Vec<Account> = (1..=40).map(|id| faker.account(id)).collect();
        let funds: Vec<Fund> = (1..=18).map(|id| faker.fund(id)).collect();
        let transactions: Vec<Transaction> = (1..=120)
            .map(|id| {
                let fund = funds[faker.rng.int_n(funds.len())].clone();
                let security = securities[faker.rng.int_n(securities.len())].clone();
                faker.transaction(id, &fund, &security)
            })
            .collect();

        Self {
            securities,
            accounts,
            funds,
            transactions,
        }
    }

    pub fn securities_page(&self, query: &PageQuery) -> Page<Security> {
        let filtered = filter_rows(&self.securities, &query.filter, |row| {
            vec![row.ticker.clone(), row.name.clone()]
        });
        paginate(filtered, query, |a, b, column| match column {
            "name" => a.name.cmp(&b.name),
            "asset_class" => a.asset_class.as_str().cmp(b.asset_class.as_str()),
            "exchange" => a.exchange.cmp(&b.exchange),
            _ => a.ticker.cmp(&b.ticker),
        })
    }

    pub fn accounts_page(&self, query: &PageQuery) -> Page<Account> {
        let filtered = filter_rows(&self.accounts, &query.filter, |row| {
            vec![row.code.clone(), row.name.clone(), row.owner.clone()]
        });
        paginate(filtered, query, |a, b, column| match column {
            "name" => a.name.cmp(&b.name),
            "owner" => a.owner.cmp(&b.owner),
            "base_currency" => a.base_currency.cmp(&b.base_currency),
            _ => a.code.cmp(&b.code),
        })
    }

    pub fn funds_page(&self, query: &PageQuery) -> Page<Fund> {
        let filtered = filter_rows(&self.funds, &query.filter, |row| {
            vec![row.code.clone(), row.name.clone(), row.manager.clone()]
        });
        paginate(filtered, query, |a, b, column| match column {
            "code" => a.code.cmp(&b.code),
            "manager" => a.manager.cmp(&b.manager),
            "nav" => a.nav_cents.cmp(&b.nav_cents),
            _ => a.name.cmp(&b.name),
        })
    }

    pub fn transactions_page(&self, query: &PageQuery) -> Page<Transaction> {
        let filtered = filter_rows(&self.transactions, &query.filter, |row| {
            vec![row.trade_ref.clone(), row.fund_code.clone(), row.ticker.clone()]
        });
        paginate(filtered, query, |a, b, column| match column {
            "trade_ref" => a.trade_ref.cmp(&b.trade_ref),
            "fund_code" => a.fund_code.cmp(&b.fund_code),
            "ticker" => a.ticker.cmp(&b.ticker),
            "amount" => a.amount_cents.cmp(&b.amount_cents),
            _ => a.trade_date.cmp(&b.trade_date),
        })
    }

    /// Offline counterpart of `POST /{path}/{id}/deactivate`, including
    /// the backend's conflict error for already-inactive rows.
    pub fn deactivate(&mut self, tab: TabKind, id: i64) -> Result<()> {
        let (label, active) = match tab {
            TabKind::Securities => match self.securities.iter_mut().find(|s| s.id.get() == id) {
                Some(row) => (row.ticker.clone(), &mut row.active),
                None => bail!("security {id} not found"),
            },
            TabKind::Accounts => match self.accounts.iter_mut().find(|a| a.id.get() == id) {
                Some(row) => (row.code.clone(), &mut row.active),
                None => bail!("account {id} not found"),
            },
            TabKind::Funds => match self.funds.iter_mut().find(|f| f.id.get() == id) {
                Some(row) => (row.code.clone(), &mut row.active),
                None => bail!("fund {id} not found"),
            },
            TabKind::Transactions => bail!("transactions cannot be deactivated"),
        };

        if !*active {
            bail!("Cannot deactivate {label}: already inactive");
        }
        *active = false;
        Ok(())
    }
}

fn filter_rows<T: Clone>(
    rows: &[T],
    filter: &Option<String>,
    searchable: impl Fn(&T) -> Vec<String>,
) -> Vec<T> {
    match filter {
        None => rows.to_vec(),
        Some(term) => {
            let needle = term.to_lowercase();
            rows.iter()
                .filter(|row| {
                    searchable(row)
                        .iter()
                        .any(|field| field.to_lowercase().contains(&needle))
                })
                .cloned()
                .collect()
        }
    }
}

fn paginate<T>(
    mut rows: Vec<T>,
    query: &PageQuery,
    compare: impl Fn(&T, &T, &str) -> Ordering,
) -> Page<T> {
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, &query.sort_by);
        match query.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let total_count = rows.len() as u64;
    let items: Vec<T> = rows
        .into_iter()
        .skip(query.offset as usize)
        .take(query.limit as usize)
        .collect();

    Page {
        items,
        total_count,
        limit: query.limit,
        offset: query.offset,
    }
}

#[cfg(test)]
mod tests {
    use super::SampleData;
    use funddesk_app::{PageQuery, SortDirection, TabKind};

    fn query() -> PageQuery {
        PageQuery {
            limit: 15,
            offset: 0,
            sort_by: "ticker".to_owned(),
            sort_direction: SortDirection::Asc,
            filter: None,
        }
    }

    #[test]
    fn seeded_data_is_deterministic() {
        let first = SampleData::seeded(42);
        let second = SampleData::seeded(42);
        assert_eq!(first.securities, second.securities);
        assert_eq!(first.transactions, second.transactions);
    }

    #[test]
    fn page_respects_limit_offset_and_total() {
        let data = SampleData::seeded(42);
        let mut q = query();
        q.limit = 10;
        q.offset = 20;

        let page = data.securities_page(&q);
        assert_eq!(page.total_count, 24);
        assert_eq!(page.items.len(), 4);
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset, 20);
    }

    #[test]
    fn sort_direction_reverses_ordering() {
        let data = SampleData::seeded(42);
        let asc = data.securities_page(&query());
        let mut desc_query = query();
        desc_query.sort_direction = SortDirection::Desc;
        let desc = data.securities_page(&desc_query);

        assert_eq!(asc.items.first().map(|s| s.ticker.clone()), {
            desc.items.last().map(|s| s.ticker.clone())
        });
    }

    #[test]
    fn filter_matches_ticker_or_name_case_insensitively() {
        let data = SampleData::seeded(42);
        let mut q = query();
        q.filter = Some("vanguard".to_owned());

        let page = data.securities_page(&q);
        assert!(!page.items.is_empty());
        assert!(
            page.items
                .iter()
                .all(|s| s.name.to_lowercase().contains("vanguard")),
        );
        assert_eq!(page.total_count, page.items.len() as u64);
    }

    #[test]
    fn deactivate_flips_active_once_then_conflicts() {
        let mut data = SampleData::seeded(42);
        let id = data
            .securities
            .iter()
            .find(|s| s.active)
            .map(|s| s.id.get())
            .expect("seeded data has active securities");

        data.deactivate(TabKind::Securities, id)
            .expect("first deactivate succeeds");
        let error = data
            .deactivate(TabKind::Securities, id)
            .expect_err("second deactivate conflicts");
        assert!(error.to_string().contains("already inactive"));
    }

    #[test]
    fn transactions_cannot_be_deactivated() {
        let mut data = SampleData::seeded(42);
        let error = data
            .deactivate(TabKind::Transactions, 1)
            .expect_err("transactions are read-only");
        assert!(error.to_string().contains("cannot be deactivated"));
    }
}
