// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use funddesk_app::{AccountId, FundId, PageQuery, SecurityId, TabKind};
use funddesk_testkit::SampleData;
use funddesk_tui::{ApiRuntime, PageSnapshot};

/// Runtime backed by the ledger administration backend over HTTP.
pub struct HttpRuntime {
    client: funddesk_api::Client,
}

impl HttpRuntime {
    pub fn new(client: funddesk_api::Client) -> Self {
        Self { client }
    }
}

impl ApiRuntime for HttpRuntime {
    fn fetch_page(&mut self, tab: TabKind, query: &PageQuery) -> Result<PageSnapshot> {
        Ok(match tab {
            TabKind::Securities => PageSnapshot::Securities(self.client.fetch_securities(query)?),
            TabKind::Accounts => PageSnapshot::Accounts(self.client.fetch_accounts(query)?),
            TabKind::Funds => PageSnapshot::Funds(self.client.fetch_funds(query)?),
            TabKind::Transactions => {
                PageSnapshot::Transactions(self.client.fetch_transactions(query)?)
            }
        })
    }

    fn deactivate(&mut self, tab: TabKind, id: i64) -> Result<()> {
        match tab {
            TabKind::Securities => self.client.deactivate_security(SecurityId::new(id)),
            TabKind::Accounts => self.client.deactivate_account(AccountId::new(id)),
            TabKind::Funds => self.client.deactivate_fund(FundId::new(id)),
            TabKind::Transactions => bail!("transactions cannot be deactivated"),
        }
    }
}

const OFFLINE_SEED: u64 = 7;

/// In-process runtime for `--offline`: same paging, filtering, and
/// conflict semantics as the backend, served from seeded sample data.
pub struct OfflineRuntime {
    data: SampleData,
}

impl OfflineRuntime {
    pub fn new() -> Self {
        Self {
            data: SampleData::seeded(OFFLINE_SEED),
        }
    }
}

impl ApiRuntime for OfflineRuntime {
    fn fetch_page(&mut self, tab: TabKind, query: &PageQuery) -> Result<PageSnapshot> {
        Ok(match tab {
            TabKind::Securities => PageSnapshot::Securities(self.data.securities_page(query)),
            TabKind::Accounts => PageSnapshot::Accounts(self.data.accounts_page(query)),
            TabKind::Funds => PageSnapshot::Funds(self.data.funds_page(query)),
            TabKind::Transactions => PageSnapshot::Transactions(self.data.transactions_page(query)),
        })
    }

    fn deactivate(&mut self, tab: TabKind, id: i64) -> Result<()> {
        self.data.deactivate(tab, id)
    }
}
