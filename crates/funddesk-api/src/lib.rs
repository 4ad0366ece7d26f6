// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use funddesk_app::{
    Account, AccountId, Fund, FundId, Page, PageQuery, Security, SecurityId, Transaction,
};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Blocking client for the fund-administration backend.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        Url::parse(&base_url).with_context(|| format!("invalid api.base_url {base_url:?}"))?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn fetch_securities(&self, query: &PageQuery) -> Result<Page<Security>> {
        self.fetch_page("securities", query)
    }

    pub fn fetch_accounts(&self, query: &PageQuery) -> Result<Page<Account>> {
        self.fetch_page("accounts", query)
    }

    pub fn fetch_funds(&self, query: &PageQuery) -> Result<Page<Fund>> {
        self.fetch_page("funds", query)
    }

    pub fn fetch_transactions(&self, query: &PageQuery) -> Result<Page<Transaction>> {
        self.fetch_page("transactions", query)
    }

    pub fn deactivate_security(&self, id: SecurityId) -> Result<()> {
        self.deactivate("securities", id.get())
    }

    pub fn deactivate_account(&self, id: AccountId) -> Result<()> {
        self.deactivate("accounts", id.get())
    }

    pub fn deactivate_fund(&self, id: FundId) -> Result<()> {
        self.deactivate("funds", id.get())
    }

    fn fetch_page<T: DeserializeOwned>(&self, path: &str, query: &PageQuery) -> Result<Page<T>> {
        let url = page_url(&self.base_url, path, query)?;
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(server_error(status, &body));
        }

        response
            .json()
            .with_context(|| format!("decode {path} page"))
    }

    fn deactivate(&self, path: &str, id: i64) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/{path}/{id}/deactivate", self.base_url))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(server_error(status, &body));
        }
        Ok(())
    }
}

/// Backend pagination query string: `limit`, `offset`, `sortBy`,
/// `sortDirection`, and `filter` only when a term is present.
pub fn page_url(base_url: &str, path: &str, query: &PageQuery) -> Result<Url> {
    let mut params: Vec<(&str, String)> = vec![
        ("limit", query.limit.to_string()),
        ("offset", query.offset.to_string()),
        ("sortBy", query.sort_by.clone()),
        ("sortDirection", query.sort_direction.as_str().to_owned()),
    ];
    if let Some(filter) = &query.filter {
        params.push(("filter", filter.clone()));
    }

    Url::parse_with_params(&format!("{base_url}/{path}"), params)
        .with_context(|| format!("build {path} request URL"))
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!("cannot reach {base_url} -- check [api].base_url and that the backend is up ({error})")
}

/// Most specific message available: the server's error envelope, then a
/// short plain-text body, then the bare status code.
fn server_error(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<FlatErrorEnvelope>(body)
        && let Some(message) = parsed.message
        && !message.is_empty()
    {
        return anyhow!("{message}");
    }

    if let Ok(parsed) = serde_json::from_str::<NestedErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.message.is_empty()
    {
        return anyhow!("{}", error.message);
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct FlatErrorEnvelope {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NestedErrorEnvelope {
    error: Option<NestedErrorBody>,
}

#[derive(Debug, Deserialize)]
struct NestedErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::{page_url, server_error};
    use funddesk_app::{PageQuery, SortDirection};
    use reqwest::StatusCode;

    fn query(filter: Option<&str>) -> PageQuery {
        PageQuery {
            limit: 15,
            offset: 30,
            sort_by: "ticker".to_owned(),
            sort_direction: SortDirection::Desc,
            filter: filter.map(str::to_owned),
        }
    }

    #[test]
    fn page_url_includes_all_pagination_parameters() {
        let url = page_url("http://localhost:8080/api", "securities", &query(None))
            .expect("valid page url");
        assert_eq!(url.path(), "/api/securities");
        assert_eq!(
            url.query(),
            Some("limit=15&offset=30&sortBy=ticker&sortDirection=desc"),
        );
    }

    #[test]
    fn page_url_omits_filter_when_absent_and_encodes_it_when_present() {
        let bare = page_url("http://localhost:8080/api", "funds", &query(None))
            .expect("valid page url");
        assert!(!bare.query().unwrap_or_default().contains("filter"));

        let filtered = page_url("http://localhost:8080/api", "funds", &query(Some("US bonds")))
            .expect("valid page url");
        assert!(
            filtered
                .query()
                .unwrap_or_default()
                .contains("filter=US+bonds"),
        );
    }

    #[test]
    fn server_error_prefers_the_envelope_message() {
        let flat = server_error(
            StatusCode::CONFLICT,
            r#"{"message":"Cannot deactivate: security is referenced by open positions"}"#,
        );
        assert_eq!(
            flat.to_string(),
            "Cannot deactivate: security is referenced by open positions",
        );

        let nested = server_error(
            StatusCode::CONFLICT,
            r#"{"error":{"message":"Cannot deactivate"}}"#,
        );
        assert_eq!(nested.to_string(), "Cannot deactivate");
    }

    #[test]
    fn server_error_falls_back_to_body_then_status() {
        let text = server_error(StatusCode::BAD_GATEWAY, "upstream offline");
        assert_eq!(text.to_string(), "server error (502): upstream offline");

        let opaque = server_error(StatusCode::INTERNAL_SERVER_ERROR, "{\"odd\":true}");
        assert_eq!(opaque.to_string(), "server returned 500");

        let empty = server_error(StatusCode::NOT_FOUND, "");
        assert_eq!(empty.to_string(), "server returned 404");
    }
}
