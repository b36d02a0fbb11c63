use async_trait::async_trait;
use serde::Serialize;

use crate::domain::errors::DomainError;
use crate::domain::invoice::{ExecuteMsg, ExecuteResult};
use crate::domain::ports::ChainWriteClient;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<reqwest::Error> for DomainError {
    fn from(e: reqwest::Error) -> Self {
        DomainError::ChainWrite(e.to_string())
    }
}

// ── Relay request ─────────────────────────────────────────────────────────────

/// Body posted to the signing relay. Fee, memo and funds are fixed: the
/// relay estimates gas and no tokens are attached to an invoice.
#[derive(Debug, Serialize)]
pub struct ExecuteRequest<'a> {
    pub sender: &'a str,
    pub contract: &'a str,
    pub msg: &'a ExecuteMsg,
    pub fee: &'static str,
    pub memo: &'static str,
    pub funds: Vec<Coin>,
}

#[derive(Debug, Serialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl<'a> ExecuteRequest<'a> {
    pub fn new(sender: &'a str, contract: &'a str, msg: &'a ExecuteMsg) -> Self {
        Self {
            sender,
            contract,
            msg,
            fee: "auto",
            memo: "",
            funds: Vec::new(),
        }
    }
}

// ── Client ────────────────────────────────────────────────────────────────────

/// Forwards execute calls to a relay that holds the session's signing key.
pub struct HttpChainClient {
    http: reqwest::Client,
    execute_url: String,
}

impl HttpChainClient {
    pub fn new(relay_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            execute_url: execute_url(relay_url),
        }
    }
}

fn execute_url(relay_url: &str) -> String {
    format!("{}/execute", relay_url.trim_end_matches('/'))
}

#[async_trait]
impl ChainWriteClient for HttpChainClient {
    async fn execute(
        &self,
        sender: &str,
        contract: &str,
        msg: &ExecuteMsg,
    ) -> Result<ExecuteResult, DomainError> {
        let resp = self
            .http
            .post(&self.execute_url)
            .json(&ExecuteRequest::new(sender, contract, msg))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::ChainWrite(format!(
                "relay returned {}: {}",
                status, body
            )));
        }

        Ok(resp.json::<ExecuteResult>().await?)
    }
}
