//! Banking API client: OAuth token, balance and transaction list.

use anyhow::{Context, Result, bail};
use pennywise_core::{AccountSummary, CoreError, Transaction};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::credentials::Credentials;

pub const DEFAULT_TOKEN_URL: &str = "https://production-api.gmon.io/oauth2/token";
pub const DEFAULT_BASE_URL: &str = "https://production-api.gmon.io";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    token_url: String,
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_URL, DEFAULT_BASE_URL)
    }
}

impl ApiClient {
    pub fn new(token_url: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: token_url.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// OAuth2 password grant.
    pub async fn request_access_token(&self, creds: &Credentials) -> Result<String> {
        #[derive(Deserialize)]
        struct TokenResp {
            access_token: String,
        }

        let resp = self
            .http
            .execute(self.token_request(creds)?)
            .await
            .context("token request")?;
        let body = success_text(resp, "token").await?;
        let token: TokenResp = serde_json::from_str(&body).context("parse token response")?;
        debug!("access token acquired");
        Ok(token.access_token)
    }

    pub async fn fetch_balance(&self, token: &str, account_id: &str) -> Result<AccountSummary> {
        let resp = self
            .http
            .execute(self.balance_request(token, account_id)?)
            .await
            .context("balance request")?;
        let body = success_text(resp, "balance").await?;
        decode_summary(&body)
    }

    pub async fn fetch_transactions(
        &self,
        token: &str,
        account_id: &str,
    ) -> Result<Vec<Transaction>> {
        let resp = self
            .http
            .execute(self.transactions_request(token, account_id)?)
            .await
            .context("transactions request")?;
        let body = success_text(resp, "transactions").await?;
        let transactions = decode_transactions_response(&body)?;
        info!(count = transactions.len(), "transactions fetched");
        Ok(transactions)
    }

    fn token_request(&self, creds: &Credentials) -> Result<reqwest::Request> {
        let form = [
            ("grant_type", "password"),
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("username", creds.username.as_str()),
            ("password", creds.password.as_str()),
        ];
        self.http
            .post(&self.token_url)
            .form(&form)
            .build()
            .context("build token request")
    }

    fn balance_request(&self, token: &str, account_id: &str) -> Result<reqwest::Request> {
        self.http
            .get(format!("{}/balance", self.base_url))
            .bearer_auth(token)
            .query(&[("account_id", account_id)])
            .build()
            .context("build balance request")
    }

    fn transactions_request(&self, token: &str, account_id: &str) -> Result<reqwest::Request> {
        self.http
            .get(format!("{}/transactions", self.base_url))
            .bearer_auth(token)
            .query(&[("account_id", account_id), ("expand[]", "merchant")])
            .build()
            .context("build transactions request")
    }
}

async fn success_text(resp: reqwest::Response, what: &str) -> Result<String> {
    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("{what} error: {status} {txt}");
    }
    resp.text().await.with_context(|| format!("read {what} response"))
}

pub fn decode_summary(body: &str) -> Result<AccountSummary> {
    serde_json::from_str(body).context("parse balance response")
}

/// Decode `{ "transactions": [...] }`.
pub fn decode_transactions_response(body: &str) -> Result<Vec<Transaction>> {
    #[derive(Deserialize)]
    struct TransactionsResp {
        transactions: Vec<Value>,
    }

    let resp: TransactionsResp =
        serde_json::from_str(body).context("parse transactions response")?;
    Ok(decode_transactions(resp.transactions)?)
}

/// Decode each entry on its own so a bad one is reported by id.
pub fn decode_transactions(values: Vec<Value>) -> Result<Vec<Transaction>, CoreError> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let id = value
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{i}"));
            serde_json::from_value(value).map_err(|e| CoreError::malformed(id, e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_summary() {
        let body = r#"{"balance": 5000, "currency": "GBP", "spend_today": -120}"#;
        let s = decode_summary(body).unwrap();
        assert_eq!(s.balance, 5000);
        assert_eq!(s.spend_today, -120);
        assert_eq!(s.currency.as_deref(), Some("GBP"));
    }

    #[test]
    fn test_decode_transactions_response() {
        let body = json!({
            "transactions": [
                { "id": "tx_1", "amount": -510, "created": "2026-10-17T09:12:44Z",
                  "merchant": { "id": "merch_1", "name": "Pret" }, "notes": "" },
                { "id": "tx_2", "amount": 10000, "created": "2026-10-17T10:00:00Z",
                  "merchant": null, "notes": null }
            ]
        })
        .to_string();
        let txns = decode_transactions_response(&body).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].merchant_id(), Some("merch_1"));
        assert!(txns[1].merchant.is_none());
    }

    #[test]
    fn test_bad_transaction_reported_by_id() {
        let err = decode_transactions(vec![
            json!({ "id": "tx_ok", "amount": -1, "created": "2026-10-17T00:00:00Z" }),
            json!({ "id": "tx_bad", "amount": "lots", "created": "2026-10-17T00:00:00Z" }),
        ])
        .unwrap_err();
        assert!(matches!(err, CoreError::MalformedTransaction { ref id, .. } if id == "tx_bad"));
    }

    #[test]
    fn test_transaction_without_id_uses_position() {
        let err = decode_transactions(vec![json!({ "amount": -1 })]).unwrap_err();
        assert!(matches!(err, CoreError::MalformedTransaction { ref id, .. } if id == "#0"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new(DEFAULT_TOKEN_URL, "https://api.example.test/");
        assert_eq!(client.base_url, "https://api.example.test");
    }

    fn client() -> ApiClient {
        ApiClient::new("https://auth.example.test/oauth2/token", "https://api.example.test/")
    }

    fn query(req: &reqwest::Request) -> Vec<(String, String)> {
        req.url().query_pairs().into_owned().collect()
    }

    fn header<'a>(req: &'a reqwest::Request, name: reqwest::header::HeaderName) -> &'a str {
        req.headers().get(name).unwrap().to_str().unwrap()
    }

    #[test]
    fn test_token_request_is_password_grant_form() {
        let creds = Credentials {
            client_id: "cid".to_string(),
            client_secret: "csecret".to_string(),
            username: "alex".to_string(),
            password: "hunter2".to_string(),
            account_id: "acc_1".to_string(),
        };
        let req = client().token_request(&creds).unwrap();
        assert_eq!(req.method(), reqwest::Method::POST);
        assert_eq!(req.url().as_str(), "https://auth.example.test/oauth2/token");
        assert_eq!(
            header(&req, reqwest::header::CONTENT_TYPE),
            "application/x-www-form-urlencoded"
        );
        let body = req.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(
            std::str::from_utf8(body).unwrap(),
            "grant_type=password&client_id=cid&client_secret=csecret&username=alex&password=hunter2"
        );
    }

    #[test]
    fn test_balance_request_sends_bearer_token() {
        let req = client().balance_request("tok_abc", "acc_1").unwrap();
        assert_eq!(req.method(), reqwest::Method::GET);
        assert_eq!(req.url().path(), "/balance");
        assert_eq!(query(&req), vec![("account_id".to_string(), "acc_1".to_string())]);
        assert_eq!(header(&req, reqwest::header::AUTHORIZATION), "Bearer tok_abc");
    }

    #[test]
    fn test_transactions_request_expands_merchant() {
        let req = client().transactions_request("tok_abc", "acc_1").unwrap();
        assert_eq!(req.url().path(), "/transactions");
        assert_eq!(
            query(&req),
            vec![
                ("account_id".to_string(), "acc_1".to_string()),
                ("expand[]".to_string(), "merchant".to_string()),
            ]
        );
        assert_eq!(header(&req, reqwest::header::AUTHORIZATION), "Bearer tok_abc");
    }

    /// Serve one canned HTTP response on a local port and return its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/balance")
    }

    fn local_http() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn test_error_status_reports_status_and_body() {
        let url = serve_once("401 Unauthorized", "invalid_token").await;
        let resp = local_http().get(url).send().await.unwrap();
        let err = success_text(resp, "balance").await.unwrap_err();
        assert_eq!(err.to_string(), "balance error: 401 Unauthorized invalid_token");
    }

    #[tokio::test]
    async fn test_success_status_returns_body() {
        let url = serve_once("200 OK", r#"{"balance":1}"#).await;
        let resp = local_http().get(url).send().await.unwrap();
        assert_eq!(success_text(resp, "balance").await.unwrap(), r#"{"balance":1}"#);
    }
}
