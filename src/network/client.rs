//! HTTP client wrapper - executes the backend's REST operations

use crate::messages::NetworkResponse;
use crate::models::{Credentials, ErrorBody, PaymentRequest, TokenResponse, TransactionList};

/// Client for the teller backend's fixed REST contract.
///
/// Every method returns a `NetworkResponse` rather than a `Result`:
/// server rejections carry the `{detail}` message, transport failures
/// a generic prefixed one, and the caller treats both as data.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        ApiClient {
            client: create_client(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /register
    pub async fn register(&self, id: u64, credentials: &Credentials) -> NetworkResponse {
        let result = self
            .client
            .post(self.url("/register"))
            .json(credentials)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => NetworkResponse::Registered { id },
            Ok(resp) => api_error(id, resp).await,
            Err(e) => network_error(id, e),
        }
    }

    /// POST /login
    pub async fn login(&self, id: u64, credentials: &Credentials) -> NetworkResponse {
        let result = self
            .client
            .post(self.url("/login"))
            .json(credentials)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => match resp.json::<TokenResponse>().await {
                Ok(body) => NetworkResponse::LoggedIn {
                    id,
                    token: body.access_token,
                },
                Err(e) => NetworkResponse::NetworkError {
                    id,
                    message: format!("Error reading body: {}", e),
                },
            },
            Ok(resp) => api_error(id, resp).await,
            Err(e) => network_error(id, e),
        }
    }

    /// POST /payment with the bearer token attached
    pub async fn submit_payment(
        &self,
        id: u64,
        payment: &PaymentRequest,
        token: &str,
    ) -> NetworkResponse {
        let result = self
            .client
            .post(self.url("/payment"))
            .header("Authorization", format!("Bearer {}", token))
            .json(payment)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => NetworkResponse::PaymentAccepted { id },
            Ok(resp) => api_error(id, resp).await,
            Err(e) => network_error(id, e),
        }
    }

    /// GET /transactions with the bearer token attached
    pub async fn fetch_transactions(&self, id: u64, token: &str) -> NetworkResponse {
        let result = self
            .client
            .get(self.url("/transactions"))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => match resp.json::<TransactionList>().await {
                Ok(body) => NetworkResponse::Transactions {
                    id,
                    transactions: body.transactions,
                },
                Err(e) => NetworkResponse::NetworkError {
                    id,
                    message: format!("Error reading body: {}", e),
                },
            },
            Ok(resp) => api_error(id, resp).await,
            Err(e) => network_error(id, e),
        }
    }
}

/// Decode a non-2xx response into the server's error message
async fn api_error(id: u64, resp: reqwest::Response) -> NetworkResponse {
    let status = resp.status();
    let message = match resp.text().await {
        Ok(body) => {
            error_detail(&body).unwrap_or_else(|| format!("Request failed: {}", status))
        }
        Err(_) => format!("Request failed: {}", status),
    };
    NetworkResponse::ApiError { id, message }
}

/// Extract the `detail` field from an error body, if it parses
fn error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body).ok().map(|e| e.detail)
}

/// Map a transport failure to a generic prefixed message
fn network_error(id: u64, e: reqwest::Error) -> NetworkResponse {
    let message = if e.is_timeout() {
        String::from("Error: request timed out (30s)")
    } else if e.is_connect() {
        format!("Error: connection failed: {}", e)
    } else {
        format!("Error: {}", e)
    };
    NetworkResponse::NetworkError { id, message }
}

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    use std::time::Duration;

    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_parses_server_body() {
        let body = r#"{"detail":"Email already registered"}"#;
        assert_eq!(
            error_detail(body),
            Some("Email already registered".to_string())
        );
    }

    #[test]
    fn test_error_detail_rejects_garbage() {
        assert_eq!(error_detail("<html>502</html>"), None);
        assert_eq!(error_detail(""), None);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.url("/login"), "http://localhost:8000/login");
    }
}
