use crate::core::currency::{CurrencyRecord, CurrencySource};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::{debug, error, instrument};

/// Fetches the currency list from a JSON endpoint with a single GET per call.
pub struct HttpCurrencySource {
    url: String,
    client: reqwest::Client,
}

impl HttpCurrencySource {
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ratecast/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }
}

#[async_trait]
impl CurrencySource for HttpCurrencySource {
    #[instrument(name = "CurrencyFetch", skip(self), fields(url = %self.url))]
    async fn fetch_currencies(&self) -> Result<Vec<CurrencyRecord>> {
        debug!("connecting to server...");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} URL: {}", e, self.url))?;

        debug!(status = %response.status(), "Received currency response");

        let response = response
            .error_for_status()
            .context("Currency server returned an error status")?;
        let response_text = response
            .text()
            .await
            .context("Failed to get response text")?;

        let records: Vec<CurrencyRecord> = match serde_json::from_str(&response_text) {
            Ok(data) => data,
            Err(e) => {
                error!(
                    error = ?e,
                    response = %response_text,
                    "Failed to parse currency response"
                );
                return Err(e).context("Failed to parse currency response");
            }
        };

        debug!(count = records.len(), "Parsed currency records");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    async fn create_mock_server(response: ResponseTemplate) -> wiremock::MockServer {
        let mock_server = wiremock::MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/currencies.json"))
            .respond_with(response)
            .expect(1)
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn source_for(server: &wiremock::MockServer) -> HttpCurrencySource {
        HttpCurrencySource::new(&format!("{}/currencies.json", server.uri())).unwrap()
    }

    const MOCK_JSON: &str = r#"[
        {"name": "Доллар США", "charCode": "USD", "ratio": "0.010869565217391304"},
        {"name": "Евро", "charCode": "EUR", "ratio": "0.00990099"}
    ]"#;

    #[tokio::test]
    async fn test_fetch_currencies() {
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string(MOCK_JSON)).await;
        let source = source_for(&mock_server);

        let records = source.fetch_currencies().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].char_code, "USD");
        assert_eq!(records[0].name, "Доллар США");
        assert_eq!(records[1].ratio, "0.00990099");
    }

    #[tokio::test]
    async fn test_fetch_empty_array() {
        let mock_server = create_mock_server(ResponseTemplate::new(200).set_body_string("[]")).await;
        let source = source_for(&mock_server);

        let records = source.fetch_currencies().await.unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let mock_server = create_mock_server(ResponseTemplate::new(500)).await;
        let source = source_for(&mock_server);

        let err = source.fetch_currencies().await.unwrap_err();

        assert!(err.to_string().contains("error status"));
    }

    #[tokio::test]
    async fn test_fetch_invalid_json() {
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string("<html>")).await;
        let source = source_for(&mock_server);

        let err = source.fetch_currencies().await.unwrap_err();

        assert!(err.to_string().contains("Failed to parse currency response"));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_server() {
        let source = HttpCurrencySource::new("http://127.0.0.1:1/currencies.json").unwrap();

        let err = source.fetch_currencies().await.unwrap_err();

        assert!(err.to_string().contains("Request error"));
    }
}
