use crate::config;
use crate::error::FetchError;
use crate::models::OptionChain;
use anyhow::{Context, Result};
use rand::{seq::SliceRandom, thread_rng};
use reqwest::{header, Client};
use tracing::{debug, error};

// -----------------------------------------------
// CLIENT WRAPPER
// -----------------------------------------------
/// Data source for the option chain.
///
/// Built once at startup and shared through the server state. Every call is a
/// single GET: no warmup, no retry, no cache.
pub struct NSEClient {
    client: Client,
    url: String,
}

impl NSEClient {
    /// Client for the NIFTY option chain
    pub fn new() -> Result<Self> {
        Self::with_url(config::nse_option_chain_indices_url(config::DEFAULT_SYMBOL))
    }

    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the chain, logging and swallowing any failure.
    ///
    /// `None` is a normal outcome; callers render the empty view.
    pub async fn fetch_option_chain(&self) -> Option<OptionChain> {
        match self.try_fetch_option_chain().await {
            Ok(chain) => Some(chain),
            Err(e) => {
                error!(url = %self.url, error = %e, "Error fetching option chain");
                None
            }
        }
    }

    /// Single attempt with the failure kept typed
    pub async fn try_fetch_option_chain(&self) -> Result<OptionChain, FetchError> {
        let res = self.client.get(&self.url).send().await?;
        let status = res.status();
        let text = res.text().await?;

        debug!(url = %self.url, status = status.as_u16(), bytes = text.len(), "Upstream responded");

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                preview: preview(&text),
            });
        }

        let trimmed = text.trim_start();
        if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
            return Err(FetchError::NonJsonResponse(preview(&text)));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

fn preview(text: &str) -> String {
    text.chars().take(config::BODY_PREVIEW_CHARS).collect()
}

// -----------------------------------------------
// HTTP CLIENT BUILDER
// -----------------------------------------------
fn build_client() -> Result<Client> {
    let mut headers = header::HeaderMap::new();

    // Rotating Accept-Language headers (fingerprint avoidance)
    let lang = config::ACCEPT_LANGUAGES
        .choose(&mut thread_rng())
        .copied()
        .unwrap_or("en-US,en;q=0.9");
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_str(lang)?,
    );
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("*/*"));

    Client::builder()
        .default_headers(headers)
        .cookie_store(true)
        .gzip(true)
        .user_agent(config::USER_AGENT)
        .timeout(config::HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}
