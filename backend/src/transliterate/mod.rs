//! Name romanization through the slovnyk.ua transliteration form.
//!
//! The service answers with an HTML page; the romanized text sits in
//! `<textarea id="translated1">`.

use std::future::Future;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

use crate::error::{RemoteError, RemoteResult};
use crate::remote::{ensure_success, probe_service, transport_error};

/// Public transliteration endpoint.
pub const DEFAULT_TRANSLIT_URL: &str = "https://slovnyk.ua/translit.php";

/// Fixed request timeout for transliteration calls.
pub const TRANSLIT_TIMEOUT: Duration = Duration::from_secs(30);

const SERVICE: &str = "Transliteration";

static TRANSLATED_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<textarea\b[^>]*\bid\s*=\s*["']?translated1["']?[^>]*>(.*?)</textarea>"#)
        .expect("valid translated-text pattern")
});

static NUMERIC_ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("valid entity pattern")
});

/// Maps native-script text to its romanized form.
pub trait Transliterator {
    /// Romanize `text` (name parts joined by single spaces).
    fn transliterate(&self, text: &str) -> impl Future<Output = RemoteResult<String>> + Send;
}

/// Client for the slovnyk.ua form.
#[derive(Clone)]
pub struct SlovnykClient {
    client: Client,
    url: String,
}

impl SlovnykClient {
    /// Create a client for `url` with the fixed request timeout.
    pub fn new(url: impl Into<String>) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(TRANSLIT_TIMEOUT)
            .build()
            .map_err(|e| transport_error(SERVICE, e))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Startup availability check.
    pub async fn probe(&self) -> RemoteResult<()> {
        probe_service(&self.client, &self.url, SERVICE).await
    }
}

impl Transliterator for SlovnykClient {
    async fn transliterate(&self, text: &str) -> RemoteResult<String> {
        let response = self
            .client
            .post(&self.url)
            .form(&[("text", text)])
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        let page = ensure_success(SERVICE, response)
            .await?
            .text()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        extract_translated(&page)
    }
}

/// Pull the romanized text out of the service's HTML page.
pub fn extract_translated(page: &str) -> RemoteResult<String> {
    let raw = TRANSLATED_FIELD
        .captures(page)
        .and_then(|c| c.get(1))
        .ok_or(RemoteError::MissingField {
            service: SERVICE,
            field: "translated1",
        })?;

    let text = decode_entities(raw.as_str()).trim().to_string();
    if text.is_empty() {
        return Err(RemoteError::InvalidResponse {
            service: SERVICE,
            message: "translated text is empty".to_string(),
        });
    }
    Ok(text)
}

fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY.replace_all(text, |caps: &regex::Captures| {
        let code = &caps[1];
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        value
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    numeric
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
