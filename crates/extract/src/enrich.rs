use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use lettrage_core::{parse_amount, parse_date, EnrichmentConfig, InvoiceFields};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// A second opinion on invoice fields, typically from a language model.
///
/// Implementations never fail: anything that goes wrong yields `None` and the
/// heuristic fields stand.
pub trait TextEnricher: Send + Sync {
    fn enrich(&self, text: &str) -> impl Future<Output = Option<InvoiceFields>> + Send;
}

// ── No-op and fixed enrichers ────────────────────────────────────────────────

/// Produces nothing. Used when enrichment is disabled.
pub struct NoopEnricher;

impl TextEnricher for NoopEnricher {
    async fn enrich(&self, _text: &str) -> Option<InvoiceFields> {
        None
    }
}

/// Returns preset fields whatever the text. Useful for exercising the
/// overlay without a model server.
pub struct StaticEnricher {
    pub fields: Option<InvoiceFields>,
}

impl StaticEnricher {
    pub fn new(fields: InvoiceFields) -> Self {
        Self { fields: Some(fields) }
    }
}

impl TextEnricher for StaticEnricher {
    async fn enrich(&self, _text: &str) -> Option<InvoiceFields> {
        self.fields.clone()
    }
}

impl<E: TextEnricher> TextEnricher for Option<E> {
    async fn enrich(&self, text: &str) -> Option<InvoiceFields> {
        match self {
            Some(inner) => inner.enrich(text).await,
            None => None,
        }
    }
}

// ── Ollama ───────────────────────────────────────────────────────────────────

const GENERATE_PATH: &str = "/api/generate";

const INSTRUCTIONS: &str = "Tu es un extracteur de champs de facture. \
Retourne un JSON compact avec les clés: invoice_number, \
invoice_date (YYYY-MM-DD), total_amount (float), currency (ISO).";

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model output is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Client for an Ollama-compatible `/api/generate` endpoint.
pub struct OllamaEnricher {
    http: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OllamaEnricher {
    pub fn new(config: &EnrichmentConfig) -> Result<Self, EnrichError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn prompt(text: &str) -> String {
        format!("{INSTRUCTIONS}\n\nTexte facture:\n{text}\n\nRéponds uniquement en JSON, sans explications.")
    }

    async fn generate(&self, text: &str) -> Result<InvoiceFields, EnrichError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: Self::prompt(text),
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };
        let resp: GenerateResponse = self
            .http
            .post(format!("{}{GENERATE_PATH}", self.base_url))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let raw = resp.response.unwrap_or_else(|| "{}".to_string());
        let value: Value = serde_json::from_str(raw.trim())?;
        Ok(fields_from_json(&value))
    }
}

impl TextEnricher for OllamaEnricher {
    async fn enrich(&self, text: &str) -> Option<InvoiceFields> {
        match self.generate(text).await {
            Ok(fields) => {
                debug!(model = %self.model, ?fields, "enrichment");
                Some(fields)
            }
            Err(e) => {
                warn!(model = %self.model, "enrichment failed, keeping heuristic fields: {e}");
                None
            }
        }
    }
}

/// Read the fields a model returned. Unknown keys and unusable values are
/// ignored.
pub fn fields_from_json(value: &Value) -> InvoiceFields {
    let text = |key: &str| {
        value
            .get(key)
            .and_then(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
    };

    let total_amount = match value.get("total_amount") {
        Some(Value::Number(n)) => n.to_string().parse::<Decimal>().ok(),
        Some(Value::String(s)) => amount_from_str(s),
        _ => None,
    };

    InvoiceFields {
        invoice_number: text("invoice_number"),
        invoice_date: text("invoice_date").and_then(|d| parse_date(&d)),
        total_amount,
        currency: text("currency"),
    }
}

/// A plain decimal with either `.` or `,` as the mark; grouped figures such
/// as `"1 234,56"` go through the locale heuristics.
fn amount_from_str(s: &str) -> Option<Decimal> {
    let plain = s.trim().replace(',', ".");
    Decimal::from_str(&plain).ok().or_else(|| parse_amount(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> EnrichmentConfig {
        EnrichmentConfig {
            enabled: true,
            base_url: base_url.to_string(),
            timeout_secs: 5,
            ..EnrichmentConfig::default()
        }
    }

    #[test]
    fn reads_model_fields() {
        let f = fields_from_json(&json!({
            "invoice_number": "F-2024-001",
            "invoice_date": "2024-01-10",
            "total_amount": "1 234,56",
            "currency": "EUR",
            "vendor": "ignored"
        }));
        assert_eq!(f.invoice_number.as_deref(), Some("F-2024-001"));
        assert_eq!(f.invoice_date, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(f.total_amount, Some(Decimal::from_str("1234.56").unwrap()));
        assert_eq!(f.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn numeric_total_and_blank_values() {
        let f = fields_from_json(&json!({
            "invoice_number": "",
            "total_amount": 120.5,
            "invoice_date": null
        }));
        assert_eq!(f.invoice_number, None);
        assert_eq!(f.invoice_date, None);
        assert_eq!(f.total_amount, Some(Decimal::from_str("120.5").unwrap()));
    }

    #[test]
    fn string_totals_keep_every_decimal() {
        let total = |v: &str| fields_from_json(&json!({ "total_amount": v })).total_amount;
        assert_eq!(total("99.9"), Some(Decimal::from_str("99.9").unwrap()));
        assert_eq!(total("150,5"), Some(Decimal::from_str("150.5").unwrap()));
        assert_eq!(total(" 1234.567 "), Some(Decimal::from_str("1234.567").unwrap()));
        assert_eq!(total("1 234,56"), Some(Decimal::from_str("1234.56").unwrap()));
        assert_eq!(total("n/a"), None);
    }

    #[tokio::test]
    async fn noop_and_static() {
        assert!(NoopEnricher.enrich("anything").await.is_none());
        let fields = InvoiceFields {
            invoice_number: Some("X-1".into()),
            ..Default::default()
        };
        let e = StaticEnricher::new(fields.clone());
        assert_eq!(e.enrich("").await, Some(fields.clone()));
        assert_eq!(Some(e).enrich("").await, Some(fields));
        assert!(None::<StaticEnricher>.enrich("").await.is_none());
    }

    #[tokio::test]
    async fn ollama_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({
                "model": "mistral",
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "mistral",
                "response": "{\"invoice_number\": \"INV-042\", \"total_amount\": \"150,00\"}",
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let enricher = OllamaEnricher::new(&config(&server.uri())).unwrap();
        let fields = enricher.enrich("Facture INV-042").await.unwrap();
        assert_eq!(fields.invoice_number.as_deref(), Some("INV-042"));
        assert_eq!(fields.total_amount, Some(Decimal::from_str("150.00").unwrap()));
    }

    #[tokio::test]
    async fn ollama_non_json_output_is_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "Voici les champs : numéro INV-042"
            })))
            .mount(&server)
            .await;

        let enricher = OllamaEnricher::new(&config(&server.uri())).unwrap();
        assert!(enricher.enrich("Facture INV-042").await.is_none());
    }

    #[tokio::test]
    async fn ollama_server_error_is_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let enricher = OllamaEnricher::new(&config(&format!("{}/", server.uri()))).unwrap();
        assert!(enricher.enrich("text").await.is_none());
    }
}
