//! Raw dataset loading.
//!
//! The source document is a single JSON file with optional top-level
//! `Companies` and `Deals` arrays. Older exports are a bare deal array; those
//! are accepted and treated as `Deals` with an empty company list.
//!
//! Records are heterogeneous: field names vary, numbers and booleans arrive
//! as strings, and most fields can be absent. The serde types here absorb
//! that variance so the normalizer can work on one shape.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::domain::DataSource;
use crate::error::AppError;

/// Environment variable naming the default dataset (path or URL).
pub const DATA_ENV_VAR: &str = "VC_PULSE_DATA";

/// An amount that may arrive as a JSON number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountValue {
    Number(f64),
    Text(String),
}

impl AmountValue {
    pub fn is_blank(&self) -> bool {
        match self {
            AmountValue::Number(_) => false,
            AmountValue::Text(s) => s.trim().is_empty(),
        }
    }

    /// Raw value for diagnostics.
    pub fn display(&self) -> String {
        match self {
            AmountValue::Number(n) => n.to_string(),
            AmountValue::Text(s) => s.clone(),
        }
    }
}

/// A boolean-like flag that may arrive as a JSON bool or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

/// A raw company record from the companion dataset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCompany {
    #[serde(rename = "Title", alias = "Company", alias = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Industry")]
    pub industry: Option<String>,
    #[serde(rename = "Vertical")]
    pub vertical: Option<String>,
    #[serde(rename = "Sector")]
    pub sector: Option<String>,
}

impl RawCompany {
    /// First non-empty of `Industry`/`Vertical`/`Sector`.
    pub fn resolved_industry(&self) -> Option<String> {
        [&self.industry, &self.vertical, &self.sector]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// A raw deal record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDeal {
    #[serde(rename = "Company", alias = "Startup", alias = "Title")]
    pub company: Option<String>,
    #[serde(rename = "Amount")]
    pub amount: Option<AmountValue>,
    #[serde(rename = "Date of the funding round", alias = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Canton")]
    pub canton: Option<String>,
    #[serde(rename = "Phase", alias = "Investment Phase")]
    pub phase: Option<String>,
    #[serde(rename = "Gender CEO", alias = "Gender")]
    pub gender: Option<String>,
    #[serde(rename = "Confidential")]
    pub confidential: Option<FlagValue>,
}

/// The parsed source document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDataset {
    #[serde(rename = "Companies", alias = "companies")]
    pub companies: Vec<RawCompany>,
    #[serde(rename = "Deals", alias = "deals")]
    pub deals: Vec<RawDeal>,
}

/// Load the raw dataset for a configured source.
pub fn load_dataset(source: &DataSource) -> Result<RawDataset, AppError> {
    match source {
        DataSource::Path(path) => load_from_path(path),
        DataSource::Url(url) => load_from_url(url),
        DataSource::Sample { seed, deals } => crate::data::sample::generate_sample(*seed, *deals),
    }
}

/// Resolve the default source from the environment (`.env` supported).
pub fn source_from_env() -> Option<DataSource> {
    dotenvy::dotenv().ok();
    let value = std::env::var(DATA_ENV_VAR).ok()?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return None;
    }
    Some(if is_url(&value) {
        DataSource::Url(value)
    } else {
        DataSource::Path(value.into())
    })
}

pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn load_from_path(path: &Path) -> Result<RawDataset, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::usage(format!("Failed to read dataset '{}': {e}", path.display())))?;
    parse_document(&text)
        .map_err(|e| AppError::usage(format!("Invalid dataset JSON '{}': {e}", path.display())))
}

fn load_from_url(url: &str) -> Result<RawDataset, AppError> {
    let resp = reqwest::blocking::Client::new()
        .get(url)
        .send()
        .map_err(|e| AppError::runtime(format!("Dataset request failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(AppError::runtime(format!(
            "Dataset request failed with status {}.",
            resp.status()
        )));
    }

    let text = resp
        .text()
        .map_err(|e| AppError::runtime(format!("Failed to read dataset response: {e}")))?;
    parse_document(&text).map_err(|e| AppError::usage(format!("Invalid dataset JSON from '{url}': {e}")))
}

/// Parse the document, accommodating both accepted top-level shapes.
pub fn parse_document(text: &str) -> Result<RawDataset, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(text)?;

    let dataset = match value {
        // Bare-array exports predate the Companies/Deals envelope.
        serde_json::Value::Array(_) => RawDataset {
            companies: Vec::new(),
            deals: serde_json::from_value(value)?,
        },
        other => serde_json::from_value(other)?,
    };

    debug!(
        companies = dataset.companies.len(),
        deals = dataset.deals.len(),
        "parsed dataset document"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_enveloped_document_shape() {
        let doc = r#"{
            "Companies": [{"Title": "Helvetica Bio AG", "Industry": "Biotech"}],
            "Deals": [{"Company": "Helvetica Bio AG", "Amount": "5200000",
                       "Date of the funding round": "2020-03-15", "Canton": "Basel-Land"}]
        }"#;
        let dataset = parse_document(doc).unwrap();
        assert_eq!(dataset.companies.len(), 1);
        assert_eq!(dataset.deals.len(), 1);
        assert_eq!(dataset.deals[0].company.as_deref(), Some("Helvetica Bio AG"));
    }

    #[test]
    fn bare_array_documents_become_deals() {
        let doc = r#"[{"Company": "Solo", "Amount": 3.5}]"#;
        let dataset = parse_document(doc).unwrap();
        assert!(dataset.companies.is_empty());
        assert_eq!(dataset.deals.len(), 1);
        match dataset.deals[0].amount.as_ref().unwrap() {
            AmountValue::Number(n) => assert_eq!(*n, 3.5),
            AmountValue::Text(_) => panic!("expected numeric amount"),
        }
    }

    #[test]
    fn company_industry_falls_back_through_vertical_and_sector() {
        let company = RawCompany {
            name: Some("X".to_string()),
            industry: Some("  ".to_string()),
            vertical: Some("Fintech".to_string()),
            sector: Some("Ignored".to_string()),
        };
        assert_eq!(company.resolved_industry().as_deref(), Some("Fintech"));
    }

    #[test]
    fn confidential_flag_accepts_bool_and_string_forms() {
        let doc = r#"[{"Company": "A", "Confidential": true},
                      {"Company": "B", "Confidential": "TRUE"},
                      {"Company": "C", "Confidential": "false"}]"#;
        let dataset = parse_document(doc).unwrap();
        let flags: Vec<bool> = dataset
            .deals
            .iter()
            .map(|d| match d.confidential.as_ref() {
                Some(FlagValue::Bool(b)) => *b,
                Some(FlagValue::Text(s)) => s.eq_ignore_ascii_case("true"),
                None => false,
            })
            .collect();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[test]
    fn url_detection() {
        assert!(is_url("https://example.org/data.json"));
        assert!(!is_url("data/startups.json"));
    }
}
