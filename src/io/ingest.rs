//! Raw-record normalization.
//!
//! This module turns the heterogeneous company/deal records of the source
//! dataset into clean [`NormalizedDeal`]s that are safe to aggregate.
//!
//! Design goals:
//! - **Graceful degradation**: a malformed field degrades to `None`, a
//!   malformed record never aborts the batch
//! - **Row-level diagnostics** (report what happened, keep going)
//! - **Deterministic behavior** (fixed alias tables, fixed format lists)
//! - **Separation of concerns**: no aggregation logic here

use std::collections::HashMap;

use tracing::debug;

use crate::data::loader::{AmountValue, FlagValue, RawCompany, RawDataset};
use crate::domain::{Canton, NormalizedDeal};

/// Raw magnitudes above this are taken to be base-currency units and divided
/// by 1e6. Values between 10,000 and 1,000,000 are genuinely ambiguous under
/// this rule; it is preserved as-is from the source system, not "fixed".
const RESCALE_THRESHOLD: f64 = 10_000.0;

/// Legal-form suffixes ignored when matching company names.
const LEGAL_SUFFIXES: [&str; 7] = ["ag", "sa", "ltd", "inc", "corp", "gmbh", "llc"];

/// Summary stats about the deals that survived normalization.
#[derive(Debug, Clone, Default)]
pub struct DatasetStats {
    pub n_deals: usize,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    /// CHF millions across all normalized deals.
    pub total_volume: f64,
    pub companies_indexed: usize,
    /// Deals with no parseable funding-round date.
    pub yearless: usize,
    /// Deals whose company has no entry in the company index.
    pub unmatched_industry: usize,
}

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    /// 0-based index into the raw deal array.
    pub index: usize,
    pub company: Option<String>,
    pub message: String,
}

/// Ingest output: normalized deals + stats + row diagnostics.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub deals: Vec<NormalizedDeal>,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
    /// Confidential rows dropped before normalization.
    pub confidential_dropped: usize,
    /// Amounts rescaled from base-currency units by the magnitude heuristic.
    pub amounts_rescaled: usize,
}

/// Normalize a raw dataset.
///
/// Infallible by design: every malformed field degrades in place and is
/// reported through `row_errors`/counters instead of failing the run.
pub fn normalize_dataset(raw: &RawDataset) -> IngestedData {
    let index = CompanyIndex::build(&raw.companies);

    let mut deals = Vec::with_capacity(raw.deals.len());
    let mut row_errors = Vec::new();
    let mut confidential_dropped = 0usize;
    let mut amounts_rescaled = 0usize;

    for (idx, record) in raw.deals.iter().enumerate() {
        if is_confidential(record.confidential.as_ref()) {
            confidential_dropped += 1;
            continue;
        }

        let company = record
            .company
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let (year, quarter) = match record.date.as_deref().map(str::trim) {
            None | Some("") => (None, None),
            Some(text) => match parse_round_date(text) {
                Some((year, quarter)) => (Some(year), quarter),
                None => {
                    row_errors.push(RowError {
                        index: idx,
                        company: non_empty(&company),
                        message: format!("Unparseable funding-round date '{text}'."),
                    });
                    (None, None)
                }
            },
        };

        let amount = match record.amount.as_ref() {
            None => None,
            Some(value) => {
                let parsed = parse_amount(value);
                if parsed.rescaled {
                    amounts_rescaled += 1;
                }
                if parsed.value.is_none() && !value.is_blank() {
                    row_errors.push(RowError {
                        index: idx,
                        company: non_empty(&company),
                        message: format!("Non-numeric amount '{}'.", value.display()),
                    });
                }
                parsed.value
            }
        };

        let canton = record
            .canton
            .as_deref()
            .and_then(canton_from_raw);

        let industry = index.resolve(&company).map(str::to_string);

        deals.push(NormalizedDeal {
            company,
            year,
            quarter,
            amount,
            canton,
            industry,
            phase: record.phase.as_deref().and_then(non_empty),
            gender: record.gender.as_deref().and_then(non_empty),
        });
    }

    let stats = compute_stats(&deals, index.len());
    let rows_used = deals.len();

    debug!(
        rows_read = raw.deals.len(),
        rows_used,
        confidential_dropped,
        amounts_rescaled,
        row_errors = row_errors.len(),
        "normalized dataset"
    );

    IngestedData {
        deals,
        stats,
        row_errors,
        rows_read: raw.deals.len(),
        rows_used,
        confidential_dropped,
        amounts_rescaled,
    }
}

/// Company-name → industry lookup built from the companion company records.
///
/// Keys are lower-cased with whitespace and punctuation squashed out, plus a
/// legal-suffix-stripped variant per company. First entry wins on collisions.
pub struct CompanyIndex {
    industries: HashMap<String, String>,
}

impl CompanyIndex {
    pub fn build(companies: &[RawCompany]) -> Self {
        let mut industries = HashMap::new();

        for company in companies {
            let Some(name) = company.name.as_deref().and_then(non_empty) else {
                continue;
            };
            let Some(industry) = company.resolved_industry() else {
                continue;
            };

            let key = company_key(&name);
            if !key.is_empty() {
                industries.entry(key).or_insert_with(|| industry.clone());
            }
            if let Some(stripped) = suffix_stripped_key(&name) {
                industries.entry(stripped).or_insert(industry);
            }
        }

        Self { industries }
    }

    /// Resolve a deal's company name to an industry, if the company is known.
    pub fn resolve(&self, company: &str) -> Option<&str> {
        let key = company_key(company);
        if key.is_empty() {
            return None;
        }
        if let Some(industry) = self.industries.get(&key) {
            return Some(industry);
        }
        suffix_stripped_key(company)
            .and_then(|stripped| self.industries.get(&stripped))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.industries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.industries.is_empty()
    }
}

/// Outcome of amount parsing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedAmount {
    /// CHF millions.
    pub value: Option<f64>,
    /// Whether the magnitude heuristic divided by 1e6.
    pub rescaled: bool,
}

/// Parse a raw amount into CHF millions.
///
/// Strings are stripped of currency markers and grouping separators; an
/// explicit "million" marker pins the unit and bypasses the magnitude
/// heuristic. Plain magnitudes above [`RESCALE_THRESHOLD`] are treated as
/// base-currency units.
pub fn parse_amount(raw: &AmountValue) -> ParsedAmount {
    match raw {
        AmountValue::Number(n) => scale_amount(*n, false),
        AmountValue::Text(s) => {
            let lower = s.trim().to_lowercase();
            if lower.is_empty() {
                return ParsedAmount { value: None, rescaled: false };
            }
            let explicit_millions = lower.contains("million") || lower.contains("mio");
            match extract_number(&lower) {
                None => ParsedAmount { value: None, rescaled: false },
                Some(v) => scale_amount(v, explicit_millions),
            }
        }
    }
}

fn scale_amount(value: f64, explicit_millions: bool) -> ParsedAmount {
    if !value.is_finite() || value < 0.0 {
        return ParsedAmount { value: None, rescaled: false };
    }
    if !explicit_millions && value > RESCALE_THRESHOLD {
        ParsedAmount {
            value: Some(value / 1_000_000.0),
            rescaled: true,
        }
    } else {
        ParsedAmount {
            value: Some(value),
            rescaled: false,
        }
    }
}

/// Extract the first number from a string, skipping `'`/`,` grouping marks.
fn extract_number(s: &str) -> Option<f64> {
    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;
    while i < chars.len() && !chars[i].is_ascii_digit() {
        i += 1;
    }
    if i == chars.len() {
        return None;
    }

    let mut out = String::new();
    while i < chars.len() {
        let c = chars[i];
        let next_is_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
        if c.is_ascii_digit() {
            out.push(c);
        } else if c == '.' && next_is_digit && !out.contains('.') {
            out.push('.');
        } else if (c == '\'' || c == ',') && next_is_digit {
            // Grouping separator.
        } else {
            break;
        }
        i += 1;
    }

    out.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Accepted funding-round date formats, tried in order.
///
/// ISO first; the dotted and slashed day-first forms are common in Swiss
/// exports. A bare 4-digit year degrades to a year without a quarter.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d"];

/// Parse a funding-round date into `(year, quarter)`.
pub fn parse_round_date(s: &str) -> Option<(i32, Option<u8>)> {
    use chrono::Datelike;

    for fmt in DATE_FORMATS {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(s, fmt) {
            let quarter = (date.month0() / 3) as u8 + 1;
            return Some((date.year(), Some(quarter)));
        }
    }

    // Year-only values keep the record in year-bucketed views.
    if let Ok(year) = s.parse::<i32>() {
        if (1900..=2100).contains(&year) {
            return Some((year, None));
        }
    }

    None
}

/// Alias table for canton values that are not official names/codes.
///
/// Entries mapped to `None` are explicit exclusions (non-Swiss locations).
/// Keys are lowercase. Anything that matches neither an official name nor an
/// alias normalizes to `None` and is shown as "Unknown"; it is never coerced
/// to a real canton.
const CANTON_ALIASES: &[(&str, Option<Canton>)] = &[
    ("basel-land", Some(Canton::BaselLandschaft)),
    ("basel land", Some(Canton::BaselLandschaft)),
    ("baselland", Some(Canton::BaselLandschaft)),
    ("basel", Some(Canton::BaselStadt)),
    ("basel-city", Some(Canton::BaselStadt)),
    ("genève", Some(Canton::Geneva)),
    ("geneve", Some(Canton::Geneva)),
    ("genf", Some(Canton::Geneva)),
    ("zurich", Some(Canton::Zurich)),
    ("zuerich", Some(Canton::Zurich)),
    ("winterthur", Some(Canton::Zurich)),
    ("berne", Some(Canton::Bern)),
    ("biel", Some(Canton::Bern)),
    ("bienne", Some(Canton::Bern)),
    ("luzern", Some(Canton::Lucerne)),
    ("grisons", Some(Canton::Graubuenden)),
    ("graubuenden", Some(Canton::Graubuenden)),
    ("neuchatel", Some(Canton::Neuchatel)),
    ("freiburg", Some(Canton::Fribourg)),
    ("wallis", Some(Canton::Valais)),
    ("sion", Some(Canton::Valais)),
    ("waadt", Some(Canton::Vaud)),
    ("lausanne", Some(Canton::Vaud)),
    ("nyon", Some(Canton::Vaud)),
    ("tessin", Some(Canton::Ticino)),
    ("lugano", Some(Canton::Ticino)),
    ("st gallen", Some(Canton::StGallen)),
    ("st.gallen", Some(Canton::StGallen)),
    ("sankt gallen", Some(Canton::StGallen)),
    ("abroad", None),
    ("foreign", None),
    ("ausland", None),
    ("international", None),
    ("unknown", None),
];

/// Resolve a free-text canton value.
pub fn canton_from_raw(raw: &str) -> Option<Canton> {
    if let Some(canton) = Canton::from_official(raw) {
        return Some(canton);
    }
    let key = raw.trim().to_lowercase();
    CANTON_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .and_then(|&(_, canton)| canton)
}

fn is_confidential(flag: Option<&FlagValue>) -> bool {
    match flag {
        Some(FlagValue::Bool(b)) => *b,
        Some(FlagValue::Text(s)) => s.trim().eq_ignore_ascii_case("true"),
        None => false,
    }
}

/// Lower-cased name with whitespace and punctuation squashed out.
fn company_key(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Key variant with a trailing legal-form token removed, when one exists.
fn suffix_stripped_key(name: &str) -> Option<String> {
    let lower = name.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let last = tokens.last()?;
    if tokens.len() < 2 || !LEGAL_SUFFIXES.contains(last) {
        return None;
    }
    Some(tokens[..tokens.len() - 1].concat())
}

fn compute_stats(deals: &[NormalizedDeal], companies_indexed: usize) -> DatasetStats {
    let mut stats = DatasetStats {
        n_deals: deals.len(),
        companies_indexed,
        ..DatasetStats::default()
    };

    for deal in deals {
        match deal.year {
            Some(year) => {
                stats.year_min = Some(stats.year_min.map_or(year, |y| y.min(year)));
                stats.year_max = Some(stats.year_max.map_or(year, |y| y.max(year)));
            }
            None => stats.yearless += 1,
        }
        if deal.industry.is_none() {
            stats.unmatched_industry += 1;
        }
        stats.total_volume += deal.amount.unwrap_or(0.0);
    }

    stats.total_volume = (stats.total_volume * 10.0).round() / 10.0;
    stats
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::RawDeal;

    fn text_amount(s: &str) -> AmountValue {
        AmountValue::Text(s.to_string())
    }

    #[test]
    fn amount_heuristic_rescales_base_currency_units() {
        let parsed = parse_amount(&text_amount("5200000"));
        assert_eq!(parsed.value, Some(5.2));
        assert!(parsed.rescaled);
    }

    #[test]
    fn amount_in_millions_passes_through() {
        let parsed = parse_amount(&text_amount("5.2"));
        assert_eq!(parsed.value, Some(5.2));
        assert!(!parsed.rescaled);
    }

    #[test]
    fn amount_with_million_suffix_skips_the_heuristic() {
        let parsed = parse_amount(&text_amount("5.2 million CHF"));
        assert_eq!(parsed.value, Some(5.2));
        assert!(!parsed.rescaled);
    }

    #[test]
    fn amount_with_currency_and_grouping_marks() {
        assert_eq!(parse_amount(&text_amount("CHF 5'200'000")).value, Some(5.2));
        assert_eq!(parse_amount(&text_amount("12,500,000")).value, Some(12.5));
    }

    #[test]
    fn numeric_amounts_use_the_same_heuristic() {
        assert_eq!(parse_amount(&AmountValue::Number(7_000_000.0)).value, Some(7.0));
        assert_eq!(parse_amount(&AmountValue::Number(7.5)).value, Some(7.5));
    }

    #[test]
    fn unparseable_amount_degrades_to_none() {
        assert_eq!(parse_amount(&text_amount("undisclosed")).value, None);
        assert_eq!(parse_amount(&AmountValue::Number(-3.0)).value, None);
    }

    #[test]
    fn date_formats_and_quarters() {
        assert_eq!(parse_round_date("2020-03-15"), Some((2020, Some(1))));
        assert_eq!(parse_round_date("15.11.2019"), Some((2019, Some(4))));
        assert_eq!(parse_round_date("01/07/2021"), Some((2021, Some(3))));
        assert_eq!(parse_round_date("2020"), Some((2020, None)));
        assert_eq!(parse_round_date("soon"), None);
    }

    #[test]
    fn canton_resolution_scenarios() {
        assert_eq!(canton_from_raw("Basel-Land"), Some(Canton::BaselLandschaft));
        assert_eq!(canton_from_raw("Lausanne"), Some(Canton::Vaud));
        assert_eq!(canton_from_raw("Vaud"), Some(Canton::Vaud));
        assert_eq!(canton_from_raw("Abroad"), None);
        assert_eq!(canton_from_raw("Atlantis"), None);
    }

    #[test]
    fn company_index_matches_ignoring_case_punctuation_and_suffix() {
        let companies = vec![
            RawCompany {
                name: Some("Helvetica Bio AG".to_string()),
                industry: Some("Biotech".to_string()),
                vertical: None,
                sector: None,
            },
            RawCompany {
                name: Some("Alpine-Pay".to_string()),
                industry: None,
                vertical: Some("Fintech".to_string()),
                sector: None,
            },
        ];
        let index = CompanyIndex::build(&companies);

        assert_eq!(index.resolve("helvetica bio"), Some("Biotech"));
        assert_eq!(index.resolve("Helvetica Bio AG"), Some("Biotech"));
        assert_eq!(index.resolve("HELVETICA-BIO ag"), Some("Biotech"));
        assert_eq!(index.resolve("Alpine Pay GmbH"), Some("Fintech"));
        assert_eq!(index.resolve("Unseen Startup"), None);
    }

    #[test]
    fn confidential_deals_never_enter_the_output() {
        let raw = RawDataset {
            companies: Vec::new(),
            deals: vec![
                RawDeal {
                    company: Some("Open Co".to_string()),
                    date: Some("2020-01-10".to_string()),
                    amount: Some(AmountValue::Number(2.0)),
                    confidential: Some(FlagValue::Text("TRUE".to_string())),
                    ..RawDeal::default()
                },
                RawDeal {
                    company: Some("Public Co".to_string()),
                    date: Some("2020-05-10".to_string()),
                    amount: Some(AmountValue::Number(3.0)),
                    confidential: Some(FlagValue::Bool(false)),
                    ..RawDeal::default()
                },
            ],
        };

        let ingested = normalize_dataset(&raw);
        assert_eq!(ingested.confidential_dropped, 1);
        assert_eq!(ingested.deals.len(), 1);
        assert_eq!(ingested.deals[0].company, "Public Co");
    }

    #[test]
    fn malformed_fields_degrade_and_are_reported() {
        let raw = RawDataset {
            companies: Vec::new(),
            deals: vec![RawDeal {
                company: Some("Glitch AG".to_string()),
                date: Some("sometime in spring".to_string()),
                amount: Some(text_amount("n/a")),
                canton: Some("Mars".to_string()),
                ..RawDeal::default()
            }],
        };

        let ingested = normalize_dataset(&raw);
        assert_eq!(ingested.deals.len(), 1);
        let deal = &ingested.deals[0];
        assert_eq!(deal.year, None);
        assert_eq!(deal.amount, None);
        assert_eq!(deal.canton, None);
        // One error for the date, one for the amount.
        assert_eq!(ingested.row_errors.len(), 2);
        assert_eq!(ingested.stats.yearless, 1);
    }

    #[test]
    fn stats_cover_year_span_and_volume() {
        let raw = RawDataset {
            companies: Vec::new(),
            deals: vec![
                RawDeal {
                    company: Some("A".to_string()),
                    date: Some("2018-02-01".to_string()),
                    amount: Some(AmountValue::Number(1.5)),
                    ..RawDeal::default()
                },
                RawDeal {
                    company: Some("B".to_string()),
                    date: Some("2021-09-01".to_string()),
                    amount: Some(AmountValue::Number(4.0)),
                    ..RawDeal::default()
                },
            ],
        };

        let stats = normalize_dataset(&raw).stats;
        assert_eq!(stats.year_min, Some(2018));
        assert_eq!(stats.year_max, Some(2021));
        assert_eq!(stats.total_volume, 5.5);
        assert_eq!(stats.unmatched_industry, 2);
    }
}
