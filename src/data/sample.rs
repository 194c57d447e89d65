//! Synthetic dataset generation.
//!
//! Produces a raw-shaped dataset (companies + deals) that exercises the whole
//! normalizer: mixed amount encodings, alias-form cantons, a few confidential
//! rows, missing dates, and companies absent from the index. Deterministic for
//! a given seed so demos and golden tests are reproducible.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::LogNormal;

use crate::data::loader::{AmountValue, FlagValue, RawCompany, RawDataset, RawDeal};
use crate::error::AppError;

/// First year of the generated deal history.
const FIRST_YEAR: i32 = 2012;
/// Last year of the generated deal history.
const LAST_YEAR: i32 = 2024;

const INDUSTRIES: [&str; 8] = [
    "Biotech",
    "ICT",
    "ICT (Fintech)",
    "Medtech",
    "Cleantech",
    "Micro / Nano",
    "Healthcare IT",
    "Consumer Products",
];

/// Canton values as they appear in the wild: official names, alias spellings,
/// city names, and the occasional non-Swiss entry.
const CANTON_POOL: [(&str, u32); 13] = [
    ("Zürich", 28),
    ("Vaud", 16),
    ("Geneva", 11),
    ("Zug", 8),
    ("Basel-Stadt", 7),
    ("Basel-Land", 4),
    ("Bern", 6),
    ("Lausanne", 3),
    ("St. Gallen", 3),
    ("Lucerne", 3),
    ("Ticino", 2),
    ("Fribourg", 2),
    ("Abroad", 2),
];

const PHASES: [(&str, u32); 3] = [("Seed", 45), ("Early Stage", 35), ("Later Stage", 20)];

const NAME_STEMS: [&str; 10] = [
    "Alpen", "Helv", "Lema", "Rhein", "Jura", "Aare", "Glacier", "Matter", "Lim", "Ticino",
];
const NAME_TAILS: [&str; 10] = [
    "tech", "nova", "works", "labs", "genix", "scan", "pay", "sense", "metrics", "therapeutics",
];
const LEGAL_FORMS: [&str; 4] = [" AG", " SA", " GmbH", ""];

/// Generate a raw dataset with `deals` deal records.
pub fn generate_sample(seed: u64, deals: usize) -> Result<RawDataset, AppError> {
    let mut rng = StdRng::seed_from_u64(seed);

    // Deal sizes in CHF millions; median ~4m with a heavy right tail.
    let amount_dist = LogNormal::new(4.0_f64.ln(), 0.9)
        .map_err(|e| AppError::runtime(format!("Amount distribution error: {e}")))?;

    let n_companies = (deals / 2).max(1);
    let companies: Vec<RawCompany> = (0..n_companies)
        .map(|i| RawCompany {
            name: Some(company_name(&mut rng, i)),
            industry: Some(INDUSTRIES[rng.gen_range(0..INDUSTRIES.len())].to_string()),
            vertical: None,
            sector: None,
        })
        .collect();

    let mut raw_deals = Vec::with_capacity(deals);
    for i in 0..deals {
        // A small share of deals reference companies missing from the
        // companion dataset; their industry stays unresolved downstream.
        let company = if rng.gen_bool(0.08) {
            format!("Stealth Venture {i}")
        } else {
            companies[rng.gen_range(0..companies.len())]
                .name
                .clone()
                .unwrap_or_default()
        };

        raw_deals.push(RawDeal {
            company: Some(company),
            amount: sample_amount(&mut rng, &amount_dist),
            date: sample_date(&mut rng),
            canton: Some(weighted_pick(&mut rng, &CANTON_POOL).to_string()),
            phase: Some(weighted_pick(&mut rng, &PHASES).to_string()),
            gender: Some(if rng.gen_bool(0.12) { "Female" } else { "Male" }.to_string()),
            confidential: rng
                .gen_bool(0.04)
                .then(|| FlagValue::Text("TRUE".to_string())),
        });
    }

    Ok(RawDataset {
        companies,
        deals: raw_deals,
    })
}

fn company_name(rng: &mut StdRng, index: usize) -> String {
    let stem = NAME_STEMS[rng.gen_range(0..NAME_STEMS.len())];
    let tail = NAME_TAILS[rng.gen_range(0..NAME_TAILS.len())];
    let form = LEGAL_FORMS[rng.gen_range(0..LEGAL_FORMS.len())];
    // The index suffix keeps names unique without affecting matching.
    format!("{stem}{tail} {index}{form}")
}

/// Encode an amount the way real exports do: mostly numeric millions, some
/// base-currency strings with grouping marks, some "million" strings, and a
/// few missing values.
fn sample_amount(rng: &mut StdRng, dist: &LogNormal<f64>) -> Option<AmountValue> {
    let millions = (dist.sample(rng) * 10.0).round() / 10.0;
    match rng.gen_range(0..100) {
        0..60 => Some(AmountValue::Number(millions)),
        60..85 => {
            let units = (millions * 1_000_000.0).round() as u64;
            Some(AmountValue::Text(group_thousands(units)))
        }
        85..95 => Some(AmountValue::Text(format!("{millions} million CHF"))),
        _ => None,
    }
}

fn sample_date(rng: &mut StdRng) -> Option<String> {
    if rng.gen_bool(0.03) {
        return None;
    }
    // Weight later years more heavily (the market grew).
    let span = (LAST_YEAR - FIRST_YEAR) as f64;
    let offset = (rng.gen_range(0.0..1.0_f64).sqrt() * (span + 1.0)) as i32;
    let year = (FIRST_YEAR + offset).min(LAST_YEAR);

    if rng.gen_bool(0.02) {
        return Some(year.to_string());
    }
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=28);
    Some(format!("{year:04}-{month:02}-{day:02}"))
}

fn weighted_pick<'a>(rng: &mut StdRng, pool: &[(&'a str, u32)]) -> &'a str {
    let total: u32 = pool.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total);
    for &(value, weight) in pool {
        if roll < weight {
            return value;
        }
        roll -= weight;
    }
    pool[pool.len() - 1].0
}

/// Swiss-style `'` grouping, e.g. 5200000 -> "5'200'000".
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('\'');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::normalize_dataset;

    #[test]
    fn same_seed_reproduces_the_same_dataset() {
        let a = generate_sample(7, 50).unwrap();
        let b = generate_sample(7, 50).unwrap();
        assert_eq!(a.deals.len(), b.deals.len());
        for (left, right) in a.deals.iter().zip(&b.deals) {
            assert_eq!(left.company, right.company);
            assert_eq!(left.date, right.date);
            assert_eq!(left.canton, right.canton);
        }
    }

    #[test]
    fn grouping_marks_render_swiss_style() {
        assert_eq!(group_thousands(5_200_000), "5'200'000");
        assert_eq!(group_thousands(950), "950");
    }

    #[test]
    fn generated_data_survives_normalization_end_to_end() {
        let raw = generate_sample(42, 200).unwrap();
        let ingested = normalize_dataset(&raw);

        assert!(ingested.rows_used > 150);
        // The generator produces confidential rows, resolvable industries,
        // alias cantons, and rescalable amounts; all paths must fire.
        assert!(ingested.confidential_dropped > 0);
        assert!(ingested.amounts_rescaled > 0);
        assert!(ingested.deals.iter().any(|d| d.industry.is_some()));
        assert!(ingested.deals.iter().any(|d| d.canton.is_some()));
        assert!(ingested.stats.year_min.unwrap() >= FIRST_YEAR);
        assert!(ingested.stats.year_max.unwrap() <= LAST_YEAR);
    }
}
