//! Values computed at generation time.
//!
//! These form the lowest-precedence layer of the merged map: any context or
//! document file that defines the same key wins.

use chrono::{Datelike, Months, NaiveDate};

use super::{FactMap, FactValue};

/// Full date, e.g. `29 de Janeiro de 2026`.
pub const CURRENT_DATE_KEY: &str = "@DataAtual";
/// Reference month of the latest published construction cost index, e.g. `Dezembro/2025`.
pub const CUB_REFERENCE_KEY: &str = "@ReferenciaCUB";
/// Download link of the reference month's index bulletin.
pub const CUB_LINK_KEY: &str = "@LinkCUB";

const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

// Used in URLs, so no diacritics
const MONTH_SLUGS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "marco",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

fn month_index(date: NaiveDate) -> usize {
    date.month0() as usize
}

/// `29 de Janeiro de 2026`
pub fn full_date(date: NaiveDate) -> String {
    format!("{} de {} de {}", date.day(), MONTH_NAMES[month_index(date)], date.year())
}

/// The month whose index is the latest available on `today`: the previous one.
pub fn reference_month(today: NaiveDate) -> NaiveDate {
    today
        .with_day(1)
        .and_then(|first| first.checked_sub_months(Months::new(1)))
        .unwrap_or(today)
}

/// `Dezembro/2025`
pub fn reference_label(today: NaiveDate) -> String {
    let reference = reference_month(today);
    format!("{}/{}", MONTH_NAMES[month_index(reference)], reference.year())
}

/// `{base}/cub-dezembro-2025.pdf`
pub fn reference_link(today: NaiveDate, base_url: &str) -> String {
    let reference = reference_month(today);
    format!(
        "{}/cub-{}-{}.pdf",
        base_url.trim_end_matches('/'),
        MONTH_SLUGS[month_index(reference)],
        reference.year()
    )
}

/// Build the system layer for a generation on `today`.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use docfill::facts::system_variables;
///
/// let today = NaiveDate::from_ymd_opt(2026, 1, 29).unwrap();
/// let vars = system_variables(today, "https://example.com/cub");
///
/// assert_eq!(vars["@DataAtual"].to_string(), "29 de Janeiro de 2026");
/// assert_eq!(vars["@ReferenciaCUB"].to_string(), "Dezembro/2025");
/// assert_eq!(vars["@LinkCUB"].to_string(), "https://example.com/cub/cub-dezembro-2025.pdf");
/// ```
pub fn system_variables(today: NaiveDate, cub_base_url: &str) -> FactMap {
    let mut vars = FactMap::new();
    vars.insert(CURRENT_DATE_KEY.to_string(), FactValue::Text(full_date(today)));
    vars.insert(CUB_REFERENCE_KEY.to_string(), FactValue::Text(reference_label(today)));
    vars.insert(CUB_LINK_KEY.to_string(), FactValue::Text(reference_link(today, cub_base_url)));
    vars
}
