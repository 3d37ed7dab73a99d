use crate::models::{
    CumulativeStats, DailyRecords, DayView, FormattedStats, ProductStat, Rates, StatsSummary,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Which products contribute to an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProductFilter {
    #[default]
    All,
    Product(String),
}

impl ProductFilter {
    /// `None`, an empty value and `"all"` select every product.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some("all") => Self::All,
            Some(name) => Self::Product(name.to_string()),
        }
    }

    pub fn matches(&self, product: &str) -> bool {
        match self {
            Self::All => true,
            Self::Product(name) => name == product,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Product(name) => name,
        }
    }
}

/// Inclusive range over `YYYY-MM-DD` keys. A missing bound is open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    pub fn new(start: Option<String>, end: Option<String>) -> Self {
        Self { start, end }
    }

    // ISO dates sort lexicographically in calendar order.
    pub fn contains(&self, date: &str) -> bool {
        if let Some(start) = &self.start {
            if date < start.as_str() {
                return false;
            }
        }
        if let Some(end) = &self.end {
            if date > end.as_str() {
                return false;
            }
        }
        true
    }
}

impl CumulativeStats {
    fn add(&mut self, stat: &ProductStat) {
        self.orders = self.orders.saturating_add(stat.total_for_day);
        self.delivered = self.delivered.saturating_add(stat.delivered);
        self.confirmed = self.confirmed.saturating_add(stat.confirmed);
        self.cancelled = self.cancelled.saturating_add(stat.cancelled_company);
        self.no_answer = self.no_answer.saturating_add(stat.no_answer);
    }
}

impl From<&CumulativeStats> for Rates {
    fn from(totals: &CumulativeStats) -> Self {
        Self {
            success: ratio(totals.delivered, totals.orders),
            confirmation: ratio(totals.confirmed, totals.orders),
            delivery_after_confirmation: ratio(totals.delivered, totals.confirmed),
            no_answer: ratio(totals.no_answer, totals.orders),
            cancellation: ratio(totals.cancelled, totals.orders),
        }
    }
}

fn ratio(numerator: i64, denominator: i64) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

/// Sums every counter of the records inside `range` whose product passes `filter`.
pub fn aggregate(
    records: &DailyRecords,
    filter: &ProductFilter,
    range: &DateRange,
) -> CumulativeStats {
    records
        .iter()
        .filter(|(date, _)| range.contains(date))
        .flat_map(|(_, record)| record.products.iter())
        .filter(|(product, _)| filter.matches(product))
        .fold(CumulativeStats::default(), |mut totals, (_, stat)| {
            totals.add(stat);
            totals
        })
}

pub fn summarize(records: &DailyRecords, filter: &ProductFilter, range: &DateRange) -> StatsSummary {
    let totals = aggregate(records, filter, range);
    let rates = Rates::from(&totals);

    StatsSummary {
        filter: filter.label().to_string(),
        start: range.start.clone(),
        end: range.end.clone(),
        formatted: FormattedStats {
            orders: format_number(totals.orders),
            delivered: format_number(totals.delivered),
            confirmed: format_number(totals.confirmed),
            cancelled: format_number(totals.cancelled),
            no_answer: format_number(totals.no_answer),
            success_rate: format_percent(rates.success),
            confirmation_rate: format_percent(rates.confirmation),
            delivery_after_confirmation_rate: format_percent(rates.delivery_after_confirmation),
            no_answer_rate: format_percent(rates.no_answer),
            cancellation_rate: format_percent(rates.cancellation),
        },
        totals,
        rates,
    }
}

/// Every product name present in any record, sorted. Names removed from the
/// catalog still show up here while their history exists.
pub fn historical_products(records: &DailyRecords) -> Vec<String> {
    records
        .values()
        .flat_map(|record| record.products.keys())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn stat_for(records: &DailyRecords, date: NaiveDate, product: &str) -> ProductStat {
    records
        .get(&date_key(date))
        .and_then(|record| record.products.get(product))
        .copied()
        .unwrap_or_default()
}

pub fn previous_no_answer(records: &DailyRecords, date: NaiveDate, product: &str) -> i64 {
    date.pred_opt()
        .map(|yesterday| stat_for(records, yesterday, product).no_answer)
        .unwrap_or(0)
}

pub fn day_view(records: &DailyRecords, date: NaiveDate, product: Option<&str>) -> DayView {
    let (stat, yesterday_no_answer) = match product {
        Some(product) => (
            stat_for(records, date, product),
            previous_no_answer(records, date, product),
        ),
        None => (ProductStat::default(), 0),
    };

    DayView {
        date: date_key(date),
        product: product.map(str::to_string),
        stat,
        yesterday_no_answer,
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Integer with `,` between thousands groups, e.g. `1,234,567`.
pub fn format_number(value: i64) -> String {
    let grouped = group_thousands(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Fraction rendered as a percentage with one decimal, e.g. `0.8667` -> `86.7%`.
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "0.0%".to_string();
    }

    // halves round away from zero, matching en-US percent formatting
    let tenths = (value * 1000.0).abs().round() / 10.0;
    let fixed = format!("{tenths:.1}");
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0"));
    let sign = if value < 0.0 && fixed != "0.0" { "-" } else { "" };
    format!("{sign}{}.{fraction}%", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
