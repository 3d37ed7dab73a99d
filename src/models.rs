use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Date key (`YYYY-MM-DD`) to the record for that day.
pub type DailyRecords = BTreeMap<String, DailyRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProductStat {
    pub total_for_day: i64,
    pub delivered: i64,
    pub confirmed: i64,
    pub cancelled_company: i64,
    pub no_answer: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DailyRecord {
    #[serde(default)]
    pub products: BTreeMap<String, ProductStat>,
}

/// Everything the file store persists.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub daily: DailyRecords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CumulativeStats {
    pub orders: i64,
    pub delivered: i64,
    pub confirmed: i64,
    pub cancelled: i64,
    pub no_answer: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct Rates {
    pub success: f64,
    pub confirmation: f64,
    pub delivery_after_confirmation: f64,
    pub no_answer: f64,
    pub cancellation: f64,
}

#[derive(Debug, Deserialize)]
pub struct AddProductRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectProductRequest {
    pub product: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveStatRequest {
    pub date: String,
    pub product: Option<String>,
    pub stat: ProductStat,
}

#[derive(Debug, Default, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
    pub product: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub product: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub products: Vec<String>,
    pub selected: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayView {
    pub date: String,
    pub product: Option<String>,
    pub stat: ProductStat,
    pub yesterday_no_answer: i64,
}

/// Display strings for the statistics panel.
#[derive(Debug, Serialize, Deserialize)]
pub struct FormattedStats {
    pub orders: String,
    pub delivered: String,
    pub confirmed: String,
    pub cancelled: String,
    pub no_answer: String,
    pub success_rate: String,
    pub confirmation_rate: String,
    pub delivery_after_confirmation_rate: String,
    pub no_answer_rate: String,
    pub cancellation_rate: String,
}

#[derive(Debug, Serialize)]
pub struct StatsSummary {
    pub filter: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub totals: CumulativeStats,
    pub rates: Rates,
    pub formatted: FormattedStats,
}

/// Result of a mutating request, echoing the notification it raised.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}
