//! Response assembly
//!
//! Turns an upstream snapshot plus a freshness verdict into the status code
//! and JSON body a caller relays to its own clients.

use crate::freshness::{self, CanonicalInstant, Fresh, Rejection};
use crate::nse::{IndexRow, IndexSnapshot};
use crate::telemetry::ScanOutcome;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Serialize;

/// Message of the upstream failure body
pub const FETCH_FAILED: &str = "Failed to fetch data";

/// Per-symbol fields of a relayed snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolQuote {
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub open: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub day_high: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub day_low: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub last_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub previous_close: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub change: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub p_change: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub total_traded_volume: Option<Decimal>,
    pub last_update_time: Option<String>,
}

impl From<IndexRow> for SymbolQuote {
    fn from(row: IndexRow) -> Self {
        Self {
            symbol: row.symbol,
            open: row.open,
            day_high: row.day_high,
            day_low: row.day_low,
            last_price: row.last_price,
            previous_close: row.previous_close,
            change: row.change,
            p_change: row.p_change,
            total_traded_volume: row.total_traded_volume,
            last_update_time: row.last_update_time,
        }
    }
}

/// Normalized description of a snapshot that passed validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    /// Vendor update time in IST
    pub ts_ist: CanonicalInstant,
    pub age_seconds: u64,
    /// When the scan ran, in IST
    pub scan_time: CanonicalInstant,
    pub index: Option<String>,
    /// Constituents only; the index's own row is reported separately
    pub symbol_count: usize,
    pub index_quote: Option<SymbolQuote>,
    pub symbols: Vec<SymbolQuote>,
}

impl ScanReport {
    pub fn new(snapshot: IndexSnapshot, fresh: Fresh, scan_time: &CanonicalInstant) -> Self {
        let IndexSnapshot { name, data, .. } = snapshot;

        let mut index_quote = None;
        let mut symbols = Vec::with_capacity(data.len());
        for row in data {
            if index_quote.is_none() && name.as_deref() == Some(row.symbol.as_str()) {
                index_quote = Some(SymbolQuote::from(row));
            } else {
                symbols.push(SymbolQuote::from(row));
            }
        }

        Self {
            ts_ist: fresh.ts_ist,
            age_seconds: fresh.age_seconds,
            scan_time: scan_time.clone(),
            index: name,
            symbol_count: symbols.len(),
            index_quote,
            symbols,
        }
    }
}

/// Outcome of one scan as seen by an HTTP layer
#[derive(Debug, Clone, PartialEq)]
pub enum ScanResponse {
    /// 200 with the normalized snapshot
    Fresh(ScanReport),
    /// 412 with the reason-coded rejection
    Rejected(Rejection),
    /// 500, upstream could not be fetched
    UpstreamFailed { details: String },
}

impl From<&Rejection> for ScanOutcome {
    fn from(rejection: &Rejection) -> Self {
        match rejection {
            Rejection::WrongDate { .. } => ScanOutcome::WrongDate,
            Rejection::DataTooOld { .. } => ScanOutcome::DataTooOld,
        }
    }
}

#[derive(Serialize)]
struct Tagged<'a, T: Serialize> {
    ok: bool,
    #[serde(flatten)]
    inner: &'a T,
}

/// JSON object of `inner` with an `ok` flag alongside its fields
pub fn tagged_body<T: Serialize>(ok: bool, inner: &T) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(Tagged { ok, inner })
}

/// Status and tagged body for a validator result
pub fn assessment_body(
    assessment: &Result<Fresh, Rejection>,
) -> serde_json::Result<(StatusCode, serde_json::Value)> {
    match assessment {
        Ok(fresh) => Ok((StatusCode::OK, tagged_body(true, fresh)?)),
        Err(rejection) => Ok((StatusCode::PRECONDITION_FAILED, tagged_body(false, rejection)?)),
    }
}

#[derive(Serialize)]
struct FailureBody<'a> {
    error: &'static str,
    details: &'a str,
}

impl ScanResponse {
    /// Validate `snapshot` against `now` and assemble the response
    pub fn assemble(snapshot: IndexSnapshot, now: &CanonicalInstant, max_age_seconds: u64) -> Self {
        match freshness::assess(snapshot.timestamp.as_deref(), now, max_age_seconds) {
            Ok(fresh) => ScanResponse::Fresh(ScanReport::new(snapshot, fresh, now)),
            Err(rejection) => ScanResponse::Rejected(rejection),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ScanResponse::Fresh(_) => StatusCode::OK,
            ScanResponse::Rejected(_) => StatusCode::PRECONDITION_FAILED,
            ScanResponse::UpstreamFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn outcome(&self) -> ScanOutcome {
        match self {
            ScanResponse::Fresh(_) => ScanOutcome::Fresh,
            ScanResponse::Rejected(rejection) => ScanOutcome::from(rejection),
            ScanResponse::UpstreamFailed { .. } => ScanOutcome::UpstreamError,
        }
    }

    /// JSON body for the HTTP layer
    pub fn body(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            ScanResponse::Fresh(report) => tagged_body(true, report),
            ScanResponse::Rejected(rejection) => tagged_body(false, rejection),
            ScanResponse::UpstreamFailed { details } => serde_json::to_value(FailureBody {
                error: FETCH_FAILED,
                details,
            }),
        }
    }
}
