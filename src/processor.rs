use crate::config;
use crate::models::{OptionChain, OptionData, OptionDetail};
use serde::{Serialize, Serializer};
use std::collections::HashSet;

/// Option side with the extremal flags for the displayed window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedOptionDetail {
    #[serde(flatten)]
    pub base: OptionDetail,

    #[serde(rename = "isHighestOI")]
    pub is_highest_oi: bool,

    #[serde(rename = "isHighestChangeOI")]
    pub is_highest_change_oi: bool,
}

/// One strike of the displayed window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRow {
    #[serde(rename = "strikePrice")]
    pub strike_price: f64,

    #[serde(rename = "expiryDate", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,

    #[serde(rename = "isCurrentStrike")]
    pub is_current_strike: bool,

    #[serde(rename = "CE")]
    pub call: ProcessedOptionDetail,

    #[serde(rename = "PE")]
    pub put: ProcessedOptionDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    #[serde(rename = "callOI")]
    pub call_oi: f64,

    #[serde(rename = "callChangeOI")]
    pub call_change_oi: f64,

    #[serde(rename = "putOI")]
    pub put_oi: f64,

    #[serde(rename = "putChangeOI")]
    pub put_change_oi: f64,
}

/// Spot price plus reference prices read positionally from `strikePrices`.
///
/// `open`, `high` and `prev_close` are NOT market OHLC. They are the first,
/// last and middle entries of the strike list, falling back to the spot
/// price, and are kept that way for compatibility with the existing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    #[serde(rename = "currentPrice")]
    pub current_price: Option<f64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    #[serde(rename = "prevClose")]
    pub prev_close: Option<f64>,
}

/// Metrics only computed when the window has rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Derived {
    pub pcr: String,
    pub support: String,
    pub resistance: String,
    #[serde(rename = "marketData")]
    pub market: MarketSnapshot,
}

/// Everything the page and the table fragment render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    #[serde(rename = "filteredData")]
    pub rows: Vec<ViewRow>,

    #[serde(serialize_with = "totals_or_empty_object")]
    pub totals: Option<Totals>,

    #[serde(flatten)]
    pub derived: Option<Derived>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ViewModel {
    /// The "no data" view: no rows, no totals, no metrics.
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            totals: None,
            derived: None,
            timestamp: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the display model from a raw option chain.
///
/// Absent payload, absent `records`/`records.data`, or no strike with both
/// sides all give [`ViewModel::empty`]. Never panics on malformed input.
pub fn build_view_model(raw: Option<&OptionChain>) -> ViewModel {
    let Some(records) = raw.and_then(|chain| chain.records.as_ref()) else {
        return ViewModel::empty();
    };
    let Some(data) = records.data.as_deref() else {
        return ViewModel::empty();
    };

    // Step 1: complete strikes, first occurrence wins
    let all_data = dedupe_complete(data);
    if all_data.is_empty() {
        return ViewModel::empty();
    }

    // Step 2: anchor on the strike closest to spot
    let underlying_value = records.underlying_value;
    let atm_strike = underlying_value.and_then(|uv| find_atm_strike(&all_data, uv));
    let atm_index = atm_strike.and_then(|strike| {
        all_data.iter().position(|entry| entry.strike_price == strike)
    });

    // Step 3: fixed radius window around it
    let (start, end) = window_bounds(atm_index, all_data.len());
    let window = &all_data[start..end];

    // Step 4-7: flags and aggregates over the window only
    let rows = flag_rows(window, atm_strike);
    let totals = calculate_totals(window);
    let derived = Derived {
        pcr: calculate_pcr(&totals),
        support: calculate_support(window),
        resistance: calculate_resistance(window),
        market: market_snapshot(underlying_value, records.strike_prices.as_deref()),
    };

    ViewModel {
        rows,
        totals: Some(totals),
        derived: Some(derived),
        timestamp: records.timestamp.clone(),
    }
}

/// A strike with both sides present
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompleteEntry<'a> {
    pub strike_price: f64,
    pub expiry_date: Option<&'a str>,
    pub call: &'a OptionDetail,
    pub put: &'a OptionDetail,
}

impl<'a> CompleteEntry<'a> {
    pub fn from_option_data(opt: &'a OptionData) -> Option<Self> {
        match (opt.strike_price, &opt.call, &opt.put) {
            (Some(strike_price), Some(call), Some(put)) => Some(Self {
                strike_price,
                expiry_date: opt.expiry_date.as_deref(),
                call,
                put,
            }),
            _ => None,
        }
    }
}

/// Keep entries with strike, CE and PE, dropping repeated strikes.
pub fn dedupe_complete(data: &[OptionData]) -> Vec<CompleteEntry<'_>> {
    let mut seen = HashSet::new();

    data.iter()
        .filter_map(CompleteEntry::from_option_data)
        .filter(|entry| seen.insert(entry.strike_price.to_bits()))
        .collect()
}

/// Strike closest to `underlying_value`; on a tie the earlier entry wins.
pub fn find_atm_strike(data: &[CompleteEntry], underlying_value: f64) -> Option<f64> {
    let mut closest_strike = None;
    let mut min_distance = f64::MAX;

    for entry in data {
        let distance = (entry.strike_price - underlying_value).abs();
        if distance < min_distance {
            min_distance = distance;
            closest_strike = Some(entry.strike_price);
        }
    }

    closest_strike
}

/// Half-open `[start, end)` range of the display window.
///
/// Without an anchor the window starts at the first strike and holds
/// `WINDOW_RADIUS` rows.
pub fn window_bounds(atm_index: Option<usize>, len: usize) -> (usize, usize) {
    match atm_index {
        Some(idx) => (
            idx.saturating_sub(config::WINDOW_RADIUS),
            (idx + config::WINDOW_RADIUS + 1).min(len),
        ),
        None => (0, config::WINDOW_RADIUS.min(len)),
    }
}

fn max_of<F>(window: &[CompleteEntry], value: F) -> f64
where
    F: Fn(&CompleteEntry) -> f64,
{
    window
        .iter()
        .map(value)
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Mark the current strike and every row holding a side's maximum.
pub fn flag_rows(window: &[CompleteEntry], atm_strike: Option<f64>) -> Vec<ViewRow> {
    let highest_call_oi = max_of(window, |e| e.call.open_interest);
    let highest_call_change_oi = max_of(window, |e| e.call.change_in_oi);
    let highest_put_oi = max_of(window, |e| e.put.open_interest);
    let highest_put_change_oi = max_of(window, |e| e.put.change_in_oi);

    window
        .iter()
        .map(|entry| ViewRow {
            strike_price: entry.strike_price,
            expiry_date: entry.expiry_date.map(str::to_string),
            is_current_strike: atm_strike == Some(entry.strike_price),
            call: ProcessedOptionDetail {
                base: entry.call.clone(),
                is_highest_oi: entry.call.open_interest == highest_call_oi,
                is_highest_change_oi: entry.call.change_in_oi == highest_call_change_oi,
            },
            put: ProcessedOptionDetail {
                base: entry.put.clone(),
                is_highest_oi: entry.put.open_interest == highest_put_oi,
                is_highest_change_oi: entry.put.change_in_oi == highest_put_change_oi,
            },
        })
        .collect()
}

pub fn calculate_totals(window: &[CompleteEntry]) -> Totals {
    window.iter().fold(Totals::default(), |mut acc, entry| {
        acc.call_oi += entry.call.open_interest;
        acc.call_change_oi += entry.call.change_in_oi;
        acc.put_oi += entry.put.open_interest;
        acc.put_change_oi += entry.put.change_in_oi;
        acc
    })
}

/// Put-call ratio, or the sentinel when there is no call OI
pub fn calculate_pcr(totals: &Totals) -> String {
    if totals.call_oi > 0.0 {
        format!("{:.2}", totals.put_oi / totals.call_oi)
    } else {
        config::NOT_AVAILABLE.to_string()
    }
}

/// First row holding the maximum of `value`.
fn first_max_row<'w, 'a, F>(window: &'w [CompleteEntry<'a>], value: F) -> Option<&'w CompleteEntry<'a>>
where
    F: Fn(&CompleteEntry) -> f64,
{
    let highest = max_of(window, &value);
    window.iter().find(|entry| value(*entry) == highest)
}

/// Strike minus put LTP at the highest put OI strike
pub fn calculate_support(window: &[CompleteEntry]) -> String {
    first_max_row(window, |e| e.put.open_interest)
        .map(|e| format!("{:.2}", e.strike_price - e.put.last_price))
        .unwrap_or_else(|| config::NOT_AVAILABLE.to_string())
}

/// Strike plus call LTP at the highest call OI strike
pub fn calculate_resistance(window: &[CompleteEntry]) -> String {
    first_max_row(window, |e| e.call.open_interest)
        .map(|e| format!("{:.2}", e.strike_price + e.call.last_price))
        .unwrap_or_else(|| config::NOT_AVAILABLE.to_string())
}

/// Positional approximation of open/high/prev close, see [`MarketSnapshot`].
///
/// An unreadable list element falls back to spot like a missing one.
pub fn market_snapshot(
    underlying_value: Option<f64>,
    strike_prices: Option<&[Option<f64>]>,
) -> MarketSnapshot {
    let prices = strike_prices.unwrap_or(&[]);
    let at = |idx: Option<usize>| {
        idx.and_then(|i| prices.get(i).copied().flatten())
            .or(underlying_value)
    };

    MarketSnapshot {
        current_price: underlying_value,
        open: at(Some(0)),
        high: at(prices.len().checked_sub(1)),
        prev_close: at(Some(prices.len() / 2)),
    }
}

fn totals_or_empty_object<S>(totals: &Option<Totals>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::ser::SerializeMap;

    match totals {
        Some(totals) => totals.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}
