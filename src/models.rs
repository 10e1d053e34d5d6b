use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Response from the NSE option-chain-indices endpoint.
///
/// Every nesting level is optional: a payload missing `records` or
/// `records.data` is still a valid `OptionChain`, and the processor decides
/// what to do with it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionChain {
    #[serde(default)]
    pub records: Option<Records>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Records {
    #[serde(default)]
    pub timestamp: Option<String>,

    #[serde(rename = "underlyingValue", default, deserialize_with = "de_opt_number")]
    pub underlying_value: Option<f64>,

    #[serde(default)]
    pub data: Option<Vec<OptionData>>,

    /// Numbers on the indices endpoint, strings on some others. An element
    /// that isn't a number is kept as `None` so positions don't shift.
    #[serde(rename = "strikePrices", default, deserialize_with = "de_price_list")]
    pub strike_prices: Option<Vec<Option<f64>>>,
}

/// One strike's row. Either side may be missing, and so may the strike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionData {
    #[serde(rename = "strikePrice", default, deserialize_with = "de_opt_number")]
    pub strike_price: Option<f64>,

    #[serde(rename = "expiryDate", default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,

    #[serde(rename = "CE", default, skip_serializing_if = "Option::is_none")]
    pub call: Option<OptionDetail>,

    #[serde(rename = "PE", default, skip_serializing_if = "Option::is_none")]
    pub put: Option<OptionDetail>,
}

/// Detailed option information (CE or PE)
///
/// NSE sends `null` for untraded contracts; those count as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionDetail {
    #[serde(rename = "openInterest", default, deserialize_with = "de_number_or_zero")]
    pub open_interest: f64,

    #[serde(rename = "changeinOpenInterest", default, deserialize_with = "de_number_or_zero")]
    pub change_in_oi: f64,

    #[serde(rename = "lastPrice", default, deserialize_with = "de_number_or_zero")]
    pub last_price: f64,

    #[serde(
        rename = "totalTradedVolume",
        default,
        deserialize_with = "de_opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub volume: Option<f64>,

    #[serde(
        rename = "impliedVolatility",
        default,
        deserialize_with = "de_opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub iv: Option<f64>,

    #[serde(
        rename = "change",
        default,
        deserialize_with = "de_opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_change: Option<f64>,
}

impl OptionData {
    /// Strike, CE and PE all present.
    pub fn is_complete(&self) -> bool {
        self.strike_price.is_some() && self.call.is_some() && self.put.is_some()
    }
}

// -----------------------------------------------
// LENIENT NUMBER PARSING
// -----------------------------------------------
// One odd value must not reject the whole chain

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberValue {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl NumberValue {
    fn into_f64(self) -> Option<f64> {
        match self {
            NumberValue::Number(n) => Some(n),
            NumberValue::Text(s) => s.trim().replace(',', "").parse::<f64>().ok(),
            NumberValue::Other(_) => None,
        }
    }
}

fn de_opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<NumberValue> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(NumberValue::into_f64))
}

fn de_number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_opt_number(deserializer)?.unwrap_or(0.0))
}

fn de_price_list<'de, D>(deserializer: D) -> Result<Option<Vec<Option<f64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<NumberValue>>> = Option::deserialize(deserializer)?;

    Ok(raw.map(|values| {
        values
            .into_iter()
            .map(|value| value.and_then(NumberValue::into_f64))
            .collect()
    }))
}
