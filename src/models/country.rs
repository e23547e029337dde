use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Currency code to rate, relative to USD.
pub type RateTable = HashMap<String, f64>;

/// A country as returned by the country directory service.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCountry {
    pub name: String,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub currencies: Option<Vec<RawCurrency>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrency {
    pub code: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub name: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    pub symbol: Option<String>,
}

/// Envelope of the exchange-rate provider. Only `rates` feeds the pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeRateResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub base_code: Option<String>,
    #[serde(default)]
    pub time_last_update_utc: Option<String>,
    #[serde(default)]
    pub rates: RateTable,
}

/// Output of the enrichment step, ready to be upserted.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedCountry {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: u64,
    pub flag_url: Option<String>,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
}

/// A stored country row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
    pub last_refreshed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_country_without_currencies() {
        let json = r#"[
            {"name":"Antarctica","region":"Polar","population":1000,"flag":"https://flagcdn.com/aq.svg"},
            {"name":"Ghana","capital":"Accra","region":"Africa","population":31072945,
             "flag":"https://flagcdn.com/gh.svg",
             "currencies":[{"code":"GHS","name":"Ghanaian cedi","symbol":"₵"}]}
        ]"#;

        let countries: Vec<RawCountry> = serde_json::from_str(json).unwrap();
        assert_eq!(countries.len(), 2);
        assert!(countries[0].currencies.is_none());
        assert!(countries[0].capital.is_none());

        let currencies = countries[1].currencies.as_ref().unwrap();
        assert_eq!(currencies[0].code, "GHS");
        assert_eq!(currencies[0].symbol.as_deref(), Some("₵"));
    }

    #[test]
    fn decodes_rate_envelope_ignoring_extra_fields() {
        let json = r#"{
            "result":"success","provider":"https://www.exchangerate-api.com",
            "time_last_update_unix":1760659351,"time_last_update_utc":"Fri, 17 Oct 2026 00:02:31 +0000",
            "base_code":"USD","rates":{"USD":1,"NGN":1530.5,"GHS":10.2}
        }"#;

        let envelope: ExchangeRateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.result.as_deref(), Some("success"));
        assert_eq!(envelope.base_code.as_deref(), Some("USD"));
        assert_eq!(envelope.rates.len(), 3);
        assert_eq!(envelope.rates["NGN"], 1530.5);
    }
}
