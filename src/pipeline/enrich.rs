use std::ops::Range;

use rand::Rng;

use crate::models::{EnrichedCountry, RateTable, RawCountry};

/// Bounds of the per-country random multiplier used for the GDP estimate.
///
/// The estimate is a noisy proxy, not an economic figure: two refreshes over
/// identical input produce different values.
pub const GDP_MULTIPLIER_RANGE: Range<f64> = 1000.0..2000.0;

/// Join countries against the rate table and derive `estimated_gdp`.
///
/// Output has one entry per input country, in input order. The multiplier is
/// drawn from `rng` independently for every country with a known rate.
pub fn enrich_countries<R: Rng>(
    countries: Vec<RawCountry>,
    rates: &RateTable,
    rng: &mut R,
) -> Vec<EnrichedCountry> {
    countries
        .into_iter()
        .map(|country| enrich_one(country, rates, rng))
        .collect()
}

fn enrich_one<R: Rng>(
    country: RawCountry,
    rates: &RateTable,
    rng: &mut R,
) -> EnrichedCountry {
    let currency_code = country
        .currencies
        .as_ref()
        .and_then(|currencies| currencies.first())
        .map(|currency| currency.code.clone());

    let (exchange_rate, estimated_gdp) = match &currency_code {
        // No currency at all: GDP is definitively zero
        None => (None, Some(0.0)),
        Some(code) => match rates.get(code).copied().filter(|rate| rate.is_normal()) {
            Some(rate) => {
                let multiplier = rng.gen_range(GDP_MULTIPLIER_RANGE);
                (Some(rate), Some(country.population as f64 * multiplier / rate))
            }
            // Rate unknown: GDP unknown
            None => (None, None),
        },
    };

    EnrichedCountry {
        name: country.name.to_lowercase(),
        capital: country.capital,
        region: country.region,
        population: country.population,
        flag_url: country.flag,
        currency_code,
        exchange_rate,
        estimated_gdp,
    }
}
