pub mod country;
mod summary;

pub use country::{Country, EnrichedCountry, ExchangeRateResponse, RateTable, RawCountry};
pub use summary::{RefreshOutcome, RefreshStatus, SummarySnapshot, TopCountry};
