mod enrich;

pub use enrich::enrich_countries;
