pub const SCHEMA: &str = r#"
-- countries table (name is the lowercased natural key)
CREATE TABLE IF NOT EXISTS countries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    capital TEXT,
    region TEXT,
    population INTEGER NOT NULL DEFAULT 0,
    currency_code TEXT,
    exchange_rate REAL,
    estimated_gdp REAL,
    flag_url TEXT,
    last_refreshed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_countries_region ON countries(region);
CREATE INDEX IF NOT EXISTS idx_countries_currency_code ON countries(currency_code);
CREATE INDEX IF NOT EXISTS idx_countries_estimated_gdp ON countries(estimated_gdp DESC);
"#;
