use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::{Country, EnrichedCountry, RefreshStatus, SummarySnapshot, TopCountry};

use super::schema::SCHEMA;

const COUNTRY_COLUMNS: &str = "id, name, capital, region, population, currency_code, \
     exchange_rate, estimated_gdp, flag_url, last_refreshed_at";

/// Orderings accepted by the list query. Anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    GdpAsc,
    GdpDesc,
    NameAsc,
    NameDesc,
    PopulationAsc,
    PopulationDesc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "gdp_asc" => Some(Self::GdpAsc),
            "gdp_desc" => Some(Self::GdpDesc),
            "name_asc" => Some(Self::NameAsc),
            "name_desc" => Some(Self::NameDesc),
            "pop_asc" => Some(Self::PopulationAsc),
            "pop_desc" => Some(Self::PopulationDesc),
            _ => None,
        }
    }

    fn order_by(self) -> &'static str {
        match self {
            Self::GdpAsc => "estimated_gdp ASC",
            Self::GdpDesc => "estimated_gdp DESC NULLS LAST",
            Self::NameAsc => "name ASC",
            Self::NameDesc => "name DESC",
            Self::PopulationAsc => "population ASC",
            Self::PopulationDesc => "population DESC",
        }
    }
}

/// Filters for listing countries. Both filters are exact matches, ANDed.
#[derive(Debug, Clone, Default)]
pub struct CountryQuery {
    pub region: Option<String>,
    pub currency: Option<String>,
    pub sort: Option<SortOrder>,
}

pub struct Repository {
    conn: Connection,
}

impl Repository {
    /// Open (or create) the store. `":memory:"` gives a private in-memory store.
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Insert or overwrite each country, all stamped with `refreshed_at`.
    ///
    /// Each row is its own statement; a failure partway leaves earlier rows
    /// written. Rows absent from `countries` are left untouched.
    pub async fn upsert_countries(
        &self,
        countries: Vec<EnrichedCountry>,
        refreshed_at: DateTime<Utc>,
    ) -> Result<usize> {
        let stamp = format_timestamp(refreshed_at);
        let written = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare_cached(
                    r#"INSERT INTO countries (name, capital, region, population, currency_code,
                                              exchange_rate, estimated_gdp, flag_url, last_refreshed_at)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                       ON CONFLICT(name) DO UPDATE SET
                           capital = excluded.capital,
                           region = excluded.region,
                           population = excluded.population,
                           currency_code = excluded.currency_code,
                           exchange_rate = excluded.exchange_rate,
                           estimated_gdp = excluded.estimated_gdp,
                           flag_url = excluded.flag_url,
                           last_refreshed_at = excluded.last_refreshed_at"#,
                )?;
                let mut written = 0;
                for country in &countries {
                    written += stmt.execute(params![
                        country.name,
                        country.capital,
                        country.region,
                        i64::try_from(country.population).unwrap_or(i64::MAX),
                        country.currency_code,
                        country.exchange_rate,
                        country.estimated_gdp,
                        country.flag_url,
                        stamp,
                    ])?;
                }
                Ok(written)
            })
            .await?;
        Ok(written)
    }

    pub async fn list_countries(&self, query: CountryQuery) -> Result<Vec<Country>> {
        let countries = self
            .conn
            .call(move |conn| {
                let mut sql = format!("SELECT {} FROM countries", COUNTRY_COLUMNS);
                let mut clauses = Vec::new();
                let mut values = Vec::new();

                if let Some(region) = query.region {
                    values.push(region);
                    clauses.push(format!("region = ?{}", values.len()));
                }
                if let Some(currency) = query.currency {
                    values.push(currency);
                    clauses.push(format!("currency_code = ?{}", values.len()));
                }
                if !clauses.is_empty() {
                    sql.push_str(" WHERE ");
                    sql.push_str(&clauses.join(" AND "));
                }

                // Without a recognised sort, rows come back in insertion order
                let order_by = query.sort.map(SortOrder::order_by).unwrap_or("id ASC");
                sql.push_str(" ORDER BY ");
                sql.push_str(order_by);

                let mut stmt = conn.prepare(&sql)?;
                let countries = stmt
                    .query_map(params_from_iter(values.iter()), country_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(countries)
            })
            .await?;
        Ok(countries)
    }

    pub async fn get_country(&self, name: &str) -> Result<Option<Country>> {
        let name = name.to_string();
        let country = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM countries WHERE name = ?1",
                    COUNTRY_COLUMNS
                ))?;
                let country = stmt
                    .query_row(params![name], country_from_row)
                    .optional()?;
                Ok(country)
            })
            .await?;
        Ok(country)
    }

    /// Returns whether a row was actually removed.
    pub async fn delete_country(&self, name: &str) -> Result<bool> {
        let name = name.to_string();
        let removed = self
            .conn
            .call(move |conn| {
                let affected = conn.execute("DELETE FROM countries WHERE name = ?1", params![name])?;
                Ok(affected > 0)
            })
            .await?;
        Ok(removed)
    }

    pub async fn status(&self) -> Result<RefreshStatus> {
        let (total_countries, last_refreshed) = self
            .conn
            .call(|conn| {
                let row = conn.query_row(
                    r#"SELECT
                           (SELECT COUNT(*) FROM countries),
                           (SELECT MAX(last_refreshed_at) FROM countries)"#,
                    [],
                    |row| Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?)),
                )?;
                Ok(row)
            })
            .await?;

        Ok(RefreshStatus {
            total_countries,
            last_refreshed_at: last_refreshed.as_deref().and_then(parse_datetime),
        })
    }

    /// The `limit` highest estimated GDPs, unknown GDPs last.
    pub async fn top_by_gdp(&self, limit: usize) -> Result<Vec<TopCountry>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let top = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT name, currency_code, estimated_gdp FROM countries
                       ORDER BY estimated_gdp DESC NULLS LAST
                       LIMIT ?1"#,
                )?;
                let top = stmt
                    .query_map(params![limit], |row| {
                        Ok(TopCountry {
                            name: row.get(0)?,
                            currency_code: row.get(1)?,
                            estimated_gdp: row.get(2)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(top)
            })
            .await?;
        Ok(top)
    }

    pub async fn summary_snapshot(&self, limit: usize) -> Result<SummarySnapshot> {
        let top_countries = self.top_by_gdp(limit).await?;
        let status = self.status().await?;

        Ok(SummarySnapshot {
            total_countries: status.total_countries,
            top_countries,
            last_refreshed_at: status.last_refreshed_at,
        })
    }
}

/// Fixed-width UTC form so that `MAX()` over the text column is chronological.
fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn country_from_row(row: &Row) -> rusqlite::Result<Country> {
    let refreshed: String = row.get(9)?;
    let last_refreshed_at = parse_datetime(&refreshed).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            9,
            Type::Text,
            format!("invalid timestamp: {}", refreshed).into(),
        )
    })?;

    Ok(Country {
        id: row.get(0)?,
        name: row.get(1)?,
        capital: row.get(2)?,
        region: row.get(3)?,
        population: row.get(4)?,
        currency_code: row.get(5)?,
        exchange_rate: row.get(6)?,
        estimated_gdp: row.get(7)?,
        flag_url: row.get(8)?,
        last_refreshed_at,
    })
}
