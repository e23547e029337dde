mod repository;
mod schema;

pub use repository::{CountryQuery, Repository, SortOrder};
