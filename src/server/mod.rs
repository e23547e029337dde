//! HTTP query service
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/countries` | List countries (`region`, `currency`, `sort` filters) |
//! | `POST` | `/countries/refresh` | Fetch, enrich, persist and re-render the summary |
//! | `GET` | `/countries/image` | Latest summary image |
//! | `GET` | `/countries/:name` | Single country |
//! | `DELETE` | `/countries/:name` | Remove a country |
//! | `GET` | `/status` | Row count and last refresh time |

mod handlers;
mod routes;

pub use routes::{router, serve};
