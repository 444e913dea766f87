//! The quad store (spec §4.B): a connection pool to an arbitrary SQL
//! backing engine (SQLite or PostgreSQL via `sqlx`'s `Any` driver),
//! holding quads under named contexts plus the shortcut registries.

mod config;
mod store;

pub use config::StoreConfig;
pub use oxrdfio::RdfFormat;
pub use store::{QuadPattern, Store};
