//! The Linked Data Fragments mirroring engine (spec §4.F): walks
//! user-declared resource paths, fetching paged Turtle from LDF
//! endpoints and persisting the result into a [`sparqldb_store::Store`].

mod config;
mod mirror;
mod path;

pub use config::MirrorConfig;
pub use mirror::Mirror;
pub use path::{ResourcePath, Seed, Step, TransformFn};
