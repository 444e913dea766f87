//! Data model for the SPARQL-to-SQL quad store.
//!
//! This crate holds the pieces every other crate in the workspace
//! shares: the RDF [`Term`]/[`Quad`] types, the [`ShortcutResolver`],
//! and [`SparqlDbError`]. Large portions of the SPARQL parsing and
//! algebra types used elsewhere in the workspace come straight from
//! [`spargebra`] and [`oxrdf`]; this crate only defines what the
//! relational backend needs on top of them.

mod error;
mod shortcuts;
mod term;

pub use error::{Result, SparqlDbError};
pub use shortcuts::ShortcutResolver;
pub use term::{Iri, Literal, Quad, Term, Variable};

// Re-exported so downstream crates can consume the algebra tree
// `spargebra` hands back without an extra direct dependency.
pub use spargebra::Query;
