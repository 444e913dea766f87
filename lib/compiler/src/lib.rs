//! Translates a `spargebra` SPARQL algebra tree into a single nested
//! relational `SELECT` plus its ordered bind parameters (spec §4.C,
//! §4.D): the algebra compiler (`algebra`), the expression/FILTER
//! compiler (`expression`), and the base-triple compiler (`triple`)
//! that the algebra compiler's `Bgp` case builds on.

mod algebra;
mod expression;
mod relation;
mod triple;

pub use algebra::compile_query;
pub use expression::{compile_expression, ColumnResolver};
pub use relation::CompiledRelation;
