//! Rehydrates SQL rows back into RDF term bindings (spec §4.E).
//!
//! The compiler (`sparqldb-compiler`) names every exported column after
//! the SPARQL variable it binds, with `{var}_lang`/`{var}_dt` companion
//! columns where applicable. This crate only needs to know the
//! projection list and those companion-column names to turn one
//! `sqlx::any::AnyRow` into a [`QuerySolution`].

use indexmap::IndexMap;
use sparqldb_compiler::CompiledRelation;
use sparqldb_model::{Result, Term};
use sqlx::any::AnyRow;
use sqlx::Row;

/// One row of variable bindings, in projection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySolution {
    bindings: IndexMap<String, Term>,
}

impl QuerySolution {
    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.bindings.get(variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The output of a SELECT query: the projected variable names, in
/// source order, plus the ordered list of bindings (spec §4.E, "Output
/// shape").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResults {
    pub vars: Vec<String>,
    pub bindings: Vec<QuerySolution>,
}

impl QueryResults {
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Builds the final [`QueryResults`] from the rows a compiled relation's
/// SQL produced. `relation` supplies which columns carry companion
/// lang/datatype data; `relation.vars` (in insertion order) is the
/// projection list unless `projection` narrows it further.
pub fn materialize(relation: &CompiledRelation, rows: &[AnyRow]) -> Result<QueryResults> {
    let vars: Vec<String> = relation.vars.iter().cloned().collect();
    let mut bindings = Vec::with_capacity(rows.len());
    for row in rows {
        bindings.push(materialize_row(relation, &vars, row)?);
    }
    Ok(QueryResults { vars, bindings })
}

fn materialize_row(
    relation: &CompiledRelation,
    vars: &[String],
    row: &AnyRow,
) -> Result<QuerySolution> {
    let mut bindings = IndexMap::with_capacity(vars.len());
    for var in vars {
        let value: Option<String> = row.try_get(var.as_str())?;
        let Some(value) = value else {
            // Unbound (e.g. the right side of an unmatched LeftJoin) —
            // absent from the solution rather than bound to NULL
            // (spec §9, open question resolution).
            continue;
        };
        let lang: Option<String> = if relation.vars_with_lang.contains(var) {
            row.try_get(format!("{var}_lang").as_str())?
        } else {
            None
        };
        let datatype: Option<String> = if relation.vars_with_dt.contains(var) {
            row.try_get(format!("{var}_dt").as_str())?
        } else {
            None
        };
        let term = Term::from_db(&value, lang.as_deref(), datatype.as_deref());
        bindings.insert(var.clone(), term);
    }
    Ok(QuerySolution { bindings })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_results_have_zero_len() {
        let results = QueryResults::default();
        assert_eq!(results.len(), 0);
        assert!(results.is_empty());
    }
}
