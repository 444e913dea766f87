use indexmap::IndexSet;

/// The result of compiling one algebra node: a SQL sub-select
/// ("relation") plus which SPARQL variables it exports, and which of
/// those carry companion `_lang`/`_dt` columns (spec §4.C).
///
/// A column's SQL name is always the SPARQL variable name itself — a
/// parent node that re-wraps a child always re-exports columns under
/// that same name (`AS var`), so "variable identity is preserved by
/// name across nesting" (spec §4.C) falls out of the representation
/// instead of needing a separate `var_map` indirection.
#[derive(Debug, Clone)]
pub struct CompiledRelation {
    /// A bare `SELECT ...` statement (no enclosing parens/alias).
    pub sql: String,
    /// Bound parameter values, in the order their `?` placeholders
    /// appear in `sql`, left to right.
    pub binds: Vec<String>,
    /// Variables exported by this relation, in projection order.
    pub vars: IndexSet<String>,
    /// Subset of `vars` that also export a `{var}_lang` column.
    pub vars_with_lang: IndexSet<String>,
    /// Subset of `vars` that also export a `{var}_dt` column.
    pub vars_with_dt: IndexSet<String>,
}

impl CompiledRelation {
    pub fn has_var(&self, name: &str) -> bool {
        self.vars.contains(name)
    }
}

/// Generates unique table aliases for derived tables, and holds the
/// configured quads table name.
pub struct CompilerState<'a> {
    table: &'a str,
    next_alias: usize,
}

impl<'a> CompilerState<'a> {
    pub fn new(table: &'a str) -> Self {
        Self {
            table,
            next_alias: 0,
        }
    }

    pub fn table(&self) -> &str {
        self.table
    }

    pub fn fresh_alias(&mut self) -> String {
        let alias = format!("t{}", self.next_alias);
        self.next_alias += 1;
        alias
    }
}

/// Builds the `SELECT <cols> FROM (<sql>) AS <alias>` wrapper shared
/// by every node that just needs to re-export a child's columns
/// (selecting `*` is enough since column names never change on a
/// pass-through wrap).
pub fn wrap_passthrough(child: &CompiledRelation, alias: &str, where_clause: Option<&str>) -> String {
    let mut sql = format!("SELECT * FROM ({}) AS {alias}", child.sql);
    if let Some(predicate) = where_clause {
        sql.push_str(&format!(" WHERE {predicate}"));
    }
    sql
}
