use crate::expression::{compile_expression, ColumnResolver};
use crate::relation::{wrap_passthrough, CompiledRelation, CompilerState};
use crate::triple::compile_triple;
use indexmap::IndexSet;
use sparqldb_model::{Result, SparqlDbError};
use spargebra::algebra::{Expression, GraphPattern};
use spargebra::Query;

/// Compiles a full `SELECT` query into a `CompiledRelation` (spec
/// §4.C, "SelectQuery"). `spargebra` has no dedicated `SelectQuery`
/// algebra node — `Query::Select` is its functional equivalent, so a
/// dataset clause (`FROM`/`FROM NAMED`) on it is rejected the same way
/// spec.md rejects dataset clauses on `SelectQuery`.
pub fn compile_query(table: &str, query: &Query) -> Result<CompiledRelation> {
    match query {
        Query::Select {
            dataset, pattern, ..
        } => {
            if dataset.is_some() {
                return Err(SparqlDbError::UnsupportedAlgebra(
                    "FROM / FROM NAMED dataset clauses are not supported".to_owned(),
                ));
            }
            let mut state = CompilerState::new(table);
            compile_pattern(&mut state, pattern)
        }
        other => Err(SparqlDbError::UnsupportedAlgebra(format!(
            "only SELECT queries are supported, got {other:?}"
        ))),
    }
}

/// Recursively compiles one algebra node. The node set this function
/// accepts is closed: `Bgp`, `Filter`, `LeftJoin`, `Project`,
/// `Distinct`, and `Slice` (spec §4.C). Anything else — including a
/// bare `Join`, which never arises from a supported query since
/// `spargebra` already groups consecutive triples into one `Bgp` — is
/// a hard compile-time error.
pub fn compile_pattern(
    state: &mut CompilerState<'_>,
    pattern: &GraphPattern,
) -> Result<CompiledRelation> {
    match pattern {
        GraphPattern::Bgp { patterns } => compile_bgp(state, patterns),
        GraphPattern::Filter { inner, expr } => compile_filter(state, inner, expr),
        GraphPattern::LeftJoin {
            left, right, expr, ..
        } => compile_left_join(state, left, right, expr.as_ref()),
        GraphPattern::Project { inner, variables } => compile_project(state, inner, variables),
        GraphPattern::Distinct { inner } => compile_distinct(state, inner),
        GraphPattern::Slice {
            inner,
            start,
            length,
        } => compile_slice(state, inner, *start, *length),
        other => Err(SparqlDbError::UnsupportedAlgebra(format!("{other:?}"))),
    }
}

fn compile_bgp(
    state: &mut CompilerState<'_>,
    patterns: &[spargebra::term::TriplePattern],
) -> Result<CompiledRelation> {
    if patterns.is_empty() {
        return Err(SparqlDbError::UnsupportedAlgebra(
            "empty basic graph patterns are not supported".to_owned(),
        ));
    }
    let mut patterns = patterns.iter();
    #[allow(clippy::expect_used, reason = "checked non-empty above")]
    let first = patterns.next().expect("checked non-empty above");
    let mut acc = compile_triple(state, first);
    for triple in patterns {
        let next = compile_triple(state, triple);
        acc = join_relations(state, &acc, &next, false, None)?;
    }
    Ok(acc)
}

/// Joins two relations left-to-right on every variable they share.
/// `optional` selects an SQL `LEFT JOIN` over an `INNER JOIN`; `expr`
/// is an additional `FILTER`-like condition applied on the join (used
/// by `LeftJoin`'s own expression, if any). When the accumulated and
/// new relation share a variable, the left (accumulated) side's
/// column is kept as canonical — first-binding-wins (spec §4.C).
fn join_relations(
    state: &mut CompilerState<'_>,
    left: &CompiledRelation,
    right: &CompiledRelation,
    optional: bool,
    expr: Option<&Expression>,
) -> Result<CompiledRelation> {
    let left_alias = state.fresh_alias();
    let right_alias = state.fresh_alias();

    let shared: Vec<&String> = left.vars.intersection(&right.vars).collect();
    let mut on_conditions: Vec<String> = shared
        .iter()
        .map(|v| format!("{left_alias}.{v} = {right_alias}.{v}"))
        .collect();

    let mut binds = Vec::new();
    if let Some(expr) = expr {
        let resolver = JoinResolver {
            left_alias: &left_alias,
            left,
            right_alias: &right_alias,
            right,
        };
        let (sql, expr_binds) = compile_expression(expr, &resolver)?;
        on_conditions.push(sql);
        binds.extend(expr_binds);
    }
    let on_clause = if on_conditions.is_empty() {
        "1 = 1".to_owned()
    } else {
        on_conditions.join(" AND ")
    };

    let mut vars = IndexSet::new();
    let mut vars_with_lang = IndexSet::new();
    let mut vars_with_dt = IndexSet::new();
    let mut select_items = vec![format!("{left_alias}.__id__ AS __id__")];

    for v in left.vars.union(&right.vars) {
        let source = if left.vars.contains(v) { &left_alias } else { &right_alias };
        select_items.push(format!("{source}.{v} AS {v}"));
        vars.insert(v.clone());
        if (left.vars_with_lang.contains(v) && left.vars.contains(v))
            || (right.vars_with_lang.contains(v) && !left.vars.contains(v))
        {
            select_items.push(format!("{source}.{v}_lang AS {v}_lang"));
            vars_with_lang.insert(v.clone());
        }
        if (left.vars_with_dt.contains(v) && left.vars.contains(v))
            || (right.vars_with_dt.contains(v) && !left.vars.contains(v))
        {
            select_items.push(format!("{source}.{v}_dt AS {v}_dt"));
            vars_with_dt.insert(v.clone());
        }
    }

    let join_kind = if optional { "LEFT JOIN" } else { "JOIN" };
    let sql = format!(
        "SELECT {} FROM ({}) AS {left_alias} {join_kind} ({}) AS {right_alias} ON {on_clause}",
        select_items.join(", "),
        left.sql,
        right.sql,
    );

    let mut all_binds = left.binds.clone();
    all_binds.extend(right.binds.clone());
    all_binds.extend(binds);

    Ok(CompiledRelation {
        sql,
        binds: all_binds,
        vars,
        vars_with_lang,
        vars_with_dt,
    })
}

struct JoinResolver<'a> {
    left_alias: &'a str,
    left: &'a CompiledRelation,
    right_alias: &'a str,
    right: &'a CompiledRelation,
}

impl ColumnResolver for JoinResolver<'_> {
    fn column(&self, var: &str) -> Option<String> {
        if self.left.has_var(var) {
            Some(format!("{}.{var}", self.left_alias))
        } else if self.right.has_var(var) {
            Some(format!("{}.{var}", self.right_alias))
        } else {
            None
        }
    }

    fn lang_column(&self, var: &str) -> Option<String> {
        if self.left.vars_with_lang.contains(var) {
            Some(format!("{}.{var}_lang", self.left_alias))
        } else if self.right.vars_with_lang.contains(var) {
            Some(format!("{}.{var}_lang", self.right_alias))
        } else {
            None
        }
    }
}

fn compile_filter(
    state: &mut CompilerState<'_>,
    inner: &GraphPattern,
    expr: &Expression,
) -> Result<CompiledRelation> {
    let child = compile_pattern(state, inner)?;
    let alias = state.fresh_alias();
    let resolver = SingleAliasResolver {
        alias: &alias,
        relation: &child,
    };
    let (condition_sql, condition_binds) = compile_expression(expr, &resolver)?;
    let sql = wrap_passthrough(&child, &alias, Some(&condition_sql));
    let mut binds = child.binds.clone();
    binds.extend(condition_binds);
    Ok(CompiledRelation {
        sql,
        binds,
        vars: child.vars,
        vars_with_lang: child.vars_with_lang,
        vars_with_dt: child.vars_with_dt,
    })
}

struct SingleAliasResolver<'a> {
    alias: &'a str,
    relation: &'a CompiledRelation,
}

impl ColumnResolver for SingleAliasResolver<'_> {
    fn column(&self, var: &str) -> Option<String> {
        self.relation
            .has_var(var)
            .then(|| format!("{}.{var}", self.alias))
    }

    fn lang_column(&self, var: &str) -> Option<String> {
        self.relation
            .vars_with_lang
            .contains(var)
            .then(|| format!("{}.{var}_lang", self.alias))
    }
}

fn compile_left_join(
    state: &mut CompilerState<'_>,
    left: &GraphPattern,
    right: &GraphPattern,
    expr: Option<&Expression>,
) -> Result<CompiledRelation> {
    let left_rel = compile_pattern(state, left)?;
    let right_rel = compile_pattern(state, right)?;
    join_relations(state, &left_rel, &right_rel, true, expr)
}

fn compile_project(
    state: &mut CompilerState<'_>,
    inner: &GraphPattern,
    variables: &[spargebra::term::Variable],
) -> Result<CompiledRelation> {
    let child = compile_pattern(state, inner)?;
    let alias = state.fresh_alias();

    let mut select_items = vec![format!("{alias}.__id__ AS __id__")];
    let mut vars = IndexSet::new();
    let mut vars_with_lang = IndexSet::new();
    let mut vars_with_dt = IndexSet::new();
    for v in variables {
        let name = v.as_str();
        if !child.has_var(name) {
            return Err(SparqlDbError::UnsupportedExpression(format!(
                "projected variable ?{name} is never bound"
            )));
        }
        select_items.push(format!("{alias}.{name} AS {name}"));
        vars.insert(name.to_owned());
        if child.vars_with_lang.contains(name) {
            select_items.push(format!("{alias}.{name}_lang AS {name}_lang"));
            vars_with_lang.insert(name.to_owned());
        }
        if child.vars_with_dt.contains(name) {
            select_items.push(format!("{alias}.{name}_dt AS {name}_dt"));
            vars_with_dt.insert(name.to_owned());
        }
    }

    let sql = format!(
        "SELECT {} FROM ({}) AS {alias}",
        select_items.join(", "),
        child.sql
    );
    Ok(CompiledRelation {
        sql,
        binds: child.binds,
        vars,
        vars_with_lang,
        vars_with_dt,
    })
}

fn compile_distinct(state: &mut CompilerState<'_>, inner: &GraphPattern) -> Result<CompiledRelation> {
    let child = compile_pattern(state, inner)?;
    let alias = state.fresh_alias();
    // DISTINCT is applied over every exported column, including the
    // companion `_lang`/`_dt` columns, so two literals that agree on
    // lexical form but differ in language or datatype remain distinct
    // solutions (spec §4.C). `__id__` is dropped; an arbitrary
    // remaining variable's column is relabeled to `__id__` so the
    // surrogate row id stays non-null, or the child's own `__id__`
    // passes through unchanged when there are no variables at all.
    let mut select_items: Vec<String> = Vec::new();
    for v in &child.vars {
        select_items.push(v.clone());
        if child.vars_with_lang.contains(v) {
            select_items.push(format!("{v}_lang"));
        }
        if child.vars_with_dt.contains(v) {
            select_items.push(format!("{v}_dt"));
        }
    }
    select_items.push(match child.vars.iter().next() {
        Some(first) => format!("{first} AS __id__"),
        None => "__id__ AS __id__".to_owned(),
    });
    let sql = format!(
        "SELECT DISTINCT {} FROM ({}) AS {alias}",
        select_items.join(", "),
        child.sql
    );
    Ok(CompiledRelation {
        sql,
        binds: child.binds,
        vars: child.vars,
        vars_with_lang: child.vars_with_lang,
        vars_with_dt: child.vars_with_dt,
    })
}

fn compile_slice(
    state: &mut CompilerState<'_>,
    inner: &GraphPattern,
    start: usize,
    length: Option<usize>,
) -> Result<CompiledRelation> {
    let child = compile_pattern(state, inner)?;
    let alias = state.fresh_alias();
    let limit = length.map_or("-1".to_owned(), |n| n.to_string());
    let sql = format!(
        "SELECT * FROM ({}) AS {alias} ORDER BY __id__ LIMIT {limit} OFFSET {start}",
        child.sql
    );
    Ok(CompiledRelation {
        sql,
        binds: child.binds,
        vars: child.vars,
        vars_with_lang: child.vars_with_lang,
        vars_with_dt: child.vars_with_dt,
    })
}
