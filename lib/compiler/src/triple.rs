use crate::relation::{CompilerState, CompiledRelation};
use indexmap::IndexSet;
use spargebra::term::{NamedNodePattern, TermPattern, TriplePattern};

enum Slot {
    Constant(String),
    Variable(String),
}

fn term_pattern_slot(pattern: &TermPattern) -> Slot {
    match pattern {
        TermPattern::NamedNode(n) => Slot::Constant(n.as_str().to_owned()),
        TermPattern::BlankNode(b) => Slot::Constant(format!("_:{}", b.as_str())),
        TermPattern::Literal(l) => Slot::Constant(l.value().to_owned()),
        TermPattern::Variable(v) => Slot::Variable(v.as_str().to_owned()),
        #[allow(unreachable_patterns, reason = "rdf-star is not enabled")]
        _ => unreachable!("rdf-star triple terms are not supported"),
    }
}

fn predicate_slot(pattern: &NamedNodePattern) -> Slot {
    match pattern {
        NamedNodePattern::NamedNode(n) => Slot::Constant(n.as_str().to_owned()),
        NamedNodePattern::Variable(v) => Slot::Variable(v.as_str().to_owned()),
    }
}

/// Compiles a single triple pattern into a base relation over the
/// quads table: constants become `WHERE` equalities, repeated
/// variables within the triple become column-to-column equalities, and
/// object-position variables additionally export `_lang`/`_dt`
/// companion columns (spec §4.C, "BGP(triples)").
pub fn compile_triple(state: &mut CompilerState<'_>, triple: &TriplePattern) -> CompiledRelation {
    let slots = [
        ("s", term_pattern_slot(&triple.subject)),
        ("p", predicate_slot(&triple.predicate)),
        ("o", term_pattern_slot(&triple.object)),
    ];

    let mut select_items = vec!["id AS __id__".to_owned()];
    let mut conditions = Vec::new();
    let mut binds = Vec::new();
    let mut vars = IndexSet::new();
    let mut vars_with_lang = IndexSet::new();
    let mut vars_with_dt = IndexSet::new();
    // Raw column of the first occurrence of each variable within this
    // triple, used to equate repeated variables (e.g. `?x ?p ?x`).
    let mut first_column: indexmap::IndexMap<String, &'static str> = indexmap::IndexMap::new();

    for (column, slot) in slots {
        match slot {
            Slot::Constant(value) => {
                conditions.push(format!("{column} = ?"));
                binds.push(value);
            }
            Slot::Variable(name) => {
                if let Some(&first) = first_column.get(&name) {
                    conditions.push(format!("{column} = {first}"));
                } else {
                    first_column.insert(name.clone(), column);
                    select_items.push(format!("{column} AS {name}"));
                    vars.insert(name.clone());
                }
                if column == "o" {
                    if !vars_with_lang.contains(&name) {
                        select_items.push(format!("lang AS {name}_lang"));
                        vars_with_lang.insert(name.clone());
                    }
                    if !vars_with_dt.contains(&name) {
                        select_items.push(format!("datatype AS {name}_dt"));
                        vars_with_dt.insert(name.clone());
                    }
                }
            }
        }
    }

    let where_clause = if conditions.is_empty() {
        "1 = 1".to_owned()
    } else {
        conditions.join(" AND ")
    };
    let sql = format!(
        "SELECT {} FROM {} WHERE {where_clause}",
        select_items.join(", "),
        state.table()
    );

    CompiledRelation {
        sql,
        binds,
        vars,
        vars_with_lang,
        vars_with_dt,
    }
}
