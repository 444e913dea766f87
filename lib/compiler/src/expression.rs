use sparqldb_model::{Result, SparqlDbError};
use spargebra::algebra::{Expression, Function};

/// Resolves a SPARQL variable name to the SQL column expression that
/// holds its binding (and, for object-position variables, its
/// language tag) in the relation currently being filtered/joined.
pub trait ColumnResolver {
    fn column(&self, var: &str) -> Option<String>;
    fn lang_column(&self, var: &str) -> Option<String>;
}

/// Compiles a FILTER expression into a SQL boolean expression (spec
/// §4.D). Returns the SQL text plus the bind values its `?`
/// placeholders need, in left-to-right order.
pub fn compile_expression(
    expr: &Expression,
    resolver: &dyn ColumnResolver,
) -> Result<(String, Vec<String>)> {
    match expr {
        Expression::NamedNode(n) => Ok(("?".to_owned(), vec![n.as_str().to_owned()])),
        Expression::Literal(l) => Ok(("?".to_owned(), vec![l.value().to_owned()])),
        Expression::Variable(v) => {
            let column = resolver.column(v.as_str()).ok_or_else(|| {
                SparqlDbError::UnsupportedExpression(format!(
                    "variable ?{} is not bound at this point in the query",
                    v.as_str()
                ))
            })?;
            Ok((column, Vec::new()))
        }
        Expression::Equal(l, r) => binary_op(l, r, "=", resolver),
        Expression::Greater(l, r) => binary_op(l, r, ">", resolver),
        Expression::GreaterOrEqual(l, r) => binary_op(l, r, ">=", resolver),
        Expression::Less(l, r) => binary_op(l, r, "<", resolver),
        Expression::LessOrEqual(l, r) => binary_op(l, r, "<=", resolver),
        Expression::SameTerm(l, r) => binary_op(l, r, "IS", resolver),
        Expression::Not(inner) => {
            // `!=` arrives from the parser as `Not(Equal(l, r))`.
            let (sql, binds) = compile_expression(inner, resolver)?;
            Ok((format!("NOT ({sql})"), binds))
        }
        Expression::And(l, r) => logical_op(l, r, "AND", resolver),
        Expression::Or(l, r) => logical_op(l, r, "OR", resolver),
        Expression::FunctionCall(Function::Lang, args) => match args.as_slice() {
            [Expression::Variable(v)] => {
                let column = resolver.lang_column(v.as_str()).ok_or_else(|| {
                    SparqlDbError::UnsupportedExpression(format!(
                        "LANG(?{}) has no language column",
                        v.as_str()
                    ))
                })?;
                Ok((column, Vec::new()))
            }
            _ => Err(SparqlDbError::UnsupportedExpression(
                "LANG() expects a single variable argument".to_owned(),
            )),
        },
        other => Err(SparqlDbError::UnsupportedExpression(format!("{other:?}"))),
    }
}

fn binary_op(
    l: &Expression,
    r: &Expression,
    op: &str,
    resolver: &dyn ColumnResolver,
) -> Result<(String, Vec<String>)> {
    let (l_sql, mut binds) = compile_expression(l, resolver)?;
    let (r_sql, r_binds) = compile_expression(r, resolver)?;
    binds.extend(r_binds);
    Ok((format!("({l_sql} {op} {r_sql})"), binds))
}

fn logical_op(
    l: &Expression,
    r: &Expression,
    op: &str,
    resolver: &dyn ColumnResolver,
) -> Result<(String, Vec<String>)> {
    let (l_sql, mut binds) = compile_expression(l, resolver)?;
    let (r_sql, r_binds) = compile_expression(r, resolver)?;
    binds.extend(r_binds);
    Ok((format!("({l_sql} {op} {r_sql})"), binds))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedResolver;
    impl ColumnResolver for FixedResolver {
        fn column(&self, var: &str) -> Option<String> {
            Some(format!("t0.{var}"))
        }
        fn lang_column(&self, var: &str) -> Option<String> {
            Some(format!("t0.{var}_lang"))
        }
    }

    #[test]
    fn lang_builtin_resolves_companion_column() {
        let expr = Expression::FunctionCall(
            Function::Lang,
            vec![Expression::Variable(spargebra::term::Variable::new("label").unwrap())],
        );
        let (sql, binds) = compile_expression(&expr, &FixedResolver).unwrap();
        assert_eq!(sql, "t0.label_lang");
        assert!(binds.is_empty());
    }

    #[test]
    fn not_equal_compiles_via_not_of_equal() {
        let expr = Expression::Not(Box::new(Expression::Equal(
            Box::new(Expression::Variable(spargebra::term::Variable::new("x").unwrap())),
            Box::new(Expression::Literal(oxrdf::Literal::new_simple_literal("a"))),
        )));
        let (sql, binds) = compile_expression(&expr, &FixedResolver).unwrap();
        assert_eq!(sql, "NOT ((t0.x = ?))");
        assert_eq!(binds, vec!["a".to_owned()]);
    }

    #[test]
    fn lang_on_non_variable_is_an_error() {
        let expr = Expression::FunctionCall(
            Function::Lang,
            vec![Expression::Literal(oxrdf::Literal::new_simple_literal("a"))],
        );
        assert!(compile_expression(&expr, &FixedResolver).is_err());
    }
}
