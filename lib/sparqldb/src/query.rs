use sparqldb_compiler::compile_query;
use sparqldb_model::{Result, SparqlDbError};
use sparqldb_results::QueryResults;
use sparqldb_store::Store;
use spargebra::Query;
use tracing::{instrument, trace};

/// Parses `sparql`, compiles it against `store`'s table, runs the
/// resulting SQL, and materializes the rows into [`QueryResults`]
/// (spec §4, data flow for queries). This is the one place the four
/// query-side components — the parser (delegated to `spargebra`), the
/// algebra/expression compiler, the backing engine, and the result
/// materializer — are wired together.
#[instrument(skip(store, sparql), fields(table = store.table_name()))]
pub async fn run_query(store: &Store, sparql: &str) -> Result<QueryResults> {
    let query = Query::parse(sparql, None).map_err(SparqlDbError::malformed_input)?;
    let relation = compile_query(store.table_name(), &query)?;

    trace!(sql = %relation.sql, "running compiled query");
    let mut sql_query = sqlx::query(&relation.sql);
    for bind in &relation.binds {
        sql_query = sql_query.bind(bind.clone());
    }
    let rows = sql_query.fetch_all(store.pool()).await?;

    sparqldb_results::materialize(&relation, &rows)
}
