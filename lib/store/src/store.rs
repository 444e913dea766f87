use crate::config::StoreConfig;
use oxrdfio::{RdfFormat, RdfParser};
use sparqldb_model::{Iri, Literal, Quad, Result, ShortcutResolver, SparqlDbError, Term};
use sqlx::any::{AnyKind, AnyPool, AnyPoolOptions};
use sqlx::Row;
use std::io::Read;
use tracing::{debug, instrument, trace};

/// A pattern over quad columns; `None` is a wildcard. Used by
/// [`Store::remove`] and [`Store::filter_quads`] (spec §4.B).
#[derive(Debug, Clone, Default)]
pub struct QuadPattern<'a> {
    pub subject: Option<&'a str>,
    pub predicate: Option<&'a str>,
    pub object: Option<&'a str>,
    pub context: Option<&'a str>,
}

/// The quad store (spec §4.B): persists `(s, p, o, context, lang,
/// datatype)` rows over a connection pool to the backing SQL engine,
/// and owns the alias/prefix shortcut registries (spec §3).
///
/// The store is the sole writer; concurrent writers are undefined
/// (spec §5). Every operation acquires a connection from the pool,
/// executes, and releases it — no long-lived transaction spans more
/// than one [`Store`] method call, except for `add_n`'s own
/// delete-then-insert pair, which share one transaction so the two
/// statements land on the same connection in order.
pub struct Store {
    pool: AnyPool,
    table: String,
    resolver: ShortcutResolver,
}

fn validate_table_name(table: &str) -> Result<()> {
    let ok = !table.is_empty()
        && table
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(SparqlDbError::malformed_input(InvalidTableName(table.to_owned())))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid table name: {0}")]
struct InvalidTableName(String);

fn create_table_sql(table: &str, kind: AnyKind) -> Vec<String> {
    let id_column = match kind {
        AnyKind::Postgres => "id BIGSERIAL PRIMARY KEY",
        AnyKind::Sqlite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
        // Any is `#[non_exhaustive]`; new backends fall back to a
        // plain auto-increment integer.
        _ => "id INTEGER PRIMARY KEY",
    };
    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS {table} (\
                {id_column}, \
                s TEXT NOT NULL, \
                p TEXT NOT NULL, \
                o TEXT NOT NULL, \
                context TEXT NOT NULL, \
                lang TEXT, \
                datatype TEXT\
            )"
        ),
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_s ON {table} (s)"),
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_p ON {table} (p)"),
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_o ON {table} (o)"),
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_context ON {table} (context)"),
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_lang ON {table} (lang)"),
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_spo ON {table} (s, p, o)"),
    ]
}

impl Store {
    /// Opens (and, if needed, creates) the quads table at `config.db_url`.
    #[instrument(skip(config), fields(table = %config.table_name))]
    pub async fn connect(config: StoreConfig) -> Result<Self> {
        sqlx::any::install_default_drivers();
        validate_table_name(&config.table_name)?;

        let pool = AnyPoolOptions::new()
            .max_connections(8)
            .connect(&config.db_url)
            .await?;

        for stmt in create_table_sql(&config.table_name, pool.any_kind()) {
            trace!(%stmt, "running schema migration");
            sqlx::query(&stmt).execute(&pool).await?;
        }

        let mut resolver = ShortcutResolver::with_builtin_prefixes();
        for (alias, iri) in config.aliases {
            resolver.register_alias(alias, iri);
        }
        for (prefix, iri) in config.prefixes {
            resolver.register_prefix(prefix, iri);
        }

        Ok(Self {
            pool,
            table: config.table_name,
            resolver,
        })
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn register_alias(&mut self, alias: impl Into<String>, iri: impl Into<String>) {
        self.resolver.register_alias(alias, iri);
    }

    pub fn register_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.resolver.register_prefix(prefix, iri);
    }

    pub fn resolve_shortcuts(&self, s: &str) -> String {
        self.resolver.resolve(s)
    }

    /// Imports RDF (Turtle, N3, RDF/XML, ...) via an internal bulk
    /// `add_n` (spec §4.B, §6 "RDF import").
    #[instrument(skip(self, data), fields(table = %self.table))]
    pub async fn parse(&self, data: impl Read, format: RdfFormat, context: &str) -> Result<()> {
        let context = Iri::new(context);
        let mut quads = Vec::new();
        for quad in RdfParser::from_format(format).for_reader(data) {
            let quad = quad.map_err(SparqlDbError::malformed_input)?;
            let subject = Iri::from_oxrdf_subject(&quad.subject);
            let predicate = Iri::new(quad.predicate.as_str());
            let object = Term::from_oxrdf(&quad.object);
            quads.push(Quad::new(subject, predicate, object, context.clone()));
        }
        debug!(count = quads.len(), "parsed quads, bulk-inserting");
        self.add_n(&quads).await
    }

    /// Batch upsert (spec §4.B): for each `(s, p, o, context)` key, any
    /// existing row is deleted, then the new row is inserted. Two
    /// statements, delete then insert, sharing one transaction so they
    /// land on the same connection in order. An empty batch is a no-op.
    #[instrument(skip(self, quads), fields(table = %self.table, count = quads.len()))]
    pub async fn add_n(&self, quads: &[Quad]) -> Result<()> {
        if quads.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        let delete_predicate = quads
            .iter()
            .map(|_| "(s = ? AND p = ? AND o = ? AND context = ?)")
            .collect::<Vec<_>>()
            .join(" OR ");
        let delete_sql = format!("DELETE FROM {} WHERE {delete_predicate}", self.table);
        let mut delete_query = sqlx::query(&delete_sql);
        for q in quads {
            delete_query = delete_query
                .bind(q.subject.as_str().to_owned())
                .bind(q.predicate.as_str().to_owned())
                .bind(q.object.to_db_object())
                .bind(q.context.as_str().to_owned());
        }
        delete_query.execute(&mut *tx).await?;

        let values_clause = quads
            .iter()
            .map(|_| "(?, ?, ?, ?, ?, ?)")
            .collect::<Vec<_>>()
            .join(", ");
        let insert_sql = format!(
            "INSERT INTO {} (s, p, o, context, lang, datatype) VALUES {values_clause}",
            self.table
        );
        let mut insert_query = sqlx::query(&insert_sql);
        for q in quads {
            let (lang, datatype) = lang_and_datatype(&q.object);
            insert_query = insert_query
                .bind(q.subject.as_str().to_owned())
                .bind(q.predicate.as_str().to_owned())
                .bind(q.object.to_db_object())
                .bind(q.context.as_str().to_owned())
                .bind(lang)
                .bind(datatype);
        }
        insert_query.execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Deletes rows matching `pattern`; `None` fields are wildcards
    /// (spec §4.B).
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn remove(&self, pattern: QuadPattern<'_>) -> Result<()> {
        let (where_clause, binds) = build_where(&pattern);
        let sql = format!("DELETE FROM {} {where_clause}", self.table);
        let mut query = sqlx::query(&sql);
        for bind in binds {
            query = query.bind(bind);
        }
        query.execute(&self.pool).await?;
        Ok(())
    }

    /// Deletes all rows, optionally restricted to one context (spec
    /// §4.B).
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn clear_graph(&self, context: Option<&str>) -> Result<()> {
        let sql = match context {
            Some(_) => format!("DELETE FROM {} WHERE context = ?", self.table),
            None => format!("DELETE FROM {}", self.table),
        };
        let mut query = sqlx::query(&sql);
        if let Some(ctx) = context {
            query = query.bind(ctx.to_owned());
        }
        query.execute(&self.pool).await?;
        Ok(())
    }

    /// Read scan, rehydrating rows into `(s, p, Term, context)` quads.
    /// Pattern terms (other than context) pass through the shortcut
    /// resolver before matching (spec §4.B).
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn filter_quads(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        context: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Quad>> {
        let resolved_s = subject.map(|s| self.resolve_shortcuts(s));
        let resolved_p = predicate.map(|p| self.resolve_shortcuts(p));
        let resolved_o = object.map(|o| self.resolve_shortcuts(o));

        let pattern = QuadPattern {
            subject: resolved_s.as_deref(),
            predicate: resolved_p.as_deref(),
            object: resolved_o.as_deref(),
            context,
        };
        let (where_clause, binds) = build_where(&pattern);

        let mut sql = format!(
            "SELECT s, p, o, context, lang, datatype FROM {} {where_clause}",
            self.table
        );
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let mut query = sqlx::query(&sql);
        for bind in binds {
            query = query.bind(bind);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                let s: String = row.try_get("s")?;
                let p: String = row.try_get("p")?;
                let o: String = row.try_get("o")?;
                let context: String = row.try_get("context")?;
                let lang: Option<String> = row.try_get("lang")?;
                let datatype: Option<String> = row.try_get("datatype")?;
                let object = Term::from_db(&o, lang.as_deref(), datatype.as_deref());
                Ok(Quad::new(Iri::new(s), Iri::new(p), object, Iri::new(context)))
            })
            .collect()
    }

    /// Total row count (spec §4.B).
    pub async fn size(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) AS c FROM {}", self.table);
        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
        Ok(row.try_get("c")?)
    }

    /// Distinct predicates, optionally capped at `limit` (spec §4.B).
    pub async fn get_all_predicates(&self, limit: Option<u32>) -> Result<Vec<String>> {
        let mut sql = format!("SELECT DISTINCT p FROM {}", self.table);
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(|row| Ok(row.try_get("p")?)).collect()
    }
}

fn lang_and_datatype(term: &Term) -> (Option<String>, Option<String>) {
    match term {
        Term::Literal(Literal { lang, datatype, .. }) => (
            lang.clone(),
            datatype.as_ref().map(|d| d.as_str().to_owned()),
        ),
        _ => (None, None),
    }
}

fn build_where(pattern: &QuadPattern<'_>) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();
    for (column, value) in [
        ("s", pattern.subject),
        ("p", pattern.predicate),
        ("o", pattern.object),
        ("context", pattern.context),
    ] {
        if let Some(value) = value {
            conditions.push(format!("{column} = ?"));
            binds.push(value.to_owned());
        }
    }
    if conditions.is_empty() {
        (String::new(), binds)
    } else {
        (format!("WHERE {}", conditions.join(" AND ")), binds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_n_dedups_on_key() {
        let store = Store::connect(StoreConfig::new("sqlite::memory:", "quads"))
            .await
            .unwrap();
        let quad = Quad::new(
            Iri::new("http://ex/s"),
            Iri::new("http://ex/p"),
            Term::iri("http://ex/o"),
            Iri::new("http://ex/ctx"),
        );
        store.add_n(&[quad.clone(), quad.clone()]).await.unwrap();
        assert_eq!(store.size().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_batch_is_noop() {
        let store = Store::connect(StoreConfig::new("sqlite::memory:", "quads"))
            .await
            .unwrap();
        store.add_n(&[]).await.unwrap();
        assert_eq!(store.size().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn clear_graph_is_context_scoped() {
        let store = Store::connect(StoreConfig::new("sqlite::memory:", "quads"))
            .await
            .unwrap();
        store
            .add_n(&[Quad::new(
                Iri::new("http://ex/s"),
                Iri::new("http://ex/p"),
                Term::iri("http://ex/o"),
                Iri::new("http://ex/a"),
            )])
            .await
            .unwrap();
        store
            .add_n(&[Quad::new(
                Iri::new("http://ex/s2"),
                Iri::new("http://ex/p"),
                Term::iri("http://ex/o"),
                Iri::new("http://ex/b"),
            )])
            .await
            .unwrap();
        store.clear_graph(Some("http://ex/a")).await.unwrap();
        assert_eq!(store.size().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn filter_quads_round_trips_literal_with_language() {
        let store = Store::connect(StoreConfig::new("sqlite::memory:", "quads"))
            .await
            .unwrap();
        store
            .add_n(&[Quad::new(
                Iri::new("http://ex/s"),
                Iri::new("http://ex/p"),
                Term::Literal(Literal::with_language("hallo", "de")),
                Iri::new("http://ex/ctx"),
            )])
            .await
            .unwrap();
        let quads = store
            .filter_quads(None, None, None, None, None)
            .await
            .unwrap();
        assert_eq!(quads.len(), 1);
        match &quads[0].object {
            Term::Literal(lit) => {
                assert_eq!(lit.lexical, "hallo");
                assert_eq!(lit.lang.as_deref(), Some("de"));
            }
            other => panic!("expected literal, got {other:?}"),
        }
    }
}
