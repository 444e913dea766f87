//! Facade crate assembling the SPARQL-to-SQL quad store (spec §2):
//! the quad store (`sparqldb-store`), the algebra/expression compiler
//! (`sparqldb-compiler`), the result materializer (`sparqldb-results`),
//! and the LDF mirror (`sparqldb-ldf`) behind one [`SparqlDb`] handle,
//! the way `rdf-fusion`'s own facade crate assembles its
//! engine/storage/model split behind `rdf_fusion::store::Store`.

mod query;

pub use query::run_query;
pub use sparqldb_compiler::CompiledRelation;
pub use sparqldb_ldf::{Mirror, MirrorConfig, ResourcePath, Seed, Step, TransformFn};
pub use sparqldb_model::{Iri, Literal, Quad, Result, SparqlDbError, Term, Variable};
pub use sparqldb_results::{QueryResults, QuerySolution};
pub use sparqldb_store::{QuadPattern, RdfFormat, Store, StoreConfig};

use std::io::Read;

/// The quad store plus its LDF mirror, bundled behind one handle.
/// `Store` alone is enough for parse/query/remove/filter; `SparqlDb`
/// additionally owns the `Mirror` so callers have one connect call and
/// one place to run `mirror()` against the same store.
pub struct SparqlDb {
    store: Store,
    mirror: Mirror,
}

impl SparqlDb {
    /// Opens the store and configures the LDF mirror's endpoint map in
    /// one call (spec §6, "Configuration inputs").
    pub async fn connect(store_config: StoreConfig, mirror_config: MirrorConfig) -> Result<Self> {
        let store = Store::connect(store_config).await?;
        let mirror = Mirror::new(mirror_config);
        Ok(Self { store, mirror })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn register_alias(&mut self, alias: impl Into<String>, iri: impl Into<String>) {
        self.store.register_alias(alias, iri);
    }

    pub fn register_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.store.register_prefix(prefix, iri);
    }

    pub async fn parse(&self, data: impl Read, format: RdfFormat, context: &str) -> Result<()> {
        self.store.parse(data, format, context).await
    }

    pub async fn add_n(&self, quads: &[Quad]) -> Result<()> {
        self.store.add_n(quads).await
    }

    pub async fn remove(&self, pattern: QuadPattern<'_>) -> Result<()> {
        self.store.remove(pattern).await
    }

    pub async fn clear_graph(&self, context: Option<&str>) -> Result<()> {
        self.store.clear_graph(context).await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn filter_quads(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
        context: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Quad>> {
        self.store
            .filter_quads(subject, predicate, object, context, limit)
            .await
    }

    pub async fn size(&self) -> Result<i64> {
        self.store.size().await
    }

    /// Compiles and runs a SPARQL SELECT query (spec §4.C–§4.E).
    pub async fn query(&self, sparql: &str) -> Result<QueryResults> {
        query::run_query(&self.store, sparql).await
    }

    /// Walks the declared resource paths against the configured LDF
    /// endpoints, persisting mirrored quads under `context` (spec
    /// §4.F).
    pub async fn mirror(&self, paths: &[ResourcePath], context: &str) -> Result<()> {
        self.mirror.mirror(&self.store, paths, context).await
    }
}
