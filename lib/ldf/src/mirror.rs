use crate::config::MirrorConfig;
use crate::path::{ResourcePath, Seed, Step};
use oxrdfio::{RdfFormat, RdfParser};
use reqwest::Client;
use sparqldb_model::{Iri, Quad, Result, SparqlDbError, Term};
use sparqldb_store::Store;
use tracing::{debug, info, instrument};

const HYDRA_NEXT_PAGE: &str = "http://www.w3.org/ns/hydra/core#nextPage";
const HYDRA_NEXT: &str = "http://www.w3.org/ns/hydra/core#next";

/// The LDF mirroring engine (spec §4.F): resolves a resource to the
/// LDF endpoint responsible for its host, fetches pages of matching
/// triples, and walks declared resource paths to recurse through the
/// graph.
pub struct Mirror {
    client: Client,
    endpoints: Vec<(String, String)>,
}

impl Mirror {
    pub fn new(config: MirrorConfig) -> Self {
        Self {
            client: Client::new(),
            endpoints: config.endpoints,
        }
    }

    /// Finds the endpoint responsible for `resource`'s host, if any
    /// (spec §4.F, "Endpoint routing").
    fn find_endpoint(&self, resource: &str) -> Option<&str> {
        let host = reqwest::Url::parse(resource).ok()?.host_str()?.to_owned();
        self.endpoints
            .iter()
            .find(|(hostname, _)| *hostname == host)
            .map(|(_, endpoint)| endpoint.as_str())
    }

    /// Resolves the endpoint for a triple pattern: the first of
    /// `(s, p, o)` that resolves one wins (spec §4.F).
    fn resolve_endpoint(&self, s: Option<&str>, p: Option<&str>, o: Option<&str>) -> Option<&str> {
        s.and_then(|s| self.find_endpoint(s))
            .or_else(|| p.and_then(|p| self.find_endpoint(p)))
            .or_else(|| o.and_then(|o| self.find_endpoint(o)))
    }

    /// Fetches every triple matching `(s, p, o)` from the LDF endpoint
    /// responsible for it, following `hydra:nextPage`/`hydra:next`
    /// pagination hints until neither appears (spec §4.F, "Fetch-LDF
    /// primitive"). Returns an empty set (not an error) when no
    /// endpoint covers this pattern, mirroring the reference
    /// mirroring utility this is grounded on.
    #[instrument(skip(self), fields(?s, ?p, ?o))]
    pub async fn fetch_ldf(
        &self,
        s: Option<&str>,
        p: Option<&str>,
        o: Option<&str>,
        context: &str,
    ) -> Result<Vec<Quad>> {
        let Some(endpoint) = self.resolve_endpoint(s, p, o) else {
            return Ok(Vec::new());
        };

        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(s) = s {
            params.push(("subject", s));
        }
        if let Some(p) = p {
            params.push(("predicate", p));
        }
        if let Some(o) = o {
            params.push(("object", o));
        }

        let mut quads = Vec::new();
        let mut url = endpoint.to_owned();
        let mut first_request = true;

        loop {
            info!(%url, "fetching LDF page");
            let mut request = self.client.get(&url).header("Accept", "text/turtle");
            if first_request {
                request = request.query(&params);
            }
            let response = request.send().await?;
            if !response.status().is_success() {
                debug!(status = %response.status(), "LDF endpoint returned non-200, stopping pagination");
                break;
            }
            first_request = false;

            let body = response.text().await?;
            let (page_quads, next_url) = parse_ldf_page(&body, s, p, o, context)?;
            quads.extend(page_quads);

            match next_url {
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(quads)
    }

    /// Walks the declared resource paths, persisting mirrored quads
    /// into `store` under `context` (spec §4.F, "Walk algorithm").
    /// Already-present resources are never re-fetched within one call
    /// (spec §4.F, "Cache discipline") — this is what guarantees
    /// termination of the wildcard step, so the cache check always
    /// runs before any network I/O.
    #[instrument(skip(self, store, paths), fields(%context))]
    pub async fn mirror(&self, store: &Store, paths: &[ResourcePath], context: &str) -> Result<()> {
        let mut todo: Vec<(String, Vec<Step>)> = Vec::new();

        for path in paths {
            let resolved_steps: Vec<Step> = path
                .edge_pattern
                .iter()
                .map(|step| resolve_step(store, step))
                .collect();

            for seed in &path.seeds {
                let resources = self.seed_resources(store, seed, context).await?;
                for resource in resources {
                    todo.push((resource, resolved_steps.clone()));
                }
            }
        }

        while let Some((resource, remaining)) = todo.pop() {
            debug!(%resource, remaining = remaining.len(), queued = todo.len(), "LDF walk: visiting");

            let cached = store
                .filter_quads(Some(&resource), None, None, Some(context), None)
                .await?;
            let (mut quads, do_add) = if cached.is_empty() {
                (self.fetch_ldf(Some(&resource), None, None, context).await?, true)
            } else {
                (cached, false)
            };

            // If present, the transform step reassigns the effective
            // filter to the last matching quad's synthesized predicate
            // (spec §4.F step 2) — matching the reference mirror's
            // `res_filter = unicode(np)` inside the loop body.
            let effective_step_filter = if let Some(Step::Transform { predicate, transform }) =
                remaining.first()
            {
                let mut synthetic = Vec::new();
                let mut last_new_predicate = predicate.clone();
                for quad in &quads {
                    if quad.predicate.as_str() != predicate {
                        continue;
                    }
                    let (new_predicate, new_object) = transform(&quad.object.to_db_object());
                    let new_predicate = store.resolve_shortcuts(&new_predicate);
                    if do_add {
                        synthetic.push(Quad::new(
                            Iri::new(resource.clone()),
                            Iri::new(new_predicate.clone()),
                            Term::iri(new_object),
                            Iri::new(context.to_owned()),
                        ));
                    }
                    last_new_predicate = new_predicate;
                }
                quads.extend(synthetic);
                Some(last_new_predicate)
            } else {
                None
            };

            if do_add {
                store.add_n(&quads).await?;
            }

            if let Some((step, rest)) = remaining.split_first() {
                let step_filter = match (step, &effective_step_filter) {
                    (Step::Transform { .. }, Some(np)) => np.clone(),
                    (Step::Predicate(p), _) => p.clone(),
                    (Step::Wildcard, _) => "*".to_owned(),
                    (Step::Transform { predicate, .. }, None) => predicate.clone(),
                };
                for quad in &quads {
                    let Term::Iri(object_iri) = &quad.object else {
                        continue;
                    };
                    let matches =
                        matches!(step, Step::Wildcard) || step_filter == quad.predicate.as_str();
                    if matches {
                        todo.push((object_iri.as_str().to_owned(), rest.to_vec()));
                    }
                }
            }
        }

        Ok(())
    }

    async fn seed_resources(&self, store: &Store, seed: &Seed, context: &str) -> Result<Vec<String>> {
        match seed {
            Seed::Resource(resource) => Ok(vec![store.resolve_shortcuts(resource)]),
            Seed::Pattern { predicate, object } => {
                let predicate = store.resolve_shortcuts(predicate);
                let object = store.resolve_shortcuts(object);
                let quads = self
                    .fetch_ldf(None, Some(&predicate), Some(&object), context)
                    .await?;
                Ok(quads.into_iter().map(|q| q.subject.into_string()).collect())
            }
        }
    }
}

fn resolve_step(store: &Store, step: &Step) -> Step {
    match step {
        Step::Predicate(p) => Step::Predicate(store.resolve_shortcuts(p)),
        Step::Wildcard => Step::Wildcard,
        Step::Transform { predicate, transform } => Step::Transform {
            predicate: store.resolve_shortcuts(predicate),
            transform: transform.clone(),
        },
    }
}

/// Parses one LDF response page, returning the quads matching the
/// requested pattern (tagged with `context`) plus the next page URL,
/// if the response graph carries a `hydra:nextPage`/`hydra:next` hint.
fn parse_ldf_page(
    body: &str,
    s: Option<&str>,
    p: Option<&str>,
    o: Option<&str>,
    context: &str,
) -> Result<(Vec<Quad>, Option<String>)> {
    let mut quads = Vec::new();
    let mut next_url = None;

    for triple in RdfParser::from_format(RdfFormat::Turtle).for_reader(body.as_bytes()) {
        let triple = triple.map_err(SparqlDbError::malformed_input)?;
        let subject = Iri::from_oxrdf_subject(&triple.subject);
        let predicate = triple.predicate.as_str();

        if predicate == HYDRA_NEXT_PAGE || predicate == HYDRA_NEXT {
            if let oxrdf::Term::NamedNode(next) = &triple.object {
                next_url = Some(next.as_str().to_owned());
            }
            continue;
        }

        if s.is_some_and(|s| s != subject.as_str())
            || p.is_some_and(|p| p != predicate)
            || o.is_some_and(|o| o != object_string(&triple.object))
        {
            continue;
        }

        let object = Term::from_oxrdf(&triple.object);
        if let Term::Literal(lit) = &object {
            if lit.lang.as_deref() == Some("en") && predicate == "http://www.w3.org/2000/01/rdf-schema#label" {
                info!(label = %lit.lexical, "fetched label");
            }
        }

        quads.push(Quad::new(
            subject,
            Iri::new(predicate),
            object,
            Iri::new(context.to_owned()),
        ));
    }

    Ok((quads, next_url))
}

fn object_string(term: &oxrdf::Term) -> String {
    match term {
        oxrdf::Term::NamedNode(n) => n.as_str().to_owned(),
        oxrdf::Term::BlankNode(b) => format!("_:{}", b.as_str()),
        oxrdf::Term::Literal(l) => l.value().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_endpoint_prefers_subject_then_predicate_then_object() {
        let mirror = Mirror::new(MirrorConfig::new(vec![(
            "www.wikidata.org".to_owned(),
            "https://query.wikidata.org/bigdata/ldf".to_owned(),
        )]));
        assert_eq!(
            mirror.resolve_endpoint(
                Some("http://www.wikidata.org/entity/Q1"),
                None,
                None
            ),
            Some("https://query.wikidata.org/bigdata/ldf")
        );
        assert_eq!(mirror.resolve_endpoint(Some("http://other.org/x"), None, None), None);
    }

    #[test]
    fn parse_ldf_page_extracts_next_page_hint() {
        let body = r#"
            @prefix hydra: <http://www.w3.org/ns/hydra/core#> .
            <http://example.com/s> <http://example.com/p> <http://example.com/o> .
            <http://example.com/page1> hydra:nextPage <http://example.com/page2> .
        "#;
        let (quads, next) = parse_ldf_page(body, None, None, None, "http://ctx").unwrap();
        assert_eq!(quads.len(), 1);
        assert_eq!(next.as_deref(), Some("http://example.com/page2"));
    }
}
