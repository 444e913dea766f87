//! End-to-end scenarios against an in-memory SQLite backend, covering
//! the concrete cases in spec §8 (adapted to data inlined in the test
//! rather than the original `tests/triples.n3` fixture, which this
//! workspace does not carry).

use sparqldb::{MirrorConfig, QuadPattern, RdfFormat, SparqlDb, StoreConfig};

async fn memory_db() -> SparqlDb {
    SparqlDb::connect(
        StoreConfig::new("sqlite::memory:", "quads"),
        MirrorConfig::default(),
    )
    .await
    .unwrap()
}

const TURTLE: &str = r#"
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix schema: <http://schema.org/> .
@prefix dbo: <http://dbpedia.org/ontology/> .
@prefix ex: <http://example.com/> .

ex:Merkel rdf:type schema:Person ;
    rdfs:label "Angela Merkel"@en ;
    rdfs:label "Angela Merkel"@de ;
    dbo:leader ex:Germany .

ex:Scholz rdf:type schema:Person ;
    rdfs:label "Olaf Scholz"@en ;
    rdfs:label "Olaf Scholz"@de .

ex:Germany rdf:type schema:Country .
"#;

#[tokio::test]
async fn import_and_count() {
    let db = memory_db().await;
    db.parse(TURTLE.as_bytes(), RdfFormat::Turtle, "http://example.com")
        .await
        .unwrap();
    assert_eq!(db.size().await.unwrap(), 8);
}

#[tokio::test]
async fn clear_graph_is_isolated_to_its_context() {
    let db = memory_db().await;
    db.parse(TURTLE.as_bytes(), RdfFormat::Turtle, "http://example.com")
        .await
        .unwrap();
    let before = db.size().await.unwrap();

    db.add_n(&[sparqldb::Quad::new(
        sparqldb::Iri::new("http://example.com/foo"),
        sparqldb::Iri::new("http://example.com/bar"),
        sparqldb::Term::iri("http://example.com/baz"),
        sparqldb::Iri::new("http://foo.com"),
    )])
    .await
    .unwrap();
    assert_eq!(db.size().await.unwrap(), before + 1);

    db.clear_graph(Some("http://bar.com")).await.unwrap();
    assert_eq!(db.size().await.unwrap(), before + 1);

    db.clear_graph(Some("http://example.com")).await.unwrap();
    assert_eq!(db.size().await.unwrap(), 1);
}

#[tokio::test]
async fn optional_join_with_lang_filter() {
    let db = memory_db().await;
    db.parse(TURTLE.as_bytes(), RdfFormat::Turtle, "http://example.com")
        .await
        .unwrap();

    let all = db
        .query(
            "PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
             PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
             PREFIX schema: <http://schema.org/>
             PREFIX dbo: <http://dbpedia.org/ontology/>
             SELECT ?leader ?label ?leaderobj WHERE {
               ?leader rdfs:label ?label .
               ?leader rdf:type schema:Person .
               OPTIONAL { ?leaderobj dbo:leader ?leader }
             }",
        )
        .await
        .unwrap();
    assert_eq!(all.len(), 4);

    let german_only = db
        .query(
            "PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
             PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
             PREFIX schema: <http://schema.org/>
             PREFIX dbo: <http://dbpedia.org/ontology/>
             SELECT ?leader ?label ?leaderobj WHERE {
               ?leader rdfs:label ?label .
               ?leader rdf:type schema:Person .
               OPTIONAL { ?leaderobj dbo:leader ?leader }
               FILTER(lang(?label) = 'de')
             }",
        )
        .await
        .unwrap();
    assert_eq!(german_only.len(), 2);
    for solution in &german_only.bindings {
        let label = solution.get("label").unwrap();
        match label {
            sparqldb::Term::Literal(lit) => assert_eq!(lit.lang.as_deref(), Some("de")),
            other => panic!("expected a literal, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn limit_restricts_binding_count() {
    let db = memory_db().await;
    db.parse(TURTLE.as_bytes(), RdfFormat::Turtle, "http://example.com")
        .await
        .unwrap();

    let results = db
        .query(
            "PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
             PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
             PREFIX schema: <http://schema.org/>
             SELECT ?leader ?label WHERE {
               ?leader rdfs:label ?label .
               ?leader rdf:type schema:Person .
             } LIMIT 1",
        )
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn pattern_removal_narrows_then_empties_scan() {
    let db = memory_db().await;
    db.parse(TURTLE.as_bytes(), RdfFormat::Turtle, "http://example.com")
        .await
        .unwrap();

    let before = db
        .filter_quads(
            Some("http://example.com/Merkel"),
            None,
            None,
            Some("http://example.com"),
            None,
        )
        .await
        .unwrap();
    assert_eq!(before.len(), 3);

    db.remove(QuadPattern {
        subject: Some("http://example.com/Merkel"),
        predicate: Some("http://www.w3.org/2000/01/rdf-schema#label"),
        object: None,
        context: Some("http://example.com"),
    })
    .await
    .unwrap();
    let after_label_removal = db
        .filter_quads(
            Some("http://example.com/Merkel"),
            None,
            None,
            Some("http://example.com"),
            None,
        )
        .await
        .unwrap();
    assert_eq!(after_label_removal.len(), 1);

    db.remove(QuadPattern {
        subject: Some("http://example.com/Merkel"),
        predicate: None,
        object: None,
        context: Some("http://example.com"),
    })
    .await
    .unwrap();
    let after_full_removal = db
        .filter_quads(
            Some("http://example.com/Merkel"),
            None,
            None,
            Some("http://example.com"),
            None,
        )
        .await
        .unwrap();
    assert!(after_full_removal.is_empty());
}

#[tokio::test]
async fn datatype_range_filter_compares_iso8601_lexically() {
    let db = memory_db().await;
    db.add_n(&[
        sparqldb::Quad::new(
            sparqldb::Iri::new("http://example.com/event1"),
            sparqldb::Iri::new("http://example.com/start"),
            sparqldb::Term::Literal(sparqldb::Literal::with_datatype(
                "2016-12-09T06:45:51-05:00",
                sparqldb::Iri::new("http://www.w3.org/2001/XMLSchema#dateTime"),
            )),
            sparqldb::Iri::new("http://example.com"),
        ),
        sparqldb::Quad::new(
            sparqldb::Iri::new("http://example.com/event2"),
            sparqldb::Iri::new("http://example.com/start"),
            sparqldb::Term::Literal(sparqldb::Literal::with_datatype(
                "2016-11-01T00:00:00+00:00",
                sparqldb::Iri::new("http://www.w3.org/2001/XMLSchema#dateTime"),
            )),
            sparqldb::Iri::new("http://example.com"),
        ),
    ])
    .await
    .unwrap();

    let results = db
        .query(
            "PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
             SELECT ?event ?start WHERE {
               ?event <http://example.com/start> ?start .
               FILTER(?start >= \"2016-12-04T10:20:13+05:30\"^^xsd:dateTime)
             }",
        )
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    let solution = &results.bindings[0];
    assert_eq!(
        solution.get("event"),
        Some(&sparqldb::Term::iri("http://example.com/event1"))
    );
}

#[tokio::test]
async fn distinct_keeps_solutions_differing_only_by_language() {
    let db = memory_db().await;
    db.add_n(&[
        sparqldb::Quad::new(
            sparqldb::Iri::new("http://example.com/s1"),
            sparqldb::Iri::new("http://example.com/hasLabel"),
            sparqldb::Term::Literal(sparqldb::Literal::with_language("Berlin", "en")),
            sparqldb::Iri::new("http://example.com"),
        ),
        sparqldb::Quad::new(
            sparqldb::Iri::new("http://example.com/s2"),
            sparqldb::Iri::new("http://example.com/hasLabel"),
            sparqldb::Term::Literal(sparqldb::Literal::with_language("Berlin", "de")),
            sparqldb::Iri::new("http://example.com"),
        ),
    ])
    .await
    .unwrap();

    let results = db
        .query(
            "SELECT DISTINCT ?label WHERE {
               ?s <http://example.com/hasLabel> ?label .
             }",
        )
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
}
