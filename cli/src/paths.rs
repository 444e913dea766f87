use serde::Deserialize;
use sparqldb::{ResourcePath, Seed, Step};

/// TOML shape for one resource path spec (spec §4.F, "Resource
/// paths"). `Step::Transform` has no declarative TOML form — it takes
/// a Rust closure — so the CLI surface only covers fixed-predicate and
/// wildcard edge steps; transform steps are a library-level capability
/// for embedders, not the CLI (see DESIGN.md).
#[derive(Debug, Clone, Deserialize)]
pub struct ResourcePathSpec {
    pub seeds: Vec<SeedSpec>,
    #[serde(default)]
    pub edge_pattern: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SeedSpec {
    Resource(String),
    Pattern { predicate: String, object: String },
}

pub fn to_resource_path(spec: &ResourcePathSpec) -> ResourcePath {
    let seeds = spec
        .seeds
        .iter()
        .map(|seed| match seed {
            SeedSpec::Resource(iri) => Seed::resource(iri.clone()),
            SeedSpec::Pattern { predicate, object } => {
                Seed::pattern(predicate.clone(), object.clone())
            }
        })
        .collect();
    let edge_pattern = spec
        .edge_pattern
        .iter()
        .map(|step| {
            if step == "*" {
                Step::wildcard()
            } else {
                Step::predicate(step.clone())
            }
        })
        .collect();
    ResourcePath::new(seeds, edge_pattern)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourcePathsFile {
    #[serde(rename = "path", default)]
    pub paths: Vec<ResourcePathSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_seed_kinds() {
        let toml = r#"
            [[path]]
            seeds = ["wde:AngelaMerkel"]
            edge_pattern = ["wdpd:PlaceOfBirth", "*"]

            [[path]]
            seeds = [{ predicate = "wdpd:PositionHeld", object = "wde:FederalChancellorOfGermany" }]
            edge_pattern = ["wdpd:PlaceOfBirth"]
        "#;
        let parsed: ResourcePathsFile = toml::from_str(toml).unwrap();
        assert_eq!(parsed.paths.len(), 2);
        let first = to_resource_path(&parsed.paths[0]);
        assert_eq!(first.edge_pattern.len(), 2);
    }
}
