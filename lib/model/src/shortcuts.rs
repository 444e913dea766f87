use rustc_hash::FxHashMap;

/// Expands resource-alias and prefix shortcuts to full IRIs (spec §4.A).
///
/// Two independent string-to-string maps: `aliases` matches a whole
/// token, `prefixes` matches a `token:` prefix of the input. Aliases
/// are tried first; on no hit, prefixes are scanned in insertion
/// order; on no hit, the input is returned unchanged. Unresolved
/// tokens passing through is not an error (spec §7, `ShortcutMiss`).
#[derive(Debug, Clone, Default)]
pub struct ShortcutResolver {
    aliases: FxHashMap<String, String>,
    // Preserves insertion order so "first matching prefix wins" is
    // deterministic, matching the iteration order of the original
    // Python dict-backed implementation.
    prefixes: Vec<(String, String)>,
}

impl ShortcutResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the common RDF/RDFS/XSD/OWL/schema.org/hal prefixes the
    /// reference mirroring utilities hard-code, so a fresh resolver is
    /// useful without the caller registering every namespace by hand.
    pub fn with_builtin_prefixes() -> Self {
        let mut resolver = Self::new();
        for (prefix, iri) in [
            ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
            ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
            ("xsd", "http://www.w3.org/2001/XMLSchema#"),
            ("owl", "http://www.w3.org/2002/07/owl#"),
            ("schema", "http://schema.org/"),
            ("hal", "http://hal.zamia.org/kb/"),
        ] {
            resolver.register_prefix(prefix, iri);
        }
        resolver
    }

    pub fn register_alias(&mut self, alias: impl Into<String>, iri: impl Into<String>) {
        self.aliases.insert(alias.into(), iri.into());
    }

    pub fn register_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        let prefix = prefix.into();
        if let Some(slot) = self.prefixes.iter_mut().find(|(p, _)| *p == prefix) {
            slot.1 = iri.into();
        } else {
            self.prefixes.push((prefix, iri.into()));
        }
    }

    /// Resolves a single shortcut token. Idempotent on already-resolved
    /// IRIs as long as aliases/prefixes do not overlap pathologically
    /// (spec §4.A).
    pub fn resolve(&self, s: &str) -> String {
        if let Some(iri) = self.aliases.get(s) {
            return iri.clone();
        }
        for (prefix, iri) in &self.prefixes {
            let needle = format!("{prefix}:");
            if let Some(local) = s.strip_prefix(&needle) {
                return format!("{iri}{local}");
            }
        }
        s.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_wins_over_prefix() {
        let mut r = ShortcutResolver::new();
        r.register_prefix("wde", "http://www.wikidata.org/entity/");
        r.register_alias("wde:Female", "http://www.wikidata.org/entity/Q6581072");
        assert_eq!(
            r.resolve("wde:Female"),
            "http://www.wikidata.org/entity/Q6581072"
        );
    }

    #[test]
    fn prefix_expands_local_name() {
        let mut r = ShortcutResolver::new();
        r.register_prefix("dbo", "http://dbpedia.org/ontology/");
        assert_eq!(r.resolve("dbo:leader"), "http://dbpedia.org/ontology/leader");
    }

    #[test]
    fn unresolved_token_passes_through() {
        let r = ShortcutResolver::new();
        assert_eq!(r.resolve("http://example.com/foo"), "http://example.com/foo");
    }

    #[test]
    fn idempotent_on_resolved_iri() {
        let mut r = ShortcutResolver::new();
        r.register_prefix("dbo", "http://dbpedia.org/ontology/");
        let once = r.resolve("dbo:leader");
        let twice = r.resolve(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn first_matching_prefix_in_insertion_order_wins() {
        let mut r = ShortcutResolver::new();
        r.register_prefix("a", "http://first/");
        r.register_prefix("a", "http://second/");
        assert_eq!(r.resolve("a:x"), "http://second/x");
    }
}
