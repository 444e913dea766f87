use std::fmt;
use std::sync::Arc;

/// A single starting point for a resource path (spec §4.F, "Resource
/// paths"): either a resolved IRI/alias, or a `(predicate, object)`
/// pattern whose matching subjects become the starting resources.
#[derive(Clone)]
pub enum Seed {
    Resource(String),
    Pattern { predicate: String, object: String },
}

impl Seed {
    pub fn resource(iri: impl Into<String>) -> Self {
        Self::Resource(iri.into())
    }

    pub fn pattern(predicate: impl Into<String>, object: impl Into<String>) -> Self {
        Self::Pattern {
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// A function transforming an object value into a synthetic
/// `(predicate, object)` pair, as used by a [`Step::Transform`] step.
pub type TransformFn = Arc<dyn Fn(&str) -> (String, String) + Send + Sync>;

/// One step of an edge pattern (spec §4.F): follow a fixed predicate,
/// follow any predicate (`*`), or follow a fixed predicate while also
/// synthesizing a derived quad from the matched object.
#[derive(Clone)]
pub enum Step {
    Predicate(String),
    Wildcard,
    Transform {
        predicate: String,
        transform: TransformFn,
    },
}

impl Step {
    pub fn predicate(iri: impl Into<String>) -> Self {
        Self::Predicate(iri.into())
    }

    pub fn wildcard() -> Self {
        Self::Wildcard
    }

    pub fn transform(
        predicate: impl Into<String>,
        transform: impl Fn(&str) -> (String, String) + Send + Sync + 'static,
    ) -> Self {
        Self::Transform {
            predicate: predicate.into(),
            transform: Arc::new(transform),
        }
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(p) => write!(f, "Predicate({p})"),
            Self::Wildcard => write!(f, "Wildcard"),
            Self::Transform { predicate, .. } => write!(f, "Transform({predicate}, <fn>)"),
        }
    }
}

/// A resource path spec: a set of seeds plus the ordered edge pattern
/// to recurse along from each of them (spec §4.F).
#[derive(Clone, Default)]
pub struct ResourcePath {
    pub seeds: Vec<Seed>,
    pub edge_pattern: Vec<Step>,
}

impl ResourcePath {
    pub fn new(seeds: Vec<Seed>, edge_pattern: Vec<Step>) -> Self {
        Self {
            seeds,
            edge_pattern,
        }
    }
}
