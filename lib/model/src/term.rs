use std::fmt;

/// An IRI, stored and compared as its string form. Blank nodes pass
/// through the store as opaque IRIs (see module docs); this type does
/// not validate IRI syntax, matching the store's "pass whatever string
/// arrived" behavior at ingest time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(String);

impl Iri {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Iri {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Iri {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Iri {
    /// Converts an `oxrdf` subject (named node or blank node) to the
    /// store's `s`-column representation. Blank nodes are stored as
    /// opaque `_:`-prefixed IRIs (spec §3, "RDF Term").
    pub fn from_oxrdf_subject(subject: &oxrdf::NamedOrBlankNode) -> Self {
        match subject {
            oxrdf::NamedOrBlankNode::NamedNode(n) => Self::new(n.as_str()),
            oxrdf::NamedOrBlankNode::BlankNode(b) => Self::new(format!("_:{}", b.as_str())),
        }
    }
}

/// A SPARQL variable name, without the leading `?`/`$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable(String);

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// An RDF literal: a lexical form plus an optional language tag and an
/// optional datatype IRI. The two are mutually exclusive in well-formed
/// RDF (spec ties this to the readback heuristic in [`Term::from_db`]),
/// but this type does not itself enforce that — the store is the sole
/// writer and is responsible for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub lexical: String,
    pub lang: Option<String>,
    pub datatype: Option<Iri>,
}

impl Literal {
    pub fn new(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            lang: None,
            datatype: None,
        }
    }

    pub fn with_language(lexical: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            lang: Some(lang.into()),
            datatype: None,
        }
    }

    pub fn with_datatype(lexical: impl Into<String>, datatype: Iri) -> Self {
        Self {
            lexical: lexical.into(),
            lang: None,
            datatype: Some(datatype),
        }
    }
}

/// An RDF term: either an IRI, a literal, or (only inside algebra /
/// expression trees, never inside a stored [`Quad`]) a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Iri(Iri),
    Literal(Literal),
    Variable(Variable),
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Self::Iri(Iri::new(value.into()))
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Disambiguates IRI vs. Literal at row readback, the sole rule the
    /// store uses to tell the two apart once lang/datatype have been
    /// split into their own columns (spec §3, "Invariants").
    pub fn from_db(o: &str, lang: Option<&str>, datatype: Option<&str>) -> Self {
        if lang.is_some() || datatype.is_some() || o.is_empty() || !o.starts_with("http://") {
            Self::Literal(Literal {
                lexical: o.to_owned(),
                lang: lang.map(ToOwned::to_owned),
                datatype: datatype.map(Iri::new),
            })
        } else {
            Self::iri(o)
        }
    }

    /// Converts an `oxrdf` term (the shape `oxrdfio`'s parsers and the
    /// LDF mirror's Turtle parsing both hand back) into the store's
    /// term representation. A plain `xsd:string` literal is stored
    /// without an explicit datatype, matching RDF 1.1's "simple
    /// literal" convention.
    pub fn from_oxrdf(term: &oxrdf::Term) -> Self {
        match term {
            oxrdf::Term::NamedNode(n) => Self::iri(n.as_str()),
            oxrdf::Term::BlankNode(b) => Self::iri(format!("_:{}", b.as_str())),
            oxrdf::Term::Literal(l) => {
                if let Some(lang) = l.language() {
                    Self::Literal(Literal::with_language(l.value(), lang))
                } else if l.datatype().as_str() == "http://www.w3.org/2001/XMLSchema#string" {
                    Self::Literal(Literal::new(l.value()))
                } else {
                    Self::Literal(Literal::with_datatype(l.value(), Iri::new(l.datatype().as_str())))
                }
            }
        }
    }

    /// The string stored in the `o` column for this term.
    pub fn to_db_object(&self) -> String {
        match self {
            Self::Iri(iri) => iri.as_str().to_owned(),
            Self::Literal(lit) => lit.lexical.clone(),
            Self::Variable(var) => var.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Literal(lit) => {
                write!(f, "\"{}\"", lit.lexical)?;
                if let Some(lang) = &lit.lang {
                    write!(f, "@{lang}")?;
                } else if let Some(dt) = &lit.datatype {
                    write!(f, "^^<{dt}>")?;
                }
                Ok(())
            }
            Self::Variable(var) => write!(f, "{var}"),
        }
    }
}

/// A quad: a triple plus the named graph (context) it lives in (spec
/// §3). `subject` and `predicate` are always IRIs; `object` may be an
/// IRI or a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quad {
    pub subject: Iri,
    pub predicate: Iri,
    pub object: Term,
    pub context: Iri,
}

impl Quad {
    pub fn new(subject: Iri, predicate: Iri, object: Term, context: Iri) -> Self {
        Self {
            subject,
            predicate,
            object,
            context,
        }
    }
}
