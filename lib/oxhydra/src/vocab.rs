//! Vocabulary terms and their resolution to full URIs.
//!
//! The model never spells out a vocabulary URI: every type tag and predicate is written as a
//! compact term (see [`term`]) and turned into a URI by a [`Resolver`] given by the caller.

use crate::error::ResolveError;
use oxiri::{Iri, IriParseError};
use rustc_hash::FxHashMap;

/// Maps a vocabulary term to a fully qualified URI.
///
/// Implementations must be read-only for the duration of a build or serialization call.
pub trait Resolver {
    fn resolve(&self, term: &str) -> Result<String, ResolveError>;
}

/// A closure lookup, returning `None` for unknown terms.
impl<F: Fn(&str) -> Option<String>> Resolver for F {
    fn resolve(&self, term: &str) -> Result<String, ResolveError> {
        self(term).ok_or_else(|| match term.split_once(':') {
            Some((prefix, _)) => ResolveError::UnknownPrefix {
                prefix: prefix.into(),
                term: term.into(),
            },
            None => ResolveError::NotACurie { term: term.into() },
        })
    }
}

/// A prefix table resolving `prefix:suffix` terms by concatenation.
///
/// ```
/// use oxhydra::vocab::{PrefixTable, Resolver};
///
/// let table = PrefixTable::standard();
/// assert_eq!(
///     table.resolve("hydra:Class")?,
///     "http://www.w3.org/ns/hydra/core#Class"
/// );
/// assert!(table.resolve("foo:Bar").is_err());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrefixTable {
    prefixes: FxHashMap<String, String>,
}

impl PrefixTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The `hydra`, `rdf`, `rdfs`, `xsd`, `sh` and `owl` prefixes.
    pub fn standard() -> Self {
        let prefixes = [
            ("hydra", namespace::HYDRA),
            ("rdf", namespace::RDF),
            ("rdfs", namespace::RDFS),
            ("xsd", namespace::XSD),
            ("sh", namespace::SHACL),
            ("owl", namespace::OWL),
        ];
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|(prefix, iri)| (prefix.to_owned(), iri.to_owned()))
                .collect(),
        }
    }

    /// Adds or replaces a prefix. The namespace must be an absolute IRI.
    pub fn with_prefix(
        mut self,
        prefix: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Result<Self, IriParseError> {
        let namespace = Iri::parse(namespace.into())?.into_inner();
        self.prefixes.insert(prefix.into(), namespace);
        Ok(self)
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }
}

impl Resolver for PrefixTable {
    /// Fails with [`ResolveError::NotACurie`] if the term has no prefix and with
    /// [`ResolveError::UnknownPrefix`] if the prefix is not in the table.
    fn resolve(&self, term: &str) -> Result<String, ResolveError> {
        let Some((prefix, suffix)) = term.split_once(':') else {
            return Err(ResolveError::NotACurie { term: term.into() });
        };
        let namespace = self
            .prefixes
            .get(prefix)
            .ok_or_else(|| ResolveError::UnknownPrefix {
                prefix: prefix.into(),
                term: term.into(),
            })?;
        Ok(format!("{namespace}{suffix}"))
    }
}

/// Namespaces registered by [`PrefixTable::standard`].
pub mod namespace {
    pub const HYDRA: &str = "http://www.w3.org/ns/hydra/core#";
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const SHACL: &str = "http://www.w3.org/ns/shacl#";
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
}

/// Compact terms used as type tags and predicates.
pub mod term {
    pub const API_DOCUMENTATION: &str = "hydra:ApiDocumentation";
    pub const CLASS: &str = "hydra:Class";
    pub const COLLECTION: &str = "hydra:Collection";
    pub const DESCRIPTION: &str = "hydra:description";
    pub const ENTRYPOINT: &str = "hydra:entrypoint";
    pub const ENTRYPOINT_CLASS: &str = "hydra:entrypointClass";
    pub const EXPECTS: &str = "hydra:expects";
    pub const LINK: &str = "hydra:Link";
    pub const MEMBER: &str = "hydra:member";
    pub const METHOD: &str = "hydra:method";
    pub const OPERATION: &str = "hydra:Operation";
    pub const PAGED_COLLECTION: &str = "hydra:PagedCollection";
    pub const PROPERTY: &str = "hydra:property";
    pub const READABLE: &str = "hydra:readable";
    pub const REQUIRED: &str = "hydra:required";
    pub const RETURNS: &str = "hydra:returns";
    pub const SUPPORTED_CLASS: &str = "hydra:supportedClass";
    pub const SUPPORTED_OPERATION: &str = "hydra:supportedOperation";
    pub const SUPPORTED_PROPERTY: &str = "hydra:supportedProperty";
    pub const SUPPORTED_PROPERTY_TYPE: &str = "hydra:SupportedProperty";
    pub const TEMPLATED_LINK: &str = "hydra:TemplatedLink";
    pub const TITLE: &str = "hydra:title";
    pub const WRITEABLE: &str = "hydra:writeable";

    pub const RDF_PROPERTY: &str = "rdf:Property";
    pub const DOMAIN: &str = "rdfs:domain";
    pub const RANGE: &str = "rdfs:range";

    pub const XSD_BOOLEAN: &str = "xsd:boolean";
    pub const XSD_NON_NEGATIVE_INTEGER: &str = "xsd:nonNegativeInteger";

    pub const SH_MAX_COUNT: &str = "sh:maxCount";
    pub const SH_MIN_COUNT: &str = "sh:minCount";
    pub const SH_NODE_SHAPE: &str = "sh:NodeShape";
    pub const SH_PREDICATE: &str = "sh:predicate";
    pub const SH_PROPERTY: &str = "sh:property";
    pub const SH_TARGET_CLASS: &str = "sh:targetClass";
}
