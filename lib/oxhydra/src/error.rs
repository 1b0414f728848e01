//! Error types for building Hydra API documentations.

use std::fmt;

/// Main error type returned by the entity builders.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HydraError {
    /// A field value does not match its grammar.
    #[error("Invalid value for {field}: {source}")]
    Grammar {
        field: &'static str,
        #[source]
        source: GrammarError,
    },

    /// The entity violates a structural or cross-referential invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A vocabulary term could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl HydraError {
    /// Wraps a grammar violation with the name of the field it concerns.
    pub fn grammar(field: &'static str, source: GrammarError) -> Self {
        Self::Grammar { field, source }
    }

    /// Returns the invariant violation if this error is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Grammar { .. } | Self::Resolve(_) => None,
        }
    }

    /// Returns the grammar violation and its field if this error is one.
    pub fn as_grammar(&self) -> Option<(&'static str, &GrammarError)> {
        match self {
            Self::Grammar { field, source } => Some((*field, source)),
            Self::Validation(_) | Self::Resolve(_) => None,
        }
    }
}

/// The string grammars enforced on identifiers and values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Grammar {
    PathComponent,
    RelativePath,
    AbsolutePath,
    PathVariable,
    Uri,
    Curie,
    Datatype,
    LanguageTag,
    JsonLdLiteral,
    Method,
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PathComponent => "path component",
            Self::RelativePath => "relative path",
            Self::AbsolutePath => "absolute path",
            Self::PathVariable => "path variable",
            Self::Uri => "URI",
            Self::Curie => "CURIE",
            Self::Datatype => "XML Schema datatype",
            Self::LanguageTag => "language tag",
            Self::JsonLdLiteral => "JSON-LD literal",
            Self::Method => "HTTP method",
        })
    }
}

/// A string does not match the grammar it was checked against.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{value:?} is not a valid {grammar}")]
pub struct GrammarError {
    grammar: Grammar,
    value: String,
}

impl GrammarError {
    pub(crate) fn new(grammar: Grammar, value: impl Into<String>) -> Self {
        Self {
            grammar,
            value: value.into(),
        }
    }

    /// The grammar that rejected the value.
    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    /// The rejected value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// The kinds of entities a builder can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Operation,
    Property,
    SupportedProperty,
    SupportedClass,
    Collection,
    ApiDocumentation,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Operation => "Operation",
            Self::Property => "Property",
            Self::SupportedProperty => "SupportedProperty",
            Self::SupportedClass => "SupportedClass",
            Self::Collection => "Collection",
            Self::ApiDocumentation => "ApiDocumentation",
        })
    }
}

/// The invariant checked by the builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Rule {
    /// The entity kind requires an identifier.
    MissingIdentifier,
    /// A required builder option is absent.
    MissingOption,
    /// `readonly` and `writeonly` are both set.
    ReadonlyAndWriteonly,
    /// `link` and `template` are both set.
    LinkAndTemplate,
    /// A required property has a min count of zero.
    RequiredMinCount,
    /// An optional property has a positive min count.
    OptionalMinCount,
    /// The min count is greater than the max count.
    MinCountAboveMaxCount,
    /// A plain property carries operations.
    OperationsOnPlainProperty,
    /// The document lists no supported class.
    NoSupportedClass,
    /// Two supported classes share an identifier.
    DuplicateClass,
    /// The entrypoint class is not one of the supported classes.
    EntrypointClassNotSupported,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingIdentifier => "an identifier is required",
            Self::MissingOption => "a required option is missing",
            Self::ReadonlyAndWriteonly => "readonly and writeonly are mutually exclusive",
            Self::LinkAndTemplate => "link and template are mutually exclusive",
            Self::RequiredMinCount => "a required property must have a min count of at least 1",
            Self::OptionalMinCount => "an optional property must have a min count of 0",
            Self::MinCountAboveMaxCount => "the min count must not exceed the max count",
            Self::OperationsOnPlainProperty => {
                "only links and templated links may carry operations"
            }
            Self::NoSupportedClass => "at least one supported class is required",
            Self::DuplicateClass => "supported class identifiers must be unique",
            Self::EntrypointClassNotSupported => {
                "the entrypoint class must be one of the supported classes"
            }
        })
    }
}

/// An entity violates one of its invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {entity} ({field_list}): {rule}", field_list = .fields.join(", "))]
pub struct ValidationError {
    entity: EntityKind,
    rule: Rule,
    fields: Vec<&'static str>,
}

impl ValidationError {
    pub(crate) fn new(entity: EntityKind, rule: Rule, fields: &[&'static str]) -> Self {
        Self {
            entity,
            rule,
            fields: fields.to_vec(),
        }
    }

    /// The kind of entity that failed validation.
    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    /// The failed rule.
    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// The offending fields.
    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }
}

/// A vocabulary term the resolver cannot map to a URI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// The term is not a `prefix:suffix` compact URI.
    #[error("The term {term:?} is not a CURIE")]
    NotACurie { term: String },

    /// The term prefix is not registered.
    #[error("Unknown prefix {prefix:?} in term {term:?}")]
    UnknownPrefix { prefix: String, term: String },
}
