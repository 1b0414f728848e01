//! Hydra entities and their builders.
//!
//! Every entity is an immutable value produced by a builder taking an options record and a
//! [`Resolver`]. The builder checks the grammar of each field and the invariants of the entity
//! before returning it, so a value of one of these types is always well-formed:
//! - [`Operation`] - an HTTP operation
//! - [`Property`] - an RDF property, a Hydra link or a templated link
//! - [`SupportedProperty`] - a property exposed by a class, with cardinality and visibility
//! - [`SupportedClass`] and [`Collection`] - the classes exposed by the API, see [`ApiClass`]
//! - [`ApiDocumentation`] - the root of the description
//!
//! [`Entity`] and [`EntityRef`] close the set of entities into a single sum type.

mod api;
mod class;
mod operation;
mod property;

pub use api::{ApiDocumentation, ApiDocumentationOptions};
pub use class::{ApiClass, Collection, CollectionOptions, SupportedClass, SupportedClassOptions};
pub use operation::{Handler, Operation, OperationOptions};
pub use property::{
    Property, PropertyKind, PropertyOptions, SupportedProperty, SupportedPropertyOptions,
};

use crate::error::{EntityKind, Grammar, GrammarError, HydraError, Rule, ValidationError};
use crate::grammar::Uri;
use crate::vocab::Resolver;

/// Type tags, title and description shared by every entity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommonProps {
    types: Vec<String>,
    title: Option<String>,
    description: Option<String>,
}

impl CommonProps {
    /// Resolves the declared type tags and appends the optional caller-provided type.
    pub(crate) fn build<R: Resolver + ?Sized>(
        declared: &[&str],
        rdf_type: Option<String>,
        title: Option<String>,
        description: Option<String>,
        resolver: &R,
    ) -> Result<Self, HydraError> {
        let mut types = declared
            .iter()
            .map(|term| resolver.resolve(term))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(rdf_type) = uri_field("type", rdf_type)? {
            if !types.iter().any(|t| rdf_type == t.as_str()) {
                types.push(rdf_type.into_string());
            }
        }
        Ok(Self {
            types,
            title,
            description,
        })
    }

    /// The resolved type tags, declared ones first.
    #[inline]
    pub fn types(&self) -> &[String] {
        &self.types
    }

    #[inline]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[inline]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Validates an optional URI field.
pub(crate) fn uri_field(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<Uri>, HydraError> {
    value
        .map(|v| Uri::new(v).map_err(|e| HydraError::grammar(field, e)))
        .transpose()
}

/// Validates a URI field the entity cannot do without.
pub(crate) fn required_uri_field(
    entity: EntityKind,
    rule: Rule,
    field: &'static str,
    value: Option<String>,
) -> Result<Uri, HydraError> {
    uri_field(field, value)?.ok_or_else(|| invalid(entity, rule, &[field]))
}

pub(crate) fn grammar_error(
    field: &'static str,
    grammar: Grammar,
    value: impl Into<String>,
) -> HydraError {
    let error = HydraError::grammar(field, GrammarError::new(grammar, value));
    tracing::debug!(%error, "rejected a field value");
    error
}

pub(crate) fn invalid(entity: EntityKind, rule: Rule, fields: &[&'static str]) -> HydraError {
    tracing::debug!(%entity, %rule, ?fields, "rejected an entity");
    ValidationError::new(entity, rule, fields).into()
}

fn built(entity: EntityKind, id: Option<&Uri>) {
    tracing::trace!(%entity, id = id.map(Uri::as_str), "built an entity");
}

/// Any Hydra entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Operation(Operation),
    Property(Property),
    SupportedProperty(SupportedProperty),
    SupportedClass(SupportedClass),
    Collection(Collection),
    ApiDocumentation(ApiDocumentation),
}

impl Entity {
    pub fn as_ref(&self) -> EntityRef<'_> {
        match self {
            Self::Operation(e) => EntityRef::Operation(e),
            Self::Property(e) => EntityRef::Property(e),
            Self::SupportedProperty(e) => EntityRef::SupportedProperty(e),
            Self::SupportedClass(e) => EntityRef::SupportedClass(e),
            Self::Collection(e) => EntityRef::Collection(e),
            Self::ApiDocumentation(e) => EntityRef::ApiDocumentation(e),
        }
    }
}

impl From<ApiClass> for Entity {
    fn from(class: ApiClass) -> Self {
        match class {
            ApiClass::Class(c) => Self::SupportedClass(c),
            ApiClass::Collection(c) => Self::Collection(c),
        }
    }
}

/// A borrowed Hydra entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityRef<'a> {
    Operation(&'a Operation),
    Property(&'a Property),
    SupportedProperty(&'a SupportedProperty),
    SupportedClass(&'a SupportedClass),
    Collection(&'a Collection),
    ApiDocumentation(&'a ApiDocumentation),
}

impl<'a> EntityRef<'a> {
    pub fn kind(self) -> EntityKind {
        match self {
            Self::Operation(_) => EntityKind::Operation,
            Self::Property(_) => EntityKind::Property,
            Self::SupportedProperty(_) => EntityKind::SupportedProperty,
            Self::SupportedClass(_) => EntityKind::SupportedClass,
            Self::Collection(_) => EntityKind::Collection,
            Self::ApiDocumentation(_) => EntityKind::ApiDocumentation,
        }
    }

    pub fn id(self) -> Option<&'a Uri> {
        match self {
            Self::Operation(e) => e.id(),
            Self::Property(e) => Some(e.id()),
            Self::SupportedProperty(e) => e.id(),
            Self::SupportedClass(e) => Some(e.id()),
            Self::Collection(e) => Some(e.id()),
            Self::ApiDocumentation(e) => Some(e.id()),
        }
    }

    pub fn common(self) -> &'a CommonProps {
        match self {
            Self::Operation(e) => e.common(),
            Self::Property(e) => e.common(),
            Self::SupportedProperty(e) => e.common(),
            Self::SupportedClass(e) => e.common(),
            Self::Collection(e) => e.common(),
            Self::ApiDocumentation(e) => e.common(),
        }
    }

    /// Supported classes and collections are both classes.
    pub fn is_class(self) -> bool {
        matches!(self, Self::SupportedClass(_) | Self::Collection(_))
    }

    pub fn is_collection(self) -> bool {
        matches!(self, Self::Collection(_))
    }

    pub fn is_supported_property(self) -> bool {
        matches!(self, Self::SupportedProperty(_))
    }

    pub fn into_owned(self) -> Entity {
        match self {
            Self::Operation(e) => Entity::Operation(e.clone()),
            Self::Property(e) => Entity::Property(e.clone()),
            Self::SupportedProperty(e) => Entity::SupportedProperty(e.clone()),
            Self::SupportedClass(e) => Entity::SupportedClass(e.clone()),
            Self::Collection(e) => Entity::Collection(e.clone()),
            Self::ApiDocumentation(e) => Entity::ApiDocumentation(e.clone()),
        }
    }
}

impl<'a> From<&'a Entity> for EntityRef<'a> {
    fn from(entity: &'a Entity) -> Self {
        entity.as_ref()
    }
}

impl<'a> From<&'a ApiClass> for EntityRef<'a> {
    fn from(class: &'a ApiClass) -> Self {
        match class {
            ApiClass::Class(c) => Self::SupportedClass(c),
            ApiClass::Collection(c) => Self::Collection(c),
        }
    }
}

macro_rules! entity_conversions {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Entity {
                fn from(entity: $variant) -> Self {
                    Self::$variant(entity)
                }
            }

            impl<'a> From<&'a $variant> for EntityRef<'a> {
                fn from(entity: &'a $variant) -> Self {
                    Self::$variant(entity)
                }
            }
        )*
    };
}

entity_conversions!(
    Operation,
    Property,
    SupportedProperty,
    SupportedClass,
    Collection,
    ApiDocumentation
);
