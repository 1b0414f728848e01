use super::{CommonProps, Operation, SupportedProperty, built, required_uri_field, uri_field};
use crate::error::{EntityKind, HydraError, Rule};
use crate::grammar::Uri;
use crate::vocab::{Resolver, term};

/// Options of [`SupportedClass::new`]. The identifier is required.
#[derive(Debug, Clone, Default)]
pub struct SupportedClassOptions {
    pub id: Option<String>,
    pub rdf_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub supported_properties: Vec<SupportedProperty>,
    pub operations: Vec<Operation>,
}

/// An RDF class exposed by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportedClass {
    id: Uri,
    common: CommonProps,
    supported_properties: Vec<SupportedProperty>,
    operations: Vec<Operation>,
}

impl SupportedClass {
    pub fn new<R: Resolver + ?Sized>(
        options: SupportedClassOptions,
        resolver: &R,
    ) -> Result<Self, HydraError> {
        let class = Self {
            id: required_uri_field(
                EntityKind::SupportedClass,
                Rule::MissingIdentifier,
                "id",
                options.id,
            )?,
            common: CommonProps::build(
                &[term::CLASS],
                options.rdf_type,
                options.title,
                options.description,
                resolver,
            )?,
            supported_properties: options.supported_properties,
            operations: options.operations,
        };
        built(EntityKind::SupportedClass, Some(&class.id));
        Ok(class)
    }

    #[inline]
    pub fn id(&self) -> &Uri {
        &self.id
    }

    #[inline]
    pub fn common(&self) -> &CommonProps {
        &self.common
    }

    #[inline]
    pub fn supported_properties(&self) -> &[SupportedProperty] {
        &self.supported_properties
    }

    #[inline]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }
}

/// Options of [`Collection::new`]. The identifier is required.
#[derive(Debug, Clone, Default)]
pub struct CollectionOptions {
    pub id: Option<String>,
    pub rdf_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub paginated: bool,
    /// Type of the collection members.
    pub member_class: Option<String>,
    pub operations: Vec<Operation>,
}

/// A collection class, typed `hydra:Class` and `hydra:Collection`, plus
/// `hydra:PagedCollection` when paginated.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    id: Uri,
    common: CommonProps,
    paginated: bool,
    member_class: Option<Uri>,
    operations: Vec<Operation>,
}

impl Collection {
    pub fn new<R: Resolver + ?Sized>(
        options: CollectionOptions,
        resolver: &R,
    ) -> Result<Self, HydraError> {
        let declared: &[&str] = if options.paginated {
            &[term::CLASS, term::COLLECTION, term::PAGED_COLLECTION]
        } else {
            &[term::CLASS, term::COLLECTION]
        };
        let collection = Self {
            id: required_uri_field(
                EntityKind::Collection,
                Rule::MissingIdentifier,
                "id",
                options.id,
            )?,
            common: CommonProps::build(
                declared,
                options.rdf_type,
                options.title,
                options.description,
                resolver,
            )?,
            paginated: options.paginated,
            member_class: uri_field("member_class", options.member_class)?,
            operations: options.operations,
        };
        built(EntityKind::Collection, Some(&collection.id));
        Ok(collection)
    }

    #[inline]
    pub fn id(&self) -> &Uri {
        &self.id
    }

    #[inline]
    pub fn common(&self) -> &CommonProps {
        &self.common
    }

    #[inline]
    pub fn is_paginated(&self) -> bool {
        self.paginated
    }

    #[inline]
    pub fn member_class(&self) -> Option<&Uri> {
        self.member_class.as_ref()
    }

    #[inline]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }
}

/// An element of [`ApiDocumentation::supported_classes`](super::ApiDocumentation::supported_classes).
#[derive(Debug, Clone, PartialEq)]
pub enum ApiClass {
    Class(SupportedClass),
    Collection(Collection),
}

impl ApiClass {
    pub fn id(&self) -> &Uri {
        match self {
            Self::Class(c) => c.id(),
            Self::Collection(c) => c.id(),
        }
    }

    pub fn common(&self) -> &CommonProps {
        match self {
            Self::Class(c) => c.common(),
            Self::Collection(c) => c.common(),
        }
    }

    pub fn operations(&self) -> &[Operation] {
        match self {
            Self::Class(c) => c.operations(),
            Self::Collection(c) => c.operations(),
        }
    }

    /// Collections have no supported properties.
    pub fn supported_properties(&self) -> &[SupportedProperty] {
        match self {
            Self::Class(c) => c.supported_properties(),
            Self::Collection(_) => &[],
        }
    }

    pub fn as_class(&self) -> Option<&SupportedClass> {
        match self {
            Self::Class(c) => Some(c),
            Self::Collection(_) => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Class(_) => None,
            Self::Collection(c) => Some(c),
        }
    }
}

impl From<SupportedClass> for ApiClass {
    fn from(class: SupportedClass) -> Self {
        Self::Class(class)
    }
}

impl From<Collection> for ApiClass {
    fn from(collection: Collection) -> Self {
        Self::Collection(collection)
    }
}
