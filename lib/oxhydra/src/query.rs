//! Read-only lookups in an [`ApiDocumentation`].
//!
//! A lookup that finds nothing returns `None` or an empty slice, never an error. Every search
//! walks the supported classes in declaration order and returns the first match.

use crate::grammar::Uri;
use crate::model::{ApiClass, ApiDocumentation, EntityRef, Operation, Property, SupportedProperty};

/// Finds a supported class or collection by identifier.
pub fn find_class<'a>(api: &'a ApiDocumentation, id: &str) -> Option<&'a ApiClass> {
    api.supported_classes().iter().find(|c| *c.id() == *id)
}

/// Finds a supported property by its own identifier, across all classes.
pub fn find_supported_property<'a>(
    api: &'a ApiDocumentation,
    id: &str,
) -> Option<&'a SupportedProperty> {
    supported_properties(api).find(|p| p.id().is_some_and(|p| *p == *id))
}

/// Finds the property wrapped by one of the supported properties of the document.
pub fn find_property<'a>(api: &'a ApiDocumentation, id: &str) -> Option<&'a Property> {
    supported_properties(api)
        .map(SupportedProperty::property)
        .find(|p| *p.id() == *id)
}

/// The class-level operations of a class, empty if there is no such class.
pub fn find_class_operations<'a>(api: &'a ApiDocumentation, id: &str) -> &'a [Operation] {
    find_class(api, id).map_or(&[], ApiClass::operations)
}

/// Looks for a class, then a supported property, then a property with this identifier.
///
/// ```
/// use oxhydra::model::{ApiDocumentation, ApiDocumentationOptions, SupportedClass, SupportedClassOptions};
/// use oxhydra::query::find_model;
/// use oxhydra::vocab::PrefixTable;
///
/// let resolver = PrefixTable::standard();
/// let class = SupportedClass::new(
///     SupportedClassOptions {
///         id: Some("/api/EntryPoint".into()),
///         ..Default::default()
///     },
///     &resolver,
/// )?;
/// let api = ApiDocumentation::new(
///     ApiDocumentationOptions {
///         id: Some("/api/doc".into()),
///         entrypoint: Some("/api".into()),
///         entrypoint_class: Some("/api/EntryPoint".into()),
///         supported_classes: vec![class.into()],
///         ..Default::default()
///     },
///     &resolver,
/// )?;
/// assert!(find_model(&api, "/api/EntryPoint").is_some_and(|m| m.is_class()));
/// assert!(find_model(&api, "/api/Nothing").is_none());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn find_model<'a>(api: &'a ApiDocumentation, id: &str) -> Option<EntityRef<'a>> {
    find_class(api, id)
        .map(EntityRef::from)
        .or_else(|| find_supported_property(api, id).map(EntityRef::from))
        .or_else(|| find_property(api, id).map(EntityRef::from))
}

fn supported_properties(api: &ApiDocumentation) -> impl Iterator<Item = &SupportedProperty> {
    api.supported_classes()
        .iter()
        .flat_map(ApiClass::supported_properties)
}

/// Either a raw identifier or a model entity.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Uri(&'a str),
    Model(EntityRef<'a>),
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(uri: &'a str) -> Self {
        Self::Uri(uri)
    }
}

impl<'a> From<&'a Uri> for Target<'a> {
    fn from(uri: &'a Uri) -> Self {
        Self::Uri(uri.as_str())
    }
}

impl<'a> From<EntityRef<'a>> for Target<'a> {
    fn from(entity: EntityRef<'a>) -> Self {
        Self::Model(entity)
    }
}

/// The identifier of a raw URI (itself) or of an entity (`None` if it has none).
///
/// ```
/// use oxhydra::query::identifier;
///
/// assert_eq!(identifier("/api/User"), Some("/api/User"));
/// ```
pub fn identifier<'a>(target: impl Into<Target<'a>>) -> Option<&'a str> {
    match target.into() {
        Target::Uri(uri) => Some(uri),
        Target::Model(entity) => entity.id().map(Uri::as_str),
    }
}
