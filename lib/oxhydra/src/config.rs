//! Declarative API description files.
//!
//! An [`ApiConfig`] is a plain JSON tree mirroring the builder options, without handlers and
//! without resolving anything. [`ApiConfig::build`] runs every builder bottom-up:
//!
//! ```
//! use oxhydra::config::ApiConfig;
//! use oxhydra::vocab::PrefixTable;
//!
//! let config = ApiConfig::from_json_str(
//!     r#"{
//!         "id": "/api/doc",
//!         "entrypoint": "/api",
//!         "entrypointClass": "/api/EntryPoint",
//!         "supportedClasses": [
//!             {"kind": "class", "id": "/api/EntryPoint", "operations": [{"method": "GET"}]},
//!             {"kind": "collection", "id": "/api/Users", "paginated": true}
//!         ]
//!     }"#,
//! )?;
//! let api = config.build(&PrefixTable::standard())?;
//! assert_eq!(api.collections().count(), 1);
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

use crate::error::HydraError;
use crate::model::{
    ApiClass, ApiDocumentation, ApiDocumentationOptions, Collection, CollectionOptions,
    Operation, OperationOptions, Property, PropertyOptions, SupportedClass,
    SupportedClassOptions, SupportedProperty, SupportedPropertyOptions,
};
use crate::vocab::Resolver;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// An error raised while loading a description file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Invalid description file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Build(#[from] HydraError),
}

/// The root of a description file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rdf_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrypoint_class: Option<String>,
    pub supported_classes: Vec<ClassConfig>,
}

impl ApiConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Builds the whole documentation, children first.
    pub fn build<R: Resolver + ?Sized>(
        &self,
        resolver: &R,
    ) -> Result<ApiDocumentation, ConfigError> {
        let supported_classes = self
            .supported_classes
            .iter()
            .map(|c| c.build(resolver))
            .collect::<Result<Vec<_>, _>>()?;
        let api = ApiDocumentation::new(
            ApiDocumentationOptions {
                id: self.id.clone(),
                rdf_type: self.rdf_type.clone(),
                title: self.title.clone(),
                description: self.description.clone(),
                entrypoint: self.entrypoint.clone(),
                entrypoint_class: self.entrypoint_class.clone(),
                supported_classes,
            },
            resolver,
        )?;
        tracing::debug!(
            id = api.id().as_str(),
            classes = api.supported_classes().len(),
            "built an API documentation from a description file"
        );
        Ok(api)
    }
}

/// An element of [`ApiConfig::supported_classes`], tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClassConfig {
    Class(SupportedClassConfig),
    Collection(CollectionConfig),
}

impl ClassConfig {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Class(c) => c.id.as_deref(),
            Self::Collection(c) => c.id.as_deref(),
        }
    }

    fn build<R: Resolver + ?Sized>(&self, resolver: &R) -> Result<ApiClass, HydraError> {
        Ok(match self {
            Self::Class(class) => SupportedClass::new(
                SupportedClassOptions {
                    id: class.id.clone(),
                    rdf_type: class.rdf_type.clone(),
                    title: class.title.clone(),
                    description: class.description.clone(),
                    supported_properties: class
                        .supported_properties
                        .iter()
                        .map(|p| p.build(resolver))
                        .collect::<Result<_, _>>()?,
                    operations: build_operations(&class.operations, resolver)?,
                },
                resolver,
            )?
            .into(),
            Self::Collection(collection) => Collection::new(
                CollectionOptions {
                    id: collection.id.clone(),
                    rdf_type: collection.rdf_type.clone(),
                    title: collection.title.clone(),
                    description: collection.description.clone(),
                    paginated: collection.paginated,
                    member_class: collection.member_class.clone(),
                    operations: build_operations(&collection.operations, resolver)?,
                },
                resolver,
            )?
            .into(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupportedClassConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rdf_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supported_properties: Vec<SupportedPropertyConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<OperationConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollectionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rdf_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub paginated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_class: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<OperationConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupportedPropertyConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rdf_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertyConfig>,
    pub required: bool,
    pub readonly: bool,
    pub writeonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_count: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<OperationConfig>,
}

impl SupportedPropertyConfig {
    fn build<R: Resolver + ?Sized>(&self, resolver: &R) -> Result<SupportedProperty, HydraError> {
        SupportedProperty::new(
            SupportedPropertyOptions {
                id: self.id.clone(),
                rdf_type: self.rdf_type.clone(),
                title: self.title.clone(),
                description: self.description.clone(),
                property: self
                    .property
                    .as_ref()
                    .map(|p| p.build(resolver))
                    .transpose()?,
                required: self.required,
                readonly: self.readonly,
                writeonly: self.writeonly,
                min_count: self.min_count,
                max_count: self.max_count,
                operations: build_operations(&self.operations, resolver)?,
            },
            resolver,
        )
    }
}

/// The flavor of a [`PropertyConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyConfigKind {
    #[default]
    Property,
    Link,
    TemplatedLink,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyConfig {
    pub kind: PropertyConfigKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rdf_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

impl PropertyConfig {
    fn build<R: Resolver + ?Sized>(&self, resolver: &R) -> Result<Property, HydraError> {
        Property::new(
            PropertyOptions {
                id: self.id.clone(),
                rdf_type: self.rdf_type.clone(),
                title: self.title.clone(),
                description: self.description.clone(),
                domain: self.domain.clone(),
                range: self.range.clone(),
                link: self.kind == PropertyConfigKind::Link,
                template: self.kind == PropertyConfigKind::TemplatedLink,
            },
            resolver,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OperationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rdf_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expects: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
}

fn build_operations<R: Resolver + ?Sized>(
    operations: &[OperationConfig],
    resolver: &R,
) -> Result<Vec<Operation>, HydraError> {
    operations
        .iter()
        .map(|operation| {
            Operation::new(
                OperationOptions {
                    id: operation.id.clone(),
                    rdf_type: operation.rdf_type.clone(),
                    title: operation.title.clone(),
                    description: operation.description.clone(),
                    method: operation.method.clone(),
                    expects: operation.expects.clone(),
                    returns: operation.returns.clone(),
                    handler: None,
                },
                resolver,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Rule;
    use crate::grammar::Method;
    use crate::vocab::PrefixTable;

    const USERS: &str = r#"{
        "id": "/api/doc",
        "title": "Users API",
        "entrypoint": "/api",
        "entrypointClass": "/api/User",
        "unknownKey": [1, 2, 3],
        "supportedClasses": [
            {
                "kind": "class",
                "id": "/api/User",
                "supportedProperties": [
                    {
                        "property": {"id": "/api/User/name", "range": "xsd:string"},
                        "required": true
                    },
                    {
                        "property": {"kind": "link", "id": "/api/User/friends"},
                        "readonly": true,
                        "operations": [{"method": "GET", "returns": "/api/Users"}]
                    }
                ],
                "operations": [{"method": "PUT"}, {"method": "DELETE"}]
            },
            {"kind": "collection", "id": "/api/Users", "memberClass": "/api/User"}
        ]
    }"#;

    #[test]
    fn test_build() {
        let api = ApiConfig::from_json_str(USERS)
            .unwrap()
            .build(&PrefixTable::standard())
            .unwrap();
        assert_eq!(api.common().title(), Some("Users API"));
        let user = api.classes().next().unwrap();
        assert_eq!(
            user.operations().iter().map(Operation::method).collect::<Vec<_>>(),
            [Method::Put, Method::Delete]
        );
        let [name, friends] = user.supported_properties() else {
            panic!("two supported properties expected")
        };
        assert!(name.is_required());
        assert_eq!(name.min_count(), Some(1));
        assert!(friends.property().is_link());
        assert_eq!(friends.operations().len(), 1);
        let users = api.collections().next().unwrap();
        assert_eq!(users.member_class().unwrap(), "/api/User");
    }

    #[test]
    fn test_build_error() {
        let config = ApiConfig::from_json_str(
            r#"{
                "id": "/api/doc",
                "entrypoint": "/api",
                "entrypointClass": "/api/User",
                "supportedClasses": [{
                    "kind": "class",
                    "id": "/api/User",
                    "supportedProperties": [{
                        "property": {"id": "/api/User/name"},
                        "readonly": true,
                        "writeonly": true
                    }]
                }]
            }"#,
        )
        .unwrap();
        let ConfigError::Build(error) = config.build(&PrefixTable::standard()).unwrap_err() else {
            panic!("build error expected")
        };
        assert_eq!(
            error.as_validation().unwrap().rule(),
            Rule::ReadonlyAndWriteonly
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ApiConfig::from_json_str(r#"{"supportedClasses": [{"id": "/api/User"}]}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            ApiConfig::from_json_str(r#"{"supportedClasses": [{"kind": "shape"}]}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            ApiConfig::from_reader(&b"{"[..]),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_reader_errors() {
        struct FailingReader;

        impl Read for FailingReader {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disconnected"))
            }
        }

        let Err(ConfigError::Json(error)) = ApiConfig::from_reader(FailingReader) else {
            panic!("JSON error expected")
        };
        assert!(error.is_io());
        assert!(error.to_string().contains("disconnected"));
    }

    #[test]
    fn test_serialization() {
        let config = ApiConfig::from_json_str(USERS).unwrap();
        let json = config.to_json_string().unwrap();
        let reparsed = ApiConfig::from_json_str(&json).unwrap();
        assert_eq!(config, reparsed);
        assert_eq!(config.supported_classes[1].id(), Some("/api/Users"));
    }
}
