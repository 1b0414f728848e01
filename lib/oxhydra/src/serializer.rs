//! JSON-LD and SHACL serialization of the model.
//!
//! Keys are the full URIs given by the [`Resolver`], so the output needs no `@context`.
//! References to other resources are written as `{"@id": ...}` nodes, booleans and counts as
//! typed [`JsonLdLiteral`]s: the output only holds strings, mappings and sequences.

use crate::error::ResolveError;
use crate::grammar::{JsonLdLiteral, Uri};
use crate::model::{
    ApiDocumentation, Collection, CommonProps, EntityRef, Operation, Property, SupportedClass,
    SupportedProperty,
};
use crate::vocab::{Resolver, term};
use serde_json::{Map, Value};

/// Serializes an entity and its children into a JSON-LD node.
///
/// ```
/// use oxhydra::model::{Operation, OperationOptions};
/// use oxhydra::serializer::to_json_ld;
/// use oxhydra::vocab::PrefixTable;
/// use serde_json::json;
///
/// let resolver = PrefixTable::standard();
/// let operation = Operation::get(OperationOptions::default(), &resolver)?;
/// assert_eq!(
///     to_json_ld(&operation, &resolver)?,
///     json!({
///         "@type": "http://www.w3.org/ns/hydra/core#Operation",
///         "http://www.w3.org/ns/hydra/core#method": "GET"
///     })
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn to_json_ld<'a, R: Resolver + ?Sized>(
    entity: impl Into<EntityRef<'a>>,
    resolver: &R,
) -> Result<Value, ResolveError> {
    let serializer = Serializer { resolver };
    Ok(Value::Object(match entity.into() {
        EntityRef::Operation(e) => serializer.operation(e)?,
        EntityRef::Property(e) => serializer.property(e)?,
        EntityRef::SupportedProperty(e) => serializer.supported_property(e)?,
        EntityRef::SupportedClass(e) => serializer.supported_class(e)?,
        EntityRef::Collection(e) => serializer.collection(e)?,
        EntityRef::ApiDocumentation(e) => serializer.api_documentation(e)?,
    }))
}

/// Serializes the SHACL constraints of an entity.
///
/// Only supported properties with a cardinality and supported classes have constraints, all
/// other entities return `None`.
pub fn to_shacl<'a, R: Resolver + ?Sized>(
    entity: impl Into<EntityRef<'a>>,
    resolver: &R,
) -> Result<Option<Value>, ResolveError> {
    let serializer = Serializer { resolver };
    match entity.into() {
        EntityRef::SupportedProperty(e) => Ok(serializer.property_shape(e)?.map(Value::Object)),
        EntityRef::SupportedClass(e) => Ok(Some(Value::Object(serializer.node_shape(e)?))),
        EntityRef::Operation(_)
        | EntityRef::Property(_)
        | EntityRef::Collection(_)
        | EntityRef::ApiDocumentation(_) => Ok(None),
    }
}

/// The node shapes of all the supported classes of a document, in declaration order.
pub fn to_shacl_shapes<R: Resolver + ?Sized>(
    api: &ApiDocumentation,
    resolver: &R,
) -> Result<Vec<Value>, ResolveError> {
    let serializer = Serializer { resolver };
    api.classes()
        .map(|class| Ok(Value::Object(serializer.node_shape(class)?)))
        .collect()
}

struct Serializer<'a, R: ?Sized> {
    resolver: &'a R,
}

impl<R: Resolver + ?Sized> Serializer<'_, R> {
    fn term(&self, term: &str) -> Result<String, ResolveError> {
        self.resolver.resolve(term)
    }

    /// `@id`, `@type`, title and description.
    fn node(
        &self,
        id: Option<&Uri>,
        common: &CommonProps,
    ) -> Result<Map<String, Value>, ResolveError> {
        let mut node = Map::new();
        if let Some(id) = id {
            node.insert("@id".into(), id.as_str().into());
        }
        let types = common.types();
        node.insert(
            "@type".into(),
            if let [single] = types {
                single.as_str().into()
            } else {
                types.iter().map(|t| Value::from(t.as_str())).collect()
            },
        );
        if let Some(title) = common.title() {
            node.insert(self.term(term::TITLE)?, title.into());
        }
        if let Some(description) = common.description() {
            node.insert(self.term(term::DESCRIPTION)?, description.into());
        }
        Ok(node)
    }

    fn insert_link(
        &self,
        node: &mut Map<String, Value>,
        predicate: &str,
        target: Option<&Uri>,
    ) -> Result<(), ResolveError> {
        if let Some(target) = target {
            node.insert(self.term(predicate)?, link(target.as_str()));
        }
        Ok(())
    }

    fn boolean(&self, value: bool) -> Result<Value, ResolveError> {
        Ok(JsonLdLiteral::new_typed_unchecked(value.to_string(), self.term(term::XSD_BOOLEAN)?)
            .to_json())
    }

    fn count(&self, value: u64) -> Result<Value, ResolveError> {
        Ok(JsonLdLiteral::new_typed_unchecked(
            value.to_string(),
            self.term(term::XSD_NON_NEGATIVE_INTEGER)?,
        )
        .to_json())
    }

    fn operations(&self, operations: &[Operation]) -> Result<Value, ResolveError> {
        operations
            .iter()
            .map(|o| Ok(Value::Object(self.operation(o)?)))
            .collect()
    }

    fn operation(&self, operation: &Operation) -> Result<Map<String, Value>, ResolveError> {
        let mut node = self.node(operation.id(), operation.common())?;
        node.insert(self.term(term::METHOD)?, operation.method().as_str().into());
        self.insert_link(&mut node, term::EXPECTS, operation.expects())?;
        self.insert_link(&mut node, term::RETURNS, operation.returns())?;
        Ok(node)
    }

    fn property(&self, property: &Property) -> Result<Map<String, Value>, ResolveError> {
        let mut node = self.node(Some(property.id()), property.common())?;
        self.insert_link(&mut node, term::DOMAIN, property.domain())?;
        self.insert_link(&mut node, term::RANGE, property.range())?;
        Ok(node)
    }

    fn supported_property(
        &self,
        supported: &SupportedProperty,
    ) -> Result<Map<String, Value>, ResolveError> {
        let mut node = self.node(supported.id(), supported.common())?;
        node.insert(
            self.term(term::PROPERTY)?,
            Value::Object(self.property(supported.property())?),
        );
        node.insert(
            self.term(term::REQUIRED)?,
            self.boolean(supported.is_required())?,
        );
        node.insert(
            self.term(term::READABLE)?,
            self.boolean(!supported.is_writeonly())?,
        );
        node.insert(
            self.term(term::WRITEABLE)?,
            self.boolean(!supported.is_readonly())?,
        );
        let property = supported.property();
        if property.is_link() || property.is_template() {
            node.insert(
                self.term(term::SUPPORTED_OPERATION)?,
                self.operations(supported.operations())?,
            );
        }
        Ok(node)
    }

    fn property_shapes(&self, class: &SupportedClass) -> Result<Vec<Value>, ResolveError> {
        let mut shapes = Vec::new();
        for supported in class.supported_properties() {
            if let Some(shape) = self.property_shape(supported)? {
                shapes.push(Value::Object(shape));
            }
        }
        Ok(shapes)
    }

    fn supported_class(&self, class: &SupportedClass) -> Result<Map<String, Value>, ResolveError> {
        let mut node = self.node(Some(class.id()), class.common())?;
        let supported_properties: Value = class
            .supported_properties()
            .iter()
            .map(|p| Ok(Value::Object(self.supported_property(p)?)))
            .collect::<Result<_, ResolveError>>()?;
        node.insert(self.term(term::SUPPORTED_PROPERTY)?, supported_properties);
        node.insert(
            self.term(term::SUPPORTED_OPERATION)?,
            self.operations(class.operations())?,
        );
        let shapes = self.property_shapes(class)?;
        if !shapes.is_empty() {
            node.insert(self.term(term::SH_PROPERTY)?, shapes.into());
        }
        Ok(node)
    }

    fn collection(&self, collection: &Collection) -> Result<Map<String, Value>, ResolveError> {
        let mut node = self.node(Some(collection.id()), collection.common())?;
        self.insert_link(&mut node, term::MEMBER, collection.member_class())?;
        node.insert(
            self.term(term::SUPPORTED_OPERATION)?,
            self.operations(collection.operations())?,
        );
        Ok(node)
    }

    fn api_documentation(
        &self,
        api: &ApiDocumentation,
    ) -> Result<Map<String, Value>, ResolveError> {
        let mut node = self.node(Some(api.id()), api.common())?;
        node.insert(self.term(term::ENTRYPOINT)?, link(api.entrypoint()));
        self.insert_link(
            &mut node,
            term::ENTRYPOINT_CLASS,
            Some(api.entrypoint_class()),
        )?;
        let classes: Value = api
            .supported_classes()
            .iter()
            .map(|class| to_json_ld(class, self.resolver))
            .collect::<Result<_, _>>()?;
        node.insert(self.term(term::SUPPORTED_CLASS)?, classes);
        Ok(node)
    }

    /// `None` when the property has no cardinality: a bare `sh:predicate` constrains nothing.
    fn property_shape(
        &self,
        supported: &SupportedProperty,
    ) -> Result<Option<Map<String, Value>>, ResolveError> {
        if !supported.has_cardinality() {
            return Ok(None);
        }
        let mut shape = Map::new();
        shape.insert(
            self.term(term::SH_PREDICATE)?,
            link(supported.property().id().as_str()),
        );
        if let Some(min_count) = supported.min_count() {
            shape.insert(self.term(term::SH_MIN_COUNT)?, self.count(min_count)?);
        }
        if let Some(max_count) = supported.max_count() {
            shape.insert(self.term(term::SH_MAX_COUNT)?, self.count(max_count)?);
        }
        Ok(Some(shape))
    }

    fn node_shape(&self, class: &SupportedClass) -> Result<Map<String, Value>, ResolveError> {
        let mut shape = Map::new();
        shape.insert("@id".into(), class.id().as_str().into());
        shape.insert("@type".into(), self.term(term::SH_NODE_SHAPE)?.into());
        shape.insert(self.term(term::SH_TARGET_CLASS)?, link(class.id().as_str()));
        let shapes = self.property_shapes(class)?;
        if !shapes.is_empty() {
            shape.insert(self.term(term::SH_PROPERTY)?, shapes.into());
        }
        Ok(shape)
    }
}

fn link(id: &str) -> Value {
    let mut node = Map::new();
    node.insert("@id".into(), id.into());
    Value::Object(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OperationOptions, PropertyOptions, SupportedPropertyOptions};
    use crate::vocab::PrefixTable;
    use serde_json::json;

    const HYDRA: &str = "http://www.w3.org/ns/hydra/core#";

    fn h(name: &str) -> String {
        format!("{HYDRA}{name}")
    }

    #[test]
    fn test_operation_links() {
        let resolver = PrefixTable::standard();
        let operation = Operation::post(
            OperationOptions {
                id: Some("/api/users/create".into()),
                title: Some("Creates a user".into()),
                expects: Some("/api/User".into()),
                returns: Some("/api/User".into()),
                ..Default::default()
            },
            &resolver,
        )
        .unwrap();
        let json = to_json_ld(&operation, &resolver).unwrap();
        assert_eq!(json["@id"], "/api/users/create");
        assert_eq!(json[h("method")], "POST");
        assert_eq!(json[h("title")], "Creates a user");
        assert_eq!(json[h("expects")], json!({"@id": "/api/User"}));
        assert_eq!(json[h("returns")], json!({"@id": "/api/User"}));
        assert!(json.get(h("description")).is_none());
        assert_eq!(to_shacl(&operation, &resolver).unwrap(), None);
    }

    #[test]
    fn test_plain_supported_property_has_no_operations_key() {
        let resolver = PrefixTable::standard();
        let name = Property::property(
            PropertyOptions {
                id: Some("http://schema.org/name".into()),
                domain: Some("/api/User".into()),
                ..Default::default()
            },
            &resolver,
        )
        .unwrap();
        let supported = SupportedProperty::new(
            SupportedPropertyOptions {
                property: Some(name),
                readonly: true,
                ..Default::default()
            },
            &resolver,
        )
        .unwrap();
        let json = to_json_ld(&supported, &resolver).unwrap();
        assert_eq!(json["@type"], h("SupportedProperty"));
        assert_eq!(
            json[h("property")],
            json!({
                "@id": "http://schema.org/name",
                "@type": "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property",
                "http://www.w3.org/2000/01/rdf-schema#domain": {"@id": "/api/User"}
            })
        );
        assert_eq!(
            json[h("writeable")],
            json!({"@value": "false", "@type": "http://www.w3.org/2001/XMLSchema#boolean"})
        );
        assert_eq!(json[h("readable")]["@value"], "true");
        assert!(json.get(h("supportedOperation")).is_none());
        assert_eq!(to_shacl(&supported, &resolver).unwrap(), None);
    }

    #[test]
    fn test_property_shape() {
        let resolver = PrefixTable::standard();
        let supported = SupportedProperty::new(
            SupportedPropertyOptions {
                property: Some(
                    Property::property(
                        PropertyOptions {
                            id: Some("http://schema.org/email".into()),
                            ..Default::default()
                        },
                        &resolver,
                    )
                    .unwrap(),
                ),
                required: true,
                max_count: Some(3),
                ..Default::default()
            },
            &resolver,
        )
        .unwrap();
        let nni = "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
        assert_eq!(
            to_shacl(&supported, &resolver).unwrap(),
            Some(json!({
                "http://www.w3.org/ns/shacl#predicate": {"@id": "http://schema.org/email"},
                "http://www.w3.org/ns/shacl#minCount": {"@value": "1", "@type": nni},
                "http://www.w3.org/ns/shacl#maxCount": {"@value": "3", "@type": nni}
            }))
        );
    }

    #[test]
    fn test_unresolvable_predicate() {
        let resolver = |t: &str| (t == "hydra:Operation").then(|| h("Operation"));
        let operation = Operation::get(OperationOptions::default(), &resolver).unwrap();
        assert!(matches!(
            to_json_ld(&operation, &resolver),
            Err(ResolveError::UnknownPrefix { .. })
        ));
    }
}
