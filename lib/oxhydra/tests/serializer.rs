#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use oxhydra::model::*;
use oxhydra::{PrefixTable, ResolveError, to_json_ld, to_shacl, to_shacl_shapes};
use serde_json::{Value, json};
use std::error::Error;

const HYDRA: &str = "http://www.w3.org/ns/hydra/core#";
const SH: &str = "http://www.w3.org/ns/shacl#";
const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

fn hydra(name: &str) -> String {
    format!("{HYDRA}{name}")
}

fn sh(name: &str) -> String {
    format!("{SH}{name}")
}

fn api(resolver: &PrefixTable) -> Result<ApiDocumentation, Box<dyn Error>> {
    let name = SupportedProperty::new(
        SupportedPropertyOptions {
            property: Some(Property::property(
                PropertyOptions {
                    id: Some("/api/User/name".into()),
                    range: Some(format!("{XSD}string")),
                    ..Default::default()
                },
                resolver,
            )?),
            required: true,
            max_count: Some(1),
            ..Default::default()
        },
        resolver,
    )?;
    let nickname = SupportedProperty::new(
        SupportedPropertyOptions {
            property: Some(Property::property(
                PropertyOptions {
                    id: Some("/api/User/nickname".into()),
                    ..Default::default()
                },
                resolver,
            )?),
            writeonly: true,
            ..Default::default()
        },
        resolver,
    )?;
    let user = SupportedClass::new(
        SupportedClassOptions {
            id: Some("/api/User".into()),
            title: Some("User".into()),
            supported_properties: vec![name, nickname],
            operations: vec![Operation::put(
                OperationOptions {
                    expects: Some("/api/User".into()),
                    ..Default::default()
                },
                resolver,
            )?],
            ..Default::default()
        },
        resolver,
    )?;
    let users = Collection::new(
        CollectionOptions {
            id: Some("/api/Users".into()),
            member_class: Some("/api/User".into()),
            ..Default::default()
        },
        resolver,
    )?;
    Ok(ApiDocumentation::new(
        ApiDocumentationOptions {
            id: Some("/api/doc".into()),
            description: Some("Users".into()),
            entrypoint: Some("/api".into()),
            entrypoint_class: Some("/api/User".into()),
            supported_classes: vec![user.into(), users.into()],
            ..Default::default()
        },
        resolver,
    )?)
}

#[test]
fn test_api_documentation() -> Result<(), Box<dyn Error>> {
    let resolver = PrefixTable::standard();
    let json = to_json_ld(&api(&resolver)?, &resolver)?;
    assert_eq!(json["@id"], "/api/doc");
    assert_eq!(json["@type"], hydra("ApiDocumentation"));
    assert_eq!(json[hydra("description")], "Users");
    assert_eq!(json[hydra("entrypoint")], json!({"@id": "/api"}));
    assert_eq!(json[hydra("entrypointClass")], json!({"@id": "/api/User"}));
    let classes = json[hydra("supportedClass")].as_array().unwrap();
    assert_eq!(classes.len(), 2);
    assert_eq!(classes[0]["@id"], "/api/User");
    assert_eq!(classes[1][hydra("member")], json!({"@id": "/api/User"}));
    Ok(())
}

#[test]
fn test_supported_class() -> Result<(), Box<dyn Error>> {
    let resolver = PrefixTable::standard();
    let api = api(&resolver)?;
    let user = api.classes().next().unwrap();
    let json = to_json_ld(user, &resolver)?;
    assert_eq!(json[hydra("title")], "User");
    let properties = json[hydra("supportedProperty")].as_array().unwrap();
    assert_eq!(properties.len(), 2);
    assert_eq!(properties[0][hydra("property")]["@id"], "/api/User/name");
    assert_eq!(
        properties[1][hydra("readable")],
        json!({"@value": "false", "@type": format!("{XSD}boolean")})
    );
    assert_eq!(json[hydra("supportedOperation")][0][hydra("method")], "PUT");
    assert_eq!(
        json[hydra("supportedOperation")][0][hydra("expects")],
        json!({"@id": "/api/User"})
    );
    // Only the constrained property gets a shape.
    let shapes = json[sh("property")].as_array().unwrap();
    assert_eq!(shapes.len(), 1);
    let count = json!({"@value": "1", "@type": format!("{XSD}nonNegativeInteger")});
    assert_eq!(shapes[0][sh("predicate")], json!({"@id": "/api/User/name"}));
    assert_eq!(shapes[0][sh("minCount")], count);
    assert_eq!(shapes[0][sh("maxCount")], count);
    Ok(())
}

#[test]
fn test_shacl() -> Result<(), Box<dyn Error>> {
    let resolver = PrefixTable::standard();
    let api = api(&resolver)?;
    let user = api.classes().next().unwrap();
    let shape = to_shacl(user, &resolver)?.unwrap();
    assert_eq!(shape["@type"], sh("NodeShape"));
    assert_eq!(shape[sh("targetClass")], json!({"@id": "/api/User"}));
    assert_eq!(shape[sh("property")].as_array().map(Vec::len), Some(1));
    let nickname = &user.supported_properties()[1];
    assert_eq!(to_shacl(nickname, &resolver)?, None);
    assert_eq!(to_shacl(&api, &resolver)?, None);
    let users = api.collections().next().unwrap();
    assert_eq!(to_shacl(users, &resolver)?, None);
    assert_eq!(to_shacl_shapes(&api, &resolver)?, [shape]);
    Ok(())
}

#[test]
fn test_idempotence() -> Result<(), Box<dyn Error>> {
    let resolver = PrefixTable::standard();
    let api = api(&resolver)?;
    assert_eq!(to_json_ld(&api, &resolver)?, to_json_ld(&api, &resolver)?);
    assert_eq!(
        to_shacl_shapes(&api, &resolver)?,
        to_shacl_shapes(&api, &resolver)?
    );
    Ok(())
}

#[test]
fn test_only_strings_mappings_and_sequences() -> Result<(), Box<dyn Error>> {
    fn check(value: &Value) -> bool {
        match value {
            Value::String(_) => true,
            Value::Array(values) => values.iter().all(check),
            Value::Object(values) => values.values().all(check),
            Value::Null | Value::Bool(_) | Value::Number(_) => false,
        }
    }
    let resolver = PrefixTable::standard();
    let api = api(&resolver)?;
    assert!(check(&to_json_ld(&api, &resolver)?));
    assert!(to_shacl_shapes(&api, &resolver)?.iter().all(check));
    Ok(())
}

#[test]
fn test_resolver_is_injected() -> Result<(), Box<dyn Error>> {
    let resolver = PrefixTable::standard();
    let api = api(&resolver)?;
    let renamed = PrefixTable::standard().with_prefix("hydra", "http://example.com/hydra#")?;
    let json = to_json_ld(&api, &renamed)?;
    assert!(json.get("http://example.com/hydra#entrypoint").is_some());
    assert!(json.get(hydra("entrypoint")).is_none());

    let no_hydra = |term: &str| {
        term.strip_prefix("sh:")
            .map(|suffix| format!("{SH}{suffix}"))
    };
    assert!(matches!(
        to_json_ld(&api, &no_hydra),
        Err(ResolveError::UnknownPrefix { .. })
    ));
    Ok(())
}
