//! [`Arbitrary`] implementations for fuzzing and property tests.
//!
//! Valid values are built from the grammar rules directly, never by filtering through the
//! validators. Invalid values ([`AdversarialString`], [`InvalidJsonLdLiteral`],
//! [`InvalidApiConfig`]) are meant to be rejected.
//!
//! ```
//! use arbitrary::{Arbitrary, Unstructured};
//! use oxhydra::generators::AbsolutePath;
//! use oxhydra::grammar::is_absolute_path;
//!
//! let path = AbsolutePath::arbitrary(&mut Unstructured::new(&[4, 8, 15, 16, 23, 42]))?;
//! assert!(is_absolute_path(path.as_str()));
//! # arbitrary::Result::<()>::Ok(())
//! ```

use crate::config::{
    ApiConfig, ClassConfig, CollectionConfig, OperationConfig, PropertyConfig, PropertyConfigKind,
    SupportedClassConfig, SupportedPropertyConfig,
};
use crate::error::Rule;
use crate::grammar::XSD_DATATYPES;
use arbitrary::{Arbitrary, Error, Result, Unstructured};
use oxrdf::vocab::xsd;
use serde_json::{Value, json};
use std::{fmt, iter};

const UNRESERVED: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";
const HEX_DIGITS: &[u8] = b"0123456789ABCDEFabcdef";
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const IDENTIFIER_START: &[u8] = b"_ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const IDENTIFIER_CONTINUE: &[u8] =
    b"_ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const HOSTS: [&str; 3] = [
    "http://example.com",
    "https://example.org",
    "http://localhost:8080",
];
const PREFIXES: [&str; 6] = ["hydra", "rdf", "rdfs", "xsd", "sh", "owl"];
const METHODS: [&str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];
const RANGES: [&str; 4] = ["xsd:string", "xsd:integer", "xsd:boolean", "xsd:dateTime"];
const LANGUAGES: [&str; 6] = ["en", "en-GB", "fr", "de-CH", "zh-Hant-TW", "es-419"];
const INVALID_LANGUAGES: [&str; 5] = ["", "not a tag", "en_GB", "-en", "abcdefghi"];
const BROKEN_RULES: [Rule; 9] = [
    Rule::MissingIdentifier,
    Rule::ReadonlyAndWriteonly,
    Rule::RequiredMinCount,
    Rule::OptionalMinCount,
    Rule::MinCountAboveMaxCount,
    Rule::OperationsOnPlainProperty,
    Rule::NoSupportedClass,
    Rule::DuplicateClass,
    Rule::EntrypointClassNotSupported,
];
#[expect(clippy::non_ascii_literal)]
const ADVERSARIAL_PIECES: [&str; 28] = [
    "", "/", "//", "#", "?", "?a=b", "#frag", " ", "\t", "\n", "%", "%2", "%G1", "%41", "{",
    "}", "{id}", ":", "::", "a", "api", "..", ".", "é", "\u{0}", "<x>", "\"", "http://",
];

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[inline]
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_newtype!(
    /// A non-empty run of unreserved characters and percent escapes.
    PathComponent
);
string_newtype!(
    /// Path components joined by `/`, without a leading `/`.
    RelativePath
);
string_newtype!(
    /// A `/` followed by a relative path, sometimes with a query.
    AbsolutePath
);
string_newtype!(
    /// A full URL or a site-relative absolute path.
    UriString
);
string_newtype!(
    /// A `prefix:suffix` compact URI.
    Curie
);
string_newtype!(
    /// The name of a path template variable, like `id` in `/users/{id}`.
    PathVariableName
);
string_newtype!(
    /// The full URI of an XML Schema datatype.
    Datatype
);
string_newtype!(
    /// A string made of fragments that tend to break path and URI grammars.
    AdversarialString
);

fn pick<T: Copy>(u: &mut Unstructured<'_>, items: &[T]) -> Result<T> {
    u.choose(items).copied()
}

/// Calls `f` a number of times between `min` and `max`.
fn repeat<T>(
    u: &mut Unstructured<'_>,
    min: usize,
    max: usize,
    mut f: impl FnMut(&mut Unstructured<'_>, usize) -> Result<T>,
) -> Result<Vec<T>> {
    let len = u.int_in_range(min..=max)?;
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(u, i)?);
    }
    Ok(values)
}

fn word(u: &mut Unstructured<'_>, alphabet: &[u8], max_len: usize) -> Result<String> {
    let len = u.int_in_range(1..=max_len)?;
    iter::repeat_with(|| pick(u, alphabet).map(char::from))
        .take(len)
        .collect()
}

impl<'a> Arbitrary<'a> for PathComponent {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let len = u.int_in_range(1..=6)?;
        let mut component = String::new();
        for _ in 0..len {
            if u.ratio(1, 5)? {
                component.push('%');
                component.push(char::from(pick(u, HEX_DIGITS)?));
                component.push(char::from(pick(u, HEX_DIGITS)?));
            } else {
                component.push(char::from(pick(u, UNRESERVED)?));
            }
        }
        Ok(Self(component))
    }

    fn size_hint(_depth: usize) -> (usize, Option<usize>) {
        (2, None)
    }
}

impl<'a> Arbitrary<'a> for RelativePath {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let components = repeat(u, 1, 4, |u, _| {
            PathComponent::arbitrary(u).map(PathComponent::into_string)
        })?;
        Ok(Self(components.join("/")))
    }
}

impl<'a> Arbitrary<'a> for AbsolutePath {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let mut path = format!("/{}", RelativePath::arbitrary(u)?);
        if u.ratio(1, 4)? {
            path.push('?');
            path.push_str(&word(u, ALPHANUMERIC, 4)?);
            path.push('=');
            path.push_str(&word(u, ALPHANUMERIC, 4)?);
        }
        Ok(Self(path))
    }
}

impl<'a> Arbitrary<'a> for UriString {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let path = AbsolutePath::arbitrary(u)?.into_string();
        Ok(Self(if u.arbitrary()? {
            format!("{}{path}", pick(u, &HOSTS)?)
        } else {
            path
        }))
    }
}

impl<'a> Arbitrary<'a> for Curie {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let prefix = if u.arbitrary()? {
            pick(u, &PREFIXES)?.to_owned()
        } else {
            format!(
                "{}{}",
                char::from(pick(u, LETTERS)?),
                word(u, ALPHANUMERIC, 4)?
            )
        };
        Ok(Self(format!("{prefix}:{}", word(u, ALPHANUMERIC, 8)?)))
    }
}

impl<'a> Arbitrary<'a> for PathVariableName {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let mut name = String::from(char::from(pick(u, IDENTIFIER_START)?));
        if u.arbitrary()? {
            name.push_str(&word(u, IDENTIFIER_CONTINUE, 8)?);
        }
        Ok(Self(name))
    }
}

impl<'a> Arbitrary<'a> for Datatype {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        Ok(Self(pick(u, &XSD_DATATYPES)?.as_str().to_owned()))
    }
}

/// A JSON-LD value object: plain, typed, language-tagged or a language-tagged `xsd:string`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonLdLiteralValue(pub Value);

impl<'a> Arbitrary<'a> for JsonLdLiteralValue {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let value = word(u, ALPHANUMERIC, 8)?;
        Ok(Self(match u.int_in_range(0..=3)? {
            0 => json!({ "@value": value }),
            1 => {
                let datatype = Datatype::arbitrary(u)?.into_string();
                json!({ "@value": value, "@type": datatype })
            }
            2 => json!({ "@value": value, "@language": pick(u, &LANGUAGES)? }),
            _ => json!({
                "@value": value,
                "@type": xsd::STRING.as_str(),
                "@language": pick(u, &LANGUAGES)?
            }),
        }))
    }
}

/// A JSON-LD value object breaking one of the literal rules.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidJsonLdLiteral(pub Value);

impl<'a> Arbitrary<'a> for InvalidJsonLdLiteral {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let value = word(u, ALPHANUMERIC, 8)?;
        Ok(Self(match u.int_in_range(0..=5)? {
            0 => json!({ "@type": xsd::STRING.as_str() }),
            1 => json!({ "@value": null }),
            2 => json!([{ "@value": value }]),
            3 => json!({ "@value": value, "@type": format!("http://example.com/{value}") }),
            4 => json!({ "@value": value, "@language": pick(u, &INVALID_LANGUAGES)? }),
            _ => {
                let datatype = pick(u, &[xsd::INTEGER, xsd::BOOLEAN, xsd::DATE_TIME])?;
                json!({
                    "@value": value,
                    "@type": datatype.as_str(),
                    "@language": pick(u, &LANGUAGES)?
                })
            }
        }))
    }
}

impl<'a> Arbitrary<'a> for AdversarialString {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let len = u.int_in_range(0..=5)?;
        let mut value = String::new();
        for _ in 0..len {
            if u.ratio(1, 6)? {
                value.push(u.arbitrary::<char>()?);
            } else {
                value.push_str(pick(u, &ADVERSARIAL_PIECES)?);
            }
        }
        Ok(Self(value))
    }
}

/// A description file that always builds.
///
/// Class identifiers are unique, the entrypoint class is one of them, and every supported
/// property satisfies the visibility and cardinality rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidApiConfig(pub ApiConfig);

impl<'a> Arbitrary<'a> for ValidApiConfig {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let root = AbsolutePath::arbitrary(u)?.into_string();
        let root = root.split('?').next().unwrap_or(&root).to_owned();
        let supported_classes = repeat(u, 1, 4, |u, i| class(u, &format!("{root}/Class{i}")))?;
        let entrypoint_class = u.choose(&supported_classes)?.id().map(str::to_owned);
        Ok(Self(ApiConfig {
            id: Some(format!("{root}/doc")),
            rdf_type: None,
            title: optional_text(u)?,
            description: optional_text(u)?,
            entrypoint: Some(root),
            entrypoint_class,
            supported_classes,
        }))
    }

    fn size_hint(_depth: usize) -> (usize, Option<usize>) {
        (8, None)
    }
}

fn optional_text(u: &mut Unstructured<'_>) -> Result<Option<String>> {
    Ok(if u.arbitrary()? {
        Some(word(u, ALPHANUMERIC, 12)?)
    } else {
        None
    })
}

fn class(u: &mut Unstructured<'_>, id: &str) -> Result<ClassConfig> {
    let operations = operations(u, 3)?;
    Ok(if u.ratio(1, 3)? {
        ClassConfig::Collection(CollectionConfig {
            id: Some(id.to_owned()),
            rdf_type: None,
            title: optional_text(u)?,
            description: optional_text(u)?,
            paginated: u.arbitrary()?,
            member_class: if u.arbitrary()? {
                Some(UriString::arbitrary(u)?.into_string())
            } else {
                None
            },
            operations,
        })
    } else {
        ClassConfig::Class(SupportedClassConfig {
            id: Some(id.to_owned()),
            rdf_type: None,
            title: optional_text(u)?,
            description: optional_text(u)?,
            supported_properties: repeat(u, 0, 3, |u, i| {
                supported_property(u, &format!("{id}/property{i}"))
            })?,
            operations,
        })
    })
}

fn supported_property(u: &mut Unstructured<'_>, id: &str) -> Result<SupportedPropertyConfig> {
    let kind = pick(
        u,
        &[
            PropertyConfigKind::Property,
            PropertyConfigKind::Link,
            PropertyConfigKind::TemplatedLink,
        ],
    )?;
    let required = u.arbitrary()?;
    let (readonly, writeonly) = pick(u, &[(false, false), (true, false), (false, true)])?;
    let min_count = if required {
        pick(u, &[None, Some(1), Some(2)])?
    } else {
        pick(u, &[None, Some(0)])?
    };
    let max_count = if u.arbitrary()? {
        Some(min_count.unwrap_or(0).max(1) + u.int_in_range(0..=3)?)
    } else {
        None
    };
    Ok(SupportedPropertyConfig {
        id: u.arbitrary::<bool>()?.then(|| format!("{id}/supported")),
        rdf_type: None,
        title: optional_text(u)?,
        description: None,
        property: Some(PropertyConfig {
            kind,
            id: Some(id.to_owned()),
            rdf_type: None,
            title: optional_text(u)?,
            description: None,
            domain: None,
            range: Some(pick(u, &RANGES)?.to_owned()),
        }),
        required,
        readonly,
        writeonly,
        min_count,
        max_count,
        operations: if kind == PropertyConfigKind::Property {
            Vec::new()
        } else {
            operations(u, 2)?
        },
    })
}

fn operations(u: &mut Unstructured<'_>, max_len: usize) -> Result<Vec<OperationConfig>> {
    repeat(u, 0, max_len, |u, _| {
        Ok(OperationConfig {
            id: None,
            rdf_type: None,
            title: optional_text(u)?,
            description: None,
            method: Some(pick(u, &METHODS)?.to_owned()),
            expects: None,
            returns: if u.arbitrary()? {
                Some(UriString::arbitrary(u)?.into_string())
            } else {
                None
            },
        })
    })
}

/// A description file breaking exactly one invariant, with the [`Rule`] its build must report.
///
/// It is a [`ValidApiConfig`] with a single alteration: a class without identifier, an extra class
/// holding one faulty supported property, no class at all, a repeated class or an entrypoint
/// class that is not listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidApiConfig {
    pub config: ApiConfig,
    pub rule: Rule,
}

impl<'a> Arbitrary<'a> for InvalidApiConfig {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let ValidApiConfig(mut config) = ValidApiConfig::arbitrary(u)?;
        let rule = pick(u, &BROKEN_RULES)?;
        let root = config.entrypoint.clone().unwrap_or_default();
        match rule {
            Rule::MissingIdentifier => {
                let class = if u.arbitrary()? {
                    ClassConfig::Class(SupportedClassConfig::default())
                } else {
                    ClassConfig::Collection(CollectionConfig::default())
                };
                config.supported_classes.push(class);
            }
            Rule::NoSupportedClass => config.supported_classes.clear(),
            Rule::DuplicateClass => {
                let class = u.choose(&config.supported_classes)?.clone();
                config.supported_classes.push(class);
            }
            Rule::EntrypointClassNotSupported => {
                config.entrypoint_class = Some(format!("{root}/Elsewhere"));
            }
            _ => {
                let property = broken_property(u, &root, rule)?;
                config.supported_classes.push(ClassConfig::Class(SupportedClassConfig {
                    id: Some(format!("{root}/Broken")),
                    supported_properties: vec![property],
                    ..SupportedClassConfig::default()
                }));
            }
        }
        Ok(Self { config, rule })
    }

    fn size_hint(_depth: usize) -> (usize, Option<usize>) {
        (9, None)
    }
}

fn broken_property(
    u: &mut Unstructured<'_>,
    root: &str,
    rule: Rule,
) -> Result<SupportedPropertyConfig> {
    let mut property = SupportedPropertyConfig {
        property: Some(PropertyConfig {
            id: Some(format!("{root}/Broken/property")),
            ..PropertyConfig::default()
        }),
        ..SupportedPropertyConfig::default()
    };
    match rule {
        Rule::ReadonlyAndWriteonly => {
            property.readonly = true;
            property.writeonly = true;
        }
        Rule::RequiredMinCount => {
            property.required = true;
            property.min_count = Some(0);
        }
        Rule::OptionalMinCount => property.min_count = Some(u.int_in_range(1..=3)?),
        Rule::MinCountAboveMaxCount => {
            let max_count = u.int_in_range(1..=3)?;
            property.required = true;
            property.min_count = Some(max_count + u.int_in_range(1..=3)?);
            property.max_count = Some(max_count);
        }
        Rule::OperationsOnPlainProperty => {
            property.operations.push(OperationConfig::default());
            property.operations.extend(operations(u, 1)?);
        }
        _ => return Err(Error::IncorrectFormat),
    }
    Ok(property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::*;

    const BYTES: [u8; 64] = [
        3, 141, 59, 26, 53, 58, 97, 93, 23, 84, 62, 64, 33, 83, 27, 95, 2, 88, 41, 97, 16, 93, 99,
        37, 51, 5, 82, 9, 74, 94, 45, 92, 30, 78, 16, 40, 62, 86, 20, 89, 98, 62, 80, 34, 82, 53,
        42, 11, 70, 67, 98, 21, 48, 8, 65, 13, 28, 23, 6, 64, 70, 93, 84, 46,
    ];

    #[test]
    fn test_generated_strings_are_valid() {
        let mut u = Unstructured::new(&BYTES);
        assert!(is_path_component(PathComponent::arbitrary(&mut u).unwrap().as_str()));
        assert!(is_relative_path(RelativePath::arbitrary(&mut u).unwrap().as_str()));
        assert!(is_absolute_path(AbsolutePath::arbitrary(&mut u).unwrap().as_str()));
        assert!(is_uri(UriString::arbitrary(&mut u).unwrap().as_str()));
        assert!(is_curie(Curie::arbitrary(&mut u).unwrap().as_str()));
        let name = PathVariableName::arbitrary(&mut u).unwrap();
        assert!(PathVariable::new(name.into_string()).is_ok());
        assert!(is_datatype(Datatype::arbitrary(&mut u).unwrap().as_str()));
        assert!(is_jsonld_literal(&JsonLdLiteralValue::arbitrary(&mut u).unwrap().0));
        assert!(!is_jsonld_literal(&InvalidJsonLdLiteral::arbitrary(&mut u).unwrap().0));
    }

    #[test]
    fn test_exhausted_input_still_generates() {
        let mut u = Unstructured::new(&[]);
        assert!(is_absolute_path(AbsolutePath::arbitrary(&mut u).unwrap().as_str()));
        let config = ValidApiConfig::arbitrary(&mut u).unwrap().0;
        assert_eq!(config.supported_classes.len(), 1);
        let invalid = InvalidApiConfig::arbitrary(&mut u).unwrap();
        assert_eq!(invalid.rule, Rule::MissingIdentifier);
        assert_eq!(invalid.config.supported_classes.len(), 2);
        assert_eq!(invalid.config.supported_classes[1].id(), None);
    }
}
