//! String grammars every identifier and value of the model must satisfy.
//!
//! The predicates in this module are pure: they never allocate an error and never consult the
//! vocabulary resolver. Validated newtypes ([`Uri`], [`PathVariable`], [`JsonLdLiteral`],
//! [`Method`]) wrap them for use in the entity builders.

use crate::error::{Grammar, GrammarError};
use oxilangtag::LanguageTag;
use oxiri::Iri;
use oxrdf::NamedNodeRef;
use oxrdf::vocab::xsd;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use url::Url;

/// RFC 3986 `URI-reference`.
///
/// Curly braces are allowed as path, query and fragment characters so that site-relative templates
/// like `/users/{id}` are identifiers.
static URI_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    let pct = "%[0-9A-Fa-f]{2}";
    let pchar = format!(r"(?:[A-Za-z0-9\-._~!$&'()*+,;=:@{{}}]|{pct})");
    let pchar_no_colon = format!(r"(?:[A-Za-z0-9\-._~!$&'()*+,;=@{{}}]|{pct})");
    let authority = format!(
        r"//(?:(?:[A-Za-z0-9\-._~!$&'()*+,;=:]|{pct})*@)?(?:\[[0-9A-Za-z.:\-_~!$&'()*+,;=]+\]|(?:[A-Za-z0-9\-._~!$&'()*+,;=]|{pct})*)(?::[0-9]*)?(?:/{pchar}*)*"
    );
    let path_absolute = format!("/(?:{pchar}+(?:/{pchar}*)*)?");
    let query_or_fragment = format!("(?:{pchar}|[/?])*");
    Regex::new(&format!(
        "^(?:[A-Za-z][A-Za-z0-9+.\\-]*:(?:{authority}|{path_absolute}|{pchar}+(?:/{pchar}*)*)?|{authority}|{path_absolute}|{pchar_no_colon}+(?:/{pchar}*)*)?(?:\\?{query_or_fragment})?(?:#{query_or_fragment})?$"
    ))
    .unwrap()
});

/// Synthetic base against which site-relative identifiers are resolved.
static LOCAL_BASE: LazyLock<Url> = LazyLock::new(|| Url::parse("http://localhost/").unwrap());

pub(crate) const XSD_DATATYPES: [NamedNodeRef<'static>; 39] = [
    xsd::ANY_URI,
    xsd::BASE_64_BINARY,
    xsd::BOOLEAN,
    xsd::BYTE,
    xsd::DATE,
    xsd::DAY_TIME_DURATION,
    xsd::DATE_TIME,
    xsd::DATE_TIME_STAMP,
    xsd::DECIMAL,
    xsd::DOUBLE,
    xsd::DURATION,
    xsd::FLOAT,
    xsd::G_DAY,
    xsd::G_MONTH,
    xsd::G_MONTH_DAY,
    xsd::G_YEAR,
    xsd::G_YEAR_MONTH,
    xsd::HEX_BINARY,
    xsd::INT,
    xsd::INTEGER,
    xsd::LANGUAGE,
    xsd::LONG,
    xsd::NAME,
    xsd::NC_NAME,
    xsd::NEGATIVE_INTEGER,
    xsd::NMTOKEN,
    xsd::NON_NEGATIVE_INTEGER,
    xsd::NON_POSITIVE_INTEGER,
    xsd::NORMALIZED_STRING,
    xsd::POSITIVE_INTEGER,
    xsd::TIME,
    xsd::SHORT,
    xsd::STRING,
    xsd::TOKEN,
    xsd::UNSIGNED_BYTE,
    xsd::UNSIGNED_INT,
    xsd::UNSIGNED_LONG,
    xsd::UNSIGNED_SHORT,
    xsd::YEAR_MONTH_DURATION,
];

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

/// A non-empty sequence of unreserved or percent-encoded characters.
///
/// ```
/// use oxhydra::grammar::is_path_component;
///
/// assert!(is_path_component("users"));
/// assert!(is_path_component("caf%C3%A9"));
/// assert!(!is_path_component("a/b"));
/// assert!(!is_path_component(""));
/// ```
pub fn is_path_component(component: &str) -> bool {
    if component.is_empty() {
        return false;
    }
    let mut bytes = component.bytes();
    while let Some(b) = bytes.next() {
        if b == b'%' {
            let high = bytes.next().is_some_and(|b| b.is_ascii_hexdigit());
            let low = bytes.next().is_some_and(|b| b.is_ascii_hexdigit());
            if !(high && low) {
                return false;
            }
        } else if !is_unreserved(b) {
            return false;
        }
    }
    true
}

/// Removes the `?query` and `#fragment` parts of a path, they are never validated.
fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// A path that does not start with `/` or `#` and whose segments are all path components.
pub fn is_relative_path(path: &str) -> bool {
    if path.is_empty() || path.starts_with(['/', '#']) {
        return false;
    }
    strip_query(path).split('/').all(is_path_component)
}

/// A path starting with `/` or `#` with at least one segment, all segments being path components.
///
/// ```
/// use oxhydra::grammar::is_absolute_path;
///
/// assert!(is_absolute_path("/api/users?page=2"));
/// assert!(is_absolute_path("#/api"));
/// assert!(!is_absolute_path("/"));
/// assert!(!is_absolute_path("api"));
/// ```
pub fn is_absolute_path(path: &str) -> bool {
    if !path.starts_with(['/', '#']) {
        return false;
    }
    let path = path.strip_prefix('#').unwrap_or(path);
    let mut segments = strip_query(path).split('/').skip(1).peekable();
    segments.peek().is_some() && segments.all(is_path_component)
}

/// An absolute URI or a reference that resolves against a local base.
///
/// Both `https://example.com/api` and `/users/{id}` are accepted.
pub fn is_uri(uri: &str) -> bool {
    !uri.is_empty()
        && URI_REFERENCE.is_match(uri)
        && (Url::parse(uri).is_ok() || LOCAL_BASE.join(uri).is_ok())
}

/// A compact URI: a `prefix:suffix` string with a non-empty prefix and suffix.
pub fn is_curie(curie: &str) -> bool {
    curie
        .split_once(':')
        .is_some_and(|(prefix, suffix)| !prefix.is_empty() && !suffix.is_empty())
}

/// The full URI of one of the XML Schema datatypes.
pub fn is_datatype(datatype: &str) -> bool {
    Iri::parse(datatype).is_ok() && XSD_DATATYPES.iter().any(|d| d.as_str() == datatype)
}

/// A `{"@value": ..., "@type"?: ..., "@language"?: ...}` mapping.
pub fn is_jsonld_literal(value: &Value) -> bool {
    JsonLdLiteral::from_json(value).is_ok()
}

/// A validated URI or site-relative path used as an identifier.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct Uri {
    uri: String,
}

impl Uri {
    /// Builds and validates a URI.
    pub fn new(uri: impl Into<String>) -> Result<Self, GrammarError> {
        let uri = uri.into();
        if is_uri(&uri) {
            Ok(Self { uri })
        } else {
            Err(GrammarError::new(Grammar::Uri, uri))
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.uri
    }
}

impl fmt::Display for Uri {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl FromStr for Uri {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl PartialEq<str> for Uri {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Uri {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// A named placeholder in a path template, like `id` in `/users/{id}`.
///
/// It is an atomic token: it is never compared to or confused with a literal path segment.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct PathVariable {
    name: String,
}

impl PathVariable {
    pub fn new(name: impl Into<String>) -> Result<Self, GrammarError> {
        let name = name.into();
        let mut chars = name.chars();
        let valid = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(Self { name })
        } else {
            Err(GrammarError::new(Grammar::PathVariable, name))
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for PathVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.name)
    }
}

/// An HTTP method. Only the uppercase spelling is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
        }
    }
}

impl FromStr for Method {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "OPTIONS" => Self::Options,
            "HEAD" => Self::Head,
            _ => return Err(GrammarError::new(Grammar::Method, s)),
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON-LD value object.
///
/// A language tag is only allowed on plain literals and on `xsd:string` literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonLdLiteral {
    value: Value,
    datatype: Option<String>,
    language: Option<String>,
}

impl JsonLdLiteral {
    /// Builds a literal without datatype nor language tag.
    pub fn new_simple(value: impl Into<String>) -> Self {
        Self {
            value: Value::String(value.into()),
            datatype: None,
            language: None,
        }
    }

    /// Builds a typed literal, the datatype must be an XML Schema datatype.
    pub fn new_typed(
        value: impl Into<String>,
        datatype: impl Into<String>,
    ) -> Result<Self, GrammarError> {
        let datatype = datatype.into();
        if !is_datatype(&datatype) {
            return Err(GrammarError::new(Grammar::Datatype, datatype));
        }
        Ok(Self::new_typed_unchecked(value, datatype))
    }

    /// Builds a typed literal from an already resolved datatype URI.
    pub(crate) fn new_typed_unchecked(
        value: impl Into<String>,
        datatype: impl Into<String>,
    ) -> Self {
        Self {
            value: Value::String(value.into()),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    /// Builds a language-tagged string.
    pub fn new_language_tagged(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, GrammarError> {
        let language = language.into();
        if LanguageTag::parse(language.as_str()).is_err() {
            return Err(GrammarError::new(Grammar::LanguageTag, language));
        }
        Ok(Self {
            value: Value::String(value.into()),
            datatype: None,
            language: Some(language),
        })
    }

    /// Parses a JSON-LD value object.
    pub fn from_json(json: &Value) -> Result<Self, GrammarError> {
        let invalid = || GrammarError::new(Grammar::JsonLdLiteral, json.to_string());
        let object = json.as_object().ok_or_else(invalid)?;
        let value = match object.get("@value") {
            Some(v @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => v.clone(),
            _ => return Err(invalid()),
        };
        let datatype = match object.get("@type") {
            None => None,
            Some(Value::String(t)) if is_datatype(t) => Some(t.clone()),
            Some(Value::String(t)) => return Err(GrammarError::new(Grammar::Datatype, t.clone())),
            Some(_) => return Err(invalid()),
        };
        let language = match object.get("@language") {
            None => None,
            Some(Value::String(l)) if LanguageTag::parse(l.as_str()).is_ok() => Some(l.clone()),
            Some(Value::String(l)) => {
                return Err(GrammarError::new(Grammar::LanguageTag, l.clone()));
            }
            Some(_) => return Err(invalid()),
        };
        if language.is_some() && datatype.as_deref().is_some_and(|t| t != xsd::STRING.as_str()) {
            return Err(invalid());
        }
        Ok(Self {
            value,
            datatype,
            language,
        })
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    #[inline]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("@value".into(), self.value.clone());
        if let Some(datatype) = &self.datatype {
            object.insert("@type".into(), datatype.clone().into());
        }
        if let Some(language) = &self.language {
            object.insert("@language".into(), language.clone().into());
        }
        Value::Object(object)
    }
}
