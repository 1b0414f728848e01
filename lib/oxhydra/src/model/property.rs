use super::{CommonProps, Operation, built, invalid, required_uri_field, uri_field};
use crate::error::{EntityKind, HydraError, Rule};
use crate::grammar::Uri;
use crate::vocab::{Resolver, term};

/// The three mutually exclusive flavors of [`Property`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PropertyKind {
    /// A plain `rdf:Property`.
    #[default]
    Property,
    /// A `hydra:Link` to a dereferenceable resource.
    Link,
    /// A `hydra:TemplatedLink`, whose target is built from a URI template.
    TemplatedLink,
}

impl PropertyKind {
    fn from_flags(link: bool, template: bool) -> Result<Self, HydraError> {
        match (link, template) {
            (false, false) => Ok(Self::Property),
            (true, false) => Ok(Self::Link),
            (false, true) => Ok(Self::TemplatedLink),
            (true, true) => Err(invalid(
                EntityKind::Property,
                Rule::LinkAndTemplate,
                &["link", "template"],
            )),
        }
    }

    fn type_term(self) -> &'static str {
        match self {
            Self::Property => term::RDF_PROPERTY,
            Self::Link => term::LINK,
            Self::TemplatedLink => term::TEMPLATED_LINK,
        }
    }
}

/// Options of [`Property::new`]. The identifier is required.
#[derive(Debug, Clone, Default)]
pub struct PropertyOptions {
    pub id: Option<String>,
    pub rdf_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub range: Option<String>,
    pub link: bool,
    pub template: bool,
}

/// An RDF property, a Hydra link or a Hydra templated link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    id: Uri,
    common: CommonProps,
    kind: PropertyKind,
    domain: Option<Uri>,
    range: Option<Uri>,
}

impl Property {
    /// Builds a property whose flavor is given by the `link` and `template` flags.
    pub fn new<R: Resolver + ?Sized>(
        options: PropertyOptions,
        resolver: &R,
    ) -> Result<Self, HydraError> {
        let kind = PropertyKind::from_flags(options.link, options.template)?;
        let property = Self {
            id: required_uri_field(
                EntityKind::Property,
                Rule::MissingIdentifier,
                "id",
                options.id,
            )?,
            kind,
            domain: uri_field("domain", options.domain)?,
            range: uri_field("range", options.range)?,
            common: CommonProps::build(
                &[kind.type_term()],
                options.rdf_type,
                options.title,
                options.description,
                resolver,
            )?,
        };
        built(EntityKind::Property, Some(&property.id));
        Ok(property)
    }

    /// Builds a plain `rdf:Property`, ignoring the `link` and `template` flags.
    pub fn property<R: Resolver + ?Sized>(
        options: PropertyOptions,
        resolver: &R,
    ) -> Result<Self, HydraError> {
        Self::new(
            PropertyOptions {
                link: false,
                template: false,
                ..options
            },
            resolver,
        )
    }

    /// Builds a `hydra:Link`, ignoring the `link` and `template` flags.
    pub fn link<R: Resolver + ?Sized>(
        options: PropertyOptions,
        resolver: &R,
    ) -> Result<Self, HydraError> {
        Self::new(
            PropertyOptions {
                link: true,
                template: false,
                ..options
            },
            resolver,
        )
    }

    /// Builds a `hydra:TemplatedLink`, ignoring the `link` and `template` flags.
    pub fn templated_link<R: Resolver + ?Sized>(
        options: PropertyOptions,
        resolver: &R,
    ) -> Result<Self, HydraError> {
        Self::new(
            PropertyOptions {
                link: false,
                template: true,
                ..options
            },
            resolver,
        )
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
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    #[inline]
    pub fn is_link(&self) -> bool {
        self.kind == PropertyKind::Link
    }

    #[inline]
    pub fn is_template(&self) -> bool {
        self.kind == PropertyKind::TemplatedLink
    }

    #[inline]
    pub fn domain(&self) -> Option<&Uri> {
        self.domain.as_ref()
    }

    #[inline]
    pub fn range(&self) -> Option<&Uri> {
        self.range.as_ref()
    }
}

/// Options of [`SupportedProperty::new`]. The property is required.
#[derive(Debug, Clone, Default)]
pub struct SupportedPropertyOptions {
    pub id: Option<String>,
    pub rdf_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub property: Option<Property>,
    pub required: bool,
    pub readonly: bool,
    pub writeonly: bool,
    /// Defaults to 1 when the property is required.
    pub min_count: Option<u64>,
    pub max_count: Option<u64>,
    /// Only allowed on links and templated links.
    pub operations: Vec<Operation>,
}

/// A property exposed by a class, with its cardinality and visibility.
///
/// Invariants:
/// - `readonly` and `writeonly` are never both set,
/// - a required property has a min count of at least 1 and an optional one has none or 0,
/// - the min count never exceeds the max count,
/// - only links and templated links carry operations.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportedProperty {
    id: Option<Uri>,
    common: CommonProps,
    property: Property,
    required: bool,
    readonly: bool,
    writeonly: bool,
    min_count: Option<u64>,
    max_count: Option<u64>,
    operations: Vec<Operation>,
}

impl SupportedProperty {
    pub fn new<R: Resolver + ?Sized>(
        options: SupportedPropertyOptions,
        resolver: &R,
    ) -> Result<Self, HydraError> {
        const ENTITY: EntityKind = EntityKind::SupportedProperty;

        let Some(property) = options.property else {
            return Err(invalid(ENTITY, Rule::MissingOption, &["property"]));
        };
        if options.readonly && options.writeonly {
            return Err(invalid(
                ENTITY,
                Rule::ReadonlyAndWriteonly,
                &["readonly", "writeonly"],
            ));
        }
        let min_count = if options.required {
            match options.min_count {
                Some(0) => {
                    return Err(invalid(
                        ENTITY,
                        Rule::RequiredMinCount,
                        &["required", "min_count"],
                    ));
                }
                Some(min_count) => min_count,
                None => 1,
            }
        } else {
            match options.min_count {
                Some(0) | None => 0,
                Some(_) => {
                    return Err(invalid(
                        ENTITY,
                        Rule::OptionalMinCount,
                        &["required", "min_count"],
                    ));
                }
            }
        };
        if options.max_count.is_some_and(|max_count| min_count > max_count) {
            return Err(invalid(
                ENTITY,
                Rule::MinCountAboveMaxCount,
                &["min_count", "max_count"],
            ));
        }
        if property.kind() == PropertyKind::Property && !options.operations.is_empty() {
            return Err(invalid(
                ENTITY,
                Rule::OperationsOnPlainProperty,
                &["property", "operations"],
            ));
        }
        let supported_property = Self {
            id: uri_field("id", options.id)?,
            common: CommonProps::build(
                &[term::SUPPORTED_PROPERTY_TYPE],
                options.rdf_type,
                options.title,
                options.description,
                resolver,
            )?,
            property,
            required: options.required,
            readonly: options.readonly,
            writeonly: options.writeonly,
            // An explicit 0 is kept, an implicit one is dropped.
            min_count: if options.required {
                Some(min_count)
            } else {
                options.min_count
            },
            max_count: options.max_count,
            operations: options.operations,
        };
        built(ENTITY, supported_property.id.as_ref());
        Ok(supported_property)
    }

    #[inline]
    pub fn id(&self) -> Option<&Uri> {
        self.id.as_ref()
    }

    #[inline]
    pub fn common(&self) -> &CommonProps {
        &self.common
    }

    #[inline]
    pub fn property(&self) -> &Property {
        &self.property
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    #[inline]
    pub fn is_writeonly(&self) -> bool {
        self.writeonly
    }

    /// The effective min count: 1 for a required property without explicit value.
    #[inline]
    pub fn min_count(&self) -> Option<u64> {
        self.min_count
    }

    #[inline]
    pub fn max_count(&self) -> Option<u64> {
        self.max_count
    }

    #[inline]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Whether the property has a min or max count.
    pub fn has_cardinality(&self) -> bool {
        self.min_count.is_some() || self.max_count.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OperationOptions;
    use crate::vocab::PrefixTable;

    fn name_property(resolver: &PrefixTable) -> Property {
        Property::property(
            PropertyOptions {
                id: Some("http://schema.org/name".into()),
                range: Some("http://www.w3.org/2001/XMLSchema#string".into()),
                ..Default::default()
            },
            resolver,
        )
        .unwrap()
    }

    fn rule_of(error: &HydraError) -> Rule {
        error.as_validation().unwrap().rule()
    }

    #[test]
    fn test_property_kinds() {
        let resolver = PrefixTable::standard();
        let options = || PropertyOptions {
            id: Some("/api/User/friends".into()),
            ..Default::default()
        };
        let property = Property::property(options(), &resolver).unwrap();
        assert!(!property.is_link() && !property.is_template());
        assert_eq!(
            property.common().types(),
            ["http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"]
        );
        let link = Property::link(options(), &resolver).unwrap();
        assert!(link.is_link());
        assert_eq!(
            link.common().types(),
            ["http://www.w3.org/ns/hydra/core#Link"]
        );
        let template = Property::templated_link(options(), &resolver).unwrap();
        assert!(template.is_template());
        assert_eq!(
            template.common().types(),
            ["http://www.w3.org/ns/hydra/core#TemplatedLink"]
        );
    }

    #[test]
    fn test_link_and_template_are_exclusive() {
        let error = Property::new(
            PropertyOptions {
                id: Some("/api/p".into()),
                link: true,
                template: true,
                ..Default::default()
            },
            &PrefixTable::standard(),
        )
        .unwrap_err();
        assert_eq!(rule_of(&error), Rule::LinkAndTemplate);
    }

    #[test]
    fn test_property_requires_an_identifier() {
        let error =
            Property::link(PropertyOptions::default(), &PrefixTable::standard()).unwrap_err();
        let error = error.as_validation().unwrap();
        assert_eq!(error.rule(), Rule::MissingIdentifier);
        assert_eq!(error.entity(), EntityKind::Property);
        assert_eq!(error.fields(), ["id"]);
    }

    #[test]
    fn test_required_defaults_min_count_to_one() {
        let resolver = PrefixTable::standard();
        let supported = SupportedProperty::new(
            SupportedPropertyOptions {
                property: Some(name_property(&resolver)),
                required: true,
                ..Default::default()
            },
            &resolver,
        )
        .unwrap();
        assert_eq!(supported.min_count(), Some(1));
        assert!(supported.has_cardinality());
    }

    #[test]
    fn test_cardinality_rules() {
        let resolver = PrefixTable::standard();
        let build = |required, min_count, max_count| {
            SupportedProperty::new(
                SupportedPropertyOptions {
                    property: Some(name_property(&resolver)),
                    required,
                    min_count,
                    max_count,
                    ..Default::default()
                },
                &resolver,
            )
        };
        assert_eq!(
            rule_of(&build(true, Some(0), None).unwrap_err()),
            Rule::RequiredMinCount
        );
        assert_eq!(
            rule_of(&build(false, Some(2), None).unwrap_err()),
            Rule::OptionalMinCount
        );
        assert_eq!(
            rule_of(&build(true, Some(3), Some(2)).unwrap_err()),
            Rule::MinCountAboveMaxCount
        );
        assert_eq!(
            rule_of(&build(true, None, Some(0)).unwrap_err()),
            Rule::MinCountAboveMaxCount
        );
        assert_eq!(build(true, Some(2), Some(2)).unwrap().min_count(), Some(2));
        assert_eq!(build(false, Some(0), Some(5)).unwrap().min_count(), Some(0));
        let optional = build(false, None, None).unwrap();
        assert_eq!(optional.min_count(), None);
        assert!(!optional.has_cardinality());
    }

    #[test]
    fn test_readonly_and_writeonly_are_exclusive() {
        let resolver = PrefixTable::standard();
        let error = SupportedProperty::new(
            SupportedPropertyOptions {
                property: Some(name_property(&resolver)),
                readonly: true,
                writeonly: true,
                ..Default::default()
            },
            &resolver,
        )
        .unwrap_err();
        assert_eq!(rule_of(&error), Rule::ReadonlyAndWriteonly);
    }

    #[test]
    fn test_operations_only_on_links() {
        let resolver = PrefixTable::standard();
        let operation = Operation::get(OperationOptions::default(), &resolver).unwrap();
        let error = SupportedProperty::new(
            SupportedPropertyOptions {
                property: Some(name_property(&resolver)),
                operations: vec![operation.clone()],
                ..Default::default()
            },
            &resolver,
        )
        .unwrap_err();
        assert_eq!(rule_of(&error), Rule::OperationsOnPlainProperty);

        let friends = Property::link(
            PropertyOptions {
                id: Some("/api/User/friends".into()),
                ..Default::default()
            },
            &resolver,
        )
        .unwrap();
        let supported = SupportedProperty::new(
            SupportedPropertyOptions {
                property: Some(friends),
                operations: vec![operation],
                ..Default::default()
            },
            &resolver,
        )
        .unwrap();
        assert_eq!(supported.operations().len(), 1);
    }

    #[test]
    fn test_missing_property() {
        let error = SupportedProperty::new(
            SupportedPropertyOptions::default(),
            &PrefixTable::standard(),
        )
        .unwrap_err();
        let error = error.as_validation().unwrap();
        assert_eq!(error.rule(), Rule::MissingOption);
        assert_eq!(error.fields(), ["property"]);
    }
}
