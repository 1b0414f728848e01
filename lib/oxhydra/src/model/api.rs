use super::{
    ApiClass, Collection, CommonProps, SupportedClass, built, grammar_error, invalid,
    required_uri_field,
};
use crate::error::{EntityKind, Grammar, HydraError, Rule};
use crate::grammar::{Uri, is_absolute_path};
use crate::vocab::{Resolver, term};
use rustc_hash::FxHashSet;

/// Options of [`ApiDocumentation::new`].
///
/// The identifier, the entrypoint, the entrypoint class and at least one supported class are
/// required.
#[derive(Debug, Clone, Default)]
pub struct ApiDocumentationOptions {
    pub id: Option<String>,
    pub rdf_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Absolute path of the entrypoint resource, like `/api`.
    pub entrypoint: Option<String>,
    /// Identifier of the class of the entrypoint resource.
    pub entrypoint_class: Option<String>,
    pub supported_classes: Vec<ApiClass>,
}

/// The root of a Hydra API description.
///
/// The entrypoint class is always the identifier of exactly one of the supported classes.
///
/// ```
/// use oxhydra::model::{ApiDocumentation, ApiDocumentationOptions, SupportedClass, SupportedClassOptions};
/// use oxhydra::vocab::PrefixTable;
///
/// let resolver = PrefixTable::standard();
/// let entrypoint = SupportedClass::new(
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
///         supported_classes: vec![entrypoint.into()],
///         ..Default::default()
///     },
///     &resolver,
/// )?;
/// assert_eq!(api.entrypoint(), "/api");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiDocumentation {
    id: Uri,
    common: CommonProps,
    entrypoint: String,
    entrypoint_class: Uri,
    supported_classes: Vec<ApiClass>,
}

impl ApiDocumentation {
    pub fn new<R: Resolver + ?Sized>(
        options: ApiDocumentationOptions,
        resolver: &R,
    ) -> Result<Self, HydraError> {
        const ENTITY: EntityKind = EntityKind::ApiDocumentation;

        let id = required_uri_field(ENTITY, Rule::MissingIdentifier, "id", options.id)?;
        let Some(entrypoint) = options.entrypoint else {
            return Err(invalid(ENTITY, Rule::MissingOption, &["entrypoint"]));
        };
        if !is_absolute_path(&entrypoint) {
            return Err(grammar_error(
                "entrypoint",
                Grammar::AbsolutePath,
                entrypoint,
            ));
        }
        let entrypoint_class = required_uri_field(
            ENTITY,
            Rule::MissingOption,
            "entrypoint_class",
            options.entrypoint_class,
        )?;
        if options.supported_classes.is_empty() {
            return Err(invalid(
                ENTITY,
                Rule::NoSupportedClass,
                &["supported_classes"],
            ));
        }
        let mut seen = FxHashSet::default();
        if !options.supported_classes.iter().all(|c| seen.insert(c.id())) {
            return Err(invalid(
                ENTITY,
                Rule::DuplicateClass,
                &["supported_classes"],
            ));
        }
        if !seen.contains(&entrypoint_class) {
            return Err(invalid(
                ENTITY,
                Rule::EntrypointClassNotSupported,
                &["entrypoint_class", "supported_classes"],
            ));
        }
        let api = Self {
            id,
            common: CommonProps::build(
                &[term::API_DOCUMENTATION],
                options.rdf_type,
                options.title,
                options.description,
                resolver,
            )?,
            entrypoint,
            entrypoint_class,
            supported_classes: options.supported_classes,
        };
        built(ENTITY, Some(&api.id));
        Ok(api)
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
    pub fn entrypoint(&self) -> &str {
        &self.entrypoint
    }

    #[inline]
    pub fn entrypoint_class(&self) -> &Uri {
        &self.entrypoint_class
    }

    /// The supported classes and collections, in declaration order.
    #[inline]
    pub fn supported_classes(&self) -> &[ApiClass] {
        &self.supported_classes
    }

    pub fn classes(&self) -> impl Iterator<Item = &SupportedClass> {
        self.supported_classes.iter().filter_map(ApiClass::as_class)
    }

    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.supported_classes.iter().filter_map(ApiClass::as_collection)
    }
}
