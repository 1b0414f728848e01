use super::{CommonProps, built, grammar_error, uri_field};
use crate::error::{EntityKind, Grammar, HydraError};
use crate::grammar::{Method, Uri};
use crate::vocab::{Resolver, term};
use std::any::Any;
use std::fmt;
use std::ptr;
use std::str::FromStr;
use std::sync::Arc;

/// An opaque value attached to an [`Operation`], usually the function serving it.
///
/// It is stored and handed back verbatim. Two handlers are equal if they share the same
/// allocation.
#[derive(Clone)]
pub struct Handler(Arc<dyn Any + Send + Sync>);

impl Handler {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Returns the wrapped value if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").finish_non_exhaustive()
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

/// Options of [`Operation::new`]. The method defaults to `GET`.
#[derive(Debug, Clone, Default)]
pub struct OperationOptions {
    pub id: Option<String>,
    pub rdf_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Uppercase HTTP method name.
    pub method: Option<String>,
    /// Type of the accepted payload.
    pub expects: Option<String>,
    /// Type of the response payload.
    pub returns: Option<String>,
    pub handler: Option<Handler>,
}

/// A Hydra operation.
///
/// ```
/// use oxhydra::model::{Operation, OperationOptions};
/// use oxhydra::vocab::PrefixTable;
///
/// let resolver = PrefixTable::standard();
/// let operation = Operation::post(
///     OperationOptions {
///         expects: Some("https://example.com/api#User".into()),
///         ..Default::default()
///     },
///     &resolver,
/// )?;
/// assert_eq!(operation.method().as_str(), "POST");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    id: Option<Uri>,
    common: CommonProps,
    method: Method,
    expects: Option<Uri>,
    returns: Option<Uri>,
    handler: Option<Handler>,
}

impl Operation {
    pub fn new<R: Resolver + ?Sized>(
        options: OperationOptions,
        resolver: &R,
    ) -> Result<Self, HydraError> {
        let method = match options.method {
            Some(method) => Method::from_str(&method)
                .map_err(|_| grammar_error("method", Grammar::Method, method))?,
            None => Method::default(),
        };
        let operation = Self {
            id: uri_field("id", options.id)?,
            method,
            expects: uri_field("expects", options.expects)?,
            returns: uri_field("returns", options.returns)?,
            common: CommonProps::build(
                &[term::OPERATION],
                options.rdf_type,
                options.title,
                options.description,
                resolver,
            )?,
            handler: options.handler,
        };
        built(EntityKind::Operation, operation.id.as_ref());
        Ok(operation)
    }

    fn with_method<R: Resolver + ?Sized>(
        method: Method,
        options: OperationOptions,
        resolver: &R,
    ) -> Result<Self, HydraError> {
        Self::new(
            OperationOptions {
                method: Some(method.as_str().into()),
                ..options
            },
            resolver,
        )
    }

    pub fn get<R: Resolver + ?Sized>(
        options: OperationOptions,
        resolver: &R,
    ) -> Result<Self, HydraError> {
        Self::with_method(Method::Get, options, resolver)
    }

    pub fn post<R: Resolver + ?Sized>(
        options: OperationOptions,
        resolver: &R,
    ) -> Result<Self, HydraError> {
        Self::with_method(Method::Post, options, resolver)
    }

    pub fn put<R: Resolver + ?Sized>(
        options: OperationOptions,
        resolver: &R,
    ) -> Result<Self, HydraError> {
        Self::with_method(Method::Put, options, resolver)
    }

    pub fn patch<R: Resolver + ?Sized>(
        options: OperationOptions,
        resolver: &R,
    ) -> Result<Self, HydraError> {
        Self::with_method(Method::Patch, options, resolver)
    }

    pub fn delete<R: Resolver + ?Sized>(
        options: OperationOptions,
        resolver: &R,
    ) -> Result<Self, HydraError> {
        Self::with_method(Method::Delete, options, resolver)
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
    pub fn method(&self) -> Method {
        self.method
    }

    #[inline]
    pub fn expects(&self) -> Option<&Uri> {
        self.expects.as_ref()
    }

    #[inline]
    pub fn returns(&self) -> Option<&Uri> {
        self.returns.as_ref()
    }

    #[inline]
    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GrammarError;
    use crate::vocab::PrefixTable;

    #[test]
    fn test_method_defaults_to_get() {
        let operation =
            Operation::new(OperationOptions::default(), &PrefixTable::standard()).unwrap();
        assert_eq!(operation.method(), Method::Get);
        assert_eq!(
            operation.common().types(),
            ["http://www.w3.org/ns/hydra/core#Operation"]
        );
        assert!(operation.id().is_none());
        assert!(operation.expects().is_none());
    }

    #[test]
    fn test_lowercase_method_is_rejected() {
        let error = Operation::new(
            OperationOptions {
                method: Some("get".into()),
                ..Default::default()
            },
            &PrefixTable::standard(),
        )
        .unwrap_err();
        let (field, source) = error.as_grammar().unwrap();
        assert_eq!(field, "method");
        assert_eq!(source, &GrammarError::new(Grammar::Method, "get"));
    }

    #[test]
    fn test_method_builders_override_the_method() {
        let resolver = PrefixTable::standard();
        let options = || OperationOptions {
            method: Some("GET".into()),
            returns: Some("/api/User".into()),
            ..Default::default()
        };
        for (operation, method) in [
            (Operation::get(options(), &resolver), Method::Get),
            (Operation::post(options(), &resolver), Method::Post),
            (Operation::put(options(), &resolver), Method::Put),
            (Operation::patch(options(), &resolver), Method::Patch),
            (Operation::delete(options(), &resolver), Method::Delete),
        ] {
            let operation = operation.unwrap();
            assert_eq!(operation.method(), method);
            assert_eq!(operation.returns().unwrap(), "/api/User");
        }
    }

    #[test]
    fn test_invalid_expects() {
        let error = Operation::post(
            OperationOptions {
                expects: Some("not a uri".into()),
                ..Default::default()
            },
            &PrefixTable::standard(),
        )
        .unwrap_err();
        assert_eq!(error.as_grammar().unwrap().0, "expects");
    }

    #[test]
    fn test_handler_is_stored_verbatim() {
        let handler = Handler::new(|request: &str| request.len());
        let operation = Operation::get(
            OperationOptions {
                handler: Some(handler.clone()),
                ..Default::default()
            },
            &PrefixTable::standard(),
        )
        .unwrap();
        assert_eq!(operation.handler(), Some(&handler));
        assert_ne!(Some(&Handler::new(1_u8)), operation.handler());
        assert_eq!(Handler::new(7_u32).downcast_ref::<u32>(), Some(&7));
    }

    #[test]
    fn test_extra_type() {
        let operation = Operation::post(
            OperationOptions {
                rdf_type: Some("http://schema.org/CreateAction".into()),
                ..Default::default()
            },
            &PrefixTable::standard(),
        )
        .unwrap();
        assert_eq!(
            operation.common().types(),
            [
                "http://www.w3.org/ns/hydra/core#Operation",
                "http://schema.org/CreateAction",
            ]
        );
    }
}
