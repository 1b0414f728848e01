#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
mod error;
pub mod generators;
pub mod grammar;
pub mod model;
pub mod query;
pub mod serializer;
pub mod vocab;

pub use config::{ApiConfig, ConfigError};
pub use error::{EntityKind, Grammar, GrammarError, HydraError, ResolveError, Rule, ValidationError};
pub use serializer::{to_json_ld, to_shacl, to_shacl_shapes};
pub use vocab::{PrefixTable, Resolver};
