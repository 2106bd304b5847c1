//! Annogen - Kubernetes manifest data from directive comments
//!
//! Annogen turns structured `+directive` comments attached to API type
//! declarations into machine-usable configuration: access-control rules,
//! a resource registration index, and OpenAPI-style validation schemas for
//! generating CustomResourceDefinition manifests.
//!
//! The source-file front end (which produces the type-declaration graph)
//! and the manifest file writer are external collaborators; this crate owns
//! everything between them.
//!
//! ## Module Structure
//!
//! - `crd`: CustomResourceDefinition manifest value types
//! - `directive`: tokenizer, module registry, dispatcher, built-in handlers
//! - `error`: grammar / domain-validation error taxonomy
//! - `generate`: the single sequential generation pass
//! - `index`: resource descriptors and the dual-keyed resource index
//! - `rbac`: access-control rule accumulation
//! - `schema`: type-to-schema derivation and validation constraints
//! - `types`: the input type-declaration graph contract
//! - `utils`: shared utility functions

pub mod crd;
pub mod directive;
pub mod error;
pub mod generate;
pub mod index;
pub mod rbac;
pub mod schema;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
pub use generate::{Generation, Options, SubresourceIndex, generate};
