//! Validation-schema derivation.
//!
//! - `props`: the schema node type and its JSON rendering
//! - `validation`: inline `+kubebuilder:validation:` constraint parsing
//! - `derive`: the recursive type-to-schema translator and member walker

pub mod derive;
pub mod props;
pub mod validation;

pub use derive::SchemaDeriver;
pub use props::{JsonSchemaProps, render};
pub use validation::apply_validation;
