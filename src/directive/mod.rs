//! Directive engine: tokenizer, module registry, dispatcher, and the
//! built-in accumulator handlers.
//!
//! A directive is a structured comment line of the form
//! `+[header:]module[:submodule...]:key1=val1,key2=val2;val2b`. Tokenizing
//! splits it on `:`; dispatch resolves the module path against a
//! [`Registry`] and invokes the deepest matching handler with the trailing
//! payload. Handlers mutate an explicit [`Accumulators`] object, which the
//! generation pass owns for its whole lifetime.

pub mod handlers;
pub mod registry;
pub mod tokens;

pub use handlers::{Accumulators, PrintColumn, ResourceDirective, default_registry};
pub use registry::{HandlerFn, ModuleNode, Registry};
pub use tokens::tokenize;
