//! Module registry and directive dispatcher.
//!
//! Directives form a namespaced command tree: `+[header:]module[:submodule
//! ...]:payload`. The registry holds the recognized header names and the
//! root module nodes; dispatch walks the tree to the deepest matching module
//! and invokes its handler with the trailing payload. Handlers receive the
//! accumulator object explicitly, so all directive state flows through one
//! visible contract instead of shared captured pointers.

use std::collections::{BTreeMap, BTreeSet};

use crate::directive::handlers::Accumulators;
use crate::directive::tokens::tokenize;
use crate::error::{Error, Result};

/// Handler invoked when dispatch terminates at a module. The payload is the
/// trailing token, or the empty string for marker-only directives.
pub type HandlerFn = fn(&mut Accumulators, &str) -> Result<()>;

/// One named node in the directive dispatch tree.
///
/// A node may carry a handler, submodules, or both. A node with no handler
/// is a valid no-op match, used for marker directives that only need to be
/// recognized (e.g. `doc`, `categories`).
#[derive(Debug, Default)]
pub struct ModuleNode {
    name: String,
    handler: Option<HandlerFn>,
    submodules: BTreeMap<String, ModuleNode>,
}

impl ModuleNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn handler(mut self, f: HandlerFn) -> Self {
        self.handler = Some(f);
        self
    }

    /// Adds a submodule, replacing any existing submodule of the same name.
    pub fn submodule(mut self, node: ModuleNode) -> Self {
        self.submodules.insert(node.name.clone(), node);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, acc: &mut Accumulators, payload: &str) -> Result<()> {
        match self.handler {
            Some(f) => f(acc, payload),
            None => Ok(()),
        }
    }
}

/// Flat catalog of recognized headers and root modules.
#[derive(Debug, Default)]
pub struct Registry {
    headers: BTreeSet<String>,
    modules: BTreeMap<String, ModuleNode>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a recognized top-level header prefix (e.g. `kubebuilder`).
    /// Directives may include or omit registered headers interchangeably.
    pub fn header(&mut self, name: &str) -> &mut Self {
        self.headers.insert(name.to_string());
        self
    }

    /// Registers (or replaces) a root module by name.
    pub fn module(&mut self, node: ModuleNode) -> &mut Self {
        self.modules.insert(node.name.clone(), node);
        self
    }

    /// Tokenizes and dispatches one comment line against the registry.
    ///
    /// Non-directive lines are no-ops. A directive whose module path cannot
    /// be resolved is a grammar error; state already accumulated from prior
    /// lines is left untouched by the failure.
    pub fn dispatch(&self, line: &str, acc: &mut Accumulators) -> Result<()> {
        let Some(tokens) = tokenize(line) else {
            return Ok(());
        };

        let mut idx = 0;
        if self.headers.contains(&tokens[idx]) {
            idx += 1;
            // A bare header ("+genclient") is a recognized marker.
            if idx == tokens.len() {
                return Ok(());
            }
        }

        let mut module = self
            .modules
            .get(&tokens[idx])
            .ok_or_else(|| Error::UnknownModule {
                module: tokens[idx].clone(),
                line: line.trim().to_string(),
            })?;

        // Descend while more than two tokens remain: each intermediate token
        // must name a submodule of the current module.
        while tokens.len() - idx > 2 {
            let next = &tokens[idx + 1];
            module = module
                .submodules
                .get(next)
                .ok_or_else(|| Error::UnknownSubmodule {
                    module: module.name.clone(),
                    submodule: next.clone(),
                })?;
            idx += 1;
        }

        if tokens.len() - idx == 2 {
            let tail = &tokens[idx + 1];
            if let Some(sub) = module.submodules.get(tail) {
                // e.g. "+subresource:status" terminates at the submodule.
                return sub.invoke(acc, "");
            }
            if !module.submodules.is_empty() {
                return Err(Error::UnknownSubmodule {
                    module: module.name.clone(),
                    submodule: tail.clone(),
                });
            }
            return module.invoke(acc, tail);
        }
        module.invoke(acc, "")
    }
}
