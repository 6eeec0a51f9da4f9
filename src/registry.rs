//! Compiler lookup by mime type.
//!
//! The inline compiler receives its lookup at construction instead of consulting a
//! process-wide table. Any `Fn(&str) -> Option<Arc<dyn Compiler>>` is a lookup, and
//! [`MimeRegistry`] is an owned map for the common case.

use std::collections::HashMap;
use std::sync::Arc;

use crate::contract::Compiler;

pub trait CompilerLookup: Send + Sync {
    fn resolve(&self, mime_type: &str) -> Option<Arc<dyn Compiler>>;
}

impl<F> CompilerLookup for F
where
    F: Fn(&str) -> Option<Arc<dyn Compiler>> + Send + Sync,
{
    fn resolve(&self, mime_type: &str) -> Option<Arc<dyn Compiler>> {
        self(mime_type)
    }
}

/// Mime type → compiler map. Keys are matched case-insensitively.
#[derive(Clone, Default)]
pub struct MimeRegistry {
    compilers: HashMap<String, Arc<dyn Compiler>>,
}

impl MimeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mime_type: &str, compiler: Arc<dyn Compiler>) {
        self.compilers
            .insert(mime_type.to_ascii_lowercase(), compiler);
    }

    /// Registers `compiler` under every mime type it reports as input.
    pub fn register_compiler(&mut self, compiler: Arc<dyn Compiler>) {
        for mime_type in compiler.input_mime_types() {
            self.insert(&mime_type, compiler.clone());
        }
    }

    pub fn with_compiler(mut self, compiler: Arc<dyn Compiler>) -> Self {
        self.register_compiler(compiler);
        self
    }

    pub fn contains(&self, mime_type: &str) -> bool {
        self.compilers
            .contains_key(&mime_type.to_ascii_lowercase())
    }

    pub fn mime_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.compilers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl CompilerLookup for MimeRegistry {
    fn resolve(&self, mime_type: &str) -> Option<Arc<dyn Compiler>> {
        self.compilers
            .get(&mime_type.to_ascii_lowercase())
            .cloned()
    }
}
