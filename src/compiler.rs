//! # Inline HTML Compiler
//!
//! Compiles the code embedded in an HTML document. Each inline `<script>` and `<style>`
//! is handed to the compiler registered for its mime type, and the result is spliced
//! back with a source-map reference. Links and resource references are canonicalized
//! on the way. The output is always `text/html`.
//!
//! ## Passes
//!
//! 1. **Plan**: parse, extract regions and links, queue canonicalization edits. Path
//!    traversal fails here, before any delegate runs.
//! 2. **Dispatch**: compile inline regions one at a time, in document order, threading
//!    the caller's caching context through every delegate.
//! 3. **Render**: parse the same source again, apply the edits by element index and
//!    serialize.
//!
//! The tree is not `Send`, so it never lives across a suspension point: the async path
//! only holds the owned plan while awaiting delegates. The blocking path runs the same
//! three passes.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use crate::context::CachingContext;
use crate::contract::{CompileResult, Compiler};
use crate::dependencies::dependent_files;
use crate::dispatch::{Dispatch, DispatchEngine};
use crate::document::Document;
use crate::error::CompileError;
use crate::extract::{candidates, extract, Extraction};
use crate::mime::{self, HTML_MIME_TYPE};
use crate::options::InlineCompilerOptions;
use crate::registry::CompilerLookup;
use crate::rewrite::Rewriter;

struct CompilePlan {
    extraction: Extraction,
    rewriter: Rewriter,
}

pub struct InlineHtmlCompiler {
    registry: Arc<dyn CompilerLookup>,
    options: InlineCompilerOptions,
}

impl InlineHtmlCompiler {
    pub fn new(registry: Arc<dyn CompilerLookup>) -> Self {
        Self {
            registry,
            options: InlineCompilerOptions::default(),
        }
    }

    pub fn with_options(
        registry: Arc<dyn CompilerLookup>,
        options: InlineCompilerOptions,
    ) -> Result<Self, CompileError> {
        options.validate()?;
        Ok(Self { registry, options })
    }

    pub fn options(&self) -> &InlineCompilerOptions {
        &self.options
    }

    fn parse(&self, code: &str, path: &str) -> Result<Document, CompileError> {
        Document::parse(code, path, self.options.strict_parsing)
    }

    fn plan(&self, code: &str, path: &str) -> Result<CompilePlan, CompileError> {
        let document = self.parse(code, path)?;
        let extraction = extract(&document, &self.options);
        tracing::debug!(
            file = path,
            regions = extraction.regions.len(),
            links = extraction.links.len(),
            "extracted document regions"
        );

        let mut rewriter = Rewriter::new();
        rewriter.canonicalize(&extraction, path)?;
        Ok(CompilePlan {
            extraction,
            rewriter,
        })
    }

    fn render(
        &self,
        code: &str,
        path: &str,
        rewriter: &Rewriter,
    ) -> Result<CompileResult, CompileError> {
        let document = self.parse(code, path)?;
        rewriter.apply(&candidates(&document, &self.options), path)?;
        Ok(CompileResult::new(document.serialize()?, HTML_MIME_TYPE))
    }
}

#[async_trait]
impl Compiler for InlineHtmlCompiler {
    fn input_mime_types(&self) -> Vec<String> {
        vec![HTML_MIME_TYPE.to_string()]
    }

    fn compiler_version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn should_compile_file_sync(&self, path: &str, _cx: &mut CachingContext) -> bool {
        mime::lookup(path) == Some(HTML_MIME_TYPE)
    }

    fn determine_dependent_files_sync(
        &self,
        path: &str,
        code: &str,
        _cx: &mut CachingContext,
    ) -> Result<Vec<PathBuf>, CompileError> {
        let document = self.parse(code, path)?;
        let extraction = extract(&document, &self.options);
        Ok(dependent_files(&extraction, path))
    }

    fn compile_sync(
        &self,
        code: &str,
        path: &str,
        cx: &mut CachingContext,
    ) -> Result<CompileResult, CompileError> {
        let mut plan = self.plan(code, path)?;
        let engine = DispatchEngine::new(self.registry.as_ref(), path);

        for region in plan.extraction.inline_regions() {
            if let Dispatch::Compiled(compiled) = engine.dispatch_sync(region, cx)? {
                plan.rewriter.splice(&compiled);
            }
        }

        self.render(code, path, &plan.rewriter)
    }

    async fn compile(
        &self,
        code: &str,
        path: &str,
        cx: &mut CachingContext,
    ) -> Result<CompileResult, CompileError> {
        let mut plan = self.plan(code, path)?;
        let engine = DispatchEngine::new(self.registry.as_ref(), path);

        for region in plan.extraction.inline_regions() {
            if let Dispatch::Compiled(compiled) = engine.dispatch(region, cx).await? {
                plan.rewriter.splice(&compiled);
            }
        }

        self.render(code, path, &plan.rewriter)
    }
}
