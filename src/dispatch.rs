//! Identity & Dispatch Engine
//!
//! For each inline region: resolve its mime type, look up a delegate compiler, name
//! the region with a [`SyntheticIdentity`], ask the delegate whether it claims the
//! region and compile it.
//!
//! Missing mime types, missing compilers and delegates that decline all degrade to
//! pass-through for that region only. A delegate failure aborts the document.
//!
//! `dispatch` and `dispatch_sync` share `prepare` and `finish` and differ only in
//! which form of the delegate contract they call.

use std::sync::Arc;

use crate::context::CachingContext;
use crate::contract::{CompileResult, Compiler};
use crate::error::CompileError;
use crate::extract::{Region, RegionKind};
use crate::identity::SyntheticIdentity;
use crate::registry::CompilerLookup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRegion {
    pub element_index: usize,
    pub kind: RegionKind,
    pub identity: SyntheticIdentity,
    pub result: CompileResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Compiled(CompiledRegion),
    /// Leave the region's content as it is.
    PassThrough,
}

struct Prepared<'r> {
    compiler: Arc<dyn Compiler>,
    identity: SyntheticIdentity,
    source: &'r str,
}

pub struct DispatchEngine<'a> {
    registry: &'a dyn CompilerLookup,
    file_path: &'a str,
}

impl<'a> DispatchEngine<'a> {
    pub fn new(registry: &'a dyn CompilerLookup, file_path: &'a str) -> Self {
        Self {
            registry,
            file_path,
        }
    }

    fn prepare<'r>(&self, region: &'r Region) -> Option<Prepared<'r>> {
        let source = region.raw_content.as_deref()?;

        let Some(mime_type) = region.resolved_mime_type() else {
            tracing::trace!(
                ordinal = region.ordinal,
                kind = region.kind.name(),
                "no mime type, passing through"
            );
            return None;
        };

        let Some(compiler) = self.registry.resolve(mime_type) else {
            let diagnostic = CompileError::UnsupportedMimeType {
                mime_type: mime_type.to_string(),
                tag: region.kind.name().to_string(),
            };
            tracing::warn!(file = self.file_path, code = diagnostic.code(), "{}", diagnostic);
            return None;
        };

        Some(Prepared {
            compiler,
            identity: SyntheticIdentity::new(self.file_path, region.ordinal, mime_type),
            source,
        })
    }

    fn finish(
        region: &Region,
        identity: SyntheticIdentity,
        result: Result<CompileResult, CompileError>,
    ) -> Result<Dispatch, CompileError> {
        match result {
            Ok(result) => Ok(Dispatch::Compiled(CompiledRegion {
                element_index: region.element_index,
                kind: region.kind,
                identity,
                result,
            })),
            Err(e) => Err(CompileError::DelegateCompile {
                identity: identity.to_string(),
                source: Box::new(e),
            }),
        }
    }

    pub fn dispatch_sync(
        &self,
        region: &Region,
        cx: &mut CachingContext,
    ) -> Result<Dispatch, CompileError> {
        let Some(prepared) = self.prepare(region) else {
            return Ok(Dispatch::PassThrough);
        };
        let path = prepared.identity.to_string();

        if !prepared.compiler.should_compile_file_sync(&path, cx) {
            tracing::trace!(identity = %path, "delegate declined region");
            return Ok(Dispatch::PassThrough);
        }

        tracing::debug!(identity = %path, "compiling inline region");
        let result = prepared.compiler.compile_sync(prepared.source, &path, cx);
        Self::finish(region, prepared.identity, result)
    }

    pub async fn dispatch(
        &self,
        region: &Region,
        cx: &mut CachingContext,
    ) -> Result<Dispatch, CompileError> {
        let Some(prepared) = self.prepare(region) else {
            return Ok(Dispatch::PassThrough);
        };
        let path = prepared.identity.to_string();

        if !prepared.compiler.should_compile_file(&path, cx).await {
            tracing::trace!(identity = %path, "delegate declined region");
            return Ok(Dispatch::PassThrough);
        }

        tracing::debug!(identity = %path, "compiling inline region");
        let result = prepared.compiler.compile(prepared.source, &path, cx).await;
        Self::finish(region, prepared.identity, result)
    }
}
