//! The capability contract shared by every mime-type compiler.
//!
//! The inline HTML compiler implements this trait itself and drives its delegates
//! through it, so nested inline compilers and single-language compilers look the same
//! to a build driver.
//!
//! Each capability comes in two forms. The blocking form (`*_sync`) is for callers that
//! cannot suspend, such as a synchronous module-loading hook. The suspending form is for
//! pipelines that overlap I/O. Both forms must produce the same results. The suspending
//! forms default to the blocking ones, so a compiler with no asynchronous work only
//! implements the blocking methods.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::context::CachingContext;
use crate::error::CompileError;

/// Output of a compiler.
///
/// `mime_type` is the container format the compiler produced. For a delegate compiling
/// an inline region it is discarded once the code is spliced back into the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResult {
    pub code: String,
    pub mime_type: String,
    /// JSON source map, when the compiler produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_map: Option<String>,
}

impl CompileResult {
    pub fn new(code: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            mime_type: mime_type.into(),
            source_map: None,
        }
    }

    pub fn with_source_map(mut self, source_map: impl Into<String>) -> Self {
        self.source_map = Some(source_map.into());
        self
    }
}

#[async_trait]
pub trait Compiler: Send + Sync {
    /// Mime types this compiler accepts as input.
    fn input_mime_types(&self) -> Vec<String>;

    fn compiler_version(&self) -> String;

    /// Whether this compiler claims `path`. `false` means the caller passes the
    /// source through unmodified.
    fn should_compile_file_sync(&self, path: &str, cx: &mut CachingContext) -> bool;

    /// Files that must exist and be fresh for the compiled output of `path` to be valid.
    fn determine_dependent_files_sync(
        &self,
        path: &str,
        code: &str,
        cx: &mut CachingContext,
    ) -> Result<Vec<PathBuf>, CompileError>;

    fn compile_sync(
        &self,
        code: &str,
        path: &str,
        cx: &mut CachingContext,
    ) -> Result<CompileResult, CompileError>;

    async fn should_compile_file(&self, path: &str, cx: &mut CachingContext) -> bool {
        self.should_compile_file_sync(path, cx)
    }

    async fn determine_dependent_files(
        &self,
        path: &str,
        code: &str,
        cx: &mut CachingContext,
    ) -> Result<Vec<PathBuf>, CompileError> {
        self.determine_dependent_files_sync(path, code, cx)
    }

    async fn compile(
        &self,
        code: &str,
        path: &str,
        cx: &mut CachingContext,
    ) -> Result<CompileResult, CompileError> {
        self.compile_sync(code, path, cx)
    }
}
