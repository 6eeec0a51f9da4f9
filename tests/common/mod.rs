//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use inline_html_compiler::{
    CachingContext, CompileError, CompileResult, Compiler, InlineHtmlCompiler, MimeRegistry,
    JAVASCRIPT_MIME_TYPE,
};
use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::SourceType;

/// Initialize tracing for tests, respecting RUST_LOG env var.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Absolute path of a file under `tests/fixtures`.
#[allow(dead_code)]
pub fn fixture_path(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

#[allow(dead_code)]
pub fn read_fixture(name: &str) -> (String, String) {
    let path = fixture_path(name);
    let code = std::fs::read_to_string(&path).unwrap();
    (path, code)
}

/// JavaScript delegate: parses with oxc and prints the program back out.
#[derive(Default)]
pub struct OxcJavaScript {
    compiled: AtomicUsize,
}

impl OxcJavaScript {
    #[allow(dead_code)]
    pub fn compiled(&self) -> usize {
        self.compiled.load(Ordering::SeqCst)
    }
}

impl Compiler for OxcJavaScript {
    fn input_mime_types(&self) -> Vec<String> {
        vec![
            JAVASCRIPT_MIME_TYPE.to_string(),
            "application/javascript".to_string(),
        ]
    }

    fn compiler_version(&self) -> String {
        "oxc-0.110".to_string()
    }

    fn should_compile_file_sync(&self, path: &str, _cx: &mut CachingContext) -> bool {
        path.ends_with(".js")
    }

    fn determine_dependent_files_sync(
        &self,
        _path: &str,
        _code: &str,
        _cx: &mut CachingContext,
    ) -> Result<Vec<PathBuf>, CompileError> {
        Ok(vec![])
    }

    fn compile_sync(
        &self,
        code: &str,
        path: &str,
        _cx: &mut CachingContext,
    ) -> Result<CompileResult, CompileError> {
        let allocator = Allocator::default();
        let source_type = SourceType::default().with_module(true);
        let ret = Parser::new(&allocator, code, source_type).parse();
        if let Some(first) = ret.errors.first() {
            return Err(CompileError::source_error(path, first.to_string()));
        }

        self.compiled.fetch_add(1, Ordering::SeqCst);
        Ok(CompileResult::new(
            Codegen::new().build(&ret.program).code,
            JAVASCRIPT_MIME_TYPE,
        ))
    }
}

/// Inline compiler with only the JavaScript delegate registered.
#[allow(dead_code)]
pub fn javascript_compiler() -> (InlineHtmlCompiler, Arc<OxcJavaScript>) {
    let js = Arc::new(OxcJavaScript::default());
    let registry = MimeRegistry::new().with_compiler(js.clone());
    (InlineHtmlCompiler::new(Arc::new(registry)), js)
}
