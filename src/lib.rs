//! # Inline HTML Compiler
//!
//! Compiles the code embedded in HTML documents through a pluggable set of per-mime-type
//! compilers, and reports the external files a document depends on.
//!
//! ## Invariants
//!
//! 1. **Pass-Through**: A region with no resolvable mime type, no registered compiler,
//!    or a compiler that declines it is copied to the output unchanged.
//!
//! 2. **Synthetic Identity**: Every compiled region is named
//!    `<document path>:inline_<ordinal>.<ext>`. Ordinals count all regions of the
//!    document in document order, so names are unique and stable across runs.
//!
//! 3. **Source Maps**: Every compiled region longer than one character carries a
//!    `sourceMappingURL` reference.
//!
//! 4. **Secure Links**: Protocol-relative `src`/`href` on scripts and links are always
//!    rewritten to `https:`.
//!
//! 5. **No Traversal**: A resource reference whose `src` has a `.` or `..` segment
//!    fails the compile.
//!
//! 6. **Twin Contracts**: `compile` and `compile_sync` produce identical output.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use inline_html_compiler::{CachingContext, Compiler, InlineHtmlCompiler, MimeRegistry};
//!
//! let compiler = InlineHtmlCompiler::new(Arc::new(MimeRegistry::new()));
//! let mut cx = CachingContext::new();
//! let result = compiler
//!     .compile_sync("<link href=\"//example.com/x.css\">", "/app/index.html", &mut cx)
//!     .unwrap();
//! assert_eq!(result.mime_type, "text/html");
//! assert!(result.code.contains("https://example.com/x.css"));
//! ```

mod compiler;
mod context;
mod contract;
mod dependencies;
mod dispatch;
mod document;
mod error;
mod extract;
mod identity;
mod mime;
mod options;
mod registry;
mod rewrite;

#[cfg(test)]
mod extract_tests;

pub use compiler::InlineHtmlCompiler;
pub use context::{CacheEntry, CachingContext};
pub use contract::{CompileResult, Compiler};
pub use dependencies::dependent_files;
pub use dispatch::{CompiledRegion, Dispatch, DispatchEngine};
pub use document::{Document, Element};
pub use error::*;
pub use extract::{extract, Extraction, LinkKind, LinkReference, Region, RegionKind};
pub use identity::SyntheticIdentity;
pub use mime::{extension, lookup, CSS_MIME_TYPE, HTML_MIME_TYPE, JAVASCRIPT_MIME_TYPE};
pub use options::InlineCompilerOptions;
pub use registry::{CompilerLookup, MimeRegistry};
pub use rewrite::{canonicalize_resource_path, fixup_protocol_relative, Edit, Rewriter};
