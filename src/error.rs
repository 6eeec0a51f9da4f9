//! Compile errors for the inline HTML compiler.
//!
//! Every error carries a stable code and the guarantee it protects, so that build
//! drivers can surface the failure without parsing the message text.

use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_UNSUPPORTED_MIME_TYPE: &str = "INLINE-ERR-UNSUPPORTED-MIME";
pub const ERR_DELEGATE_COMPILE: &str = "INLINE-ERR-DELEGATE";
pub const ERR_PATH_TRAVERSAL: &str = "INLINE-ERR-PATH-TRAVERSAL";
pub const ERR_MALFORMED_DOCUMENT: &str = "INLINE-ERR-MALFORMED";
pub const ERR_SOURCE: &str = "INLINE-ERR-SOURCE";
pub const ERR_INVALID_OPTIONS: &str = "INLINE-ERR-OPTIONS";

fn get_guarantee(code: &str) -> &'static str {
    match code {
        ERR_UNSUPPORTED_MIME_TYPE => {
            "Regions without a registered compiler are copied through unchanged."
        }
        ERR_DELEGATE_COMPILE => "A failing region fails the whole document.",
        ERR_PATH_TRAVERSAL => {
            "Resource references never escape the directory of the declaring document."
        }
        ERR_MALFORMED_DOCUMENT => "No region is compiled for a document that cannot be parsed.",
        ERR_SOURCE => "Delegate compilers report malformed input instead of emitting it.",
        ERR_INVALID_OPTIONS => "Compiler options are validated before any document is read.",
        _ => "Unknown invariant.",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILE ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// No compiler is registered for a resolved mime type. Built for diagnostics only;
    /// the dispatch engine degrades to pass-through and never returns it.
    #[error("No compiler for {mime_type}/{tag}")]
    UnsupportedMimeType { mime_type: String, tag: String },

    #[error("Failed to compile inline region {identity}: {source}")]
    DelegateCompile {
        identity: String,
        #[source]
        source: Box<CompileError>,
    },

    #[error("Resource reference '{src}' in {file} contains a '.' or '..' segment")]
    PathTraversalRejected { src: String, file: String },

    #[error("Failed to parse HTML in {file}: {reason}")]
    MalformedDocument { file: String, reason: String },

    /// Raised by delegate compilers for input they cannot compile.
    #[error("{file}: {message}")]
    Source { file: String, message: String },

    #[error("Invalid compiler options: {0}")]
    InvalidOptions(String),
}

impl CompileError {
    pub fn source_error(file: &str, message: impl Into<String>) -> Self {
        CompileError::Source {
            file: file.to_string(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CompileError::UnsupportedMimeType { .. } => ERR_UNSUPPORTED_MIME_TYPE,
            CompileError::DelegateCompile { .. } => ERR_DELEGATE_COMPILE,
            CompileError::PathTraversalRejected { .. } => ERR_PATH_TRAVERSAL,
            CompileError::MalformedDocument { .. } => ERR_MALFORMED_DOCUMENT,
            CompileError::Source { .. } => ERR_SOURCE,
            CompileError::InvalidOptions(_) => ERR_INVALID_OPTIONS,
        }
    }

    pub fn guarantee(&self) -> &'static str {
        get_guarantee(self.code())
    }

    /// Synthetic identity of the inline region that failed, if any.
    pub fn region_identity(&self) -> Option<&str> {
        match self {
            CompileError::DelegateCompile { identity, .. } => Some(identity),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_codes_and_guarantees() {
        let err = CompileError::PathTraversalRejected {
            src: "../evil.js".to_string(),
            file: "/app/index.html".to_string(),
        };
        assert_eq!(err.code(), ERR_PATH_TRAVERSAL);
        assert!(err.guarantee().contains("never escape"));
        assert!(err.to_string().contains("../evil.js"));
    }

    #[test]
    fn test_delegate_error_keeps_source() {
        let err = CompileError::DelegateCompile {
            identity: "/app/index.html:inline_0.js".to_string(),
            source: Box::new(CompileError::source_error(
                "/app/index.html:inline_0.js",
                "Unexpected token",
            )),
        };
        assert_eq!(err.region_identity(), Some("/app/index.html:inline_0.js"));
        let source = err.source().map(|s| s.to_string()).unwrap_or_default();
        assert!(source.contains("Unexpected token"));
    }
}
