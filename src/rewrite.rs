//! Rewriter
//!
//! Collects [`Edit`]s against candidate elements and applies them to a parsed tree:
//!
//! - compiled region text, with a source-map reference appended
//! - retyping of compiled elements that declared a source-language `type`
//! - protocol-relative `src`/`href` on scripts and links forced to `https:`
//! - `<link type="text/less|text/stylus">` retyped to `text/css`
//! - resource-reference paths checked for `.`/`..` segments and resolved against the
//!   document directory
//!
//! Nothing else in the tree is touched.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use crate::dispatch::CompiledRegion;
use crate::document::Element;
use crate::error::CompileError;
use crate::extract::{Extraction, LinkKind, RegionKind, MIN_REGION_LENGTH};
use crate::identity::SyntheticIdentity;
use crate::mime::{CSS_MIME_TYPE, JAVASCRIPT_MIME_TYPE};

pub const SECURE_SCHEME: &str = "https:";

/// Link types browsers ignore unless they say `text/css`.
const STYLESHEET_SOURCE_TYPES: &[&str] = &["text/less", "text/stylus"];

lazy_static! {
    static ref PATH_SEPARATOR_RE: Regex = Regex::new(r"[\\/]").unwrap();
    static ref FILE_URL_RE: Regex = Regex::new(r"(?i)^file:").unwrap();
    static ref URL_SCHEME_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]+:").unwrap();
    static ref ABSOLUTE_PATH_RE: Regex = Regex::new(r"^([/\\]|[A-Za-z]:)").unwrap();
    static ref SOURCE_MAPPING_URL_RE: Regex = Regex::new(r"[#@]\s*sourceMappingURL=").unwrap();
    static ref SCRIPT_CLOSE_RE: Regex = Regex::new(r"(?i)</(script)").unwrap();
    static ref STYLE_CLOSE_RE: Regex = Regex::new(r"(?i)</(style)").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// CANONICALIZATION RULES
// ═══════════════════════════════════════════════════════════════════════════════

/// `//host/path` → `https://host/path`. Anything else is returned unchanged.
pub fn fixup_protocol_relative(url: &str) -> Cow<'_, str> {
    if url.starts_with("//") {
        Cow::Owned(format!("{}{}", SECURE_SCHEME, url))
    } else {
        Cow::Borrowed(url)
    }
}

/// Validate and resolve the `src` of a resource-reference element.
///
/// Any `.` or `..` segment is rejected. URLs (including `file:`) and absolute paths
/// are kept as they are; relative paths are joined to the absolute directory of
/// `document_path` and normalized.
pub fn canonicalize_resource_path(src: &str, document_path: &str) -> Result<String, CompileError> {
    if PATH_SEPARATOR_RE
        .split(src)
        .any(|segment| segment == "." || segment == "..")
    {
        return Err(CompileError::PathTraversalRejected {
            src: src.to_string(),
            file: document_path.to_string(),
        });
    }

    if FILE_URL_RE.is_match(src) || URL_SCHEME_RE.is_match(src) || ABSOLUTE_PATH_RE.is_match(src)
    {
        return Ok(src.to_string());
    }

    Ok(normalize_path(&document_directory(document_path).join(src))
        .to_string_lossy()
        .into_owned())
}

/// Directory containing `document_path`, made absolute against the working directory.
pub(crate) fn document_directory(document_path: &str) -> PathBuf {
    let base = Path::new(document_path)
        .parent()
        .unwrap_or_else(|| Path::new(""));
    if base.is_absolute() {
        return base.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize_path(&cwd.join(base)),
        Err(e) => {
            tracing::warn!(file = document_path, error = %e, "working directory unavailable");
            base.to_path_buf()
        }
    }
}

/// Lexically drop `.` and resolve `..` against preceding components.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// SOURCE MAP REFERENCES
// ═══════════════════════════════════════════════════════════════════════════════

/// URL a compiled region's source-map comment points at: the delegate's map inlined
/// as a `data:` URL, or a map named after the region.
pub fn source_map_url(identity: &SyntheticIdentity, source_map: Option<&str>) -> String {
    match source_map {
        Some(map) => format!(
            "data:application/json;charset=utf-8;base64,{}",
            STANDARD.encode(map)
        ),
        None => format!("./{}.map", identity.file_name()),
    }
}

/// Append a `sourceMappingURL` comment unless `code` is shorter than two characters or
/// already carries one.
pub fn append_source_map_reference(code: &str, kind: RegionKind, url: &str) -> String {
    if code.chars().count() < MIN_REGION_LENGTH || SOURCE_MAPPING_URL_RE.is_match(code) {
        return code.to_string();
    }

    let mut out = code.to_string();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    match kind {
        RegionKind::Style => out.push_str(&format!("/*# sourceMappingURL={} */\n", url)),
        _ => out.push_str(&format!("//# sourceMappingURL={}\n", url)),
    }
    out
}

/// Keep compiled code from closing its own raw-text element early.
fn escape_raw_text(code: &str, kind: RegionKind) -> String {
    match kind {
        RegionKind::Script => SCRIPT_CLOSE_RE.replace_all(code, r"<\/$1").into_owned(),
        RegionKind::Style => STYLE_CLOSE_RE.replace_all(code, r"<\/$1").into_owned(),
        RegionKind::ResourceReference => code.to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EDITS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    SetText {
        element_index: usize,
        text: String,
    },
    SetAttribute {
        element_index: usize,
        name: &'static str,
        value: String,
    },
    /// Set `type` to `mime_type` if the element declares some other type.
    /// `type="module"` is kept.
    Retype {
        element_index: usize,
        mime_type: &'static str,
    },
}

impl Edit {
    pub fn element_index(&self) -> usize {
        match self {
            Edit::SetText { element_index, .. }
            | Edit::SetAttribute { element_index, .. }
            | Edit::Retype { element_index, .. } => *element_index,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    edits: Vec<Edit>,
}

impl Rewriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Queue the link and resource-reference rewrites for `extraction`. Fails on the
    /// first resource reference that tries to leave the document directory.
    pub fn canonicalize(
        &mut self,
        extraction: &Extraction,
        document_path: &str,
    ) -> Result<(), CompileError> {
        for link in &extraction.links {
            let fixed = fixup_protocol_relative(&link.url);
            if let Cow::Owned(value) = fixed {
                tracing::trace!(url = %link.url, "rewriting protocol-relative reference");
                self.edits.push(Edit::SetAttribute {
                    element_index: link.element_index,
                    name: link.attribute_name(),
                    value,
                });
            }

            let is_preprocessed_stylesheet = link
                .declared_type
                .as_deref()
                .map_or(false, |t| STYLESHEET_SOURCE_TYPES.contains(&t));
            if link.kind == LinkKind::Link && is_preprocessed_stylesheet {
                self.edits.push(Edit::SetAttribute {
                    element_index: link.element_index,
                    name: "type",
                    value: CSS_MIME_TYPE.to_string(),
                });
            }
        }

        for region in extraction.resource_references() {
            let Some(src) = region.source_attribute.as_deref().filter(|s| !s.is_empty()) else {
                tracing::trace!(ordinal = region.ordinal, "resource reference without src");
                continue;
            };

            let canonical = canonicalize_resource_path(src, document_path)?;
            if canonical != src {
                self.edits.push(Edit::SetAttribute {
                    element_index: region.element_index,
                    name: "src",
                    value: canonical,
                });
            }
        }

        Ok(())
    }

    /// Queue the replacement text for a compiled region.
    pub fn splice(&mut self, compiled: &CompiledRegion) {
        let url = source_map_url(&compiled.identity, compiled.result.source_map.as_deref());
        let code = escape_raw_text(&compiled.result.code, compiled.kind);
        let text = append_source_map_reference(&code, compiled.kind, &url);

        self.edits.push(Edit::SetText {
            element_index: compiled.element_index,
            text,
        });

        let container_type = match compiled.kind {
            RegionKind::Script => JAVASCRIPT_MIME_TYPE,
            RegionKind::Style => CSS_MIME_TYPE,
            RegionKind::ResourceReference => return,
        };
        self.edits.push(Edit::Retype {
            element_index: compiled.element_index,
            mime_type: container_type,
        });
    }

    /// Apply every queued edit to `candidates`, the candidate elements of a tree parsed
    /// from the same source the edits were planned on.
    pub fn apply(&self, candidates: &[Element], document_path: &str) -> Result<(), CompileError> {
        for edit in &self.edits {
            let element = candidates.get(edit.element_index()).ok_or_else(|| {
                CompileError::MalformedDocument {
                    file: document_path.to_string(),
                    reason: format!(
                        "element {} disappeared between extraction and rewrite",
                        edit.element_index()
                    ),
                }
            })?;

            match edit {
                Edit::SetText { text, .. } => element.set_text(text),
                Edit::SetAttribute { name, value, .. } => element.set_attribute(name, value),
                Edit::Retype { mime_type, .. } => {
                    let Some(current) = element.attribute("type") else {
                        continue;
                    };
                    let current = current.trim().to_ascii_lowercase();
                    if !current.is_empty() && current != "module" && current != *mime_type {
                        element.set_attribute("type", mime_type);
                    }
                }
            }
        }
        Ok(())
    }
}
