//! Dependency Reporter
//!
//! Files a document references externally and that a build graph must track:
//! `<script src>` and stylesheet/import/modulepreload `<link href>` pointing at the
//! file system. Inline regions have no file of their own and contribute nothing.
//! Resource-reference elements are resolved when the page loads and are not build
//! inputs either.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::extract::{Extraction, LinkKind, LinkReference};
use crate::rewrite::{document_directory, normalize_path};

const DEPENDENCY_LINK_RELS: &[&str] = &["stylesheet", "import", "modulepreload"];

lazy_static! {
    static ref DRIVE_PATH_RE: Regex = Regex::new(r"^[A-Za-z]:[\\/]").unwrap();
    static ref URL_SCHEME_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").unwrap();
}

/// Resolved paths of the external files `extraction` references, in document order,
/// each reported once.
pub fn dependent_files(extraction: &Extraction, document_path: &str) -> Vec<PathBuf> {
    let base = document_directory(document_path);

    let mut files: Vec<PathBuf> = Vec::new();
    for link in extraction.links.iter().filter(|l| is_build_input(l)) {
        let Some(path) = local_path(&link.url, &base) else {
            tracing::trace!(url = %link.url, "not a local file reference");
            continue;
        };
        if !files.contains(&path) {
            files.push(path);
        }
    }
    files
}

fn is_build_input(link: &LinkReference) -> bool {
    match link.kind {
        LinkKind::Script => true,
        LinkKind::Link => link.rel.as_deref().map_or(false, |rel| {
            rel.split_ascii_whitespace()
                .any(|token| DEPENDENCY_LINK_RELS.contains(&token))
        }),
    }
}

/// File system path of `url`, or `None` for remote, protocol-relative, `data:` and
/// fragment-only references.
fn local_path(url: &str, base: &Path) -> Option<PathBuf> {
    if url.starts_with("//") {
        return None;
    }
    if url.get(..5).map_or(false, |scheme| scheme.eq_ignore_ascii_case("file:")) {
        return url::Url::parse(url).ok()?.to_file_path().ok();
    }

    let path = url.split(['?', '#']).next().unwrap_or("");
    if path.is_empty() {
        return None;
    }
    if DRIVE_PATH_RE.is_match(path) {
        return Some(PathBuf::from(path));
    }
    if URL_SCHEME_RE.is_match(path) {
        return None;
    }
    Some(normalize_path(&base.join(path)))
}
