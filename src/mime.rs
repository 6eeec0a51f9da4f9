//! Standard mime type ↔ file extension table.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::path::Path;

pub const HTML_MIME_TYPE: &str = "text/html";
pub const JAVASCRIPT_MIME_TYPE: &str = "text/javascript";
pub const CSS_MIME_TYPE: &str = "text/css";

lazy_static! {
    /// Canonical extension for each known mime type.
    static ref EXTENSIONS_BY_MIME: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("text/javascript", "js");
        m.insert("application/javascript", "js");
        m.insert("application/x-javascript", "js");
        m.insert("text/ecmascript", "js");
        m.insert("application/ecmascript", "js");
        m.insert("text/jsx", "jsx");
        m.insert("text/typescript", "ts");
        m.insert("application/typescript", "ts");
        m.insert("text/tsx", "tsx");
        m.insert("text/coffeescript", "coffee");
        m.insert("text/cjsx", "cjsx");
        m.insert("text/css", "css");
        m.insert("text/less", "less");
        m.insert("text/scss", "scss");
        m.insert("text/sass", "sass");
        m.insert("text/stylus", "styl");
        m.insert("text/html", "html");
        m.insert("application/xhtml+xml", "xhtml");
        m.insert("text/vue", "vue");
        m.insert("application/json", "json");
        m.insert("text/cson", "cson");
        m.insert("text/markdown", "md");
        m.insert("text/plain", "txt");
        m
    };

    /// Mime type for each known file extension.
    static ref MIME_BY_EXTENSION: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("js", "text/javascript");
        m.insert("mjs", "text/javascript");
        m.insert("jsx", "text/jsx");
        m.insert("ts", "text/typescript");
        m.insert("tsx", "text/tsx");
        m.insert("coffee", "text/coffeescript");
        m.insert("cjsx", "text/cjsx");
        m.insert("css", "text/css");
        m.insert("less", "text/less");
        m.insert("scss", "text/scss");
        m.insert("sass", "text/sass");
        m.insert("styl", "text/stylus");
        m.insert("html", "text/html");
        m.insert("htm", "text/html");
        m.insert("xhtml", "application/xhtml+xml");
        m.insert("vue", "text/vue");
        m.insert("json", "application/json");
        m.insert("cson", "text/cson");
        m.insert("md", "text/markdown");
        m.insert("txt", "text/plain");
        m
    };
}

/// Canonical file extension for `mime_type`, if it is a known type.
pub fn extension(mime_type: &str) -> Option<&'static str> {
    EXTENSIONS_BY_MIME
        .get(mime_type.to_ascii_lowercase().as_str())
        .copied()
}

/// Extension used when naming a region of `mime_type`.
///
/// Unknown types fall back to their subtype with any `x-` prefix removed
/// (`text/x-foo` → `foo`).
pub fn extension_or_subtype(mime_type: &str) -> String {
    if let Some(ext) = extension(mime_type) {
        return ext.to_string();
    }
    let subtype = mime_type.rsplit('/').next().unwrap_or(mime_type);
    let subtype = subtype.split(';').next().unwrap_or(subtype).trim();
    subtype
        .strip_prefix("x-")
        .unwrap_or(subtype)
        .to_ascii_lowercase()
}

/// Mime type of `path` judged by its extension.
pub fn lookup(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
    MIME_BY_EXTENSION.get(ext.as_str()).copied()
}
