//! Region Extractor
//!
//! Walks the document once, in document order, over `<script>`, `<style>`, `<link>`
//! and resource-reference elements. Inline script and style text becomes a compilable
//! [`Region`]; resource-reference elements become regions without content; external
//! scripts and links become [`LinkReference`]s for the rewriter and the dependency
//! reporter.
//!
//! Every candidate element gets an `element_index` (its position among all candidates)
//! so edits can be applied to a freshly parsed tree of the same source.

use crate::document::{Document, Element};
use crate::options::InlineCompilerOptions;

pub const SCRIPT_TAG: &str = "script";
pub const STYLE_TAG: &str = "style";
pub const LINK_TAG: &str = "link";

/// Inline text shorter than this (after trimming) is passed through, not compiled.
pub const MIN_REGION_LENGTH: usize = 2;

// ═══════════════════════════════════════════════════════════════════════════════
// REGION TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Script,
    Style,
    ResourceReference,
}

impl RegionKind {
    pub fn name(&self) -> &'static str {
        match self {
            RegionKind::Script => "script",
            RegionKind::Style => "style",
            RegionKind::ResourceReference => "resource-reference",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub kind: RegionKind,
    /// Value of an explicit `type` attribute.
    pub declared_mime_type: Option<String>,
    /// Mime type implied by the tag when no `type` is given.
    pub tag_default_mime_type: Option<String>,
    /// Inline text; absent for resource references.
    pub raw_content: Option<String>,
    /// Path or URL of a resource reference.
    pub source_attribute: Option<String>,
    /// Discovery order among all regions of the document.
    pub ordinal: usize,
    pub element_index: usize,
}

impl Region {
    /// Explicit type first, then the tag default. `None` means the region is passed
    /// through verbatim.
    pub fn resolved_mime_type(&self) -> Option<&str> {
        self.declared_mime_type
            .as_deref()
            .or(self.tag_default_mime_type.as_deref())
    }

    pub fn is_inline_code(&self) -> bool {
        self.raw_content.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `<script src>`
    Script,
    /// `<link href>`
    Link,
}

/// An externally referenced resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    pub kind: LinkKind,
    pub element_index: usize,
    pub url: String,
    pub rel: Option<String>,
    pub declared_type: Option<String>,
}

impl LinkReference {
    pub fn attribute_name(&self) -> &'static str {
        match self.kind {
            LinkKind::Script => "src",
            LinkKind::Link => "href",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub regions: Vec<Region>,
    pub links: Vec<LinkReference>,
}

impl Extraction {
    /// Regions that carry inline code, in document order.
    pub fn inline_regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| r.is_inline_code())
    }

    pub fn resource_references(&self) -> impl Iterator<Item = &Region> {
        self.regions
            .iter()
            .filter(|r| r.kind == RegionKind::ResourceReference)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXTRACTION
// ═══════════════════════════════════════════════════════════════════════════════

pub fn candidate_tags(options: &InlineCompilerOptions) -> Vec<&str> {
    vec![
        SCRIPT_TAG,
        STYLE_TAG,
        LINK_TAG,
        options.resource_reference_tag.as_str(),
    ]
}

/// Candidate elements in document order. Indexes into this list are the
/// `element_index` of regions and links.
pub fn candidates(document: &Document, options: &InlineCompilerOptions) -> Vec<Element> {
    document.query(&candidate_tags(options))
}

pub fn extract(document: &Document, options: &InlineCompilerOptions) -> Extraction {
    let mut extraction = Extraction::default();

    for (element_index, element) in candidates(document, options).iter().enumerate() {
        let tag = element.tag_name().to_ascii_lowercase();

        if tag == SCRIPT_TAG {
            if let Some(src) = non_empty_attribute(element, "src") {
                extraction.links.push(LinkReference {
                    kind: LinkKind::Script,
                    element_index,
                    url: src,
                    rel: None,
                    declared_type: declared_type(element),
                });
                continue;
            }

            let text = element.text();
            if text.trim().len() < MIN_REGION_LENGTH {
                tracing::trace!(element_index, "skipping near-empty script");
                continue;
            }

            // `type="module"` is still JavaScript for the purposes of compilation.
            let declared = declared_type(element).filter(|t| t != "module");
            let ordinal = extraction.regions.len();
            extraction.regions.push(Region {
                kind: RegionKind::Script,
                declared_mime_type: declared,
                tag_default_mime_type: Some(options.script_default_mime_type.clone()),
                raw_content: Some(text),
                source_attribute: None,
                ordinal,
                element_index,
            });
        } else if tag == STYLE_TAG {
            let text = element.text();
            if text.trim().len() < MIN_REGION_LENGTH {
                tracing::trace!(element_index, "skipping near-empty style");
                continue;
            }

            let ordinal = extraction.regions.len();
            extraction.regions.push(Region {
                kind: RegionKind::Style,
                declared_mime_type: declared_type(element),
                tag_default_mime_type: options.style_default_mime_type.clone(),
                raw_content: Some(text),
                source_attribute: None,
                ordinal,
                element_index,
            });
        } else if tag == LINK_TAG {
            if let Some(href) = non_empty_attribute(element, "href") {
                extraction.links.push(LinkReference {
                    kind: LinkKind::Link,
                    element_index,
                    url: href,
                    rel: element.attribute("rel").map(|r| r.to_ascii_lowercase()),
                    declared_type: declared_type(element),
                });
            }
        } else {
            let ordinal = extraction.regions.len();
            extraction.regions.push(Region {
                kind: RegionKind::ResourceReference,
                declared_mime_type: None,
                tag_default_mime_type: None,
                raw_content: None,
                source_attribute: element.attribute("src"),
                ordinal,
                element_index,
            });
        }
    }

    extraction
}

fn declared_type(element: &Element) -> Option<String> {
    non_empty_attribute(element, "type").map(|t| t.to_ascii_lowercase())
}

fn non_empty_attribute(element: &Element, name: &str) -> Option<String> {
    element
        .attribute(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
