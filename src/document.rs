//! # Document Model
//!
//! A thin layer over html5ever's `RcDom`: parse markup into a mutable tree, query
//! elements by tag in document order, read and write attributes and text, and
//! serialize back to markup.
//!
//! ## Fragments
//!
//! html5ever always builds a complete `<html><head><body>` tree. A source whose first
//! tag (after whitespace and comments) is not a doctype, `<html>`, `<head>` or `<body>`
//! is a fragment: serialization then unwraps the implied `html`/`head`/`body` elements
//! and emits everything else in tree order, so fragments come back as fragments.
//!
//! Raw-text elements (`<script>`, `<style>`) are serialized verbatim, so region
//! content that is not rewritten survives byte for byte.

use html5ever::parse_document;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{namespace_url, ns, Attribute, LocalName, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::RefCell;
use std::rc::Rc;
use tendril::StrTendril;

use crate::error::CompileError;

pub struct Document {
    dom: RcDom,
    file_path: String,
    is_fragment: bool,
}

impl Document {
    /// Parse `markup`. With `strict`, the first recoverable parse error is reported as
    /// a malformed document instead of being repaired.
    pub fn parse(markup: &str, file_path: &str, strict: bool) -> Result<Self, CompileError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut markup.as_bytes())
            .map_err(|e| CompileError::MalformedDocument {
                file: file_path.to_string(),
                reason: e.to_string(),
            })?;

        if !dom.errors.is_empty() {
            tracing::debug!(
                file = file_path,
                errors = dom.errors.len(),
                "recovered from HTML parse errors"
            );
            if strict {
                return Err(CompileError::MalformedDocument {
                    file: file_path.to_string(),
                    reason: dom.errors[0].to_string(),
                });
            }
        }

        let is_fragment = !starts_as_document(markup);

        Ok(Self {
            dom,
            file_path: file_path.to_string(),
            is_fragment,
        })
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// All elements whose tag is one of `tags`, in document order.
    pub fn query(&self, tags: &[&str]) -> Vec<Element> {
        let mut found = Vec::new();
        collect_elements(&self.dom.document, tags, &mut found);
        found
    }

    pub fn serialize(&self) -> Result<String, CompileError> {
        if !self.is_fragment {
            return self.serialize_children(&self.dom.document);
        }

        let mut out = String::new();
        self.serialize_unwrapped(&self.dom.document, &mut out)?;
        Ok(out)
    }

    /// Serialize the children of `handle`, descending into implied wrapper elements
    /// instead of emitting their tags.
    fn serialize_unwrapped(&self, handle: &Handle, out: &mut String) -> Result<(), CompileError> {
        for child in handle.children.borrow().iter() {
            let is_wrapper = match child.data {
                NodeData::Element { ref name, .. } => IMPLIED_WRAPPERS
                    .iter()
                    .any(|tag| (*name.local).eq_ignore_ascii_case(tag)),
                _ => false,
            };
            if is_wrapper {
                self.serialize_unwrapped(child, out)?;
            } else {
                out.push_str(&self.serialize_with(child, TraversalScope::IncludeNode)?);
            }
        }
        Ok(())
    }

    fn serialize_children(&self, handle: &Handle) -> Result<String, CompileError> {
        self.serialize_with(handle, TraversalScope::ChildrenOnly(None))
    }

    fn serialize_with(&self, handle: &Handle, scope: TraversalScope) -> Result<String, CompileError> {
        let node: SerializableHandle = handle.clone().into();
        let mut bytes = Vec::new();
        let opts = SerializeOpts {
            traversal_scope: scope,
            ..Default::default()
        };
        serialize(&mut bytes, &node, opts).map_err(|e| {
            CompileError::MalformedDocument {
                file: self.file_path.clone(),
                reason: format!("Failed to serialize HTML: {}", e),
            }
        })?;
        String::from_utf8(bytes).map_err(|e| CompileError::MalformedDocument {
            file: self.file_path.clone(),
            reason: e.to_string(),
        })
    }
}

const IMPLIED_WRAPPERS: &[&str] = &["html", "head", "body"];

/// Whether the first tag of `markup`, skipping whitespace and comments, opens a whole
/// document rather than a fragment.
fn starts_as_document(markup: &str) -> bool {
    let mut rest = markup.trim_start_matches('\u{feff}');
    loop {
        rest = rest.trim_start();
        if let Some(comment) = rest.strip_prefix("<!--") {
            match comment.find("-->") {
                Some(end) => rest = &comment[end + 3..],
                None => return false,
            }
        } else {
            break;
        }
    }

    let head: String = rest.chars().take(10).collect::<String>().to_ascii_lowercase();
    if head.starts_with("<!doctype") {
        return true;
    }
    IMPLIED_WRAPPERS.iter().any(|tag| {
        head.strip_prefix('<')
            .and_then(|t| t.strip_prefix(*tag))
            .map_or(false, |after| {
                after.is_empty()
                    || after.starts_with(|c: char| c == '>' || c == '/' || c.is_ascii_whitespace())
            })
    })
}

fn collect_elements(handle: &Handle, tags: &[&str], found: &mut Vec<Element>) {
    if let NodeData::Element { ref name, .. } = handle.data {
        if tags.iter().any(|tag| (*name.local).eq_ignore_ascii_case(tag)) {
            found.push(Element(handle.clone()));
        }
    }
    for child in handle.children.borrow().iter() {
        collect_elements(child, tags, found);
    }
}

/// Handle to an element node of a [`Document`].
#[derive(Clone)]
pub struct Element(Handle);

impl Element {
    pub fn tag_name(&self) -> String {
        match self.0.data {
            NodeData::Element { ref name, .. } => name.local.to_string(),
            _ => String::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        match self.0.data {
            NodeData::Element { ref attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|attr| (*attr.name.local).eq_ignore_ascii_case(name))
                .map(|attr| attr.value.to_string()),
            _ => None,
        }
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        if let NodeData::Element { ref attrs, .. } = self.0.data {
            let mut attrs = attrs.borrow_mut();
            let value = StrTendril::from_slice(value);
            match attrs
                .iter()
                .position(|attr| (*attr.name.local).eq_ignore_ascii_case(name))
            {
                Some(index) => attrs[index].value = value,
                None => attrs.push(Attribute {
                    name: QualName::new(None, ns!(), LocalName::from(name)),
                    value,
                }),
            }
        }
    }

    /// Concatenated text of the element's direct text children.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for child in self.0.children.borrow().iter() {
            if let NodeData::Text { ref contents } = child.data {
                text.push_str(&contents.borrow());
            }
        }
        text
    }

    /// Replace all children with a single text node.
    pub fn set_text(&self, text: &str) {
        let node = Node::new(NodeData::Text {
            contents: RefCell::new(StrTendril::from_slice(text)),
        });
        node.parent.set(Some(Rc::downgrade(&self.0)));

        let mut children = self.0.children.borrow_mut();
        for child in children.drain(..) {
            child.parent.set(None);
        }
        children.push(node);
    }
}
