use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::extract::{LINK_TAG, SCRIPT_TAG, STYLE_TAG};
use crate::mime::JAVASCRIPT_MIME_TYPE;

/// Configuration for [`InlineHtmlCompiler`](crate::InlineHtmlCompiler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InlineCompilerOptions {
    /// Mime type of a `<script>` without a `type` attribute.
    pub script_default_mime_type: String,
    /// Mime type of a `<style>` without a `type` attribute. Unset means such styles
    /// are passed through untouched.
    pub style_default_mime_type: Option<String>,
    /// Tag name of resource-reference elements.
    pub resource_reference_tag: String,
    /// Treat every recoverable HTML parse error as a malformed document.
    pub strict_parsing: bool,
}

impl Default for InlineCompilerOptions {
    fn default() -> Self {
        Self {
            script_default_mime_type: JAVASCRIPT_MIME_TYPE.to_string(),
            style_default_mime_type: None,
            resource_reference_tag: "x-require".to_string(),
            strict_parsing: false,
        }
    }
}

impl InlineCompilerOptions {
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| CompileError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), CompileError> {
        if self.script_default_mime_type.trim().is_empty() {
            return Err(CompileError::InvalidOptions(
                "scriptDefaultMimeType must not be empty".to_string(),
            ));
        }
        let tag = &self.resource_reference_tag;
        if tag.is_empty()
            || !tag
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(CompileError::InvalidOptions(format!(
                "resourceReferenceTag '{}' is not a valid tag name",
                tag
            )));
        }
        // The extractor claims these before it looks for resource references.
        if [SCRIPT_TAG, STYLE_TAG, LINK_TAG]
            .iter()
            .any(|reserved| tag.eq_ignore_ascii_case(reserved))
        {
            return Err(CompileError::InvalidOptions(format!(
                "resourceReferenceTag '{}' collides with a built-in tag",
                tag
            )));
        }
        Ok(())
    }
}
