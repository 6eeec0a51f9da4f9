use std::fmt;

use crate::mime;

/// Logical file name of an inline region: `<document path>:inline_<ordinal>.<ext>`.
///
/// Delegates see it as the path of the code they compile, use it for cache keys and
/// name their source maps after it. It never exists on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntheticIdentity {
    file_path: String,
    ordinal: usize,
    extension: String,
}

impl SyntheticIdentity {
    pub fn new(file_path: &str, ordinal: usize, mime_type: &str) -> Self {
        Self {
            file_path: file_path.to_string(),
            ordinal,
            extension: mime::extension_or_subtype(mime_type),
        }
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Name of the region without the document directory, e.g. `index.html:inline_0.js`.
    pub fn file_name(&self) -> String {
        let base = self
            .file_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_path);
        format!("{}:inline_{}.{}", base, self.ordinal, self.extension)
    }
}

impl fmt::Display for SyntheticIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:inline_{}.{}",
            self.file_path, self.ordinal, self.extension
        )
    }
}
