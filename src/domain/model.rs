use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

/// Uploaded project files in upload order.
///
/// Inserting a path that already exists replaces its content in place, so the
/// archive keeps the position of the first upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSet {
    files: Vec<SourceFile>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        let path = path.into();
        let content = content.into();
        match self.files.iter_mut().find(|f| f.path == path) {
            Some(existing) => existing.content = content,
            None => self.files.push(SourceFile { path, content }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<P: Into<String>, C: Into<String>> FromIterator<(P, C)> for FileSet {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut set = FileSet::new();
        for (path, content) in iter {
            set.insert(path, content);
        }
        set
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixOptions {
    pub fix_lint: bool,
    pub add_comments: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixRequest {
    pub files: FileSet,
    pub instructions: String,
    pub options: FixOptions,
}

/// Corrected file contents keyed by path, as returned by the model.
pub type FixedFiles = HashMap<String, String>;

#[derive(Debug, Clone)]
pub struct FixOutcome {
    pub archive: Vec<u8>,
    pub files_total: usize,
    pub files_changed: usize,
}
