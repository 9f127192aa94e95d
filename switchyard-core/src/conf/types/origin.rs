use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a configuration block was declared.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Origin {
    pub(crate) file: PathBuf,
    pub(crate) section: String,
    pub(crate) index: Option<usize>,
}

impl Origin {
    pub fn new(file: &Path, section: &str, index: Option<usize>) -> Self {
        Self {
            file: file.into(),
            section: section.to_owned(),
            index,
        }
    }

    /// Origin of a block nested inside this one, e.g. `server[0].api`.
    pub fn child(&self, section: &str, index: Option<usize>) -> Self {
        let parent = match self.index {
            Some(i) => format!("{}[{}]", self.section, i),
            None => self.section.clone(),
        };

        Self {
            file: self.file.clone(),
            section: format!("{parent}.{section}"),
            index,
        }
    }

    pub fn test(message: &str) -> Self {
        Self::new(Path::new("/test/file"), message, None)
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}: {}[{}] block", self.file.display(), self.section, i),
            None => write!(f, "{}: {} block", self.file.display(), self.section),
        }
    }
}
