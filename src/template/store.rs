//! On-disk template directory.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use super::{TemplateError, TemplateResult};

/// Directory of named template files.
///
/// Names are relative paths below the root. Names that are empty, absolute or
/// step outside the root with `..` never resolve.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    /// Open the store, creating the directory (and its parents) if it does not exist
    pub fn open(root: impl Into<PathBuf>) -> TemplateResult<Self> {
        let root = root.into();

        if !root.exists() {
            fs::create_dir_all(&root).map_err(|source| TemplateError::Directory {
                path: root.clone(),
                source,
            })?;
            tracing::info!(path = %root.display(), "Created template directory");
        }

        Ok(Self { root })
    }

    /// Root directory templates are resolved from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a template name to its path below the root
    fn path_for(&self, name: &str) -> TemplateResult<PathBuf> {
        let relative = Path::new(name);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

        if name.is_empty() || !contained {
            return Err(TemplateError::NotFound(name.to_string()));
        }

        Ok(self.root.join(relative))
    }

    /// Read a template's source as UTF-8 text
    pub fn load(&self, name: &str) -> TemplateResult<String> {
        let path = self.path_for(name)?;

        if !path.is_file() {
            return Err(TemplateError::NotFound(name.to_string()));
        }

        fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => TemplateError::NotFound(name.to_string()),
            _ => TemplateError::Io {
                name: name.to_string(),
                source,
            },
        })
    }

    /// Names of the template files directly under the root, sorted
    pub fn list(&self) -> TemplateResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|source| TemplateError::Directory {
            path: self.root.clone(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();

        Ok(names)
    }
}
