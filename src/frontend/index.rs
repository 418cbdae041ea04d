//! Project indexes
//!
//! Two [`ModuleIndex`] implementations: [`InMemoryIndex`] for callers that already hold the summaries (tests, editors
//! with open buffers) and [`DirectoryIndex`], which scans one directory of Natural sources.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use natparse_core::FileKind;
use natparse_syntax::module_index::{ModuleIndex, ModuleSummary};
use thiserror::Error;

use super::config::FrontendConfig;
use super::module::{ModuleIdentity, parse_module};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Summaries held in memory, keyed by upper-case module name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIndex {
    modules: HashMap<String, ModuleSummary>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, summary: ModuleSummary) {
        self.modules.insert(summary.name.to_ascii_uppercase(), summary);
    }

    /// Parse `source` as `identity` and index its summary.
    ///
    /// The module is parsed without an index of its own, so a data area that itself refers to other modules
    /// exports only what it declares.
    pub fn add_source(&mut self, identity: ModuleIdentity, source: &str) {
        let module = parse_module(source, identity, None, &FrontendConfig::default());
        self.insert(module.summary());
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl FromIterator<ModuleSummary> for InMemoryIndex {
    fn from_iter<T: IntoIterator<Item = ModuleSummary>>(iter: T) -> Self {
        let mut index = Self::new();
        for summary in iter {
            index.insert(summary);
        }
        index
    }
}

impl ModuleIndex for InMemoryIndex {
    fn find_module(&self, name: &str) -> Option<ModuleSummary> {
        self.modules.get(&name.to_ascii_uppercase()).cloned()
    }
}

/// Index over the Natural sources of one directory (not recursive).
///
/// Data areas and functions are parsed while scanning, since `USING` needs their variables and function calls need
/// their return types; every other module is only recorded by name and kind. Files whose extension is not a Natural
/// source extension are ignored.
#[derive(Debug, Clone, Default)]
pub struct DirectoryIndex {
    root: PathBuf,
    modules: InMemoryIndex,
    paths: HashMap<String, PathBuf>,
}

impl DirectoryIndex {
    /// Scan `dir`.
    ///
    /// ## Errors
    /// - [`IndexError::Io`] when the directory or one of the summarized files can't be read.
    #[tracing::instrument(skip_all, fields(dir = %dir.display()))]
    pub fn scan(dir: &Path) -> Result<Self, IndexError> {
        let mut index = Self {
            root: dir.to_path_buf(),
            ..Self::default()
        };
        let mut entries: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(io_error(dir))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        entries.sort();

        for path in entries {
            let Ok(identity) = ModuleIdentity::from_path(&path) else {
                continue;
            };
            if identity.kind.is_data_area() || identity.kind == FileKind::Function {
                let source = fs::read_to_string(&path).map_err(io_error(&path))?;
                index.modules.add_source(identity.clone(), &source);
            } else {
                index
                    .modules
                    .insert(ModuleSummary::new(identity.name.clone(), identity.kind));
            }
            index.paths.entry(identity.name).or_insert(path);
        }
        tracing::debug!(modules = index.modules.len(), "directory indexed");
        Ok(index)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file a module was read from.
    pub fn path_of(&self, name: &str) -> Option<&Path> {
        self.paths.get(&name.to_ascii_uppercase()).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> IndexError {
    let path = path.to_path_buf();
    move |source| IndexError::Io { path, source }
}

impl ModuleIndex for DirectoryIndex {
    fn find_module(&self, name: &str) -> Option<ModuleSummary> {
        self.modules.find_module(name)
    }
}
