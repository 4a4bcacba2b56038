//! Compiled-template cache.
//!
//! [`TemplateCache`] stores compiled renderers keyed by **resolved absolute
//! path**, not by the caller-supplied template identifier, so two
//! identifiers that resolve to the same file share one entry. Entries are
//! added lazily on first compile and never evicted or invalidated by file
//! changes; the explicit bypass flag is the only way to force a fresh
//! compile. The cache lives for the process lifetime alongside its owning
//! [`Views`](crate::Views) instance.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::CompileOptions;
use crate::engine::{CompiledTemplate, TemplateCompiler};
use crate::error::ViewError;

/// Path-keyed store of compiled templates with get-or-compile semantics.
#[derive(Default)]
pub struct TemplateCache {
    entries: HashMap<PathBuf, Rc<dyn CompiledTemplate>>,
}

impl TemplateCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached renderer for `path`, compiling and storing it on
    /// a miss.
    ///
    /// With `skip_cache` set, the file is always compiled fresh and the
    /// result is neither stored nor read from the cache.
    ///
    /// On a hit the per-call `options` are ignored entirely, even when they
    /// differ from the options used at compile time: the cache is keyed by
    /// path alone and the first compile wins. Callers that need different
    /// options must bypass the cache.
    pub fn get_or_compile(
        &mut self,
        compiler: &dyn TemplateCompiler,
        path: &Path,
        options: &CompileOptions,
        skip_cache: bool,
    ) -> Result<Rc<dyn CompiledTemplate>, ViewError> {
        if skip_cache {
            return compiler.compile_file(path, options);
        }

        if let Some(compiled) = self.entries.get(path) {
            return Ok(Rc::clone(compiled));
        }

        let compiled = compiler.compile_file(path, options)?;
        self.entries.insert(path.to_path_buf(), Rc::clone(&compiled));
        Ok(compiled)
    }

    /// Returns true if a renderer is cached for `path`.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of cached renderers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
