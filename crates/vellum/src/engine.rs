//! Template compiler abstraction.
//!
//! This module defines the [`TemplateCompiler`] trait, the seam between the
//! view layer and the template-compilation engine. The engine is a black
//! box: given source text or a file path plus [`CompileOptions`], it returns
//! a [`CompiledTemplate`] that maps a locals mapping to a string. The default
//! implementation is [`MiniJinjaCompiler`].
//!
//! Compiled templates are handed out as `Rc<dyn CompiledTemplate>` so the
//! cache and the caller can share one compiled artifact without copying.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use minijinja::{Environment, Value};

use crate::config::{CompileOptions, BASEDIR, COMPILE_DEBUG, PRETTY};
use crate::error::ViewError;
use crate::Locals;

/// Name under which string-compiled templates are registered in the engine.
const INLINE_TEMPLATE_NAME: &str = "<string>";

/// An executable renderer produced by a [`TemplateCompiler`].
///
/// Rendering is synchronous and pure with respect to the cache: invoking a
/// compiled template never mutates shared state.
pub trait CompiledTemplate {
    /// Renders the template against the given locals mapping.
    fn render(&self, locals: &Locals) -> Result<String, ViewError>;
}

/// A template-compilation engine.
///
/// Implementations compile a file or a source string into a reusable
/// [`CompiledTemplate`]. The view layer never inspects the compiled
/// artifact; it only caches and invokes it.
pub trait TemplateCompiler {
    /// File extension (without the leading dot) this engine's templates
    /// carry on disk. Drives template-identifier resolution.
    fn extension(&self) -> &str;

    /// Compiles the template file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::TemplateNotFound`] if the file does not exist,
    /// [`ViewError::Filesystem`] for other read failures, and
    /// [`ViewError::Compile`] if the engine rejects the source.
    fn compile_file(
        &self,
        path: &Path,
        options: &CompileOptions,
    ) -> Result<Rc<dyn CompiledTemplate>, ViewError>;

    /// Compiles literal template source text.
    fn compile_str(
        &self,
        source: &str,
        options: &CompileOptions,
    ) -> Result<Rc<dyn CompiledTemplate>, ViewError>;
}

/// MiniJinja-backed template compiler.
///
/// Each compiled template owns a private `Environment` configured from the
/// compile options it was built with:
///
/// - `compile_debug` enables the engine's debug diagnostics
/// - `pretty = false` trims block whitespace for compact output
/// - `basedir` roots `{% include %}` resolution; when absent, includes
///   resolve relative to the template file's directory
///
/// # Example
///
/// ```rust
/// use vellum::{CompileOptions, MiniJinjaCompiler, TemplateCompiler};
///
/// let compiler = MiniJinjaCompiler::new();
/// let compiled = compiler
///     .compile_str("Hello, {{ name }}!", &CompileOptions::new())
///     .unwrap();
///
/// let mut locals = vellum::Locals::new();
/// locals.insert("name".into(), "World".into());
/// assert_eq!(compiled.render(&locals).unwrap(), "Hello, World!");
/// ```
#[derive(Debug, Default)]
pub struct MiniJinjaCompiler;

impl MiniJinjaCompiler {
    /// Creates a new MiniJinja compiler.
    pub fn new() -> Self {
        Self
    }

    fn environment(options: &CompileOptions, include_root: Option<&Path>) -> Environment<'static> {
        let mut env = Environment::new();
        env.set_debug(options.get_bool(COMPILE_DEBUG).unwrap_or(false));
        if !options.get_bool(PRETTY).unwrap_or(false) {
            env.set_trim_blocks(true);
            env.set_lstrip_blocks(true);
        }
        let root = options
            .get_str(BASEDIR)
            .map(PathBuf::from)
            .or_else(|| include_root.map(Path::to_path_buf));
        if let Some(root) = root {
            env.set_loader(minijinja::path_loader(root));
        }
        env
    }
}

impl TemplateCompiler for MiniJinjaCompiler {
    fn extension(&self) -> &str {
        "jinja"
    }

    fn compile_file(
        &self,
        path: &Path,
        options: &CompileOptions,
    ) -> Result<Rc<dyn CompiledTemplate>, ViewError> {
        let source = fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ViewError::TemplateNotFound {
                path: path.to_path_buf(),
            },
            _ => ViewError::filesystem(path, err),
        })?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(INLINE_TEMPLATE_NAME)
            .to_string();

        let mut env = Self::environment(options, path.parent());
        env.add_template_owned(name.clone(), source)?;
        Ok(Rc::new(CompiledJinja { env, name }))
    }

    fn compile_str(
        &self,
        source: &str,
        options: &CompileOptions,
    ) -> Result<Rc<dyn CompiledTemplate>, ViewError> {
        let mut env = Self::environment(options, None);
        env.add_template_owned(INLINE_TEMPLATE_NAME.to_string(), source.to_string())?;
        Ok(Rc::new(CompiledJinja {
            env,
            name: INLINE_TEMPLATE_NAME.to_string(),
        }))
    }
}

struct CompiledJinja {
    env: Environment<'static>,
    name: String,
}

impl CompiledTemplate for CompiledJinja {
    fn render(&self, locals: &Locals) -> Result<String, ViewError> {
        let template = self.env.get_template(&self.name)?;
        template
            .render(Value::from_serialize(locals))
            .map_err(ViewError::from)
    }
}
