//! Top-level render engine.
//!
//! [`Views`] ties the resolver, the compiled-template cache, and the
//! configuration store together behind one handle. The handle is cheap to
//! clone (`Rc` internally) so it can be attached to a host application's
//! request context while the application keeps rendering through the same
//! cache and configuration.
//!
//! # Render paths
//!
//! - [`Views::render`] — resolve, compile (or reuse), render with exactly
//!   the locals given.
//! - [`Views::render_into`] — the contextual path: merges the helper
//!   namespace, default locals, request state, and call-site locals (later
//!   wins), renders, and writes body + content type onto the request
//!   context.
//!
//! # Concurrency
//!
//! Single-threaded cooperative execution is assumed; configuration updates
//! are expected at startup, not per-request, and update races are out of
//! scope.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cache::TemplateCache;
use crate::config::{CompileOptions, ConfigUpdate, ViewConfig};
use crate::context::{HostApp, RequestContext};
use crate::engine::{MiniJinjaCompiler, TemplateCompiler};
use crate::error::ViewError;
use crate::resolve::resolve_template;
use crate::Locals;

/// Content type set on the request context by the contextual render path.
pub const HTML_CONTENT_TYPE: &str = "text/html";

/// Per-call options for [`Views::render`].
///
/// Models the options position of the render call, which accepts either a
/// compile-option set or a bare skip-cache boolean. A boolean here takes
/// precedence over the trailing `skip_cache` argument.
#[derive(Debug, Clone)]
pub enum RenderOptions {
    /// Compile options merged over the configured defaults.
    Compile(CompileOptions),
    /// Skip-cache flag in options position.
    SkipCache(bool),
}

impl From<bool> for RenderOptions {
    fn from(skip_cache: bool) -> Self {
        RenderOptions::SkipCache(skip_cache)
    }
}

impl From<CompileOptions> for RenderOptions {
    fn from(options: CompileOptions) -> Self {
        RenderOptions::Compile(options)
    }
}

struct Inner {
    compiler: Box<dyn TemplateCompiler>,
    cache: TemplateCache,
    config: ViewConfig,
}

/// The view-rendering engine.
///
/// # Example
///
/// ```rust,ignore
/// use vellum::{ConfigUpdate, Locals, Views};
///
/// let views = Views::new();
/// views.configure(ConfigUpdate::new().view_dir("./views"))?;
///
/// let mut locals = Locals::new();
/// locals.insert("title".into(), "Home".into());
/// let html = views.render("index", &locals, None, None)?;
/// ```
#[derive(Clone)]
pub struct Views {
    inner: Rc<RefCell<Inner>>,
}

impl Default for Views {
    fn default() -> Self {
        Self::new()
    }
}

impl Views {
    /// Creates a view engine backed by the default MiniJinja compiler.
    pub fn new() -> Self {
        Self::with_compiler(Box::new(MiniJinjaCompiler::new()))
    }

    /// Creates a view engine with an injected compiler backend.
    pub fn with_compiler(compiler: Box<dyn TemplateCompiler>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                compiler,
                cache: TemplateCache::new(),
                config: ViewConfig::new(),
            })),
        }
    }

    /// Creates a view engine and applies an initial configuration update.
    pub fn with_config(update: ConfigUpdate) -> Result<Self, ViewError> {
        let views = Self::new();
        views.configure(update)?;
        Ok(views)
    }

    /// Applies a partial configuration update; see
    /// [`ConfigUpdate`](crate::ConfigUpdate) and the `config` module docs.
    pub fn configure(&self, update: ConfigUpdate) -> Result<(), ViewError> {
        self.inner.borrow_mut().config.apply(update)
    }

    /// Replaces the default locals (`None` clears them).
    pub fn set_default_locals(&self, locals: Option<Locals>) {
        self.inner.borrow_mut().config.set_default_locals(locals);
    }

    /// Snapshot of the default locals.
    pub fn default_locals(&self) -> Locals {
        self.inner.borrow().config.default_locals().clone()
    }

    /// Snapshot of the loaded helper namespace.
    pub fn helpers(&self) -> Locals {
        self.inner.borrow().config.helpers().clone()
    }

    /// Snapshot of the default compile options.
    pub fn compile_options(&self) -> CompileOptions {
        self.inner.borrow().config.compile_options().clone()
    }

    /// Directory template identifiers currently resolve against.
    pub fn view_dir(&self) -> std::path::PathBuf {
        self.inner.borrow().config.view_dir().to_path_buf()
    }

    /// Number of compiled templates currently cached.
    pub fn cached_templates(&self) -> usize {
        self.inner.borrow().cache.len()
    }

    /// Renders a template with exactly the locals given.
    ///
    /// `options` merges over the configured compile options, or carries a
    /// skip-cache boolean in options position. The skip-cache decision is,
    /// in order: boolean in `options`, then the `skip_cache` argument,
    /// then the global `no_cache` flag.
    ///
    /// With the `from_string` option set, `template` is compiled as
    /// literal source text — no file resolution, no caching.
    ///
    /// # Errors
    ///
    /// Resolution, filesystem, compile, and render failures propagate
    /// unchanged; there is no partial or degraded output.
    pub fn render(
        &self,
        template: &str,
        locals: &Locals,
        options: Option<RenderOptions>,
        skip_cache: Option<bool>,
    ) -> Result<String, ViewError> {
        let mut inner = self.inner.borrow_mut();
        let inner = &mut *inner;

        let mut compile_options = inner.config.compile_options().clone();
        let mut positional_skip = None;
        match options {
            Some(RenderOptions::Compile(overrides)) => compile_options.merge(&overrides),
            Some(RenderOptions::SkipCache(flag)) => positional_skip = Some(flag),
            None => {}
        }

        if compile_options.from_string() {
            return inner
                .compiler
                .compile_str(template, &compile_options)?
                .render(locals);
        }

        let skip_cache = positional_skip
            .or(skip_cache)
            .unwrap_or(inner.config.skip_cache());

        let path = resolve_template(inner.config.view_dir(), template, inner.compiler.extension())?;
        let compiled =
            inner
                .cache
                .get_or_compile(inner.compiler.as_ref(), &path, &compile_options, skip_cache)?;
        compiled.render(locals)
    }

    /// Contextual render: merges helpers, default locals, request state,
    /// and call-site locals (in that order, later wins), renders, then
    /// writes the body and an HTML content type onto the context.
    pub fn render_into(
        &self,
        ctx: &mut dyn RequestContext,
        template: &str,
        locals: &Locals,
        options: Option<RenderOptions>,
        skip_cache: Option<bool>,
    ) -> Result<(), ViewError> {
        let mut merged = {
            let inner = self.inner.borrow();
            let mut merged = inner.config.helpers().clone();
            for (key, value) in inner.config.default_locals() {
                merged.insert(key.clone(), value.clone());
            }
            merged
        };
        for (key, value) in ctx.state() {
            merged.insert(key.clone(), value.clone());
        }
        for (key, value) in locals {
            merged.insert(key.clone(), value.clone());
        }

        let body = self.render(template, &merged, options, skip_cache)?;
        ctx.set_body(body);
        ctx.set_content_type(HTML_CONTENT_TYPE);
        Ok(())
    }

    /// Installs this view engine onto a host application: user-agent
    /// middleware first, then the render capability (a clone of this
    /// handle sharing the same cache and configuration).
    pub fn install(&self, app: &mut dyn HostApp) {
        let categories = self.inner.borrow().config.user_agents().clone();
        app.use_user_agent(&categories);
        app.attach_render(self.clone());
    }
}
