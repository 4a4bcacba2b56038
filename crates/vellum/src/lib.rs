//! # Vellum — view resolution, caching, and rendering
//!
//! `vellum` sits between a host application framework and a
//! template-compilation engine. It resolves a logical template name to a
//! file, compiles the file into an executable renderer, caches that
//! renderer keyed by resolved path, and renders it against merged locals
//! drawn from global defaults, per-request state, and call-site overrides.
//! A recursive helper loader flattens a directory tree of helper modules
//! into a single namespace available to every contextual render.
//!
//! ## Core concepts
//!
//! - [`Views`]: the top-level engine — `render`, `render_into`,
//!   `configure`, `install`
//! - [`ConfigUpdate`]: partial configuration updates with documented
//!   merge/replace rules per field
//! - [`TemplateCompiler`]: the black-box engine seam; [`MiniJinjaCompiler`]
//!   is the default backend
//! - [`HelperSources`]: files, directories, or inline bindings flattened
//!   into the helper namespace
//! - [`RequestContext`] / [`HostApp`]: the traits a host framework
//!   implements to receive rendered responses
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use vellum::{ConfigUpdate, Locals, Views};
//!
//! # fn main() -> Result<(), vellum::ViewError> {
//! let views = Views::new();
//! views.configure(
//!     ConfigUpdate::new()
//!         .view_dir("./views")
//!         .helpers("./views/helpers"),
//! )?;
//!
//! let mut locals = Locals::new();
//! locals.insert("title".into(), "Home".into());
//!
//! // Resolves ./views/index.jinja (or ./views/index/index.jinja),
//! // compiles it once, and reuses the compiled template afterwards.
//! let html = views.render("index", &locals, None, None)?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod context;
pub mod engine;
mod error;
pub mod helpers;
pub mod resolve;
mod util;
mod views;

/// The data mapping passed into a compiled template to produce output.
///
/// Also the currency for default locals, request state, and the helper
/// namespace.
pub type Locals = serde_json::Map<String, serde_json::Value>;

pub use cache::TemplateCache;
pub use config::{
    CompileOptions, ConfigUpdate, OptionValue, ViewConfig, BASEDIR, COMPILE_DEBUG, FROM_STRING,
    PRETTY,
};
pub use context::{HostApp, RequestContext};
pub use engine::{CompiledTemplate, MiniJinjaCompiler, TemplateCompiler};
pub use error::ViewError;
pub use helpers::{load_helpers, HelperEntry, HelperSource, HelperSources};
pub use resolve::resolve_template;
pub use util::camel_case;
pub use views::{RenderOptions, Views, HTML_CONTENT_TYPE};
