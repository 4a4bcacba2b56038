//! Process-lifetime view configuration.
//!
//! [`ViewConfig`] owns the view directory, default locals, default compile
//! options, the global cache-bypass flag, user-agent category names, and
//! the helper namespace. It is mutated only through
//! [`ViewConfig::apply`], which implements a documented field-by-field
//! partial update; raw fields are never exposed mutably.
//!
//! # Update semantics
//!
//! - An **empty** update clears the default compile options and returns —
//!   a deliberate reset switch, not a merge.
//! - `user_agents` merges into the existing categories.
//! - `view_dir` replaces the view directory; when absent, the directory
//!   falls back to the working directory captured at construction.
//! - `locals` replaces the default locals wholesale (no merge).
//! - `no_cache` replaces the global bypass flag.
//! - `helpers` loads the given sources and merges them **into** the
//!   existing helper namespace (additive).
//! - `debug` sets both `pretty` and `compile_debug` to the same value.
//!   Without `debug`, an incoming boolean overwrites a compile option only
//!   if that option key is already known; unknown keys are ignored.
//! - `basedir` sets the include-root compile option.
//!
//! A failing update (helper load error) leaves every configuration field
//! untouched: helpers are loaded into a fresh namespace before any field
//! is written.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ViewError;
use crate::helpers::{load_helpers, HelperSources};
use crate::Locals;

/// Compile-option key: pretty-print output (disables block trimming).
pub const PRETTY: &str = "pretty";
/// Compile-option key: emit engine debug diagnostics.
pub const COMPILE_DEBUG: &str = "compile_debug";
/// Compile-option key: root directory for root-relative includes.
pub const BASEDIR: &str = "basedir";
/// Compile-option key: treat the template identifier as literal source.
pub const FROM_STRING: &str = "from_string";

/// A single compile-option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Str(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Str(value)
    }
}

/// Flags and settings passed to the template-compilation engine.
///
/// An ordered string→value map with flat overwrite merge semantics. The
/// well-known keys are exported as constants ([`PRETTY`], [`COMPILE_DEBUG`],
/// [`BASEDIR`], [`FROM_STRING`]); engines are free to read further keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompileOptions {
    values: BTreeMap<String, OptionValue>,
}

impl CompileOptions {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Reads a boolean option.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(OptionValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    /// Reads a string option.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(OptionValue::Str(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns true if the key is present, regardless of value type.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Whether the template identifier should be compiled as literal source.
    pub fn from_string(&self) -> bool {
        self.get_bool(FROM_STRING).unwrap_or(false)
    }

    /// Merges `other` over `self`; incoming values win on collision.
    pub fn merge(&mut self, other: &CompileOptions) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Removes every option.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Returns true if no options are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A partial configuration update.
///
/// All fields are optional; unset fields follow the fallback rules in the
/// module docs. An update with every field unset is the compile-option
/// reset switch.
///
/// # Example
///
/// ```rust,ignore
/// views.configure(
///     ConfigUpdate::new()
///         .view_dir("./views")
///         .helpers("./views/helpers")
///         .debug(cfg!(debug_assertions)),
/// )?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    view_dir: Option<PathBuf>,
    locals: Option<Locals>,
    no_cache: Option<bool>,
    helpers: Option<HelperSources>,
    debug: Option<bool>,
    pretty: Option<bool>,
    compile_debug: Option<bool>,
    basedir: Option<PathBuf>,
    user_agents: Option<BTreeMap<String, String>>,
}

impl ConfigUpdate {
    /// Creates an empty update (applying it resets compile options).
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory template identifiers resolve against.
    pub fn view_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.view_dir = Some(dir.into());
        self
    }

    /// Replacement default locals.
    pub fn locals(mut self, locals: Locals) -> Self {
        self.locals = Some(locals);
        self
    }

    /// Global cache-bypass flag.
    pub fn no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = Some(no_cache);
        self
    }

    /// Helper sources to load and merge into the namespace.
    pub fn helpers(mut self, sources: impl Into<HelperSources>) -> Self {
        self.helpers = Some(sources.into());
        self
    }

    /// Convenience flag setting both `pretty` and `compile_debug`.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Pretty-print compile option.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = Some(pretty);
        self
    }

    /// Engine debug-diagnostics compile option.
    pub fn compile_debug(mut self, compile_debug: bool) -> Self {
        self.compile_debug = Some(compile_debug);
        self
    }

    /// Root directory for root-relative includes inside templates.
    pub fn basedir(mut self, basedir: impl Into<PathBuf>) -> Self {
        self.basedir = Some(basedir.into());
        self
    }

    /// User-agent category names, merged into the existing set.
    pub fn user_agents(mut self, agents: BTreeMap<String, String>) -> Self {
        self.user_agents = Some(agents);
        self
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.view_dir.is_none()
            && self.locals.is_none()
            && self.no_cache.is_none()
            && self.helpers.is_none()
            && self.debug.is_none()
            && self.pretty.is_none()
            && self.compile_debug.is_none()
            && self.basedir.is_none()
            && self.user_agents.is_none()
    }
}

/// Owner of all process-lifetime view configuration.
pub struct ViewConfig {
    /// Working directory captured at construction; the `view_dir` fallback.
    root: PathBuf,
    view_dir: PathBuf,
    default_locals: Locals,
    compile_options: CompileOptions,
    skip_cache: bool,
    user_agents: BTreeMap<String, String>,
    helpers: Locals,
}

fn default_user_agents() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("desktop".to_string(), "desktop".to_string()),
        ("tablet".to_string(), "tablet".to_string()),
        ("mobile".to_string(), "mobile".to_string()),
    ])
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewConfig {
    /// Creates a configuration with the default compile options
    /// (`pretty = false`, `compile_debug = false`) and the view directory
    /// pointed at the current working directory.
    pub fn new() -> Self {
        let root = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let compile_options = CompileOptions::new()
            .with(PRETTY, false)
            .with(COMPILE_DEBUG, false);

        Self {
            view_dir: root.clone(),
            root,
            default_locals: Locals::new(),
            compile_options,
            skip_cache: false,
            user_agents: default_user_agents(),
            helpers: Locals::new(),
        }
    }

    /// Directory template identifiers resolve against.
    pub fn view_dir(&self) -> &Path {
        &self.view_dir
    }

    /// Default locals merged into every contextual render.
    pub fn default_locals(&self) -> &Locals {
        &self.default_locals
    }

    /// Default compile options merged under per-call options.
    pub fn compile_options(&self) -> &CompileOptions {
        &self.compile_options
    }

    /// Global cache-bypass flag.
    pub fn skip_cache(&self) -> bool {
        self.skip_cache
    }

    /// User-agent category names handed to the host middleware.
    pub fn user_agents(&self) -> &BTreeMap<String, String> {
        &self.user_agents
    }

    /// The loaded helper namespace.
    pub fn helpers(&self) -> &Locals {
        &self.helpers
    }

    /// Replaces the default locals: `None` clears them, `Some` replaces
    /// them wholesale.
    pub fn set_default_locals(&mut self, locals: Option<Locals>) {
        self.default_locals = locals.unwrap_or_default();
    }

    /// Applies a partial update; see the module docs for field semantics.
    ///
    /// # Errors
    ///
    /// Returns the helper loader's error if a helper source fails, leaving
    /// the previous configuration untouched.
    pub fn apply(&mut self, update: ConfigUpdate) -> Result<(), ViewError> {
        if update.is_empty() {
            self.compile_options.clear();
            return Ok(());
        }

        // Load helpers before touching any field so a failure aborts the
        // whole update.
        let loaded = match &update.helpers {
            Some(sources) => Some(load_helpers(sources)?),
            None => None,
        };

        if let Some(agents) = update.user_agents {
            self.user_agents.extend(agents);
        }

        self.view_dir = update.view_dir.unwrap_or_else(|| self.root.clone());

        if let Some(locals) = update.locals {
            self.default_locals = locals;
        }

        if let Some(no_cache) = update.no_cache {
            self.skip_cache = no_cache;
        }

        if let Some(loaded) = loaded {
            for (key, value) in loaded {
                self.helpers.insert(key, value);
            }
        }

        if let Some(debug) = update.debug {
            self.compile_options.set(PRETTY, debug);
            self.compile_options.set(COMPILE_DEBUG, debug);
        } else {
            for (key, value) in [(PRETTY, update.pretty), (COMPILE_DEBUG, update.compile_debug)] {
                if let Some(value) = value {
                    if self.compile_options.contains(key) {
                        self.compile_options.set(key, value);
                    }
                }
            }
        }

        if let Some(basedir) = update.basedir {
            self.compile_options
                .set(BASEDIR, basedir.to_string_lossy().into_owned());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn locals_of(pairs: &[(&str, Value)]) -> Locals {
        let mut map = Locals::new();
        for (key, value) in pairs {
            map.insert((*key).to_string(), value.clone());
        }
        map
    }

    #[test]
    fn test_defaults() {
        let config = ViewConfig::new();
        assert_eq!(config.compile_options().get_bool(PRETTY), Some(false));
        assert_eq!(config.compile_options().get_bool(COMPILE_DEBUG), Some(false));
        assert!(!config.skip_cache());
        assert!(config.default_locals().is_empty());
        assert!(config.helpers().is_empty());
        assert_eq!(config.user_agents().len(), 3);
    }

    #[test]
    fn test_empty_update_resets_compile_options() {
        let mut config = ViewConfig::new();
        config
            .apply(ConfigUpdate::new().debug(true))
            .unwrap();
        assert_eq!(config.compile_options().get_bool(PRETTY), Some(true));

        config.apply(ConfigUpdate::new()).unwrap();
        assert!(config.compile_options().is_empty());
    }

    #[test]
    fn test_known_key_overwrite_only() {
        let mut config = ViewConfig::new();

        // Both keys are known initially.
        config
            .apply(ConfigUpdate::new().pretty(true))
            .unwrap();
        assert_eq!(config.compile_options().get_bool(PRETTY), Some(true));

        // After the reset no keys are known, so boolean updates are ignored.
        config.apply(ConfigUpdate::new()).unwrap();
        config
            .apply(ConfigUpdate::new().pretty(true))
            .unwrap();
        assert!(!config.compile_options().contains(PRETTY));
    }

    #[test]
    fn test_debug_sets_both_flags() {
        let mut config = ViewConfig::new();
        config.apply(ConfigUpdate::new().debug(true)).unwrap();
        assert_eq!(config.compile_options().get_bool(PRETTY), Some(true));
        assert_eq!(config.compile_options().get_bool(COMPILE_DEBUG), Some(true));
    }

    #[test]
    fn test_debug_overrides_individual_flags() {
        let mut config = ViewConfig::new();
        config
            .apply(ConfigUpdate::new().debug(false).pretty(true))
            .unwrap();
        // With debug present, the individual flag is ignored.
        assert_eq!(config.compile_options().get_bool(PRETTY), Some(false));
    }

    #[test]
    fn test_locals_replace_wholesale() {
        let mut config = ViewConfig::new();
        config
            .apply(ConfigUpdate::new().locals(locals_of(&[("a", json!(1)), ("b", json!(2))])))
            .unwrap();
        config
            .apply(ConfigUpdate::new().locals(locals_of(&[("c", json!(3))])))
            .unwrap();

        assert!(!config.default_locals().contains_key("a"));
        assert_eq!(config.default_locals().get("c"), Some(&json!(3)));
    }

    #[test]
    fn test_set_default_locals() {
        let mut config = ViewConfig::new();
        config.set_default_locals(Some(locals_of(&[("x", json!(1))])));
        assert_eq!(config.default_locals().get("x"), Some(&json!(1)));

        config.set_default_locals(None);
        assert!(config.default_locals().is_empty());
    }

    #[test]
    fn test_user_agents_merge() {
        let mut config = ViewConfig::new();
        config
            .apply(ConfigUpdate::new().user_agents(BTreeMap::from([(
                "tv".to_string(),
                "television".to_string(),
            )])))
            .unwrap();

        assert_eq!(config.user_agents().get("tv").unwrap(), "television");
        // Existing categories survive the merge.
        assert_eq!(config.user_agents().get("desktop").unwrap(), "desktop");
    }

    #[test]
    fn test_view_dir_falls_back_to_root() {
        let mut config = ViewConfig::new();
        let root = config.root.clone();

        config.apply(ConfigUpdate::new().view_dir("/views")).unwrap();
        assert_eq!(config.view_dir(), Path::new("/views"));

        // An update without a view_dir resets it to the captured root.
        config.apply(ConfigUpdate::new().no_cache(true)).unwrap();
        assert_eq!(config.view_dir(), root.as_path());
    }

    #[test]
    fn test_basedir_sets_compile_option() {
        let mut config = ViewConfig::new();
        config
            .apply(ConfigUpdate::new().basedir("/srv/includes"))
            .unwrap();
        assert_eq!(
            config.compile_options().get_str(BASEDIR),
            Some("/srv/includes")
        );
    }

    #[test]
    fn test_no_helper_sources_leave_namespace_unchanged() {
        let mut config = ViewConfig::new();
        config
            .apply(ConfigUpdate::new().locals(locals_of(&[("a", json!(1))])))
            .unwrap();
        assert!(config.helpers().is_empty());
    }

    #[test]
    fn test_failed_helper_load_aborts_update() {
        let mut config = ViewConfig::new();
        config.apply(ConfigUpdate::new().view_dir("/views")).unwrap();

        let result = config.apply(
            ConfigUpdate::new()
                .view_dir("/other")
                .no_cache(true)
                .helpers("/definitely/not/a/real/path"),
        );

        assert!(matches!(result, Err(ViewError::Filesystem { .. })));
        // Prior fields are untouched.
        assert_eq!(config.view_dir(), Path::new("/views"));
        assert!(!config.skip_cache());
    }

    #[test]
    fn test_compile_options_merge_incoming_wins() {
        let mut base = CompileOptions::new().with(PRETTY, false).with(BASEDIR, "/a");
        let overrides = CompileOptions::new().with(PRETTY, true);
        base.merge(&overrides);

        assert_eq!(base.get_bool(PRETTY), Some(true));
        assert_eq!(base.get_str(BASEDIR), Some("/a"));
    }
}
