//! Recursive helper loader.
//!
//! Helpers are named values exposed to every template rendered through the
//! contextual render path. They are aggregated from a list of sources into
//! one flat namespace:
//!
//! - a **file** loads as a data module (`.json` via serde_json, `.yaml` /
//!   `.yml` via serde_yaml)
//! - a **directory** recurses into every entry, depth-first, accumulating
//!   into the same namespace — nested directories do not create nested
//!   namespaces
//! - an inline **map** binds values directly, or loads a file per key when
//!   the entry is a path
//!
//! Later sources override earlier ones on key collision. Directory entries
//! are visited in raw `read_dir` order, which is not guaranteed to be
//! stable across platforms; collision outcomes between sibling files must
//! not be relied upon.
//!
//! # Naming
//!
//! A loaded value shaped `{"name": "...", "value": ...}` binds `value`
//! under `name`. Any other value binds whole under the camel-cased file
//! stem (`math_helper.json` → `mathHelper`). An explicit key from a map
//! entry always wins and binds the raw loaded value.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ViewError;
use crate::util::camel_case;
use crate::Locals;

/// One helper source: a filesystem path or an inline name→entry map.
#[derive(Debug, Clone)]
pub enum HelperSource {
    /// A file or directory to load.
    Path(PathBuf),
    /// Explicit bindings; entries are applied in order.
    Map(Vec<(String, HelperEntry)>),
}

/// The value side of an inline helper binding.
#[derive(Debug, Clone)]
pub enum HelperEntry {
    /// Load this file and bind the result under the entry's key.
    Path(PathBuf),
    /// Bind this value directly, no loading involved.
    Value(Value),
}

/// Ordered list of helper sources, as accepted by the configuration
/// surface. A single path converts directly:
///
/// ```rust
/// use vellum::HelperSources;
///
/// let sources: HelperSources = "helpers".into();
/// assert_eq!(sources.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HelperSources(Vec<HelperSource>);

impl HelperSources {
    /// Creates a source list from explicit sources.
    pub fn new(sources: Vec<HelperSource>) -> Self {
        Self(sources)
    }

    /// Number of top-level sources.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no sources are listed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the sources in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &HelperSource> {
        self.0.iter()
    }
}

impl From<&str> for HelperSources {
    fn from(path: &str) -> Self {
        Self(vec![HelperSource::Path(PathBuf::from(path))])
    }
}

impl From<String> for HelperSources {
    fn from(path: String) -> Self {
        Self(vec![HelperSource::Path(PathBuf::from(path))])
    }
}

impl From<&Path> for HelperSources {
    fn from(path: &Path) -> Self {
        Self(vec![HelperSource::Path(path.to_path_buf())])
    }
}

impl From<PathBuf> for HelperSources {
    fn from(path: PathBuf) -> Self {
        Self(vec![HelperSource::Path(path)])
    }
}

impl From<Vec<HelperSource>> for HelperSources {
    fn from(sources: Vec<HelperSource>) -> Self {
        Self(sources)
    }
}

/// Result of loading a single helper file: either the module names itself
/// or the binding name comes from the file stem.
enum LoadedHelper {
    Named(String, Value),
    Anonymous(Value),
}

/// Loads every source into one flat helper namespace.
///
/// The namespace is built fresh; callers merge it into existing state only
/// on success, so a failing source leaves prior helpers untouched.
///
/// # Errors
///
/// Returns [`ViewError::Filesystem`] if a declared path does not exist or
/// cannot be walked, and [`ViewError::HelperLoad`] if a file cannot be
/// parsed as a helper module.
pub fn load_helpers(sources: &HelperSources) -> Result<Locals, ViewError> {
    let mut namespace = Locals::new();

    for source in sources.iter() {
        match source {
            HelperSource::Path(path) => load_path(path, None, &mut namespace)?,
            HelperSource::Map(entries) => {
                for (key, entry) in entries {
                    match entry {
                        HelperEntry::Path(path) => load_path(path, Some(key), &mut namespace)?,
                        HelperEntry::Value(value) => {
                            namespace.insert(key.clone(), value.clone());
                        }
                    }
                }
            }
        }
    }

    Ok(namespace)
}

fn load_path(path: &Path, bind_as: Option<&str>, namespace: &mut Locals) -> Result<(), ViewError> {
    let meta = fs::metadata(path).map_err(|err| ViewError::filesystem(path, err))?;

    if meta.is_dir() {
        let entries = fs::read_dir(path).map_err(|err| ViewError::filesystem(path, err))?;
        for entry in entries {
            let entry = entry.map_err(|err| ViewError::filesystem(path, err))?;
            load_path(&entry.path(), None, namespace)?;
        }
        return Ok(());
    }

    let value = read_module(path)?;

    // An explicit key binds the raw loaded value, shape sniffing applies
    // only to auto-named modules.
    if let Some(key) = bind_as {
        namespace.insert(key.to_string(), value);
        return Ok(());
    }

    match classify(value) {
        LoadedHelper::Named(name, value) => {
            namespace.insert(name, value);
        }
        LoadedHelper::Anonymous(value) => {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            namespace.insert(camel_case(stem), value);
        }
    }

    Ok(())
}

fn read_module(path: &Path) -> Result<Value, ViewError> {
    let source = fs::read_to_string(path).map_err(|err| ViewError::filesystem(path, err))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    match extension {
        "json" => serde_json::from_str(&source).map_err(|err| ViewError::HelperLoad {
            path: path.to_path_buf(),
            message: err.to_string(),
        }),
        "yaml" | "yml" => serde_yaml::from_str(&source).map_err(|err| ViewError::HelperLoad {
            path: path.to_path_buf(),
            message: err.to_string(),
        }),
        other => Err(ViewError::HelperLoad {
            path: path.to_path_buf(),
            message: format!("unsupported helper module extension: {other:?}"),
        }),
    }
}

fn classify(value: Value) -> LoadedHelper {
    if let Value::Object(map) = &value {
        if let Some(Value::String(name)) = map.get("name") {
            let body = map.get("value").cloned().unwrap_or(Value::Null);
            return LoadedHelper::Named(name.clone(), body);
        }
    }
    LoadedHelper::Anonymous(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_single_json_file_auto_named() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "site_meta.json", r#"{"title": "Home"}"#);

        let helpers = load_helpers(&dir.path().join("site_meta.json").into()).unwrap();
        assert_eq!(helpers.get("siteMeta"), Some(&json!({"title": "Home"})));
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "colors.yaml", "primary: blue\naccent: red\n");

        let helpers = load_helpers(&dir.path().join("colors.yaml").into()).unwrap();
        assert_eq!(
            helpers.get("colors"),
            Some(&json!({"primary": "blue", "accent": "red"}))
        );
    }

    #[test]
    fn test_named_module_shape_binds_under_declared_name() {
        let dir = TempDir::new().unwrap();
        write_file(
            dir.path(),
            "anything.json",
            r#"{"name": "formatDate", "value": "%Y-%m-%d"}"#,
        );

        let helpers = load_helpers(&dir.path().join("anything.json").into()).unwrap();
        assert_eq!(helpers.get("formatDate"), Some(&json!("%Y-%m-%d")));
        assert!(!helpers.contains_key("anything"));
    }

    #[test]
    fn test_explicit_key_binds_raw_value() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "mod.json",
            r#"{"name": "ignored", "value": 1}"#,
        );

        let sources = HelperSources::new(vec![HelperSource::Map(vec![(
            "explicit".to_string(),
            HelperEntry::Path(path),
        )])]);
        let helpers = load_helpers(&sources).unwrap();

        // Shape sniffing is skipped: the whole module binds under the key.
        assert_eq!(
            helpers.get("explicit"),
            Some(&json!({"name": "ignored", "value": 1}))
        );
    }

    #[test]
    fn test_inline_value_binds_directly() {
        let sources = HelperSources::new(vec![HelperSource::Map(vec![(
            "version".to_string(),
            HelperEntry::Value(json!("1.2.3")),
        )])]);
        let helpers = load_helpers(&sources).unwrap();
        assert_eq!(helpers.get("version"), Some(&json!("1.2.3")));
    }

    #[test]
    fn test_directory_flattens_nested_structure() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "utils/math_helper.json", r#"{"pi": 3.14}"#);
        write_file(dir.path(), "text_helper.json", r#"{"sep": ", "}"#);

        let helpers = load_helpers(&dir.path().to_path_buf().into()).unwrap();
        assert!(helpers.contains_key("mathHelper"));
        assert!(helpers.contains_key("textHelper"));
        assert!(!helpers.contains_key("utils"));
    }

    #[test]
    fn test_later_source_wins_on_collision() {
        let dir = TempDir::new().unwrap();
        let first = write_file(dir.path(), "a.json", r#""from-a""#);
        let second = write_file(dir.path(), "b.json", r#""from-b""#);

        let sources = HelperSources::new(vec![
            HelperSource::Map(vec![("x".to_string(), HelperEntry::Path(first))]),
            HelperSource::Map(vec![("x".to_string(), HelperEntry::Path(second))]),
        ]);
        let helpers = load_helpers(&sources).unwrap();
        assert_eq!(helpers.get("x"), Some(&json!("from-b")));
    }

    #[test]
    fn test_missing_path_is_filesystem_error() {
        let dir = TempDir::new().unwrap();
        let result = load_helpers(&dir.path().join("ghost").into());
        assert!(matches!(result, Err(ViewError::Filesystem { .. })));
    }

    #[test]
    fn test_malformed_module_is_helper_load_error() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "bad.json", "{not json");

        let result = load_helpers(&dir.path().join("bad.json").into());
        assert!(matches!(result, Err(ViewError::HelperLoad { .. })));
    }

    #[test]
    fn test_unsupported_extension_is_helper_load_error() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "script.txt", "whatever");

        let result = load_helpers(&dir.path().join("script.txt").into());
        assert!(matches!(result, Err(ViewError::HelperLoad { .. })));
    }

    #[test]
    fn test_empty_sources_yield_empty_namespace() {
        let helpers = load_helpers(&HelperSources::default()).unwrap();
        assert!(helpers.is_empty());
    }
}
