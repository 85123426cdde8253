// Chunk: docs/chunks/scheme_definitions - Scheme registry keyed by name and file extension

//! Scheme registry mapping file extensions and names to schemes.
//!
//! [`SchemeRegistry`] owns the schemes a host can pick from. It starts empty
//! or with the built-in schemes, and grows with definitions loaded from JSON.
//! It is an explicit object, passed to whoever creates documents.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::builtin;
use crate::definition::SchemeDefinition;
use crate::error::SchemeError;
use crate::scheme::Scheme;
use crate::theme::LabelTheme;

/// Registry mapping file extensions and names to schemes.
pub struct SchemeRegistry {
    theme: LabelTheme,
    /// Map from lowercase scheme name to scheme
    schemes: HashMap<String, Arc<Scheme>>,
    /// Map from extension (without leading dot) to scheme name
    extensions: HashMap<String, String>,
    /// Map from alias to scheme name
    aliases: HashMap<String, String>,
}

impl SchemeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::with_theme(LabelTheme::default())
    }

    /// Creates an empty registry resolving role colors with `theme`.
    pub fn with_theme(theme: LabelTheme) -> Self {
        Self {
            theme,
            schemes: HashMap::new(),
            extensions: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Creates a registry holding the built-in schemes.
    ///
    /// A built-in that fails to build is logged and left out.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.install_builtin();
        registry
    }

    fn install_builtin(&mut self) {
        let theme = &self.theme;
        let javascript = builtin::javascript(theme).map(Arc::new);
        let css = builtin::css(theme).map(Arc::new);
        let python = builtin::python(theme).map(Arc::new);
        let html = match (&javascript, &css) {
            (Ok(js), Ok(css)) => builtin::html(theme, Arc::clone(js), Arc::clone(css)).map(Arc::new),
            (Err(_), _) => Err(SchemeError::UnknownScheme {
                scheme: "html".to_string(),
                referenced: "javascript".to_string(),
            }),
            (_, Err(_)) => Err(SchemeError::UnknownScheme {
                scheme: "html".to_string(),
                referenced: "css".to_string(),
            }),
        };

        let entries = [
            (javascript, &["js", "jsx", "mjs", "cjs"][..], &["javascript", "ecmascript"][..]),
            (css, &["css"][..], &[][..]),
            (html, &["html", "htm", "xhtml"][..], &[][..]),
            (python, &["py", "pyw"][..], &["python3", "py"][..]),
        ];
        for (scheme, extensions, aliases) in entries {
            match scheme {
                Ok(scheme) => {
                    let name = scheme.name().to_string();
                    self.insert(scheme, extensions.iter().copied());
                    for alias in aliases {
                        self.add_alias(alias, &name);
                    }
                }
                Err(err) => tracing::error!(%err, "built-in scheme failed to build"),
            }
        }
    }

    /// Registers a scheme under its name and the given extensions.
    ///
    /// A scheme with the same name, or an existing extension mapping, is
    /// replaced.
    pub fn insert<'a>(&mut self, scheme: Arc<Scheme>, extensions: impl IntoIterator<Item = &'a str>) {
        let name = scheme.name().to_lowercase();
        for ext in extensions {
            self.extensions.insert(normalize_extension(ext), name.clone());
        }
        tracing::debug!(scheme = %name, "registered scheme");
        self.schemes.insert(name, scheme);
    }

    /// Makes `alias` resolve to the scheme named `name`.
    pub fn add_alias(&mut self, alias: &str, name: &str) {
        self.aliases
            .insert(alias.trim().to_lowercase(), name.trim().to_lowercase());
    }

    /// Returns the scheme for a file extension.
    ///
    /// The extension can be with or without a leading dot (e.g., ".js" or "js").
    pub fn scheme_for_extension(&self, ext: &str) -> Option<Arc<Scheme>> {
        let name = self.extensions.get(&normalize_extension(ext))?;
        self.schemes.get(name).cloned()
    }

    /// Returns the scheme for a name or alias.
    ///
    /// Lookup is case insensitive and ignores surrounding whitespace.
    pub fn scheme_for_name(&self, name: &str) -> Option<Arc<Scheme>> {
        let name = name.trim().to_lowercase();
        if let Some(scheme) = self.schemes.get(&name) {
            return Some(Arc::clone(scheme));
        }
        let target = self.aliases.get(&name)?;
        self.schemes.get(target).cloned()
    }

    /// Returns the scheme for a file path, by its extension.
    pub fn scheme_for_path(&self, path: &Path) -> Option<Arc<Scheme>> {
        let ext = path.extension()?.to_str()?;
        self.scheme_for_extension(ext)
    }

    /// Loads one definition, or an array of definitions, from JSON.
    ///
    /// Definitions in an array are compiled in order, so later ones may
    /// extend or embed earlier ones. Returns the names of the loaded schemes.
    pub fn load_json(&mut self, json: &str) -> Result<Vec<String>, SchemeError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let definitions: Vec<SchemeDefinition> = if value.is_array() {
            serde_json::from_value(value)?
        } else {
            vec![serde_json::from_value(value)?]
        };

        let mut loaded = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let scheme = definition.compile(&self.theme, |name| self.scheme_for_name(name))?;
            self.insert(Arc::new(scheme), definition.extensions.iter().map(String::as_str));
            for alias in &definition.aliases {
                self.add_alias(alias, &definition.name);
            }
            loaded.push(definition.name);
        }
        Ok(loaded)
    }

    /// Loads scheme definitions from a JSON file.
    pub fn load_file(&mut self, path: &Path) -> Result<Vec<String>, SchemeError> {
        let json = std::fs::read_to_string(path).map_err(|source| SchemeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_json(&json)
    }

    /// Names of the registered schemes, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns an iterator over all registered extensions.
    pub fn supported_extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.keys().map(String::as_str)
    }

    pub fn theme(&self) -> &LabelTheme {
        &self.theme
    }
}

impl Default for SchemeRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    ext.strip_prefix('.').unwrap_or(ext).to_lowercase()
}
