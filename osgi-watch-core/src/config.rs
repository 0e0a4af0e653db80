//! Configuration loading from `osgi-watch.toml`.
//!
//! Every key is optional. Missing keys fall back to defaults that depend on
//! the detected [`ProjectMode`], since OSGi modules and legacy WAR plugins
//! keep their sources in different places.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::{Error, Result};
use crate::mode::ProjectMode;

pub const CONFIG_FILE: &str = "osgi-watch.toml";

/// Raw contents of `osgi-watch.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    pub glob_java: Option<String>,
    pub glob_js: Option<String>,
    pub glob_es6: Option<String>,
    pub glob_jsp: Option<String>,
    pub glob_sass: Option<String>,
    pub glob_soy: Option<String>,
    pub glob_class: Option<String>,
    pub glob_transpiled_js: Option<String>,
    pub glob_css: Option<String>,
    pub glob_soy_js: Option<String>,
    pub path_exploded: Option<PathBuf>,
    pub notifications: Option<bool>,
    pub icon: Option<PathBuf>,
    pub live_reload: Option<bool>,
    pub proxy_target: Option<String>,
    pub proxy_port: Option<u16>,
    pub browser_sync: Option<String>,
    pub debounce_ms: Option<u64>,
    pub gradle: Option<String>,
    pub ant: Option<String>,
    pub unjar_command: Option<String>,
    pub install_command: Option<String>,
}

impl ConfigFile {
    /// Reads `path`. A missing file is an error here; see [`Config::load`]
    /// for the lenient lookup.
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ConfigNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        toml::from_str(&content).map_err(|error| Error::Toml {
            error,
            context: path.display().to_string(),
        })
    }
}

/// Glob patterns per artifact category, relative to the project directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobConfig {
    pub glob_java: String,
    pub glob_js: String,
    pub glob_es6: String,
    pub glob_jsp: String,
    pub glob_sass: String,
    pub glob_soy: String,
    pub glob_class: String,
    pub glob_transpiled_js: String,
    pub glob_css: String,
    pub glob_soy_js: String,
}

impl GlobConfig {
    pub fn defaults_for(mode: ProjectMode) -> Self {
        match mode {
            ProjectMode::LegacyAnt => Self {
                glob_java: "docroot/WEB-INF/src/**/*.java".to_string(),
                glob_js: "docroot/**/*.js".to_string(),
                glob_es6: "docroot/**/*.es.js".to_string(),
                glob_jsp: "docroot/**/*.jsp".to_string(),
                glob_sass: "docroot/**/*.scss".to_string(),
                glob_soy: "docroot/**/*.soy".to_string(),
                glob_class: "docroot/**/WEB-INF/classes/**/*.class".to_string(),
                glob_transpiled_js: "docroot/**/*.js".to_string(),
                glob_css: "docroot/**/*.css".to_string(),
                glob_soy_js: "docroot/**/*.soy.js".to_string(),
            },
            ProjectMode::OsgiGradle | ProjectMode::None => Self {
                glob_java: "src/main/java/**/*.java".to_string(),
                glob_js: "src/main/resources/**/*.js".to_string(),
                glob_es6: "src/main/resources/**/*.es.js".to_string(),
                glob_jsp: "src/main/resources/**/*.jsp".to_string(),
                glob_sass: "src/main/resources/**/*.scss".to_string(),
                glob_soy: "src/main/resources/**/*.soy".to_string(),
                glob_class: "build/classes/java/main/**/*.class".to_string(),
                glob_transpiled_js: "build/resources/main/**/*.js".to_string(),
                glob_css: "build/resources/main/**/*.css".to_string(),
                glob_soy_js: "build/resources/main/**/*.soy.js".to_string(),
            },
        }
    }

    /// The source glob a watcher listens on for `category`.
    pub fn source_glob(&self, category: Category) -> &str {
        match category {
            Category::Java => &self.glob_java,
            Category::JavaScript => &self.glob_js,
            Category::JavaScriptEs6 => &self.glob_es6,
            Category::Jsp => &self.glob_jsp,
            Category::Sass => &self.glob_sass,
            Category::Soy => &self.glob_soy,
        }
    }
}

/// Resolved configuration, read-only after startup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(flatten)]
    pub globs: GlobConfig,
    pub path_exploded: PathBuf,
    pub notifications: bool,
    pub icon: Option<PathBuf>,
    pub live_reload: bool,
    pub proxy_target: String,
    pub proxy_port: u16,
    pub browser_sync: String,
    pub debounce_ms: u64,
    pub gradle: Option<String>,
    pub ant: String,
    pub unjar_command: Option<String>,
    pub install_command: Option<String>,
}

impl Config {
    /// Built-in defaults for `mode`.
    pub fn defaults_for(mode: ProjectMode) -> Self {
        Self::resolve(mode, ConfigFile::default())
    }

    /// Fills the gaps in `file` with the defaults for `mode`.
    pub fn resolve(mode: ProjectMode, file: ConfigFile) -> Self {
        let defaults = GlobConfig::defaults_for(mode);
        let path_exploded = file
            .path_exploded
            .unwrap_or_else(|| PathBuf::from("build/exploded"));

        Self {
            globs: GlobConfig {
                glob_java: file.glob_java.unwrap_or(defaults.glob_java),
                glob_js: file.glob_js.unwrap_or(defaults.glob_js),
                glob_es6: file.glob_es6.unwrap_or(defaults.glob_es6),
                glob_jsp: file.glob_jsp.unwrap_or(defaults.glob_jsp),
                glob_sass: file.glob_sass.unwrap_or(defaults.glob_sass),
                glob_soy: file.glob_soy.unwrap_or(defaults.glob_soy),
                glob_class: file.glob_class.unwrap_or(defaults.glob_class),
                glob_transpiled_js: file
                    .glob_transpiled_js
                    .unwrap_or(defaults.glob_transpiled_js),
                glob_css: file.glob_css.unwrap_or(defaults.glob_css),
                glob_soy_js: file.glob_soy_js.unwrap_or(defaults.glob_soy_js),
            },
            path_exploded,
            notifications: file.notifications.unwrap_or(true),
            icon: file.icon,
            live_reload: file.live_reload.unwrap_or(false),
            proxy_target: file
                .proxy_target
                .unwrap_or_else(|| "localhost:8080".to_string()),
            proxy_port: file.proxy_port.unwrap_or(8081),
            browser_sync: file
                .browser_sync
                .unwrap_or_else(|| "browser-sync".to_string()),
            debounce_ms: file.debounce_ms.unwrap_or(300),
            gradle: file.gradle,
            ant: file.ant.unwrap_or_else(|| "ant".to_string()),
            unjar_command: file.unjar_command,
            install_command: file.install_command,
        }
    }

    /// Loads configuration for a project.
    ///
    /// With an explicit `path` the file must exist. Otherwise
    /// `<project_dir>/osgi-watch.toml` is tried, then
    /// `<config dir>/osgi-watch/osgi-watch.toml`, and the defaults are used
    /// when neither exists.
    pub fn load(project_dir: &Path, mode: ProjectMode, path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Ok(Self::resolve(mode, ConfigFile::read(path)?));
        }

        let candidates = std::iter::once(project_dir.join(CONFIG_FILE)).chain(
            dirs::config_dir().map(|dir| dir.join("osgi-watch").join(CONFIG_FILE)),
        );

        for candidate in candidates {
            if candidate.is_file() {
                tracing::debug!("Loading config from {}", candidate.display());
                return Ok(Self::resolve(mode, ConfigFile::read(&candidate)?));
            }
        }

        Ok(Self::defaults_for(mode))
    }

    /// Sets whether desktop notifications are sent.
    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications = enabled;
        self
    }

    /// Sets whether the live-reload proxy is started.
    pub fn with_live_reload(mut self, enabled: bool) -> Self {
        self.live_reload = enabled;
        self
    }

    /// Sets the watch debounce window.
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Sets the exploded deployment directory.
    pub fn with_path_exploded(mut self, path: impl Into<PathBuf>) -> Self {
        self.path_exploded = path.into();
        self
    }
}
