//! Live-reload proxy in front of the application server.
//!
//! Runs `browser-sync` as a reverse proxy that reloads the browser whenever
//! something in the exploded directory changes. Links in proxied pages that
//! point at the server port are rewritten to the proxy port.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde_json::json;
use tempfile::TempDir;
use tokio::process::{Child, Command};

use crate::config::Config;
use crate::error::{Error, Result};

const CONFIG_NAME: &str = "bs-config.js";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveReloadOptions {
    pub proxy_target: String,
    pub port: u16,
    pub watched: PathBuf,
    pub ignored: String,
    pub reload_delay_ms: u64,
}

impl LiveReloadOptions {
    pub fn from_config(config: &Config, exploded_dir: &Path) -> Self {
        Self {
            proxy_target: config.proxy_target.clone(),
            port: config.proxy_port,
            watched: exploded_dir.join("**").join("*.*"),
            ignored: "**/*.jsp".to_string(),
            reload_delay_ms: 500,
        }
    }

    /// Port of the proxied server, `8080` when the target has none.
    pub fn target_port(&self) -> &str {
        self.proxy_target
            .rsplit_once(':')
            .map(|(_, port)| port)
            .filter(|port| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or("8080")
    }

    /// The `browser-sync` configuration module.
    pub fn config_script(&self) -> String {
        let options = json!({
            "files": [{
                "match": self.watched.to_string_lossy(),
                "options": { "ignored": self.ignored },
            }],
            "proxy": { "target": self.proxy_target, "ws": true },
            "open": false,
            "port": self.port,
            "ui": false,
            "reloadDelay": self.reload_delay_ms,
            "reloadOnRestart": true,
        });
        let from = serde_json::Value::String(self.target_port().to_string());
        let to = serde_json::Value::String(self.port.to_string());

        format!(
            "module.exports = Object.assign({}, {{\n  rewriteRules: [{{ match: new RegExp({}, \"g\"), replace: {} }}]\n}});\n",
            options, from, to
        )
    }
}

/// A running `browser-sync` process. Killed on drop.
pub struct LiveReloadServer {
    child: Child,
    _config_dir: TempDir,
}

impl LiveReloadServer {
    /// Writes the configuration and spawns `program start --config <file>`.
    pub fn start(program: &str, options: &LiveReloadOptions) -> Result<Self> {
        let config_dir = tempfile::tempdir()?;
        let config_path = config_dir.path().join(CONFIG_NAME);
        std::fs::write(&config_path, options.config_script())?;

        let child = Command::new(program)
            .arg("start")
            .arg("--config")
            .arg(&config_path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::LiveReload(format!("Failed to start {}: {}", program, e)))?;

        tracing::info!(
            "[browser-sync] Proxying {} on port {}",
            options.proxy_target,
            options.port
        );

        Ok(Self {
            child,
            _config_dir: config_dir,
        })
    }

    pub async fn stop(mut self) {
        if let Err(e) = self.child.kill().await {
            tracing::debug!("[browser-sync] Failed to stop: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::ProjectMode;

    #[test]
    fn test_options_from_config() {
        let config = Config::defaults_for(ProjectMode::OsgiGradle);
        let options = LiveReloadOptions::from_config(&config, Path::new("/srv/exploded"));

        assert_eq!(options.proxy_target, "localhost:8080");
        assert_eq!(options.port, 8081);
        assert_eq!(options.target_port(), "8080");
        assert_eq!(options.watched, PathBuf::from("/srv/exploded/**/*.*"));
    }

    #[test]
    fn test_target_port_fallback() {
        let config = Config::defaults_for(ProjectMode::OsgiGradle);
        let mut options = LiveReloadOptions::from_config(&config, Path::new("/srv"));
        options.proxy_target = "http://portal.local:9080".to_string();
        assert_eq!(options.target_port(), "9080");

        options.proxy_target = "portal.local".to_string();
        assert_eq!(options.target_port(), "8080");
    }

    #[test]
    fn test_config_script() {
        let config = Config::defaults_for(ProjectMode::OsgiGradle);
        let options = LiveReloadOptions::from_config(&config, Path::new("/srv/exploded"));
        let script = options.config_script();

        assert!(script.starts_with("module.exports = Object.assign("));
        assert!(script.contains(r#""target":"localhost:8080""#));
        assert!(script.contains(r#""ws":true"#));
        assert!(script.contains(r#""ignored":"**/*.jsp""#));
        assert!(script.contains(r#"match: new RegExp("8080", "g"), replace: "8081""#));
    }
}
