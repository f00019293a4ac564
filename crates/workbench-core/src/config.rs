use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 2280;
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Top-level config (workbench.toml + WORKBENCH_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbenchConfig {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root directory of the workspace being managed. Sessions start their
    /// shell here unless the create request overrides it.
    #[serde(default = "default_project_dir")]
    pub project: String,
    /// Agent state directory — command log files live under
    /// `<state>/sessions/<sessionId>/<commandId>.log`.
    #[serde(default = "default_state_dir")]
    pub state: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            project: default_project_dir(),
            state: default_state_dir(),
        }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_project_dir() -> String {
    std::env::current_dir()
        .ok()
        .and_then(|p| p.to_str().map(str::to_string))
        .unwrap_or_else(|| "/".to_string())
}
fn default_state_dir() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.workbench", home)
}

impl WorkbenchConfig {
    /// Load config from a TOML file with WORKBENCH_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.workbench/workbench.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: WorkbenchConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("WORKBENCH_").split("_"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.workbench/workbench.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = WorkbenchConfig::default();
        assert_eq!(config.agent.port, DEFAULT_PORT);
        assert_eq!(config.agent.bind, DEFAULT_BIND);
        assert!(config.paths.state.ends_with(".workbench"));
    }

    #[test]
    fn load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workbench.toml");
        std::fs::write(
            &path,
            "[agent]\nbind = \"127.0.0.1\"\nport = 9000\n\n[paths]\nproject = \"/work\"\n",
        )
        .unwrap();

        let config = WorkbenchConfig::load(path.to_str()).unwrap();
        assert_eq!(config.agent.bind, "127.0.0.1");
        assert_eq!(config.agent.port, 9000);
        assert_eq!(config.paths.project, "/work");
        // unset keys fall back to defaults
        assert!(config.paths.state.ends_with(".workbench"));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = WorkbenchConfig::load(Some("/nonexistent/workbench.toml")).unwrap();
        assert_eq!(config.agent.port, DEFAULT_PORT);
    }
}
