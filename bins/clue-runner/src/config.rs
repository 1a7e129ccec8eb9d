// Interpreter configuration management for clue-runner
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Environment variable forcing UTF-8 standard streams in the interpreter
pub const IO_ENCODING_VAR: &str = "PYTHONIOENCODING";

/// How a program text is handed to the interpreter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterConfig {
    pub command: String,
    /// Arguments placed before the program text (direct-execution flag)
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Variables added on top of the inherited environment
    #[serde(default = "default_env")]
    pub env: BTreeMap<String, String>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            command: default_command().to_string(),
            args: default_args(),
            env: default_env(),
        }
    }
}

fn default_command() -> &'static str {
    if cfg!(windows) {
        "py"
    } else {
        "python3"
    }
}

fn default_args() -> Vec<String> {
    vec!["-c".to_string()]
}

fn default_env() -> BTreeMap<String, String> {
    BTreeMap::from([(IO_ENCODING_VAR.to_string(), "utf-8".to_string())])
}

#[derive(Debug, Serialize, Deserialize)]
struct InterpreterJson {
    interpreter: InterpreterConfig,
}

/// Interpreter configuration manager
#[derive(Debug, Clone)]
pub struct InterpreterConfigManager {
    config: InterpreterConfig,
}

impl InterpreterConfigManager {
    /// Load the interpreter configuration from a JSON file
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            bail!("Interpreter config file not found: {}", config_path.display());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let json: InterpreterJson = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        if json.interpreter.command.trim().is_empty() {
            bail!("Interpreter command in {} is empty", config_path.display());
        }

        Ok(Self {
            config: json.interpreter,
        })
    }

    /// Load `config_path` when it exists, platform defaults otherwise
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "No interpreter config file, using defaults"
            );
            Ok(Self {
                config: InterpreterConfig::default(),
            })
        }
    }

    /// Replace the configured command, keeping args and environment
    pub fn with_command(mut self, command: Option<String>) -> Self {
        if let Some(command) = command.filter(|c| !c.trim().is_empty()) {
            self.config.command = command;
        }
        self
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn into_config(self) -> InterpreterConfig {
        self.config
    }
}
