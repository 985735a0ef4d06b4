//! Built-in command handlers
//!
//! Some table entries name a built-in operation instead of a shell
//! template, for things string substitution cannot express: mutating the
//! vibe config file, or virtualenv activation (which only the parent shell
//! can actually do). The table format refers to builtins by name; the names
//! map onto this closed enum at load time, so a typo in the table is a load
//! error rather than a runtime surprise.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Handler execution errors
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("{0}")]
    Usage(String),

    #[error("key '{0}' not found in configuration")]
    KeyNotFound(String),

    #[error("could not determine home directory")]
    NoHome,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The closed set of built-in operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    ConfigGet,
    ConfigSet,
    ConfigList,
    VenvActivate,
}

impl Builtin {
    /// Map a handler name from the command table to a builtin
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "config.get" => Some(Self::ConfigGet),
            "config.set" => Some(Self::ConfigSet),
            "config.list" => Some(Self::ConfigList),
            "venv.activate" => Some(Self::VenvActivate),
            _ => None,
        }
    }

    /// Run the builtin against the default config directory (`~/.vibe`)
    pub fn run(&self, args: &[String]) -> Result<String, HandlerError> {
        let dir = dirs::home_dir().ok_or(HandlerError::NoHome)?.join(".vibe");
        self.run_in(&dir, args)
    }

    /// Run the builtin against an explicit config directory
    pub fn run_in(&self, dir: &Path, args: &[String]) -> Result<String, HandlerError> {
        match self {
            Self::ConfigGet => config_get(dir, args),
            Self::ConfigSet => config_set(dir, args),
            Self::ConfigList => config_list(dir, args),
            Self::VenvActivate => venv_activate(args),
        }
    }
}

fn config_path(dir: &Path) -> PathBuf {
    dir.join("config.json")
}

/// Load the config document, treating a missing or corrupt file as empty
fn load_config(dir: &Path) -> serde_json::Map<String, Value> {
    let path = config_path(dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(_) => return serde_json::Map::new(),
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            warn!(path = %path.display(), "config file is corrupted, starting empty");
            serde_json::Map::new()
        }
    }
}

fn save_config(dir: &Path, config: &serde_json::Map<String, Value>) -> Result<(), HandlerError> {
    fs::create_dir_all(dir)?;
    let text = serde_json::to_string_pretty(&Value::Object(config.clone()))?;
    fs::write(config_path(dir), text)?;
    Ok(())
}

fn config_get(dir: &Path, args: &[String]) -> Result<String, HandlerError> {
    let [key] = args else {
        return Err(HandlerError::Usage(
            "usage: vibe config get <key>".to_string(),
        ));
    };

    let config = load_config(dir);
    match config.get(key.as_str()) {
        Some(value) => Ok(format!("{} = {}", key, value)),
        None => Err(HandlerError::KeyNotFound(key.clone())),
    }
}

fn config_set(dir: &Path, args: &[String]) -> Result<String, HandlerError> {
    let [key, raw_value] = args else {
        return Err(HandlerError::Usage(
            "usage: vibe config set <key> <value>".to_string(),
        ));
    };

    // Accept JSON scalars (true, 42, ...) and fall back to a plain string.
    let value = serde_json::from_str::<Value>(raw_value)
        .unwrap_or_else(|_| Value::String(raw_value.clone()));

    let mut config = load_config(dir);
    config.insert(key.clone(), value.clone());
    save_config(dir, &config)?;

    Ok(format!("set: {} = {}", key, value))
}

fn config_list(dir: &Path, args: &[String]) -> Result<String, HandlerError> {
    if !args.is_empty() {
        return Err(HandlerError::Usage(
            "usage: vibe config list (takes no arguments)".to_string(),
        ));
    }

    let config = load_config(dir);
    if config.is_empty() {
        return Ok("configuration is empty".to_string());
    }

    let lines: Vec<String> = config
        .iter()
        .map(|(key, value)| format!("  {}: {}", key, value))
        .collect();
    Ok(lines.join("\n"))
}

fn venv_activate(_args: &[String]) -> Result<String, HandlerError> {
    // A child process cannot change its parent shell's environment, so the
    // best a handler can do is print the line the user must run.
    let line = if cfg!(windows) {
        r"venv\Scripts\activate"
    } else {
        "source venv/bin/activate"
    };
    Ok(format!(
        "virtual environments must be activated by your shell, run:\n  {}",
        line
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Builtin::from_name("config.set"), Some(Builtin::ConfigSet));
        assert_eq!(Builtin::from_name("venv.activate"), Some(Builtin::VenvActivate));
        assert_eq!(Builtin::from_name("no.such.handler"), None);
    }

    #[test]
    fn test_set_then_get() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();

        Builtin::ConfigSet
            .run_in(dir, &args(&["editor", "vim"]))
            .unwrap();
        let out = Builtin::ConfigGet.run_in(dir, &args(&["editor"])).unwrap();
        assert_eq!(out, "editor = \"vim\"");
    }

    #[test]
    fn test_set_parses_json_scalars() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();

        Builtin::ConfigSet
            .run_in(dir, &args(&["telemetry", "false"]))
            .unwrap();
        let out = Builtin::ConfigGet
            .run_in(dir, &args(&["telemetry"]))
            .unwrap();
        assert_eq!(out, "telemetry = false");
    }

    #[test]
    fn test_get_missing_key() {
        let tmp = TempDir::new().unwrap();
        let err = Builtin::ConfigGet
            .run_in(tmp.path(), &args(&["nope"]))
            .unwrap_err();
        assert!(matches!(err, HandlerError::KeyNotFound(_)));
    }

    #[test]
    fn test_list_empty_and_populated() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();

        let out = Builtin::ConfigList.run_in(dir, &[]).unwrap();
        assert_eq!(out, "configuration is empty");

        Builtin::ConfigSet
            .run_in(dir, &args(&["editor", "vim"]))
            .unwrap();
        let out = Builtin::ConfigList.run_in(dir, &[]).unwrap();
        assert!(out.contains("editor: \"vim\""));
    }

    #[test]
    fn test_corrupt_config_starts_empty() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        fs::create_dir_all(dir).unwrap();
        fs::write(config_path(dir), "{not json").unwrap();

        let out = Builtin::ConfigList.run_in(dir, &[]).unwrap();
        assert_eq!(out, "configuration is empty");
    }

    #[test]
    fn test_usage_errors() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Builtin::ConfigGet.run_in(tmp.path(), &[]),
            Err(HandlerError::Usage(_))
        ));
        assert!(matches!(
            Builtin::ConfigSet.run_in(tmp.path(), &args(&["only-key"])),
            Err(HandlerError::Usage(_))
        ));
        assert!(matches!(
            Builtin::ConfigList.run_in(tmp.path(), &args(&["spurious"])),
            Err(HandlerError::Usage(_))
        ));
    }

    #[test]
    fn test_venv_activate_message() {
        let out = Builtin::VenvActivate.run_in(Path::new("/"), &[]).unwrap();
        assert!(out.contains("activate"));
    }
}
