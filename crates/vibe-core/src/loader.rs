//! Table file discovery and loading
//!
//! The command and phrase tables live in a shared directory looked up in
//! order: an explicit `VIBE_TABLE_DIR` override (used by tests), a local
//! `shared/` directory in the working tree, the installed
//! `<prefix>/share/vibe` layout next to the executable, the per-user data
//! directory, and finally the defaults embedded in the binary.
//!
//! Load failures are logged and yield empty tables; the top-level flow
//! treats an empty command table as fatal before any resolution happens.

use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::table::{CommandTable, PhraseTable};

/// Environment override for the table directory
pub const TABLE_DIR_ENV: &str = "VIBE_TABLE_DIR";

/// File name of the command table within the table directory
pub const COMMANDS_FILE: &str = "commands.yaml";

/// File name of the phrase table within the table directory
pub const PHRASES_FILE: &str = "phrases.yaml";

const DEFAULT_COMMANDS: &str = include_str!("../assets/commands.yaml");
const DEFAULT_PHRASES: &str = include_str!("../assets/phrases.yaml");

/// Load the command and phrase tables from the discovered location
pub fn load() -> (CommandTable, PhraseTable) {
    match discover_dir() {
        Some(dir) => {
            debug!(dir = %dir.display(), "loading tables");
            load_from_dir(&dir)
        }
        None => {
            debug!("no table directory found, using embedded defaults");
            load_embedded()
        }
    }
}

/// Find the directory holding the table files
fn discover_dir() -> Option<PathBuf> {
    if let Ok(dir) = env::var(TABLE_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }

    // Local development: shared/ under the working directory
    if let Ok(cwd) = env::current_dir() {
        let local = cwd.join("shared");
        if local.join(COMMANDS_FILE).is_file() {
            return Some(local);
        }
    }

    // Installed layout: <prefix>/bin/vibe -> <prefix>/share/vibe
    if let Ok(exe) = env::current_exe() {
        if let Some(prefix) = exe.parent().and_then(Path::parent) {
            let installed = prefix.join("share").join("vibe");
            if installed.join(COMMANDS_FILE).is_file() {
                return Some(installed);
            }
        }
    }

    // Per-user data directory
    if let Some(data) = dirs::data_dir() {
        let dir = data.join("vibe");
        if dir.join(COMMANDS_FILE).is_file() {
            return Some(dir);
        }
    }

    None
}

/// Load both tables from an explicit directory
pub fn load_from_dir(dir: &Path) -> (CommandTable, PhraseTable) {
    let commands_path = dir.join(COMMANDS_FILE);
    let commands = match std::fs::read_to_string(&commands_path) {
        Ok(source) => parse_commands(&source, &commands_path.display().to_string()),
        Err(err) => {
            error!(path = %commands_path.display(), %err, "failed to read command table");
            CommandTable::default()
        }
    };

    let phrases_path = dir.join(PHRASES_FILE);
    let phrases = match std::fs::read_to_string(&phrases_path) {
        Ok(source) => parse_phrases(&source, &commands, &phrases_path.display().to_string()),
        Err(err) => {
            error!(path = %phrases_path.display(), %err, "failed to read phrase table");
            PhraseTable::default()
        }
    };

    (commands, phrases)
}

/// Load the tables compiled into the binary
pub fn load_embedded() -> (CommandTable, PhraseTable) {
    let commands = parse_commands(DEFAULT_COMMANDS, "embedded commands.yaml");
    let phrases = parse_phrases(DEFAULT_PHRASES, &commands, "embedded phrases.yaml");
    (commands, phrases)
}

fn parse_commands(source: &str, origin: &str) -> CommandTable {
    match CommandTable::from_yaml(source) {
        Ok(table) => table,
        Err(err) => {
            error!(%origin, %err, "failed to load command table");
            CommandTable::default()
        }
    }
}

fn parse_phrases(source: &str, commands: &CommandTable, origin: &str) -> PhraseTable {
    match PhraseTable::from_yaml(source, commands) {
        Ok(table) => table,
        Err(err) => {
            error!(%origin, %err, "failed to load phrase table");
            PhraseTable::default()
        }
    }
}
