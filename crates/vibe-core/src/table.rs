//! Declarative command and phrase tables
//!
//! The command table maps tool -> command name -> descriptor, the phrase
//! table maps free-text phrases to canonical commands. Both are loaded once
//! per invocation and validated up front: a descriptor that cannot be
//! executed is rejected here, not when a user happens to invoke it.

use serde::Deserialize;
use serde_yaml::Value;
use thiserror::Error;
use tracing::warn;

use crate::handlers::Builtin;

/// Table loading and validation errors
#[derive(Error, Debug)]
pub enum TableError {
    #[error("tool '{tool}', command '{command}': exactly one of 'command' or 'handler' must be set")]
    InvalidAction { tool: String, command: String },

    #[error("tool '{tool}', command '{command}': unknown handler '{handler}'")]
    UnknownHandler {
        tool: String,
        command: String,
        handler: String,
    },

    #[error("unexpected document shape: {0}")]
    Shape(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw descriptor as it appears in commands.yaml
///
/// Unknown fields are tolerated so the table format can grow without
/// breaking older binaries.
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    handler: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    aliases: Vec<String>,
}

/// What invoking a command actually does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandAction {
    /// Shell template with positional `{..}` placeholders
    Template(String),
    /// Built-in operation, too complex for string substitution
    Builtin(Builtin),
}

/// One validated, invocable command
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    pub action: CommandAction,
    pub description: String,
    pub aliases: Vec<String>,
}

impl CommandDescriptor {
    fn from_raw(tool: &str, command: &str, raw: RawDescriptor) -> Result<Self, TableError> {
        let action = match (raw.command, raw.handler) {
            (Some(template), None) => CommandAction::Template(template),
            (None, Some(handler)) => match Builtin::from_name(&handler) {
                Some(builtin) => CommandAction::Builtin(builtin),
                None => {
                    return Err(TableError::UnknownHandler {
                        tool: tool.to_string(),
                        command: command.to_string(),
                        handler,
                    })
                }
            },
            _ => {
                return Err(TableError::InvalidAction {
                    tool: tool.to_string(),
                    command: command.to_string(),
                })
            }
        };

        Ok(Self {
            action,
            description: raw.description,
            aliases: raw.aliases,
        })
    }
}

/// Commands of a single tool, in table order for deterministic help listing
#[derive(Debug, Clone, Default)]
pub struct ToolTable {
    commands: Vec<(String, CommandDescriptor)>,
}

impl ToolTable {
    /// Look up a command by name, then by alias
    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands
            .iter()
            .find(|(n, _)| n == name)
            .or_else(|| {
                self.commands
                    .iter()
                    .find(|(_, d)| d.aliases.iter().any(|a| a == name))
            })
            .map(|(_, d)| d)
    }

    /// Canonical name for `name`, resolving aliases
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.commands
            .iter()
            .find(|(n, d)| n == name || d.aliases.iter().any(|a| a == name))
            .map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandDescriptor)> {
        self.commands.iter().map(|(n, d)| (n.as_str(), d))
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// The full tool -> command table, immutable after load
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    tools: Vec<(String, ToolTable)>,
}

impl CommandTable {
    /// Parse and validate a YAML table document
    pub fn from_yaml(source: &str) -> Result<Self, TableError> {
        let doc: Value = serde_yaml::from_str(source)?;
        let mapping = match doc {
            Value::Mapping(m) => m,
            Value::Null => return Ok(Self::default()),
            other => {
                return Err(TableError::Shape(format!(
                    "expected a mapping of tools, got {}",
                    value_kind(&other)
                )))
            }
        };

        let mut tools = Vec::new();
        for (tool_key, tool_value) in mapping {
            let tool = string_key(&tool_key)?;
            let commands = match tool_value {
                Value::Mapping(m) => m,
                other => {
                    return Err(TableError::Shape(format!(
                        "tool '{}': expected a mapping of commands, got {}",
                        tool,
                        value_kind(&other)
                    )))
                }
            };

            let mut entries = Vec::new();
            for (name_key, entry) in commands {
                let name = string_key(&name_key)?;
                let raw: RawDescriptor = serde_yaml::from_value(entry)?;
                let descriptor = CommandDescriptor::from_raw(&tool, &name, raw)?;
                entries.push((name, descriptor));
            }

            tools.push((tool, ToolTable { commands: entries }));
        }

        Ok(Self { tools })
    }

    pub fn get(&self, tool: &str) -> Option<&ToolTable> {
        self.tools.iter().find(|(n, _)| n == tool).map(|(_, t)| t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ToolTable)> {
        self.tools.iter().map(|(n, t)| (n.as_str(), t))
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// One phrase mapping, already resolved to its canonical target
#[derive(Debug, Clone)]
pub struct PhraseEntry {
    pub phrase: String,
    pub tool: String,
    pub command: String,
}

/// Free-text phrase -> canonical command mappings
///
/// Targets are validated against the command table at load time; entries
/// whose target does not exist are dropped with a warning so a single typo
/// in the phrase file cannot panic a lookup later.
#[derive(Debug, Clone, Default)]
pub struct PhraseTable {
    entries: Vec<PhraseEntry>,
}

impl PhraseTable {
    /// Parse a YAML phrase document and resolve targets against `table`
    ///
    /// Targets may be a bare command name (resolved within the owning tool
    /// section) or a qualified `tool.command` reference.
    pub fn from_yaml(source: &str, table: &CommandTable) -> Result<Self, TableError> {
        let doc: Value = serde_yaml::from_str(source)?;
        let mapping = match doc {
            Value::Mapping(m) => m,
            Value::Null => return Ok(Self::default()),
            other => {
                return Err(TableError::Shape(format!(
                    "expected a mapping of tools, got {}",
                    value_kind(&other)
                )))
            }
        };

        let mut entries = Vec::new();
        for (tool_key, phrases) in mapping {
            let tool = string_key(&tool_key)?;
            let phrases = match phrases {
                Value::Mapping(m) => m,
                other => {
                    return Err(TableError::Shape(format!(
                        "tool '{}': expected a mapping of phrases, got {}",
                        tool,
                        value_kind(&other)
                    )))
                }
            };

            for (phrase_key, target) in phrases {
                let phrase = string_key(&phrase_key)?;
                let target = match target {
                    Value::String(s) => s,
                    other => {
                        return Err(TableError::Shape(format!(
                            "phrase '{}': expected a command name, got {}",
                            phrase,
                            value_kind(&other)
                        )))
                    }
                };

                // Qualified targets ("git.status") name their own tool.
                let (target_tool, target_command) = match target.split_once('.') {
                    Some((t, c)) => (t.to_string(), c.to_string()),
                    None => (tool.clone(), target),
                };

                let resolved = table
                    .get(&target_tool)
                    .and_then(|t| t.canonical_name(&target_command));

                match resolved {
                    Some(canonical) => entries.push(PhraseEntry {
                        phrase,
                        tool: target_tool.clone(),
                        command: canonical.to_string(),
                    }),
                    None => warn!(
                        phrase = %phrase,
                        target_tool = %target_tool,
                        target_command = %target_command,
                        "dropping phrase with unknown target"
                    ),
                }
            }
        }

        Ok(Self { entries })
    }

    /// Exact, case-sensitive phrase lookup
    pub fn lookup(&self, phrase: &str) -> Option<&PhraseEntry> {
        self.entries.iter().find(|e| e.phrase == phrase)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhraseEntry> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn string_key(key: &Value) -> Result<String, TableError> {
    key.as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| TableError::Shape(format!("expected a string key, got {}", value_kind(key))))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
git:
  status:
    command: git status
    description: Show the working tree status
  commit:
    command: git commit -m {message}
    description: Commit staged changes
    aliases: [save]
vibe:
  config-list:
    handler: config.list
    description: List configuration values
"#;

    #[test]
    fn test_parse_valid_table() {
        let table = CommandTable::from_yaml(TABLE).unwrap();
        assert!(!table.is_empty());

        let git = table.get("git").unwrap();
        let status = git.get("status").unwrap();
        assert_eq!(
            status.action,
            CommandAction::Template("git status".to_string())
        );
        assert_eq!(status.description, "Show the working tree status");

        let vibe = table.get("vibe").unwrap();
        assert_eq!(
            vibe.get("config-list").unwrap().action,
            CommandAction::Builtin(Builtin::ConfigList)
        );
    }

    #[test]
    fn test_alias_lookup() {
        let table = CommandTable::from_yaml(TABLE).unwrap();
        let git = table.get("git").unwrap();

        assert!(git.get("save").is_some());
        assert_eq!(git.canonical_name("save"), Some("commit"));
        assert_eq!(git.canonical_name("commit"), Some("commit"));
    }

    #[test]
    fn test_order_preserved() {
        let table = CommandTable::from_yaml(TABLE).unwrap();
        let names: Vec<_> = table.get("git").unwrap().iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["status", "commit"]);
    }

    #[test]
    fn test_descriptor_with_both_rejected() {
        let src = r#"
git:
  status:
    command: git status
    handler: config.list
"#;
        let err = CommandTable::from_yaml(src).unwrap_err();
        assert!(matches!(err, TableError::InvalidAction { .. }));
    }

    #[test]
    fn test_descriptor_with_neither_rejected() {
        let src = r#"
git:
  status:
    description: no way to run this
"#;
        let err = CommandTable::from_yaml(src).unwrap_err();
        assert!(matches!(err, TableError::InvalidAction { .. }));
    }

    #[test]
    fn test_unknown_handler_rejected() {
        let src = r#"
vibe:
  frobnicate:
    handler: no.such.thing
"#;
        let err = CommandTable::from_yaml(src).unwrap_err();
        assert!(matches!(err, TableError::UnknownHandler { .. }));
    }

    #[test]
    fn test_unknown_fields_tolerated() {
        let src = r#"
git:
  status:
    command: git status
    description: Show the working tree status
    category: info
"#;
        assert!(CommandTable::from_yaml(src).is_ok());
    }

    #[test]
    fn test_phrases_resolve_targets() {
        let table = CommandTable::from_yaml(TABLE).unwrap();
        let phrases = PhraseTable::from_yaml(
            r#"
git:
  check status: status
  save my work: git.commit
"#,
            &table,
        )
        .unwrap();

        let entry = phrases.lookup("check status").unwrap();
        assert_eq!(entry.tool, "git");
        assert_eq!(entry.command, "status");

        let entry = phrases.lookup("save my work").unwrap();
        assert_eq!(entry.command, "commit");
    }

    #[test]
    fn test_phrase_with_unknown_target_dropped() {
        let table = CommandTable::from_yaml(TABLE).unwrap();
        let phrases = PhraseTable::from_yaml(
            r#"
git:
  check status: status
  do the thing: frobnicate
"#,
            &table,
        )
        .unwrap();

        assert!(phrases.lookup("check status").is_some());
        assert!(phrases.lookup("do the thing").is_none());
    }

    #[test]
    fn test_phrase_alias_target_canonicalized() {
        let table = CommandTable::from_yaml(TABLE).unwrap();
        let phrases = PhraseTable::from_yaml("git:\n  save it: save\n", &table).unwrap();
        assert_eq!(phrases.lookup("save it").unwrap().command, "commit");
    }

    #[test]
    fn test_empty_document() {
        let table = CommandTable::from_yaml("").unwrap();
        assert!(table.is_empty());
    }
}
