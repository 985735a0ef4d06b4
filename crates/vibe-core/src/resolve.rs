//! Command resolution
//!
//! Turns raw user tokens into a structured resolution: a help request, a
//! version query, a concrete command to run, or an error carrying the best
//! available help fallback. Resolution never executes anything and never
//! panics on unknown input.
//!
//! Explicit `tool command` syntax wins whenever the first token names a
//! known tool; the natural-language phrase path is only consulted after
//! that fails, so "git status" can never be shadowed by a phrase.

use crate::table::{CommandDescriptor, CommandTable, PhraseTable, ToolTable};

/// A fully resolved command, ready for formatting and execution
#[derive(Debug)]
pub struct ResolvedCommand<'a> {
    pub tool: String,
    pub command: String,
    pub descriptor: &'a CommandDescriptor,
    /// Positional arguments for the template (empty for phrase matches)
    pub args: Vec<String>,
    /// True when resolved via the natural-language path
    pub via_phrase: bool,
}

/// Outcome of resolving one token sequence
#[derive(Debug)]
pub enum Resolution<'a> {
    /// `vibe`, `vibe help`, `vibe --help`, `vibe -h`
    GeneralHelp,
    /// `vibe --version`, `vibe -v`
    Version,
    /// `vibe <tool>` or `vibe <tool> help`
    ToolHelp {
        tool: String,
        table: &'a ToolTable,
    },
    /// `vibe <tool> <command> help`
    CommandHelp {
        tool: String,
        command: String,
        descriptor: &'a CommandDescriptor,
    },
    /// A command to run
    Run(ResolvedCommand<'a>),
    /// First token is neither a tool nor a phrase; fall back to general help
    UnknownTool { name: String },
    /// Known tool, unknown command; fall back to that tool's help
    UnknownCommand {
        tool: String,
        name: String,
        table: &'a ToolTable,
    },
}

/// Resolve raw argv tokens against the loaded tables
pub fn resolve<'a>(
    commands: &'a CommandTable,
    phrases: &'a PhraseTable,
    argv: &[String],
) -> Resolution<'a> {
    let first = match argv.first() {
        Some(first) => first.as_str(),
        None => return Resolution::GeneralHelp,
    };

    match first {
        "help" | "--help" | "-h" => return Resolution::GeneralHelp,
        "--version" | "-v" => return Resolution::Version,
        _ => {}
    }

    if let Some(tool_table) = commands.get(first) {
        return resolve_explicit(first, tool_table, &argv[1..]);
    }

    // Phrases are whole-input exact matches and carry no arguments.
    let phrase = argv.join(" ");
    if let Some(entry) = phrases.lookup(&phrase) {
        if let Some(descriptor) = commands.get(&entry.tool).and_then(|t| t.get(&entry.command)) {
            return Resolution::Run(ResolvedCommand {
                tool: entry.tool.clone(),
                command: entry.command.clone(),
                descriptor,
                args: Vec::new(),
                via_phrase: true,
            });
        }
    }

    Resolution::UnknownTool {
        name: first.to_string(),
    }
}

fn resolve_explicit<'a>(tool: &str, table: &'a ToolTable, rest: &[String]) -> Resolution<'a> {
    let name = match rest.first() {
        Some(name) if name != "help" => name.as_str(),
        _ => {
            return Resolution::ToolHelp {
                tool: tool.to_string(),
                table,
            }
        }
    };

    let canonical = match table.canonical_name(name) {
        Some(canonical) => canonical.to_string(),
        None => {
            return Resolution::UnknownCommand {
                tool: tool.to_string(),
                name: name.to_string(),
                table,
            }
        }
    };

    // canonical_name and get agree on what exists
    let descriptor = match table.get(&canonical) {
        Some(descriptor) => descriptor,
        None => {
            return Resolution::UnknownCommand {
                tool: tool.to_string(),
                name: name.to_string(),
                table,
            }
        }
    };

    if rest.len() > 1 && rest[1] == "help" {
        return Resolution::CommandHelp {
            tool: tool.to_string(),
            command: canonical,
            descriptor,
        };
    }

    Resolution::Run(ResolvedCommand {
        tool: tool.to_string(),
        command: canonical,
        descriptor,
        args: rest[1..].to_vec(),
        via_phrase: false,
    })
}
