//! vibe - speak plain English, run dev commands
//!
//! Thin CLI shell over vibe-core: load the tables, resolve the tokens,
//! format and execute, map the outcome to an exit code. All grammar lives
//! in the resolver, so clap only collects raw tokens here.

mod help;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use vibe_core::{
    execute, format_template, loader, resolve, CommandAction, CommandTable, PhraseTable,
    Resolution, ResolvedCommand,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// vibe - speak plain English, run dev commands
#[derive(Parser)]
#[command(name = "vibe")]
#[command(about = "Speak plain English, run dev commands")]
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Tool, command and arguments, or a natural-language phrase
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> Result<()> {
    // Per-invocation logging; VIBE_LOG selects the level, warnings only by
    // default so command output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("VIBE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (commands, phrases) = loader::load();
    let code = run(&commands, &phrases, &cli.args);
    std::process::exit(code);
}

/// Full top-level flow, returning the process exit code
fn run(commands: &CommandTable, phrases: &PhraseTable, args: &[String]) -> i32 {
    // An empty table means nothing can ever resolve; fail before trying.
    if commands.is_empty() {
        eprintln!(
            "{} no command definitions loaded, check your table files",
            "error:".red()
        );
        return 1;
    }

    match resolve(commands, phrases, args) {
        Resolution::GeneralHelp => {
            help::general(commands, phrases);
            0
        }
        Resolution::Version => {
            println!("vibe {}", VERSION);
            0
        }
        Resolution::ToolHelp { tool, table } => {
            help::tool(&tool, table);
            0
        }
        Resolution::CommandHelp {
            tool,
            command,
            descriptor,
        } => {
            help::command(&tool, &command, descriptor);
            0
        }
        Resolution::UnknownTool { name } => {
            eprintln!("{} unknown tool or phrase: '{}'", "error:".red(), name);
            eprintln!();
            help::general(commands, phrases);
            1
        }
        Resolution::UnknownCommand { tool, name, table } => {
            eprintln!(
                "{} unknown command '{}' for tool '{}'",
                "error:".red(),
                name,
                tool
            );
            eprintln!();
            help::tool(&tool, table);
            1
        }
        Resolution::Run(resolved) => {
            let code = run_command(&resolved);
            if code == 0 && resolved.via_phrase {
                println!(
                    "{}",
                    format!(
                        "'{}' ran as: vibe {} {}",
                        args.join(" "),
                        resolved.tool,
                        resolved.command
                    )
                    .dimmed()
                );
            }
            code
        }
    }
}

fn run_command(resolved: &ResolvedCommand) -> i32 {
    match &resolved.descriptor.action {
        CommandAction::Template(template) => {
            let command = format_template(template, &resolved.args);
            println!("{} {}", "running:".green(), command.bold());

            let result = execute(&command);

            // Stdout produced before a failure still belongs to the user.
            print!("{}", result.stdout);
            eprint!("{}", result.stderr);

            if let Some(error) = &result.error {
                eprintln!("{} {}", "error:".red(), error);
            }

            if result.succeeded {
                0
            } else {
                eprintln!("{} command failed", "error:".red());
                1
            }
        }
        CommandAction::Builtin(builtin) => match builtin.run(&resolved.args) {
            Ok(message) => {
                println!("{}", message);
                0
            }
            Err(error) => {
                eprintln!("{} {}", "error:".red(), error);
                1
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibe_core::{CommandTable, PhraseTable};

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_table_is_fatal() {
        let commands = CommandTable::default();
        let phrases = PhraseTable::default();
        assert_eq!(run(&commands, &phrases, &argv(&["git", "status"])), 1);
        // Even a help request fails when nothing loaded.
        assert_eq!(run(&commands, &phrases, &[]), 1);
    }

    #[test]
    fn test_help_paths_exit_zero() {
        let commands =
            CommandTable::from_yaml("git:\n  status:\n    command: git status\n").unwrap();
        let phrases = PhraseTable::default();

        assert_eq!(run(&commands, &phrases, &[]), 0);
        assert_eq!(run(&commands, &phrases, &argv(&["help"])), 0);
        assert_eq!(run(&commands, &phrases, &argv(&["git"])), 0);
        assert_eq!(run(&commands, &phrases, &argv(&["git", "help"])), 0);
        assert_eq!(run(&commands, &phrases, &argv(&["git", "status", "help"])), 0);
        assert_eq!(run(&commands, &phrases, &argv(&["--version"])), 0);
    }

    #[test]
    fn test_resolution_errors_exit_one() {
        let commands =
            CommandTable::from_yaml("git:\n  status:\n    command: git status\n").unwrap();
        let phrases = PhraseTable::default();

        assert_eq!(run(&commands, &phrases, &argv(&["dockerz", "ps"])), 1);
        assert_eq!(run(&commands, &phrases, &argv(&["git", "frobnicate"])), 1);
    }

    #[test]
    fn test_execution_exit_codes() {
        let commands = CommandTable::from_yaml(
            "shell:\n  ok:\n    command: \"true\"\n  fail:\n    command: \"false\"\n",
        )
        .unwrap();
        let phrases = PhraseTable::default();

        assert_eq!(run(&commands, &phrases, &argv(&["shell", "ok"])), 0);
        assert_eq!(run(&commands, &phrases, &argv(&["shell", "fail"])), 1);
    }
}
