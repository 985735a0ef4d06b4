//! Help rendering
//!
//! Help output is driven entirely by the loaded tables, so user-provided
//! table files show up here without code changes. Listing order follows
//! table order.

use colored::Colorize;
use vibe_core::{CommandAction, CommandDescriptor, CommandTable, PhraseTable, ToolTable};

/// General help: usage, tools, and a sample of phrases
pub fn general(commands: &CommandTable, phrases: &PhraseTable) {
    println!("{}", "vibe - your friendly command companion".cyan().bold());
    println!();

    println!("{}", "USAGE".bold());
    println!("    vibe <tool> <command> [args...]");
    println!("    vibe <natural language phrase>");
    println!();

    println!("{}", "TOOLS".bold());
    for (tool, table) in commands.iter() {
        println!(
            "    {:12} {} commands",
            tool.cyan(),
            table.iter().count()
        );
    }
    println!();

    if !phrases.is_empty() {
        println!("{}", "PHRASES".bold());
        for entry in phrases.iter().take(5) {
            println!(
                "    {:28} {}",
                format!("\"{}\"", entry.phrase).green(),
                format!("vibe {} {}", entry.tool, entry.command).dimmed()
            );
        }
        println!();
    }

    println!("Run {} for commands within a tool", "vibe <tool> help".bold());
    println!("Run {} to see this message", "vibe help".bold());
}

/// Help for one tool: its commands and descriptions
pub fn tool(name: &str, table: &ToolTable) {
    println!("{}", format!("vibe - {} commands", name).cyan().bold());
    println!();
    println!("{}", "USAGE".bold());
    println!("    vibe {} <command> [args...]", name);
    println!();

    println!("{}", "COMMANDS".bold());
    for (command, descriptor) in table.iter() {
        println!("    {:20} {}", command.cyan(), descriptor.description);
        if !descriptor.aliases.is_empty() {
            println!(
                "    {:20} {}",
                "",
                format!("aliases: {}", descriptor.aliases.join(", ")).dimmed()
            );
        }
    }
    println!();

    println!(
        "Run {} for command details",
        format!("vibe {} <command> help", name).bold()
    );
}

/// Help for one command: description and underlying template
pub fn command(tool: &str, name: &str, descriptor: &CommandDescriptor) {
    println!("{}", format!("vibe - {} {}", tool, name).cyan().bold());
    println!();
    println!("{}", descriptor.description);
    println!();

    match &descriptor.action {
        CommandAction::Template(template) => {
            println!("{} {}", "template:".bold(), template);
        }
        CommandAction::Builtin(_) => {
            println!("{} built-in operation", "template:".bold());
        }
    }

    if !descriptor.aliases.is_empty() {
        println!("{}  {}", "aliases:".bold(), descriptor.aliases.join(", "));
    }

    println!();
    println!("{}", "USAGE".bold());
    println!("    vibe {} {} [args...]", tool, name);
}
