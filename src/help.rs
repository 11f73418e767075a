use crate::command::{CommandBody, Registry};
use std::io::{self, Write};

/// Recursively render a registry as `name: description` lines, indented two
/// spaces per nesting level, with a blank line after each top-level entry's
/// full block. Read-only; no action is invoked.
pub fn print_help(out: &mut dyn Write, commands: &Registry, indent: usize) -> io::Result<()> {
    for (name, command) in commands {
        writeln!(
            out,
            "{:width$}{}: {}",
            "",
            name,
            command.description,
            width = indent * 2
        )?;
        if let CommandBody::Subtree(children) = &command.body {
            print_help(out, children, indent + 1)?;
        }
        if indent == 0 {
            writeln!(out)?;
        }
    }
    Ok(())
}
