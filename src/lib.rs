//! A tiny, embeddable interactive command dispatcher.
//!
//! This crate provides the building blocks for a line-oriented command loop:
//! commands are registered into a named tree whose leaves execute an action
//! and whose inner nodes dispatch on the next whitespace-delimited token.
//! Each input line is resolved against the tree and the matched leaf receives
//! the unconsumed remainder of the line as a single argument string.
//!
//! The main entry point is [`Dispatcher`], which owns the command tree and
//! drives the read-dispatch loop over caller-provided streams (or an
//! interactive `rustyline` prompt). The public [`command`] module exposes the
//! types for registering your own commands, and [`print_help`] renders the
//! recursive help listing over any registry.

pub mod command;
mod dispatcher;
mod help;
mod resolver;

/// Just a convenient re-export of the interactive command loop driver.
///
/// See [`Dispatcher`] for the high-level API and examples.
pub use dispatcher::Dispatcher;
pub use help::print_help;
