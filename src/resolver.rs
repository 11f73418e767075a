use crate::command::{CommandBody, Context, Registry};
use anyhow::Result;

/// Read position within one input line, shared by every level of a resolve
/// walk. Tracks the tokens consumed so far for the unknown-command message.
pub(crate) struct Cursor<'a> {
    rest: &'a str,
    path: Vec<&'a str>,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(line: &'a str) -> Self {
        Self {
            rest: line,
            path: Vec::new(),
        }
    }

    /// Consume the next whitespace-delimited token, recording it on the
    /// resolved path. `None` when only whitespace (or nothing) remains.
    pub(crate) fn next_token(&mut self) -> Option<&'a str> {
        self.rest = self.rest.trim_start();
        if self.rest.is_empty() {
            return None;
        }
        let end = self
            .rest
            .find(char::is_whitespace)
            .unwrap_or(self.rest.len());
        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        self.path.push(token);
        Some(token)
    }

    /// Everything after the last consumed token, with the separating
    /// whitespace stripped but otherwise verbatim (not re-tokenized).
    pub(crate) fn remainder(&self) -> &'a str {
        self.rest.trim_start()
    }

    /// The tokens consumed so far, space-separated, for error reporting.
    pub(crate) fn path(&self) -> String {
        self.path.join(" ")
    }
}

/// Walk `commands` one token per level and invoke the resolved leaf with the
/// remainder of the line.
///
/// Returns `Ok(false)` when the line is unresolved (no token left, or a token
/// missing from the registry at some depth); `cursor.path()` then holds every
/// token consumed up to and including the unmatched one. An `Err` is the
/// invoked action's own failure, not a resolution failure.
pub(crate) fn resolve(
    commands: &Registry,
    cursor: &mut Cursor<'_>,
    ctx: &mut Context<'_>,
) -> Result<bool> {
    let Some(token) = cursor.next_token() else {
        return Ok(false);
    };
    let Some(command) = commands.get(token) else {
        return Ok(false);
    };
    match &command.body {
        CommandBody::Action(action) => {
            action.invoke(ctx, cursor.remainder())?;
            Ok(true)
        }
        CommandBody::Subtree(children) => resolve(children, cursor, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, CommandDef, NamedCommand};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_cursor_tokenizes_on_whitespace_runs() {
        let mut cursor = Cursor::new("  get   name\tvalue");
        assert_eq!(cursor.next_token(), Some("get"));
        assert_eq!(cursor.next_token(), Some("name"));
        assert_eq!(cursor.next_token(), Some("value"));
        assert_eq!(cursor.next_token(), None);
        assert_eq!(cursor.path(), "get name value");
    }

    #[test]
    fn test_cursor_empty_line_has_empty_path() {
        let mut cursor = Cursor::new("   ");
        assert_eq!(cursor.next_token(), None);
        assert_eq!(cursor.path(), "");
        assert_eq!(cursor.remainder(), "");
    }

    #[test]
    fn test_cursor_remainder_is_verbatim_after_token() {
        let mut cursor = Cursor::new("print  hello   world ");
        assert_eq!(cursor.next_token(), Some("print"));
        assert_eq!(cursor.remainder(), "hello   world ");
    }

    fn recording_registry(calls: Rc<RefCell<Vec<String>>>) -> Registry {
        let name_calls = calls.clone();
        let param_calls = calls;
        let mut commands = Registry::new();
        commands.insert(
            "get".to_string(),
            Command::new(
                "gets some stuff",
                CommandDef::group(vec![
                    NamedCommand::action(
                        "name",
                        "name desc",
                        move |_ctx: &mut Context, rest: &str| {
                            name_calls.borrow_mut().push(format!("name:{rest}"));
                            Ok(())
                        },
                    ),
                    NamedCommand::action(
                        "param",
                        "param desc",
                        move |_ctx: &mut Context, rest: &str| {
                            param_calls.borrow_mut().push(format!("param:{rest}"));
                            Ok(())
                        },
                    ),
                ]),
            ),
        );
        commands
    }

    fn resolve_line(commands: &Registry, line: &str) -> (bool, String) {
        let mut out: Vec<u8> = Vec::new();
        let mut running = true;
        let mut cursor = Cursor::new(line);
        let resolved = {
            let mut ctx = Context {
                out: &mut out,
                commands,
                running: &mut running,
            };
            resolve(commands, &mut cursor, &mut ctx).unwrap()
        };
        (resolved, cursor.path())
    }

    #[test]
    fn test_resolve_nested_leaf_gets_remainder() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let commands = recording_registry(calls.clone());

        let (resolved, path) = resolve_line(&commands, "get name extra  text");
        assert!(resolved);
        assert_eq!(path, "get name");
        assert_eq!(calls.borrow().as_slice(), ["name:extra  text"]);
    }

    #[test]
    fn test_resolve_invokes_exactly_one_leaf() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let commands = recording_registry(calls.clone());

        let (resolved, _) = resolve_line(&commands, "get param");
        assert!(resolved);
        assert_eq!(calls.borrow().as_slice(), ["param:"]);
    }

    #[test]
    fn test_resolve_fails_on_unknown_first_token() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let commands = recording_registry(calls.clone());

        let (resolved, path) = resolve_line(&commands, "got name");
        assert!(!resolved);
        assert_eq!(path, "got");
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_resolve_fails_mid_tree_with_full_path() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let commands = recording_registry(calls.clone());

        let (resolved, path) = resolve_line(&commands, "get nam");
        assert!(!resolved);
        assert_eq!(path, "get nam");
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_resolve_fails_when_tokens_run_out_inside_subtree() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let commands = recording_registry(calls.clone());

        let (resolved, path) = resolve_line(&commands, "get");
        assert!(!resolved);
        assert_eq!(path, "get");
    }

    #[test]
    fn test_resolve_fails_on_empty_line() {
        let commands = recording_registry(Rc::new(RefCell::new(Vec::new())));
        let (resolved, path) = resolve_line(&commands, "");
        assert!(!resolved);
        assert_eq!(path, "");
    }

    #[test]
    fn test_resolve_propagates_action_error() {
        let mut commands = Registry::new();
        commands.insert(
            "boom".to_string(),
            Command::new(
                "always fails",
                CommandDef::action(|_ctx: &mut Context, _rest: &str| {
                    Err(anyhow::anyhow!("boom failed"))
                }),
            ),
        );

        let mut out: Vec<u8> = Vec::new();
        let mut running = true;
        let mut cursor = Cursor::new("boom");
        let mut ctx = Context {
            out: &mut out,
            commands: &commands,
            running: &mut running,
        };
        let err = resolve(&commands, &mut cursor, &mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "boom failed");
    }
}
