use anyhow::Result;
use std::collections::BTreeMap;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// One level of the command tree: a name-ordered mapping from command name to
/// [`Command`]. The root registry lives on the dispatcher; nested registries
/// live inside [`CommandBody::Subtree`] nodes.
pub type Registry = BTreeMap<String, Command>;

/// Per-invocation view of dispatcher state handed to every action.
///
/// This is how the built-ins stay ordinary registered commands: `help` reads
/// `commands` to print the tree it is itself part of, and `exit` clears
/// `running` via [`Context::stop`]. Actions may write freely to `out`; the
/// dispatcher prints its own trailing blank line after each dispatch.
///
/// Note: fields are public for simplicity to keep the crate small.
pub struct Context<'a> {
    /// The output stream for the current dispatch, borrowed from the run loop.
    pub out: &'a mut dyn Write,
    /// Shared view of the dispatcher's root registry.
    pub commands: &'a Registry,
    /// The dispatcher's running flag; cleared to end the loop cooperatively.
    pub running: &'a mut bool,
}

impl Context<'_> {
    /// Request cooperative termination of the run loop.
    ///
    /// The loop observes the flag at the top of the next iteration, so the
    /// remainder of the current iteration still completes.
    pub fn stop(&mut self) {
        *self.running = false;
    }
}

/// Object-safe trait for a leaf command's executable behavior.
///
/// A blanket impl exists for any matching `Fn` closure, so most callers never
/// implement this by hand; implementing it on a struct is useful when an
/// action carries configuration of its own.
pub trait CommandAction {
    /// Executes the action with the unconsumed remainder of the input line.
    fn invoke(&self, ctx: &mut Context<'_>, rest: &str) -> Result<()>;
}

impl<F> CommandAction for F
where
    F: Fn(&mut Context<'_>, &str) -> Result<()>,
{
    fn invoke(&self, ctx: &mut Context<'_>, rest: &str) -> Result<()> {
        self(ctx, rest)
    }
}

/// A boxed leaf callback as stored in the command tree.
pub type Action = Box<dyn CommandAction>;

/// A node of the command tree: either an executable leaf or a subtree that
/// dispatches on the next token. Never both, never neither.
pub enum CommandBody {
    /// Terminal node; invoked with the remainder of the input line.
    Action(Action),
    /// Inner node; resolution continues with the next token in its registry.
    Subtree(Registry),
}

/// A registered command: a description shown by the help printer plus the
/// [`CommandBody`] that resolution pattern-matches on.
pub struct Command {
    pub description: String,
    pub body: CommandBody,
}

impl Command {
    /// Build a command from a description and a registration-form definition.
    ///
    /// The [`CommandDef`] is converted eagerly (and recursively, for groups)
    /// into the canonical [`CommandBody`] shape; the resolver never sees the
    /// registration form.
    pub fn new(description: impl Into<String>, def: impl Into<CommandDef>) -> Self {
        Self {
            description: description.into(),
            body: CommandBody::from(def.into()),
        }
    }
}

/// Registration-form command definition, friendlier to construct than the
/// canonical [`CommandBody`]: groups are plain `Vec`s of [`NamedCommand`]
/// entries instead of maps.
pub enum CommandDef {
    Action(Action),
    Group(Vec<NamedCommand>),
}

impl CommandDef {
    /// A leaf definition from a closure.
    pub fn action<F>(f: F) -> Self
    where
        F: Fn(&mut Context<'_>, &str) -> Result<()> + 'static,
    {
        CommandDef::Action(Box::new(f))
    }

    /// A subtree definition from nested registration-form entries.
    pub fn group(commands: Vec<NamedCommand>) -> Self {
        CommandDef::Group(commands)
    }
}

impl From<Vec<NamedCommand>> for CommandDef {
    fn from(commands: Vec<NamedCommand>) -> Self {
        CommandDef::Group(commands)
    }
}

impl From<Action> for CommandDef {
    fn from(action: Action) -> Self {
        CommandDef::Action(action)
    }
}

impl From<CommandDef> for CommandBody {
    /// The one conversion from registration form to canonical form. Pure and
    /// total: the variant is decided structurally, there is no error path.
    /// Duplicate names within a group follow map-insert semantics, so the
    /// last entry wins.
    fn from(def: CommandDef) -> Self {
        match def {
            CommandDef::Action(action) => CommandBody::Action(action),
            CommandDef::Group(commands) => {
                let mut registry = Registry::new();
                for named in commands {
                    registry.insert(named.name, Command::new(named.description, named.def));
                }
                CommandBody::Subtree(registry)
            }
        }
    }
}

/// A registration-form entry carrying its own name, used inside
/// [`CommandDef::Group`] lists. The name comes first in the constructors for
/// easier reading of nested literals.
pub struct NamedCommand {
    pub name: String,
    pub description: String,
    pub def: CommandDef,
}

impl NamedCommand {
    /// A named leaf entry.
    pub fn action<F>(name: impl Into<String>, description: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Context<'_>, &str) -> Result<()> + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            def: CommandDef::action(f),
        }
    }

    /// A named subtree entry.
    pub fn group(
        name: impl Into<String>,
        description: impl Into<String>,
        commands: Vec<NamedCommand>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            def: CommandDef::Group(commands),
        }
    }
}
