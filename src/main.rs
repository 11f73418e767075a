use anyhow::{Context as _, Result};
use argh::FromArgs;
use cli_commands::Dispatcher;
use cli_commands::command::{CommandDef, Context, NamedCommand};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

#[derive(FromArgs)]
/// Interactive command dispatcher demo.
struct Args {
    #[argh(positional)]
    /// file with one command per line to run instead of the interactive prompt.
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();

    let mut cli = Dispatcher::new();
    cli.add_help();
    cli.add_exit();

    cli.add_command(
        "print",
        "prints the next arguments",
        CommandDef::action(|ctx: &mut Context, rest: &str| {
            writeln!(ctx.out, "PRINTING: {rest}")?;
            Ok(())
        }),
    );

    cli.add_command(
        "get",
        "gets some stuff",
        vec![
            NamedCommand::action("name", "name desc", |ctx: &mut Context, _rest: &str| {
                writeln!(ctx.out, "get name")?;
                Ok(())
            }),
            NamedCommand::action("param", "param desc", |ctx: &mut Context, _rest: &str| {
                writeln!(ctx.out, "get param")?;
                Ok(())
            }),
        ],
    );

    let code = match args.script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("can't open script {}", path.display()))?;
            cli.run(BufReader::new(file), std::io::stdout())?
        }
        None => cli.repl()?,
    };
    std::process::exit(code);
}
