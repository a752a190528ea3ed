use crate::command::{Status, Streams};
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::env;
use std::io::Write;

/// Commands implemented inside the shell process.
///
/// Arguments are parsed from the tokens after the command name, with [`argh`]
/// (`FromArgs`) where a builtin takes any.
pub(crate) trait BuiltinCommand: Sized {
    /// Name the user types, e.g. "cd".
    const NAME: &'static str;

    /// Build the command from the tokens following its name.
    fn parse(args: &[&str]) -> Result<Self, EarlyExit>;

    fn execute(self, streams: &mut Streams<'_>) -> Result<Status>;
}

/// Parse and run `T`, reporting any failure on the error stream.
///
/// `argv[0]` is the builtin's own name.
fn run<T: BuiltinCommand>(argv: &[&str], streams: &mut Streams<'_>) -> Status {
    let args = argv.get(1..).unwrap_or_default();
    let cmd = match T::parse(args) {
        Ok(cmd) => cmd,
        Err(EarlyExit { output, status }) => {
            let _ = if status.is_err() {
                write!(streams.err, "sh: {}: {output}", T::NAME)
            } else {
                streams.out.write_all(output.as_bytes())
            };
            return Status::Continue;
        }
    };

    match cmd.execute(streams) {
        Ok(status) => status,
        Err(e) => {
            let _ = writeln!(streams.err, "sh: {e:#}");
            Status::Continue
        }
    }
}

/// Parse every token as a positional word.
///
/// The leading `--` ends option parsing, so `-x` or `--help` reach the command as
/// plain words instead of being rejected as unknown flags.
fn positional<T: FromArgs>(name: &str, args: &[&str]) -> Result<T, EarlyExit> {
    let mut words = Vec::with_capacity(args.len() + 1);
    words.push("--");
    words.extend_from_slice(args);
    T::from_args(&[name], &words)
}

/// Entry in the builtin table.
pub struct Builtin {
    pub name: &'static str,
    pub run: fn(&[&str], &mut Streams<'_>) -> Status,
}

/// Every builtin, in the order `help` lists them. Names are unique.
pub static BUILTINS: [Builtin; 3] = [
    Builtin {
        name: Cd::NAME,
        run: run::<Cd>,
    },
    Builtin {
        name: Help::NAME,
        run: run::<Help>,
    },
    Builtin {
        name: Exit::NAME,
        run: run::<Exit>,
    },
];

/// Look up a builtin by name. The first match in table order wins.
pub fn find(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to, absolute or relative; further words are ignored.
    pub words: Vec<String>,
}

impl BuiltinCommand for Cd {
    const NAME: &'static str = "cd";

    fn parse(args: &[&str]) -> Result<Self, EarlyExit> {
        positional(Self::NAME, args)
    }

    fn execute(self, streams: &mut Streams<'_>) -> Result<Status> {
        match self.words.first() {
            None => writeln!(streams.err, "sh: expected argument to \"cd\"")?,
            Some(target) => env::set_current_dir(&target)
                .with_context(|| format!("cd: {target}"))?,
        }
        Ok(Status::Continue)
    }
}

#[derive(FromArgs)]
/// List the commands built into the shell.
pub struct Help {
    #[argh(positional)]
    /// ignored.
    pub _topics: Vec<String>,
}

impl BuiltinCommand for Help {
    const NAME: &'static str = "help";

    fn parse(args: &[&str]) -> Result<Self, EarlyExit> {
        positional(Self::NAME, args)
    }

    fn execute(self, streams: &mut Streams<'_>) -> Result<Status> {
        let out = &mut *streams.out;
        writeln!(out, "minish")?;
        writeln!(out, "Type a program name and its arguments, then press enter.")?;
        writeln!(out, "The following commands are built in:")?;
        for builtin in &BUILTINS {
            writeln!(out, "  {}", builtin.name)?;
        }
        writeln!(out, "Use the man command for information on other programs.")?;
        Ok(Status::Continue)
    }
}

/// Leave the shell. Trailing arguments are accepted and ignored.
pub struct Exit;

impl BuiltinCommand for Exit {
    const NAME: &'static str = "exit";

    fn parse(_args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Exit)
    }

    fn execute(self, _streams: &mut Streams<'_>) -> Result<Status> {
        Ok(Status::Stop)
    }
}
