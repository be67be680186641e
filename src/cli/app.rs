//! Main CLI application

use crate::config::parse_config_file;
use crate::generator::{Script, Shell};
use crate::ui::{Reporter, Verbosity};
use anyhow::{bail, Context as _};
use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Name the tool reports itself under
pub const BIN_NAME: &str = "compspec";

/// Parsed command-line options
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Completion spec document
    pub source: Option<PathBuf>,
    /// Destination file; stdout when absent
    pub output: Option<PathBuf>,
    /// Requested target shell, resolved after parsing
    pub shell: String,
    pub verbosity: Verbosity,
    /// Print completions for compspec itself instead of compiling
    pub print_completions: Option<clap_complete::Shell>,
}

impl Options {
    fn from_matches(matches: &ArgMatches) -> Self {
        Options {
            source: matches.get_one::<PathBuf>("source").cloned(),
            output: matches.get_one::<PathBuf>("output").cloned(),
            shell: matches
                .get_one::<String>("shell")
                .cloned()
                .unwrap_or_else(|| Shell::Bash.name().to_string()),
            verbosity: get_verbosity(matches),
            print_completions: matches
                .get_one::<clap_complete::Shell>("print-completions")
                .copied(),
        }
    }
}

/// Build the clap command
pub fn build_command() -> Command {
    Command::new(BIN_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile a declarative CLI description into a shell completion function")
        .arg(
            Arg::new("source")
                .value_name("SOURCE")
                .help("Completion spec document (YAML or JSON)")
                .value_parser(value_parser!(PathBuf))
                .required_unless_present("print-completions"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PATH")
                .help("Write the script to PATH instead of stdout")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("shell")
                .short('s')
                .long("shell")
                .value_name("SHELL")
                .help("Target shell")
                .default_value(Shell::Bash.name()),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress warnings")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print debug diagnostics")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("print-completions")
                .long("print-completions")
                .value_name("SHELL")
                .help("Print completions for compspec itself and exit")
                .value_parser(value_parser!(clap_complete::Shell)),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Parse `args`, treating help and version requests as success
///
/// `Ok(None)` means the request was already answered.
pub fn parse_options<I, T>(args: I) -> anyhow::Result<Option<Options>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match build_command().try_get_matches_from(args) {
        Ok(matches) => Ok(Some(Options::from_matches(&matches))),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Run the CLI application with the given arguments
pub fn run<I, T>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let options = match parse_options(args)? {
        Some(options) => options,
        None => return Ok(()),
    };
    let reporter = Reporter::new(options.verbosity);

    if let Some(shell) = options.print_completions {
        let mut command = build_command();
        clap_complete::generate(shell, &mut command, BIN_NAME, &mut io::stdout());
        return Ok(());
    }

    // The shell is checked first so an unsupported one is refused before validation
    let shell: Shell = options.shell.parse()?;

    let Some(source) = options.source.as_deref() else {
        bail!("no source file given");
    };

    reporter.debug(&format!("reading {}", source.display()));
    let config = parse_config_file(source)?;
    reporter.debug(&format!(
        "command '{}': {} option(s), {} argument(s)",
        config.name,
        config.opts.len(),
        config.args.len()
    ));

    let script = shell.generate(&config);
    for warning in &script.warnings {
        reporter.warn(warning);
    }

    write_script(&script, options.output.as_deref())?;
    if let Some(path) = &options.output {
        reporter.info(&format!(
            "wrote {} completion for '{}' to {}",
            shell,
            config.name,
            path.display()
        ));
    }

    Ok(())
}

/// Write the finished script to `output`, or stdout
fn write_script(script: &Script, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(path, &script.text)
            .with_context(|| format!("cannot write '{}'", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(script.text.as_bytes())
                .and_then(|_| stdout.flush())
                .context("cannot write to stdout")
        }
    }
}
