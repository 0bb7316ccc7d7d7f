mod app;
mod command;
mod config;
mod consts;
mod game;
mod menu;
mod options;
mod scoreboard;
mod scores;
mod util;
mod warning;
use crate::app::App;
use crate::config::Config;
use crate::util::Globals;
use crate::warning::Warning;
use anyhow::Context;
use crossterm::event::{DisableFocusChange, EnableFocusChange};
use lexopt::{Arg, Parser};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

static USAGE: &str = concat!(
    "Usage: gridsnake [-c <file>] [--log-file <file>]\n",
    "\n",
    "Play snake in the terminal\n",
    "\n",
    "Options:\n",
    "  -c, --config <file>   Read configuration from the given file\n",
    "      --log-file <file> Write a debug log to the given file\n",
    "  -h, --help            Show this help and exit\n",
    "  -V, --version         Show the program version and exit\n",
);

/// What the command line asks for
#[derive(Clone, Debug, Eq, PartialEq)]
enum Invocation {
    Run {
        config: Option<PathBuf>,
        log_file: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Invocation {
    fn from_parser(mut parser: Parser) -> Result<Invocation, lexopt::Error> {
        let mut config = None;
        let mut log_file = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Short('h') | Arg::Long("help") => return Ok(Invocation::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Invocation::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Invocation::Run { config, log_file })
    }
}

fn main() -> ExitCode {
    let (config, log_file) = match Invocation::from_parser(Parser::from_env()) {
        Ok(Invocation::Run { config, log_file }) => (config, log_file),
        Ok(Invocation::Help) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Version) => {
            println!("gridsnake {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("gridsnake: {e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    if let Some(path) = log_file {
        if let Err(e) = init_logging(&path) {
            eprintln!("gridsnake: {e:#}");
            return ExitCode::FAILURE;
        }
    }
    let (globals, warning) = match setup(config.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = ?e, "Startup failed");
            eprintln!("gridsnake: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let terminal = ratatui::init();
    if let Err(e) = set_focus_reporting(&mut io::stdout(), true) {
        tracing::warn!(error = %e, "Failed to enable focus reporting");
    }
    let r = App::new(globals, warning).run(terminal);
    if let Err(e) = set_focus_reporting(&mut io::stdout(), false) {
        tracing::warn!(error = %e, "Failed to disable focus reporting");
    }
    ratatui::restore();
    io_exit(r)
}

/// Turn the terminal's focus-change events on or off.  Without them the
/// game never sees `FocusLost` and can't pause itself.
fn set_focus_reporting<W: io::Write>(out: &mut W, on: bool) -> io::Result<()> {
    if on {
        crossterm::execute!(out, EnableFocusChange)
    } else {
        crossterm::execute!(out, DisableFocusChange)
    }
}

/// Send log messages to `path`.  The terminal itself is taken up by the
/// interface, so nothing is logged when no log file is given.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = fs_err::File::create(path).context("failed to open log file")?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridsnake=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install logger")?;
    Ok(())
}

/// Load the configuration and the saved options.  Problems with the saved
/// options are not fatal; they are returned as a warning to show on the
/// main menu.
fn setup(config_path: Option<&Path>) -> anyhow::Result<(Globals, Option<Warning>)> {
    let config = match config_path {
        Some(path) => Config::load(path, false)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => match Config::default_path() {
            Ok(path) => Config::load(&path, true).with_context(|| {
                format!("failed to load configuration from {}", path.display())
            })?,
            Err(e) => {
                tracing::warn!(error = %e, "Using default configuration");
                Config::default()
            }
        },
    };
    tracing::debug!(?config, "Loaded configuration");
    let (options, warning) = match config.load_options() {
        Ok(options) => (options, None),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load saved options");
            (config.options, Some(Warning::from(e)))
        }
    };
    let player_name = config
        .player_name
        .clone()
        .unwrap_or_else(|| String::from(consts::DEFAULT_PLAYER_NAME));
    Ok((
        Globals {
            config,
            options,
            player_name,
        },
        warning,
    ))
}

fn io_exit(r: io::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "I/O error");
            eprintln!("{e}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Options, Speed};
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Result<Invocation, lexopt::Error> {
        Invocation::from_parser(Parser::from_args(args))
    }

    #[test]
    fn parse_no_args() {
        assert_eq!(
            parse(&[]).expect("no arguments is valid"),
            Invocation::Run {
                config: None,
                log_file: None,
            }
        );
    }

    #[test]
    fn parse_all_args() {
        assert_eq!(
            parse(&["-c", "snake.toml", "--log-file=debug.log"]).expect("arguments are valid"),
            Invocation::Run {
                config: Some(PathBuf::from("snake.toml")),
                log_file: Some(PathBuf::from("debug.log")),
            }
        );
        assert_eq!(
            parse(&["--config", "snake.toml", "--help"]).expect("arguments are valid"),
            Invocation::Help
        );
        assert_eq!(parse(&["-V"]).expect("arguments are valid"), Invocation::Version);
    }

    #[test]
    fn parse_bad_args() {
        assert!(parse(&["--fast"]).is_err());
        assert!(parse(&["--config"]).is_err());
        assert!(parse(&["extra"]).is_err());
    }

    #[test]
    fn focus_reporting_escapes() {
        let mut out = Vec::new();
        set_focus_reporting(&mut out, true).expect("writing to a Vec should succeed");
        assert_eq!(out, b"\x1B[?1004h");
        out.clear();
        set_focus_reporting(&mut out, false).expect("writing to a Vec should succeed");
        assert_eq!(out, b"\x1B[?1004l");
    }

    #[test]
    fn setup_from_config_file() {
        let tmpdir = tempfile::tempdir().expect("should create tempdir");
        let path = tmpdir.path().join("config.toml");
        fs_err::write(
            &path,
            "player-name = \"Sam\"\n\n[options]\nspeed = \"medium\"\n\n[files]\nsave-options = false\nsave-scores = false\n",
        )
        .expect("should write config");
        let (globals, warning) = setup(Some(&path)).expect("setup should succeed");
        assert_eq!(globals.player_name, "Sam");
        assert_eq!(
            globals.options,
            Options {
                speed: Speed::Medium,
                ..Options::default()
            }
        );
        assert!(warning.is_none());
    }

    #[test]
    fn setup_bad_options_file_warns() {
        let tmpdir = tempfile::tempdir().expect("should create tempdir");
        let options_path = tmpdir.path().join("options.json");
        fs_err::write(&options_path, "{not json").expect("should write options");
        let path = tmpdir.path().join("config.toml");
        fs_err::write(
            &path,
            format!(
                "[files]\noptions-file = {:?}\nsave-scores = false\n",
                options_path.display().to_string()
            ),
        )
        .expect("should write config");
        let (globals, warning) = setup(Some(&path)).expect("setup should succeed");
        assert_eq!(globals.options, Options::default());
        assert_eq!(globals.player_name, consts::DEFAULT_PLAYER_NAME);
        assert!(warning.is_some());
    }

    #[test]
    fn setup_missing_explicit_config() {
        let tmpdir = tempfile::tempdir().expect("should create tempdir");
        let r = setup(Some(&tmpdir.path().join("nope.toml")));
        assert!(r.is_err());
    }
}
