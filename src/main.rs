//! CLI entry point for `netiquette`.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};

use netiquette::config::{self, Config};
use netiquette::driver::{Driver, Summary};
use netiquette::report::{Format, OutputMode, Reporter};

#[derive(Parser)]
#[command(
    name = "netiquette",
    version,
    about = "Check news-style posts against the netiquette"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Files to check; standard input is read when none is given
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Only print the violations found. Use for scripts
    #[arg(short, long, global = true, conflicts_with_all = ["list_success", "list_fail"])]
    quiet: bool,

    /// Only print the authors of compliant messages
    #[arg(long, global = true, conflicts_with = "list_fail")]
    list_success: bool,

    /// Only print the authors of non-compliant messages
    #[arg(long, global = true)]
    list_fail: bool,

    /// Verbose logging (-v warn, -vv info, -vvv debug, -vvvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Keep checking files after a non-compliant one
    #[arg(long)]
    process_all_files: bool,

    /// Skip unreadable or missing files instead of aborting
    #[arg(long)]
    ignore_missing_file: bool,

    /// Stricter subject checks (reject a single tag)
    #[arg(long, global = true)]
    extra_information: bool,

    /// Require the first quote section to be attributed
    #[arg(long, global = true)]
    require_attribution: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Configuration file
    #[arg(long, value_name = "PATH", env = "NETIQUETTE_CONFIG", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every code block of a chat message (rich-text JSON or ``` fences)
    Blocks {
        /// Message file; standard input when omitted
        path: Option<PathBuf>,
    },
    /// Write the effective configuration to a file
    InitConfig {
        /// Destination; the standard config location when omitted
        path: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.list_success {
            OutputMode::ListSuccess
        } else if self.list_fail {
            OutputMode::ListFail
        } else {
            OutputMode::Normal
        }
    }

    fn format(&self) -> Format {
        if self.json {
            Format::Json
        } else {
            Format::Text
        }
    }

    /// Fold command-line switches into the loaded configuration.
    fn apply_to(&self, config: &mut Config) {
        config.rules.strict_subject |= self.extra_information;
        config.rules.require_attribution |= self.require_attribution;
        config.run.process_all_files |= self.process_all_files;
        config.run.ignore_missing_file |= self.ignore_missing_file;
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_deref());
    cli.apply_to(&mut config);

    let level = log_level(cli.output_mode(), cli.verbose, &config.general.log_level);
    setup_logging(level, &config);

    match &cli.command {
        Some(Commands::Blocks { path }) => cmd_blocks(&cli, &config, path.as_deref()),
        Some(Commands::InitConfig { path }) => cmd_init_config(&config, path.as_deref()),
        Some(Commands::Completions { shell }) => cmd_completions(*shell),
        Some(Commands::Manpage) => cmd_manpage(),
        None => cmd_check(&cli, &config),
    }
}

/// Pick the log level. Quiet and list modes start from `off`, so each
/// `-v` there reveals one level less than in normal mode.
fn log_level<'a>(mode: OutputMode, verbose: u8, configured: &'a str) -> &'a str {
    let verbose = if mode.is_silent() {
        if verbose == 0 {
            return "off";
        }
        verbose - 1
    } else {
        verbose
    };
    match verbose {
        0 if mode.is_silent() => "error",
        0 => configured,
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = config.general.log_file.as_ref().and_then(|path| {
        let name = path.file_name()?;
        let dir = match path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).ok()?;
        let appender = tracing_appender::rolling::never(dir, name);
        Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(appender),
        )
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
}

fn reporter(cli: &Cli) -> Reporter<std::io::Stdout> {
    Reporter::new(std::io::stdout(), cli.output_mode(), cli.format(), cli.verbose)
}

fn exit_code(summary: &Summary) -> ExitCode {
    if summary.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Check the given files, or standard input.
fn cmd_check(cli: &Cli, config: &Config) -> anyhow::Result<ExitCode> {
    let mut driver = Driver::new(&config.rules, &config.run, reporter(cli));

    let summary = if cli.files.is_empty() {
        driver.run_stdin(std::io::stdin().lock())?
    } else {
        driver.run_files(&cli.files)?
    };

    tracing::debug!(?summary, "Run finished");
    Ok(exit_code(&summary))
}

/// Check the code blocks of a chat message.
fn cmd_blocks(cli: &Cli, config: &Config, path: Option<&Path>) -> anyhow::Result<ExitCode> {
    let (input, source) = match path {
        Some(p) => (
            netiquette::driver::read_text(p)?,
            p.display().to_string(),
        ),
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            (input, "stdin".to_string())
        }
    };

    let mut driver = Driver::new(
        &config.rules,
        &config.run,
        reporter(cli).announce_compliant(true),
    );
    let summary = driver.run_blocks(&input, &source)?;
    Ok(exit_code(&summary))
}

/// Write the configuration, flags included, as TOML.
fn cmd_init_config(config: &Config, path: Option<&Path>) -> anyhow::Result<ExitCode> {
    let written = config::save_config(config, path)?;
    println!("  Configuration written to {}", written.display());
    Ok(ExitCode::SUCCESS)
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<ExitCode> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "netiquette", &mut std::io::stdout());
    Ok(ExitCode::SUCCESS)
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<ExitCode> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(ExitCode::SUCCESS)
}
