mod alerts;
mod collectors;
mod config;
mod error;
mod filter;
mod metrics;
mod models;
mod report;
mod util;

use anyhow::Result;
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use collectors::lvm::{LvmCommand, LvmSource};
use config::{Config, SnapAgeSettings, UsageSettings};
use filter::Selection;
use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use util::output::{self, Outcome, Status};

#[derive(Parser, Debug)]
#[command(name = "lvmcheck", about = "LVM snapshot age check and usage metrics", version)]
struct Cli {
    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Read defaults from this TOML file instead of the per-user config
    #[arg(long, value_name = "PATH", global = true)]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Check snapshot ages: exit 0=OK, 1=WARNING, 2=CRITICAL, 3=UNKNOWN
    SnapAge(SnapAgeArgs),
    /// Print VG and LV usage as Graphite plaintext metrics
    Usage(UsageArgs),
    /// Print the raw VG/LV records as JSON and exit
    Inventory(LvmArgs),
    /// Print config file path and resolved values, then exit
    Config,
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug, Default)]
struct LvmArgs {
    /// Run this lvm command, e.g. "/bin/sudo /sbin/lvm"
    #[arg(short = 'm', long = "command", value_name = "COMMAND")]
    lvm_command: Option<String>,
}

impl LvmArgs {
    fn resolve(&self, cfg: &Config) -> LvmCommand {
        LvmCommand::new(self.lvm_command.as_deref().or(cfg.lvm.command.as_deref()))
    }
}

#[derive(Args, Debug)]
struct SnapAgeArgs {
    /// Logical volume names to check (comma separated)
    #[arg(short = 'l', long = "lv", value_name = "LV", value_delimiter = ',')]
    lv: Option<Vec<String>>,

    /// Full logical volume names to check, e.g. docker/thinpool (comma separated)
    #[arg(short = 'f', long = "full-name", value_name = "VG/LV", value_delimiter = ',')]
    full_name: Option<Vec<String>>,

    /// Warn if a snapshot is older than SECONDS [default: 86400]
    #[arg(short = 'w', long = "age-warn", value_name = "SECONDS")]
    age_warn: Option<u64>,

    /// Critical if a snapshot is older than SECONDS [default: 604800]
    #[arg(short = 'c', long = "age-critical", value_name = "SECONDS")]
    age_crit: Option<u64>,

    #[command(flatten)]
    lvm: LvmArgs,
}

impl SnapAgeArgs {
    fn settings(&self, cfg: &Config) -> SnapAgeSettings {
        let mut thresholds = cfg.thresholds();
        if let Some(w) = self.age_warn { thresholds.warn_secs = w; }
        if let Some(c) = self.age_crit { thresholds.crit_secs = c; }
        thresholds.warn_if_inverted();
        SnapAgeSettings {
            selection: Selection {
                lv:        self.lv.clone(),
                full_name: self.full_name.clone(),
                ..Default::default()
            },
            thresholds,
        }
    }
}

#[derive(Args, Debug)]
struct UsageArgs {
    /// Metric naming scheme, prepended to .$parent.$child [default: <hostname>.vg_usage]
    #[arg(long, value_name = "SCHEME")]
    scheme: Option<String>,

    /// Logical volume names to report (comma separated)
    #[arg(short = 'l', long = "lv", value_name = "LV", value_delimiter = ',')]
    lv: Option<Vec<String>>,

    /// Full logical volume names to report, e.g. docker/thinpool (comma separated)
    #[arg(short = 'f', long = "full-name", value_name = "VG/LV", value_delimiter = ',')]
    full_name: Option<Vec<String>>,

    /// Only report these volume groups (comma separated)
    #[arg(long = "include-vg", value_name = "VG", value_delimiter = ',')]
    include_vg: Option<Vec<String>>,

    /// Skip these volume groups (comma separated)
    #[arg(long = "ignore-vg", value_name = "VG", value_delimiter = ',')]
    ignore_vg: Option<Vec<String>>,

    /// Skip volume groups whose name matches this regex
    #[arg(long = "ignore-vg-regex", value_name = "REGEX")]
    ignore_vg_regex: Option<String>,

    #[command(flatten)]
    lvm: LvmArgs,
}

impl UsageArgs {
    fn settings(&self, cfg: &Config) -> UsageSettings {
        UsageSettings {
            scheme: self.scheme.clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| cfg.scheme()),
            vg_selection: Selection {
                include:       self.include_vg.clone(),
                exclude:       self.ignore_vg.clone(),
                exclude_regex: self.ignore_vg_regex.clone(),
                ..Default::default()
            },
            lv_selection: Selection {
                lv:        self.lv.clone(),
                full_name: self.full_name.clone(),
                ..Default::default()
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match &cli.command {
        Cmd::SnapAge(args) => {
            let cfg = load_config_or_unknown(report::SNAP_AGE_CHECK, &cli);
            let lvm = args.lvm.resolve(&cfg);
            let outcome = report::run_snap_age(&lvm, &args.settings(&cfg), chrono::Utc::now());
            emit(report::SNAP_AGE_CHECK, &outcome)
        }
        Cmd::Usage(args) => {
            let cfg = load_config_or_unknown(report::USAGE_CHECK, &cli);
            let lvm = args.lvm.resolve(&cfg);
            let outcome = report::run_usage(&lvm, &args.settings(&cfg));
            emit(report::USAGE_CHECK, &outcome)
        }
        Cmd::Inventory(args) => {
            let cfg = Config::load(cli.config_file.as_deref())?;
            run_inventory(&args.resolve(&cfg))
        }
        Cmd::Config => run_print_config(&cli),
        Cmd::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "lvmcheck", &mut io::stdout());
            Ok(())
        }
    }
}

/// Print the outcome and exit with its plugin status code.
fn emit(check_name: &str, outcome: &Outcome) -> ! {
    let ts = chrono::Utc::now().timestamp();
    print!("{}", output::render(check_name, outcome, ts));
    std::process::exit(outcome.status().exit_code());
}

/// A broken config file still has to produce a plugin status line.
fn load_config_or_unknown(check_name: &str, cli: &Cli) -> Config {
    match Config::load(cli.config_file.as_deref()) {
        Ok(cfg) => cfg,
        Err(e)  => {
            tracing::error!(error = %format!("{:#}", e), "config load failed");
            emit(check_name, &Outcome::check(Status::Unknown, format!("{:#}", e)))
        }
    }
}

fn run_inventory(lvm: &LvmCommand) -> Result<()> {
    use serde_json::json;

    let vgs = lvm.volume_groups()?;
    let lvs = lvm.logical_volumes()?;
    let snapshot = json!({
        "timestamp":       chrono::Local::now().to_rfc3339(),
        "command":         lvm.program(),
        "volume_groups":   vgs,
        "logical_volumes": lvs,
    });
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn run_print_config(cli: &Cli) -> Result<()> {
    use util::human::fmt_secs;

    let cfg = Config::load(cli.config_file.as_deref())?;
    let path = cli.config_file.clone()
        .or_else(Config::config_path)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    let t = cfg.thresholds();
    println!("Config: {}", path);
    println!();
    println!("[lvm]");
    println!("  command       = {}", cfg.lvm.command.as_deref().unwrap_or("lvm (default)"));
    println!();
    println!("[snapshots]");
    println!("  age_warn_secs = {} ({})", t.warn_secs, fmt_secs(t.warn_secs));
    println!("  age_crit_secs = {} ({})", t.crit_secs, fmt_secs(t.crit_secs));
    println!();
    println!("[metrics]");
    println!("  scheme        = {}", cfg.scheme());
    Ok(())
}

/// Logs go to stderr; stdout belongs to the plugin output.
/// Default level is WARN. RUST_LOG, when set, takes precedence.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
