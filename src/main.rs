use anyhow::Result;
use clap::Parser;
use megamon::alerts::{self, Severity};
use megamon::collectors::{MegaCli, MegaRaid};
use megamon::config::Config;
use megamon::util::report;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "megamon", about = "MegaRAID controller health checker", version)]
struct Cli {
    /// Path to the MegaCli binary (overrides the config file)
    #[arg(short, long)]
    megacli: Option<String>,

    /// Only inspect this adapter
    #[arg(short = 'a', long)]
    controller: Option<usize>,

    /// Print a one-shot JSON snapshot of all controllers and exit
    #[arg(long)]
    json: bool,

    /// Print a human-readable health report and exit (default)
    #[arg(long)]
    report: bool,

    /// One-shot health check: exit 0=OK, 1=WARNING, 2=CRITICAL (nagios/cron compatible)
    #[arg(long)]
    check: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    config: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = Config::load();
    if cli.config {
        return run_print_config(&cfg);
    }

    let program = cli.megacli.clone().unwrap_or_else(|| cfg.general.megacli_path.clone());
    let raid = MegaRaid::new(MegaCli::new(program));

    if cli.report {
        return run_report(&raid, &cfg, cli.controller);
    }
    if cli.json {
        return run_json_snapshot(&raid, &cfg, cli.controller);
    }
    if cli.check {
        return run_check(&raid, &cfg, cli.controller);
    }
    run_report(&raid, &cfg, cli.controller)
}

fn run_json_snapshot(raid: &MegaRaid<MegaCli>, cfg: &Config, only: Option<usize>) -> Result<()> {
    let snapshots = report::collect_snapshot(raid, cfg, only)?;
    let active = alerts::evaluate(&snapshots, &cfg.alerts);
    println!("{}", serde_json::to_string_pretty(&report::to_json(&snapshots, &active))?);
    Ok(())
}

fn run_report(raid: &MegaRaid<MegaCli>, cfg: &Config, only: Option<usize>) -> Result<()> {
    let snapshots = report::collect_snapshot(raid, cfg, only)?;
    let active = alerts::evaluate(&snapshots, &cfg.alerts);
    print!("{}", report::generate(&snapshots, &active));
    Ok(())
}

fn run_check(raid: &MegaRaid<MegaCli>, cfg: &Config, only: Option<usize>) -> Result<()> {
    let snapshots = match report::collect_snapshot(raid, cfg, only) {
        Ok(s)  => s,
        Err(e) => {
            // Not being able to read the controller is itself critical.
            println!("CRITICAL: {:#}", e);
            std::process::exit(2);
        }
    };
    let active = alerts::evaluate(&snapshots, &cfg.alerts);
    let has_crit = active.iter().any(|a| a.severity == Severity::Critical);

    if active.is_empty() {
        let disks: usize = snapshots.iter().map(|s| s.disks.len()).sum();
        let lds:   usize = snapshots.iter().map(|s| s.logical_devices.len()).sum();
        println!("OK: {} adapter(s), {} virtual drive(s), {} physical drive(s), no alerts",
            snapshots.len(), lds, disks);
        std::process::exit(0);
    }

    for a in &active {
        println!("[{}] {}{}", a.severity.label(), a.prefix(), a.message);
    }
    std::process::exit(if has_crit { 2 } else { 1 });
}

fn run_print_config(cfg: &Config) -> Result<()> {
    let path = Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    let t = &cfg.thresholds;
    println!("Config: {}", path);
    println!();
    println!("[general]");
    println!("  megacli_path             = {}", cfg.general.megacli_path);
    println!();
    println!("[thresholds]");
    println!("  media_error_count        = {}", t.media_error_count);
    println!("  predictive_failure_count = {}", t.predictive_failure_count);
    match t.other_error_count {
        Some(n) => println!("  other_error_count        = {}", n),
        None    => println!("  other_error_count        = (not monitored)"),
    }
    println!();
    println!("[alerts]");
    println!("  bbu_critical             = {}", cfg.alerts.bbu_critical);
    Ok(())
}
