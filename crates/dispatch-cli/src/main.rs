use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dispatch_core::{parse_emergency_report, send_alert, RawReport};
use dispatch_runner::{parse_reports, parse_status_assignment, scenario, Config, Dispatcher, ReleaseMode};

#[derive(Parser)]
#[command(name = "dispatch", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a starter dispatch.toml into a directory
    Init {
        #[arg(long, default_value = ".")]
        dir: String,
        #[arg(long, value_delimiter = ',', default_value = "Joe,Lamar,Josh")]
        responders: Vec<String>,
    },

    /// Dispatch a JSON file of reports against the configured roster
    Run {
        #[arg(long)]
        reports: String,
        /// Defaults to ./dispatch.toml
        #[arg(long)]
        config: Option<String>,
        /// Keep assigned responders busy instead of releasing after each alert
        #[arg(long, default_value_t = false)]
        hold: bool,
        /// Write the batch summary as JSON
        #[arg(long)]
        out: Option<String>,
        /// Starting status override, repeatable: --set Joe=busy
        #[arg(long = "set", value_name = "ID=STATUS")]
        set: Vec<String>,
    },

    /// Validate a single report given as JSON
    Validate {
        #[arg(long)]
        report: String,
    },

    /// Format an alert without dispatching
    Alert {
        #[arg(long)]
        message: String,
        #[arg(long)]
        location: String,
    },

    /// Replay a scenario fixture directory and compare with expected.yaml
    Scenario { dir: String },
}

fn expand(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Init { dir, responders } => {
            let path = Config::config_path(&expand(&dir));
            if path.exists() {
                bail!("{} already exists", path.display());
            }
            Config::default_for_roster(responders).save_to(&path)?;
            println!("Wrote {}", path.display());
        }
        Command::Run { reports, config, hold, out, set } => {
            let cfg_path = match config {
                Some(p) => expand(&p),
                None => Config::config_path(&std::env::current_dir()?),
            };
            let cfg = Config::load_from(&cfg_path).context("load config (run `dispatch init` first)")?;
            tracing::info!(config = %cfg_path.display(), policy = %cfg.selection.policy, "config loaded");
            let reports_path = expand(&reports);
            let json = std::fs::read_to_string(&reports_path)
                .with_context(|| format!("read {}", reports_path.display()))?;
            let raws = parse_reports(&json)?;

            let mode = if hold { ReleaseMode::Hold } else { ReleaseMode::AfterEach };
            let dispatcher = Dispatcher::from_config(&cfg);
            for s in &set {
                let (id, status) = parse_status_assignment(s)?;
                dispatcher.store().set_status(&id, status)?;
            }
            let summary = dispatcher.run_batch(&raws, mode)?;

            for item in &summary.items {
                match (&item.alert, &item.error) {
                    (Some(alert), _) => {
                        let responder = item.responder.as_ref().map(|r| r.as_str()).unwrap_or("-");
                        println!("#{} {} -> {}", item.index, alert, responder);
                    }
                    (None, Some(e)) => println!("#{} FAILED [{:?}] {}", item.index, e.kind, e.message),
                    (None, None) => {}
                }
            }
            println!("Dispatched {}/{} ({} failed)", summary.dispatched, summary.total, summary.failed);
            for (id, status) in summary.final_statuses.iter() {
                println!("- {} [{}]", id, status);
            }
            if let Some(out) = out {
                let out = expand(&out);
                summary.write_to(&out)?;
                println!("Summary written to {}", out.display());
            }
        }
        Command::Validate { report } => {
            let value: serde_json::Value = serde_json::from_str(&report).context("parse report json")?;
            let raw = RawReport::try_from(value)?;
            let parsed = parse_emergency_report(&raw)?;
            println!("{}", serde_json::to_string(&parsed)?);
        }
        Command::Alert { message, location } => {
            println!("{}", send_alert(&message, &location));
        }
        Command::Scenario { dir } => {
            let dir = expand(&dir);
            let res = scenario::simulate(&dir)?;
            let exp = scenario::load_expected(&dir)?;
            let diffs = exp.mismatches(&res);
            if !diffs.is_empty() {
                return Err(anyhow!("scenario {} diverged:\n{}", exp.scenario_id, diffs.join("\n")));
            }
            println!(
                "{}: OK ({} dispatched, {} failed)",
                exp.scenario_id, res.summary.dispatched, res.summary.failed
            );
        }
    }

    Ok(())
}
