use crate::dm::{build_info, config, dm_event};
use crate::dm::controller::{Controller, RunOutcome};
use crate::dm::shutdown::StopOutcome;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "dmctl",
    version,
    about = "daemonmaster singleton daemon supervisor",
    arg_required_else_help = true
)]
pub struct Args {
    /// Path to controller config YAML
    #[arg(short = 'c', long = "config", default_value = "daemonmaster.yaml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Debug, Subcommand)]
pub enum Cmd {
    /// Start the daemon unless it is already running
    Start,
    /// Stop the daemon, escalating from SIGTERM to SIGKILL
    Stop,
    /// Stop the daemon (if running), then start it
    Restart,
}

pub async fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    dm_event("dmctl", build_info::banner());
    let cfg = config::load_control_config(&args.config)?;
    let ctl = Controller::from_config(&cfg);

    match args.cmd {
        Cmd::Start => report_run(ctl.ensure_running().await?),
        Cmd::Stop => report_stop(ctl.ensure_stopped().await?),
        Cmd::Restart => report_run(ctl.restart().await?),
    }
    Ok(())
}

fn report_run(outcome: RunOutcome) {
    match outcome {
        RunOutcome::AlreadyRunning(pid) => println!("daemon already running (pid {pid})"),
        RunOutcome::Started(pid) => println!("daemon started (pid {pid})"),
    }
}

fn report_stop(outcome: StopOutcome) {
    match outcome {
        StopOutcome::AlreadyStopped => println!("daemon not running"),
        StopOutcome::Stopped => println!("daemon stopped"),
    }
}
