mod report;
mod scenario;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use report::RunReport;
use scenario::{ScenarioCtx, get_scenario, list_scenarios};

#[derive(Debug, Parser)]
#[command(name = "yardline-tester", version)]
#[command(about = "Automated QA harness for the Yardline depot simulation")]
struct Args {
    /// Scenarios to run (comma-separated)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seed for synthetic fleets
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Simulated minutes for long-running scenarios
    #[arg(long, default_value_t = 2)]
    sim_minutes: u64,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list_scenarios {
        for (name, about) in list_scenarios() {
            println!("{}  {about}", name.bold());
        }
        return Ok(());
    }

    let names = split_csv(&args.scenarios);
    if names.is_empty() {
        bail!("no scenarios selected");
    }

    let ctx = ScenarioCtx {
        seed: args.seed,
        sim_minutes: args.sim_minutes,
        verbose: args.verbose,
    };
    let mut outcomes = Vec::with_capacity(names.len());
    for name in &names {
        let run = get_scenario(name)
            .with_context(|| format!("unknown scenario '{name}' (try --list-scenarios)"))?;
        log::info!("running scenario {name}");
        outcomes.push(run(&ctx));
    }

    let run_report = RunReport::new(args.seed, args.sim_minutes, outcomes);
    let rendered = match args.report.as_str() {
        "json" => run_report.render_json().context("rendering JSON report")?,
        _ => run_report.render_console(),
    };
    match &args.output {
        Some(path) => fs::write(path, &rendered)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => print!("{rendered}"),
    }

    if !run_report.all_passed() {
        bail!("one or more scenarios failed");
    }
    Ok(())
}
