use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use opolis::scenario::ScenarioLoader;
use opolis::snapshot::SnapshotWriter;

#[derive(Debug, Parser)]
#[command(author, version, about = "opolis scenario runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/small_town.yaml")]
    scenario: PathBuf,

    /// Override step count (uses the scenario default when omitted)
    #[arg(long)]
    steps: Option<u64>,

    /// Override snapshot interval in steps (0 disables snapshots)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long, default_value = "snapshots")]
    snapshot_dir: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let mut city = scenario.build_city()?;
    let steps = scenario.steps(cli.steps);
    let interval = cli
        .snapshot_interval
        .unwrap_or(scenario.snapshot_interval_steps);
    let writer = SnapshotWriter::new(cli.snapshot_dir, interval);

    for _ in 0..steps {
        city.step()?;
        let _ = writer.maybe_write(&city, &scenario.name)?;
    }

    println!(
        "Scenario '{}' completed at {}. Population: {}, zones: {}",
        scenario.name,
        city.time(),
        city.population(),
        city.zones().len()
    );
    Ok(())
}
