use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use schemadump::catalog;
use schemadump::connection::{ConnectionManager, MongoCatalog};
use schemadump::script;

/// Export collection and index definitions from a MongoDB cluster as a
/// mongosh script that recreates them on another cluster.
#[derive(Parser)]
#[command(name = "schemadump", version, about)]
struct Cli {
    /// MongoDB connection string
    #[arg(long, env = "MONGODB_URI")]
    uri: String,

    /// Seconds to wait for the initial connection
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Write the script to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> schemadump::Result<()> {
    let manager = ConnectionManager::new()?;
    let client = manager.connect(&cli.uri, Duration::from_secs(cli.timeout_secs))?;

    let source = MongoCatalog::new(&manager, &client);
    let collections = catalog::export(&source)?;
    let text = script::render(&collections)?;

    // Nothing is written until the whole script rendered successfully.
    match &cli.output {
        Some(path) => {
            std::fs::write(path, format!("{text}\n"))?;
            log::info!("wrote {} collections to {}", collections.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}")?;
        }
    }
    Ok(())
}
