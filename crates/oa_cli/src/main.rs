use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use oa_client::SyncManager;
use oa_core::ServiceConfig;
use tracing::info;

/// sysexits.h convention for command-line usage errors.
const EX_USAGE: i32 = 64;

#[derive(Parser, Debug)]
#[command(
    name = "oa",
    version,
    about = "Archives every article linked from the community feed"
)]
struct Cli {
    /// Client secret of the registered application
    client_secret: String,
    /// Directory the article files are written to
    outdir: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(EX_USAGE);
        }
    };

    let manager = match SyncManager::new(ServiceConfig::default(), cli.client_secret, cli.outdir) {
        Ok(manager) => manager,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    info!("📰 Archiving articles to {}", manager.store().root().display());
    match manager.run().await {
        Ok(report) => {
            eprintln!("Retrieved {} articles in total.", report.items_seen);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
