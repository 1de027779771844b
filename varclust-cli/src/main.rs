mod cluster;

use anyhow::Result;
use clap::Command;
use tracing_subscriber::EnvFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "varclust";
    pub const BIN_NAME: &str = "varclust";
    pub const DEFAULT_LOG_FILTER: &str = "info";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Clusters submitted genomic variants into reference SNP (RS) identities, keeping a full audit trail of every change.")
        .subcommand_required(true)
        .subcommand(cluster::cli::create_cluster_cli())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(consts::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // CLUSTERING
        //
        Some((cluster::cli::CLUSTER_CMD, matches)) => {
            cluster::handlers::run_cluster(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
