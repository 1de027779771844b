use clap::{Arg, Command, arg, value_parser};

pub const CLUSTER_CMD: &str = "cluster";

pub fn create_cluster_cli() -> Command {
    Command::new(CLUSTER_CMD)
        .about("Cluster submitted variants into RS identities, creating and merging RS as needed.")
        .arg(
            arg!(--store <STORE>)
                .required(true)
                .help("Path to the JSON store snapshot (a missing file starts an empty store)"),
        )
        .arg(
            arg!(--input <INPUT>)
                .required(false)
                .help("JSON lines file of submitted variants to add to the store and cluster"),
        )
        .arg(
            arg!(--assembly <ASSEMBLY>)
                .required(false)
                .help("Only cluster submitted variants of this assembly (required without --input)"),
        )
        .arg(
            arg!(--config <CONFIG>)
                .required(false)
                .help("Path to a TOML clustering config"),
        )
        .arg(
            Arg::new("chunk-size")
                .long("chunk-size")
                .required(false)
                .value_parser(value_parser!(usize))
                .help("Number of submitted variants per batch (overrides the config)"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Where to write the updated store snapshot (default: --store)"),
        )
}
