use std::process::exit;

use bitcoin_cookbook::cli::Args;
use bitcoin_cookbook::utils::{initialize_logger, verbosity_level};
use bitcoin_cookbook::CookbookConfig;
use clap::Parser;

fn main() {
    let args = Args::parse();

    if let Err(e) = initialize_logger(verbosity_level(args.verbose)) {
        eprintln!("{e}");
        exit(1);
    }

    let result = CookbookConfig::load(&args.config).and_then(|config| {
        tracing::debug!(?config, "loaded configuration");
        args.command.task().run(&config)
    });

    if let Err(e) = result {
        tracing::error!("{e}");
        eprintln!("error: {e}");
        exit(1);
    }
}
