mod args;
mod election;

use clap::Parser;
use log::warn;
use snafu::ErrorCompat;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    if let Err(e) = election::run_election(&args) {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
