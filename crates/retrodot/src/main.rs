use clap::Parser;
use retrodot::{Cli, RunConfig};

fn main() {
    env_logger::init();

    let config = RunConfig::from(Cli::parse());
    if let Err(err) = retrodot::run(&config) {
        eprintln!("retrodot: {err:#}");
        std::process::exit(1);
    }
}
