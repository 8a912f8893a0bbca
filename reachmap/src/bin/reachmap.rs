use clap::Parser;
use reachmap::cli::{run, CliArgs};

fn main() {
    env_logger::init();
    log::debug!("cwd: {:?}", std::env::current_dir());
    log::info!("starting reachmap at {}", chrono::Local::now().to_rfc3339());
    let args = CliArgs::parse();
    if let Err(e) = run(&args.app) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
