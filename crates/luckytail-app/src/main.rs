use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod driver;

use driver::{run_headless, RunOptions};

fn main() {
    // Init logging; RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_env_filter(filter)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    info!("Lucky Tail headless run starting");
    let options = match RunOptions::from_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Lucky Tail error: {e}");
            std::process::exit(2);
        }
    };
    match run_headless(&options) {
        Ok(report) => info!(
            "run finished after {} frames: score {} bursts {} game_over {}",
            report.frames, report.score, report.bursts, report.game_over
        ),
        Err(e) => eprintln!("Lucky Tail error: {e}"),
    }
}
