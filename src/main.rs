use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() {
    let env_filter =
        EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();

    // Step outputs and JSON go to stdout; keep logs on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    syncwith::app::cli::run();
}
