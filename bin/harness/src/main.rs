//! Harness command line.
//!
//! Usage:
//! ```bash
//! # Activate a failure point on every instance of the deployment
//! INSTANCEINFO='{"arangods":[{"endpoint":"tcp://127.0.0.1:8530"}]}' harness failpoint set crashBeforeCommit
//!
//! # Record a request transcript against the default endpoint
//! harness curl GET /_api/version --render json
//! ```

fn main() -> eyre::Result<()> {
    use clap::Parser;
    use harness::HarnessArgs;
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let args = HarnessArgs::parse();

    // Logs go to stderr, stdout carries the command output.
    tracing_subscriber::registry()
        .with(EnvFilter::builder().with_default_directive(LevelFilter::WARN.into()).from_env_lossy())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    tokio::runtime::Builder::new_multi_thread().enable_all().build()?.block_on(args.run())
}
