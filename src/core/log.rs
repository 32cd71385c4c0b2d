use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Level for this crate's own events.
fn crate_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

/// Installs the global subscriber.
///
/// Events go to stderr so quote and balance tables on stdout stay clean.
/// Dependencies only report errors unless `RUST_LOG` says otherwise.
pub fn init_logging(verbose: bool) {
    let level = crate_level(verbose);
    let targets = Targets::new()
        .with_target(env!("CARGO_PKG_NAME"), level)
        .with_default(LevelFilter::ERROR);
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .without_time(),
        )
        .with(targets)
        .with(env_filter)
        .init();
}
