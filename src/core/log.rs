use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

const APP_DEBUG: &str = "xconv=debug";

/// Installs the global subscriber. Logging stays off unless `verbose` is set
/// or `RUST_LOG` asks for it.
pub fn init_logging(verbose: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(build_filter(verbose, directives.as_deref()))
        .init();
}

/// `RUST_LOG` style directives, with `verbose` forcing debug output for this
/// crate on top of them. Unparseable directives fall back as if unset.
pub(crate) fn build_filter(verbose: bool, directives: Option<&str>) -> EnvFilter {
    let fallback = if verbose { APP_DEBUG } else { "off" };
    let mut spec = directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or("off")
        .to_string();
    if verbose {
        spec.push(',');
        spec.push_str(APP_DEBUG);
    }

    EnvFilter::try_new(&spec).unwrap_or_else(|_| EnvFilter::new(fallback))
}
