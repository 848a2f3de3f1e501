use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins over the built-in directives.
fn default_filter(verbose: bool) -> EnvFilter {
    let directives = if verbose {
        "bugfixer=debug,tower_http=debug,info"
    } else {
        "bugfixer=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(fmt::layer().with_target(false).compact())
        .init();
}

/// One JSON object per line, fields flattened into the top level.
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(fmt::layer().json().flatten_event(true))
        .init();
}
