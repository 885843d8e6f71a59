pub mod build_info;
pub mod paths;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "signout_core=info";

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` replaces the default `signout_core=info` filter when set;
/// `extra` is layered on top of either. Output goes to stderr so reports on
/// stdout stay copyable.
pub fn init_tracing(extra: Option<&str>) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
        if let Some(directive) = extra {
            match directive.parse::<Directive>() {
                Ok(parsed) => filter = filter.add_directive(parsed),
                Err(err) => eprintln!("Ignoring log filter `{directive}`: {err}"),
            }
        }

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
