//! Diagnostic logging setup using tracing

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Diagnostics go to stderr so they never mix
/// with the report output; `RUST_LOG` adds further directives.
pub fn init_logging(verbose: bool) -> Result<()> {
    let directive = if verbose { "noshow=info" } else { "noshow=warn" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    Ok(())
}
