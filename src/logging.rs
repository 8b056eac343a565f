use color_eyre::eyre::{Result, eyre};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::LogFormat;

/// Install a stdout subscriber for `--verbose` runs.
pub fn init_tracing(format: LogFormat) -> Result<()> {
    tracing::subscriber::set_global_default(build_subscriber(format, std::io::stdout))
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))
}

fn build_subscriber<W>(format: LogFormat, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(writer);
    match format {
        LogFormat::Text => Box::new(builder.finish()),
        LogFormat::Json => Box::new(builder.json().finish()),
    }
}
