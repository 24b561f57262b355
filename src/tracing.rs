use tracing::subscriber::set_global_default;
use tracing_log::LogTracer;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    LogTracer::init().expect("failed to set logger");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_level(true)
        .with_ansi(true)
        .with_thread_names(true);

    let subscriber = tracing_subscriber::registry::Registry::default()
        .with(filter)
        .with(fmt_layer);

    set_global_default(subscriber).expect("Failed to set default subscriber");
}
