pub mod calendar; // Week/month aggregation
pub mod commands; // Operator actions + error taxonomy
pub mod config;
pub mod core_state; // Session gate + view state
pub mod crypto; // Credential file
pub mod db; // Appointment file
pub mod models;
pub mod reminder; // Reminder text + chat links

use tracing_subscriber::EnvFilter;

/// Install the log subscriber. Output goes to stderr so command output on
/// stdout stays clean.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);
}
