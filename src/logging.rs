use once_cell::sync::OnceCell;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

static INIT: OnceCell<()> = OnceCell::new();

/// Install the global subscriber once. `-v` raises this crate's level.
///
/// Logs go to stderr so stdout stays free for command output.
pub fn init(verbosity: u8) {
    INIT.get_or_init(|| {
        let level = match verbosity {
            0 => None,
            1 => Some(Level::DEBUG),
            _ => Some(Level::TRACE),
        };
        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let directive =
            level.and_then(|level| format!("qrc_service={level}").parse::<Directive>().ok());
        if let Some(directive) = directive {
            filter = filter.add_directive(directive);
        }
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
