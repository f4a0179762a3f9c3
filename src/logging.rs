use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::Result;

fn filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Logs to stderr so `--json` output on stdout stays parseable.
pub fn init(directives: &str) {
    // A subscriber may already be installed (tests); keep the first one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(directives))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Logs to a file while the terminal UI is drawing on the screen.
pub fn init_to_file(directives: &str, path: &Path) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(directives))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_filter_falls_back() {
        // Must not panic on a malformed directive
        let _ = filter("=[not a filter");
    }

    #[test]
    fn init_twice_is_harmless() {
        init("debug");
        init("info");
        tracing::info!("logging initialised");
    }
}
