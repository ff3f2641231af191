//! `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

/// Filter for a verbosity count: 0 warn, 1 info, 2 debug, 3+ trace.
///
/// `RUST_LOG` wins when it is set and parses.
pub fn verbosity_filter(verbosity: u8) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

/// Install the global fmt subscriber.
///
/// Returns `false` when the host already installed one.
pub fn init_tracing(verbosity: u8) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(verbosity_filter(verbosity))
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        init_tracing(1);
        assert!(!init_tracing(2));
    }
}
