//! Subscriber installation

use std::sync::Once;

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// How log output is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines on stderr, `canonex=debug`
    Development,
    /// One JSON object per line on stderr, `canonex=info`
    Production,
    /// Nothing is rendered; tests install a capture layer instead
    Test,
}

impl Profile {
    fn default_directive(self) -> &'static str {
        match self {
            Profile::Development | Profile::Test => "canonex=debug",
            Profile::Production => "canonex=info",
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

static INSTALLED: Once = Once::new();

/// Install the global subscriber for `profile`
///
/// Only the first call in a process does anything, and an already
/// installed subscriber is left in place. `RUST_LOG` replaces the
/// profile's default filter.
pub fn init(profile: Profile) {
    INSTALLED.call_once(|| {
        let installed = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_env_filter(profile.filter())
                .with_writer(std::io::stderr)
                .finish()
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(profile.filter())
                .with_writer(std::io::stderr)
                .finish()
                .try_init(),
            Profile::Test => tracing_subscriber::registry().try_init(),
        };
        if installed.is_err() {
            tracing::debug!(?profile, "subscriber already installed");
        }
    });
}
