//! Service configuration
//!
//! Environment-style options only: the recognition service base URL, the
//! database path and the listen port. Anything else is not a recognized
//! knob of this backend.

use clap::Parser;
use std::path::PathBuf;

/// AI Guardian backend configuration
#[derive(Debug, Parser)]
#[command(name = "guardian-api", about = "AI Guardian recognition alert backend")]
pub struct ServiceConfig {
    /// Base URL of the face recognition service
    #[arg(long, env = "GUARDIAN_ML_URL", default_value = "http://127.0.0.1:8000")]
    pub ml_url: String,

    /// Path to the SQLite database file
    #[arg(long, env = "GUARDIAN_DB", default_value = "guardian.db")]
    pub database: PathBuf,

    /// TCP port to listen on
    #[arg(long, env = "GUARDIAN_PORT", default_value_t = 5000)]
    pub port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::parse_from(["guardian-api"]);
        assert_eq!(config.ml_url, "http://127.0.0.1:8000");
        assert_eq!(config.database, PathBuf::from("guardian.db"));
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_flag_overrides() {
        let config = ServiceConfig::parse_from([
            "guardian-api",
            "--ml-url",
            "http://ml.internal:9000",
            "--database",
            "/var/lib/guardian/guardian.db",
            "--port",
            "8080",
        ]);
        assert_eq!(config.ml_url, "http://ml.internal:9000");
        assert_eq!(config.port, 8080);
    }
}
