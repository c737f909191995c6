//! Command-line interface for the sentiment proxy
//!
//! Provides argument parsing and subcommand handling for the binary.

use clap::{Parser, Subcommand};

/// Front-end proxy for a remote sentiment model service
#[derive(Parser)]
#[command(name = "sentiment-proxy")]
#[command(version)]
#[command(about = "Front-end proxy for a remote sentiment model service")]
#[command(
    long_about = "Accepts review text over HTTP, forwards it to the sentiment model service \
    with the mounted API key, normalizes the result, and exposes Prometheus metrics."
)]
pub struct Cli {
    /// Path to configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# Sentiment Proxy Configuration
# =============================
#
# Every value below is the built-in default. Environment variables override
# the file: MODEL_SERVICE_URL, PORT, APP_VERSION, MODEL_CREDENTIALS_PATH,
# LOG_LEVEL.

# ─────────────────────────────────────────────────────────────────────────────
# SERVER CONFIGURATION
# ─────────────────────────────────────────────────────────────────────────────

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on
port = 5000

# Largest accepted request body in bytes (32 MiB). Larger bodies get HTTP 413.
max_body_bytes = 33554432

# ─────────────────────────────────────────────────────────────────────────────
# MODEL SERVICE
# ─────────────────────────────────────────────────────────────────────────────

[backend]
# Base URL of the sentiment model service (/predict and /version are appended)
base_url = "http://localhost:8000"

# Timeout for a single outbound call in seconds (1-300). There are no retries.
timeout_seconds = 30

# ─────────────────────────────────────────────────────────────────────────────
# APPLICATION
# ─────────────────────────────────────────────────────────────────────────────

[app]
# Reported by GET /version
version = "1.0.0"

# ─────────────────────────────────────────────────────────────────────────────
# CREDENTIALS
# ─────────────────────────────────────────────────────────────────────────────

[credentials]
# Files searched in order for the model service API key. The first readable,
# non-empty file wins. If none is found, requests are sent without X-API-Key.
search_paths = [
    "/app/secrets/model_credentials",
    "/var/run/secrets/model-service/credentials",
]

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
log_level = "info"

# Prometheus metrics are always available at /metrics on the server port
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Clap's built-in verification for the CLI structure
        Cli::command().debug_assert();
    }

    #[test]
    fn default_config_path() {
        let cli = Cli::parse_from(["sentiment-proxy"]);
        assert_eq!(cli.config, "config.toml");
        assert!(cli.command.is_none());
    }

    #[test]
    fn custom_config_path() {
        let cli = Cli::parse_from(["sentiment-proxy", "--config", "custom.toml"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn config_subcommand_with_output() {
        let cli = Cli::parse_from(["sentiment-proxy", "config", "-o", "my-config.toml"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config { output: Some(ref path) }) if path == "my-config.toml"
        ));
    }

    #[test]
    fn template_parses_and_validates() {
        let config: crate::config::Config =
            toml::from_str(generate_config_template()).expect("template should be valid TOML");
        config.validate().expect("template should validate");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.credentials.search_paths.len(), 2);
    }

    #[test]
    fn template_has_all_sections() {
        let template = generate_config_template();
        for section in [
            "[server]",
            "[backend]",
            "[app]",
            "[credentials]",
            "[observability]",
        ] {
            assert!(template.contains(section), "missing {}", section);
        }
    }
}
