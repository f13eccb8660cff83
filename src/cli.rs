use clap::Parser;
use std::path::PathBuf;

/// Comply Nav - compliance navigation assistant API
#[derive(Parser, Debug, Clone)]
#[command(name = "comply-nav", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "COMPLY_NAV_CONFIG", default_value = "comply-nav.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "COMPLY_NAV_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "COMPLY_NAV_PORT")]
    pub port: Option<u16>,

    /// Language model identifier (e.g. "anthropic/claude-2")
    #[arg(long, env = "COMPLY_NAV_MODEL")]
    pub model: Option<String>,

    /// Iteration ceiling for the routing loop
    #[arg(long, env = "COMPLY_NAV_MAX_ITERATIONS")]
    pub max_iterations: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["comply-nav"]);
        assert_eq!(cli.config, PathBuf::from("comply-nav.toml"));
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(cli.model.is_none());
        assert!(cli.max_iterations.is_none());
    }

    #[test]
    fn test_cli_with_args() {
        let cli = Cli::parse_from([
            "comply-nav",
            "--config",
            "custom.toml",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--model",
            "openai/gpt-4o-mini",
            "--max-iterations",
            "6",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.host, Some("0.0.0.0".to_string()));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.model.as_deref(), Some("openai/gpt-4o-mini"));
        assert_eq!(cli.max_iterations, Some(6));
    }
}
