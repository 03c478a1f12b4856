use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::config::AliasStyle;
use super::constants::{ENV_ALIAS_STYLE, ENV_CONFIG, ENV_HOST, ENV_PORT, ENV_SORT_PARAM};

#[derive(Parser)]
#[command(name = "filterkit")]
#[command(version, about = "Filter and sort query parameter compiler", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Filter parameter naming style (lookup or operator)
    #[arg(long, global = true, env = ENV_ALIAS_STYLE, value_parser = parse_alias_style)]
    pub alias_style: Option<AliasStyle>,

    /// Name of the shared sort parameter
    #[arg(long, global = true, env = ENV_SORT_PARAM)]
    pub sort_param: Option<String>,
}

/// Parse alias style from CLI/env string
fn parse_alias_style(s: &str) -> Result<AliasStyle, String> {
    match s.to_lowercase().as_str() {
        "lookup" | "django" => Ok(AliasStyle::Lookup),
        "operator" => Ok(AliasStyle::Operator),
        _ => Err(format!(
            "Invalid alias style '{}'. Valid options: lookup, operator",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Print the generated OpenAPI document to stdout
    Openapi,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub alias_style: Option<AliasStyle>,
    pub sort_param: Option<String>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        config: cli.config,
        alias_style: cli.alias_style,
        sort_param: cli.sort_param,
    };
    (config, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alias_style() {
        assert_eq!(parse_alias_style("lookup").unwrap(), AliasStyle::Lookup);
        assert_eq!(parse_alias_style("Operator").unwrap(), AliasStyle::Operator);
        assert!(parse_alias_style("camel").is_err());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "filterkit",
            "--port",
            "8080",
            "--alias-style",
            "operator",
            "openapi",
        ])
        .unwrap();

        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.alias_style, Some(AliasStyle::Operator));
        assert!(matches!(cli.command, Some(Commands::Openapi)));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["filterkit", "start", "--host", "0.0.0.0"]).unwrap();
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert!(matches!(cli.command, Some(Commands::Start)));
    }
}
