use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_DIALECT, ENV_MAX_DEPTH, ENV_SCHEMA};
use crate::sql::Dialect;

#[derive(Parser)]
#[command(name = "jlsql")]
#[command(version, about = "Compile JSON-Logic expressions into SQL WHERE clauses", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Target SQL dialect (bigquery, spanner, postgresql, duckdb, clickhouse)
    #[arg(long, short = 'd', global = true, env = ENV_DIALECT, value_parser = parse_dialect)]
    pub dialect: Option<Dialect>,

    /// Path to a JSON schema file describing the available fields
    #[arg(long, short = 's', global = true, env = ENV_SCHEMA)]
    pub schema: Option<PathBuf>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Maximum expression nesting depth
    #[arg(long, global = true, env = ENV_MAX_DEPTH)]
    pub max_depth: Option<usize>,
}

/// Parse dialect from CLI/env string
fn parse_dialect(s: &str) -> Result<Dialect, String> {
    s.parse::<Dialect>().map_err(|e| e.to_string())
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Compile one expression and print the SQL
    Compile {
        /// JSON-Logic expression, or "-" to read it from stdin
        expression: String,

        /// Print the bare condition without the WHERE prefix
        #[arg(long)]
        condition: bool,
    },
    /// Start the interactive shell (default command)
    Repl,
    /// List the built-in operators
    Operators,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub dialect: Option<Dialect>,
    pub schema: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub max_depth: Option<usize>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        dialect: cli.dialect,
        schema: cli.schema,
        config: cli.config,
        max_depth: cli.max_depth,
    };
    (config, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dialect() {
        assert_eq!(parse_dialect("ClickHouse"), Ok(Dialect::ClickHouse));
        assert!(parse_dialect("mysql").unwrap_err().contains("mysql"));
    }

    #[test]
    fn test_cli_compile_command() {
        let cli = Cli::try_parse_from([
            "jlsql",
            "--dialect",
            "postgres",
            "compile",
            "--condition",
            r#"{"var": "a"}"#,
        ])
        .unwrap();
        assert_eq!(cli.dialect, Some(Dialect::PostgreSQL));
        match cli.command {
            Some(Commands::Compile {
                expression,
                condition,
            }) => {
                assert_eq!(expression, r#"{"var": "a"}"#);
                assert!(condition);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_dialect() {
        assert!(Cli::try_parse_from(["jlsql", "--dialect", "oracle", "repl"]).is_err());
    }

    #[test]
    fn test_cli_verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
