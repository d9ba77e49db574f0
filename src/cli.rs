//! Command-line argument parsing for db-run.
//!
//! Uses clap to parse the CLI surface and build the immutable run
//! configuration.

use crate::exec::RunConfig;
use clap::Parser;

/// A command-line SQL batch runner.
#[derive(Parser, Debug)]
#[command(name = "dbrun")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Database connection URL (jdbc:mysql:, jdbc:oracle: or jdbc:postgresql:)
    #[arg(short = 'j', long = "jdbc", value_name = "URL")]
    pub jdbc: String,

    /// Database username
    #[arg(short = 'u', long, value_name = "USER", default_value = "")]
    pub username: String,

    /// Database password
    #[arg(short = 'p', long, value_name = "PASS", default_value = "")]
    pub password: String,

    /// Treat inputs as paths to SQL files
    #[arg(short = 'f', long)]
    pub file: bool,

    /// How many times to run the statement sequence
    #[arg(short = 't', long, value_name = "N", default_value_t = 1)]
    pub times: u64,

    /// Pause before each statement execution, in milliseconds
    #[arg(short = 'i', long, value_name = "MS", default_value_t = 0)]
    pub interval: u64,

    /// Open a fresh connection for every statement execution
    #[arg(short = 'c', long)]
    pub connection: bool,

    /// Render result sets and update counts
    #[arg(
        short = 'r',
        long,
        value_name = "BOOL",
        action = clap::ArgAction::Set,
        default_value_t = true,
        default_missing_value = "true",
        num_args = 0..=1,
    )]
    pub results: bool,

    /// SQL statement(s) to execute, or file path(s) with --file
    #[arg(value_name = "INPUTS", required = true, num_args = 1..)]
    pub inputs: Vec<String>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Builds the immutable run configuration from the parsed arguments.
    pub fn to_run_config(&self) -> RunConfig {
        RunConfig {
            url: self.jdbc.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            times: self.times,
            interval_ms: self.interval,
            new_connections: self.connection,
            show_results: self.results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Cli {
        Cli::parse_from(args)
    }

    #[test]
    fn test_parse_minimal() {
        let cli = parse_args(&["dbrun", "-j", "jdbc:mysql://localhost/test", "SELECT 1"]);
        assert_eq!(cli.jdbc, "jdbc:mysql://localhost/test");
        assert_eq!(cli.inputs, vec!["SELECT 1"]);
    }

    #[test]
    fn test_defaults() {
        let cli = parse_args(&["dbrun", "-j", "jdbc:mysql://localhost/test", "SELECT 1"]);
        assert_eq!(cli.username, "");
        assert_eq!(cli.password, "");
        assert!(!cli.file);
        assert_eq!(cli.times, 1);
        assert_eq!(cli.interval, 0);
        assert!(!cli.connection);
        assert!(cli.results);
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = parse_args(&[
            "dbrun",
            "--jdbc",
            "jdbc:postgresql://localhost:5432/test",
            "--username",
            "app",
            "--password",
            "s3cret",
            "--file",
            "--times",
            "5",
            "--interval",
            "200",
            "--connection",
            "statements.sql",
        ]);

        assert_eq!(cli.jdbc, "jdbc:postgresql://localhost:5432/test");
        assert_eq!(cli.username, "app");
        assert_eq!(cli.password, "s3cret");
        assert!(cli.file);
        assert_eq!(cli.times, 5);
        assert_eq!(cli.interval, 200);
        assert!(cli.connection);
        assert_eq!(cli.inputs, vec!["statements.sql"]);
    }

    #[test]
    fn test_parse_short_flags() {
        let cli = parse_args(&[
            "dbrun",
            "-j",
            "jdbc:mysql://localhost/test",
            "-u",
            "app",
            "-p",
            "pw",
            "-f",
            "-t",
            "3",
            "-i",
            "10",
            "-c",
            "a.sql",
            "b.sql",
        ]);

        assert_eq!(cli.username, "app");
        assert_eq!(cli.password, "pw");
        assert!(cli.file);
        assert_eq!(cli.times, 3);
        assert_eq!(cli.interval, 10);
        assert!(cli.connection);
        assert_eq!(cli.inputs, vec!["a.sql", "b.sql"]);
    }

    #[test]
    fn test_results_can_be_disabled() {
        let cli = parse_args(&[
            "dbrun",
            "-j",
            "jdbc:mysql://localhost/test",
            "-r",
            "false",
            "SELECT 1",
        ]);
        assert!(!cli.results);
    }

    #[test]
    fn test_results_bare_flag_enables() {
        let cli = parse_args(&[
            "dbrun",
            "-j",
            "jdbc:mysql://localhost/test",
            "-r",
            "--",
            "SELECT 1",
        ]);
        assert!(cli.results);
    }

    #[test]
    fn test_jdbc_is_required() {
        let result = Cli::try_parse_from(["dbrun", "SELECT 1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_inputs_are_required() {
        let result = Cli::try_parse_from(["dbrun", "-j", "jdbc:mysql://localhost/test"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_times_zero_is_accepted() {
        let cli = parse_args(&[
            "dbrun",
            "-j",
            "jdbc:mysql://localhost/test",
            "-t",
            "0",
            "SELECT 1",
        ]);
        assert_eq!(cli.times, 0);
    }

    #[test]
    fn test_to_run_config() {
        let cli = parse_args(&[
            "dbrun",
            "-j",
            "jdbc:postgresql://localhost/test",
            "-u",
            "app",
            "-t",
            "2",
            "-i",
            "100",
            "-c",
            "-r",
            "false",
            "SELECT 1",
        ]);

        let config = cli.to_run_config();
        assert_eq!(config.url, "jdbc:postgresql://localhost/test");
        assert_eq!(config.username, "app");
        assert_eq!(config.password, "");
        assert_eq!(config.times, 2);
        assert_eq!(config.interval_ms, 100);
        assert!(config.new_connections);
        assert!(!config.show_results);
    }
}
