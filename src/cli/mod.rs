//! CLI command definitions and handlers

mod analyze;
mod fix;
mod init;
mod rules;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// simple-namespace - keep C# namespaces simple
#[derive(Parser, Debug)]
#[command(name = "simple-namespace")]
#[command(
    version,
    about = "Flag public C# types declared in flat dot-joined namespaces, and flatten them on request",
    long_about = "simple-namespace reports every public or protected top-level C# type whose \
namespace is declared with a dotted name at its own level (`namespace ConsoleApp.Sub`), \
and offers a fix that collapses the declaration to its first segment.\n\n\
Run without a subcommand to analyze the current directory:\n  \
simple-namespace .",
    after_help = "\
Examples:
  simple-namespace .                          Analyze current directory
  simple-namespace analyze . --format json    JSON output for scripting
  simple-namespace fix 1                      Preview the fix for finding #1
  simple-namespace fix 1 --apply              Apply it
  simple-namespace fix 1 path/to/repo         Fix a finding of another repository
  simple-namespace rules                      Describe the rule"
)]
pub struct Cli {
    /// Path to repository (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a simple-namespace.toml config file with example settings
    Init {
        /// Path to repository
        path: Option<PathBuf>,
    },

    /// Analyze C# sources for flat namespaces
    #[command(after_help = "\
Examples:
  simple-namespace analyze .                                 Analyze current directory
  simple-namespace analyze . --format sarif -o out.sarif.json   SARIF for GitHub Code Scanning
  simple-namespace analyze . --fail-on warning               Exit code 1 if warnings exist (CI mode)")]
    Analyze {
        /// Path to repository
        path: Option<PathBuf>,

        /// Output format: text, json, sarif (default: config, then text)
        #[arg(long, short = 'f', value_parser = ["text", "json", "sarif"])]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Exit with code 1 if findings at this severity or higher exist
        #[arg(long, value_parser = ["info", "warning", "error"])]
        fail_on: Option<String>,

        /// Number of parallel workers (1-64, default: auto)
        #[arg(long, value_parser = parse_workers)]
        workers: Option<usize>,
    },

    /// Preview or apply the fix for a finding from the last analysis
    #[command(after_help = "\
Examples:
  simple-namespace fix 3               Show the diff for finding #3
  simple-namespace fix 3 --apply       Rewrite the file
  simple-namespace fix 3 path/to/repo  Use the findings of another repository")]
    Fix {
        /// Finding index (1-based, as listed by `analyze`)
        index: usize,

        /// Path to repository
        path: Option<PathBuf>,

        /// Write the fix to disk
        #[arg(long)]
        apply: bool,
    },

    /// Describe the rules and their fixes
    Rules {
        /// Path to repository (for its config overrides)
        path: Option<PathBuf>,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let default_path = cli.path;
    let repo = |path: Option<PathBuf>| path.unwrap_or_else(|| default_path.clone());

    match cli.command {
        Some(Commands::Init { path }) => init::run(&repo(path)),

        Some(Commands::Analyze {
            path,
            format,
            output,
            fail_on,
            workers,
        }) => analyze::run(&repo(path), format, output.as_deref(), fail_on, workers),

        Some(Commands::Fix { index, path, apply }) => fix::run(&repo(path), index, apply),

        Some(Commands::Rules { path }) => rules::run(&repo(path)),

        None => analyze::run(&default_path, None, None, None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workers() {
        assert_eq!(parse_workers("4"), Ok(4));
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("65").is_err());
        assert!(parse_workers("many").is_err());
    }

    #[test]
    fn test_default_command_is_analyze() {
        let cli = Cli::parse_from(["simple-namespace", "some/repo"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.path, PathBuf::from("some/repo"));
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_fix_arguments() {
        let cli = Cli::parse_from(["simple-namespace", "fix", "2", "repo", "--apply"]);
        match cli.command {
            Some(Commands::Fix { index, path, apply }) => {
                assert_eq!(index, 2);
                assert_eq!(path, Some(PathBuf::from("repo")));
                assert!(apply);
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::parse_from(["simple-namespace", "fix", "1"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Fix { index: 1, path: None, apply: false })
        ));
    }

    #[test]
    fn test_analyze_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["simple-namespace", "analyze", ".", "--format", "html"]).is_err());
    }
}
