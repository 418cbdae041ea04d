//! CLI module for the natparse front end
//!
//! This module provides the command-line interface.
//!
//! ## Commands
//!
//! - `natparse <file>` - Check one module (default action)
//! - `natparse check <path>...` - Check files and directories
//! - `--lex`, `--parse`, `--check <file>` - Debug views of single stages
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::frontend::FrontendConfig;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create an error with a custom exit code.
    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self::new(message, ExitCode(code))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// A front end for the Natural 4GL
#[derive(Parser, Debug)]
#[command(name = "natparse")]
#[command(version = VERSION)]
#[command(about = "Parse and check Natural sources", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// File to check (default action when no subcommand given)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    // Debug/development flags
    /// Tokenize only (debug)
    #[arg(long = "lex", value_name = "FILE", conflicts_with = "file")]
    pub lex_file: Option<PathBuf>,

    /// Parse only and print the tree (debug)
    #[arg(long = "parse", value_name = "FILE", conflicts_with = "file")]
    pub parse_file: Option<PathBuf>,

    /// Parse and run operand checks (debug)
    #[arg(long = "check", value_name = "FILE", conflicts_with = "file")]
    pub check_file: Option<PathBuf>,

    #[command(flatten)]
    pub options: CheckOptions,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check Natural sources
    Check {
        /// Files or directories to check
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
    },
}

/// Diagnostic output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Rendered reports with source snippets
    #[default]
    Human,
    /// One JSON document on stdout
    Json,
}

/// Options shared by every checking command.
#[derive(Args, Debug, Clone, Default)]
pub struct CheckOptions {
    /// Diagnostic output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    pub format: OutputFormat,

    /// Don't report references to undeclared variables
    #[arg(long = "no-unresolved", global = true)]
    pub no_unresolved: bool,

    /// Don't check that REDEFINE members fit into the redefined variable
    #[arg(long = "no-redefine-check", global = true)]
    pub no_redefine_check: bool,

    /// Report at most N diagnostics per module
    #[arg(long = "max-diagnostics", value_name = "N", global = true)]
    pub max_diagnostics: Option<usize>,
}

impl CheckOptions {
    /// Front end configuration for these flags.
    pub fn config(&self) -> FrontendConfig {
        FrontendConfig::new()
            .with_unresolved_variables(!self.no_unresolved)
            .with_redefinition_sizes(!self.no_redefine_check)
            .with_max_diagnostics(self.max_diagnostics)
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    // Handle debug flags first
    if let Some(file) = cli.lex_file {
        return commands::lex_file(&file);
    }
    if let Some(file) = cli.parse_file {
        return commands::parse_file(&file, &cli.options);
    }
    if let Some(file) = cli.check_file {
        return commands::check_file(&file, &cli.options);
    }

    match cli.command {
        Some(Command::Check { paths }) => commands::check_paths(&paths, &cli.options),
        None => {
            // Default: check the file if provided
            if let Some(file) = cli.file {
                commands::check_file(&file, &cli.options)
            } else {
                Err(CliError::failure("Error: no input file (see --help)"))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_default_file() {
        let cli = Cli::try_parse_from(["natparse", "MAIN.NSP"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("MAIN.NSP")));
        assert!(cli.command.is_none());
        assert_eq!(cli.options.format, OutputFormat::Human);
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["natparse", "check", "src/", "LIB.NSL", "--format", "json"]).unwrap();
        if let Some(Command::Check { paths }) = cli.command {
            assert_eq!(paths.len(), 2);
        } else {
            panic!("Expected Check command");
        }
        assert_eq!(cli.options.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_check_requires_paths() {
        assert!(Cli::try_parse_from(["natparse", "check"]).is_err());
    }

    #[test]
    fn test_cli_parse_debug_flags() {
        let cli = Cli::try_parse_from(["natparse", "--lex", "A.NSP"]).unwrap();
        assert!(cli.lex_file.is_some());

        let cli = Cli::try_parse_from(["natparse", "--parse", "A.NSP"]).unwrap();
        assert!(cli.parse_file.is_some());

        let cli = Cli::try_parse_from(["natparse", "--check", "A.NSP"]).unwrap();
        assert!(cli.check_file.is_some());

        assert!(Cli::try_parse_from(["natparse", "--lex", "A.NSP", "B.NSP"]).is_err());
    }

    #[test]
    fn test_cli_flags_map_onto_config() {
        let cli = Cli::try_parse_from([
            "natparse",
            "A.NSP",
            "--no-unresolved",
            "--no-redefine-check",
            "--max-diagnostics",
            "5",
        ])
        .unwrap();
        let config = cli.options.config();
        assert!(!config.report_unresolved_variables);
        assert!(!config.check_redefinition_sizes);
        assert_eq!(config.max_diagnostics, Some(5));

        let defaults = Cli::try_parse_from(["natparse", "A.NSP"]).unwrap().options.config();
        assert_eq!(defaults, FrontendConfig::default());
    }
}
