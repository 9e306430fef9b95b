//! Command-line interface for saxroute.

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use console::style;

use crate::config::{ParseOptions, READ_CHUNK_SIZE};
use crate::error::{Result, SaxrouteError};
use crate::stats::{check_document, collect_stats};

/// saxroute - Stream XML documents through recursive element handlers.
#[derive(Parser)]
#[command(name = "saxroute")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Bytes read from the input at a time
    #[arg(long, global = true, default_value_t = READ_CHUNK_SIZE)]
    pub chunk_size: usize,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that an XML file is well-formed.
    Check {
        /// XML file to check
        file: PathBuf,
    },
    /// Print element statistics of an XML file.
    Stats {
        /// XML file to analyse
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },
}

/// Serialization format of the `stats` report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    execute(Cli::parse())
}

/// Execute already parsed arguments.
pub fn execute(cli: Cli) -> Result<()> {
    let options = ParseOptions::new().with_chunk_size(cli.chunk_size)?;

    match cli.command {
        Commands::Check { file } => check_command(&file, &options),
        Commands::Stats { file, format } => stats_command(&file, format, &options),
    }
}

/// Execute the check command.
fn check_command(file: &Path, options: &ParseOptions) -> Result<()> {
    let filename = file.display().to_string();
    let input = File::open(file)?;

    let report = check_document(input, &filename, options).inspect_err(print_diagnostics)?;

    println!(
        "{} {}",
        style("Well-formed:").green().bold(),
        style(&filename).cyan()
    );
    println!("  Elements: {}", report.elements);
    println!("  Attributes: {}", report.attributes);
    for namespace in &report.namespaces {
        println!("  Namespace: {}", style(namespace).green());
    }

    Ok(())
}

/// Execute the stats command.
fn stats_command(file: &Path, format: OutputFormat, options: &ParseOptions) -> Result<()> {
    let filename = file.display().to_string();
    let input = File::open(file)?;

    let stats = collect_stats(input, &filename, options).inspect_err(print_diagnostics)?;

    let output = match format {
        OutputFormat::Yaml => serde_yaml_ng::to_string(&stats)?,
        OutputFormat::Json => serde_json::to_string_pretty(&stats)?,
    };
    println!("{}", output.trim_end());

    Ok(())
}

/// Print every diagnostic of a failed parse to stderr.
fn print_diagnostics(error: &SaxrouteError) {
    if let SaxrouteError::Parse { errors, .. } = error {
        for diagnostic in errors {
            eprintln!("{} {diagnostic}", style("error:").red().bold());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::parse_from(["saxroute", "check", "note.xml"]);

        assert_eq!(cli.chunk_size, READ_CHUNK_SIZE);
        let Commands::Check { file } = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(file, PathBuf::from("note.xml"));
    }

    #[test]
    fn test_cli_parse_stats_with_format() {
        let cli = Cli::parse_from([
            "saxroute",
            "stats",
            "note.xml",
            "--format",
            "json",
            "--chunk-size",
            "64",
        ]);

        assert_eq!(cli.chunk_size, 64);
        let Commands::Stats { file, format } = cli.command else {
            panic!("expected stats command");
        };
        assert_eq!(file, PathBuf::from("note.xml"));
        assert_eq!(format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_stats_default_format() {
        let cli = Cli::parse_from(["saxroute", "stats", "note.xml"]);

        let Commands::Stats { format, .. } = cli.command else {
            panic!("expected stats command");
        };
        assert_eq!(format, OutputFormat::Yaml);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let result = Cli::try_parse_from(["saxroute", "stats", "note.xml", "--format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_execute_rejects_zero_chunk_size() {
        let cli = Cli::parse_from(["saxroute", "--chunk-size", "0", "check", "note.xml"]);

        let result = execute(cli);
        assert!(matches!(
            result,
            Err(SaxrouteError::InvalidChunkSize { size: 0, .. })
        ));
    }

    #[test]
    fn test_execute_missing_file() {
        let cli = Cli::parse_from(["saxroute", "check", "/nonexistent/note.xml"]);

        assert!(matches!(execute(cli), Err(SaxrouteError::Io(_))));
    }
}
