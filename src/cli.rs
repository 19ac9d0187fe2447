//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_OUTPUT_DIR, SplitConfig};
use crate::error::ChainsawError;

/// Cut a large log file into small pieces, one file per day.
#[derive(Parser, Debug, Clone)]
#[command(name = "chainsaw")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chainsaw -f app.log
    chainsaw -f app.log -o cut/september --not-before 20230901 --not-after 20230930
    chainsaw -f app.log --chunk-size 20000 --dry-run")]
pub struct Args {
    /// Original log file
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Ignore logs before this date (20230908 or 2023-09-08)
    #[arg(long, value_name = "DATE")]
    pub not_before: Option<String>,

    /// Ignore logs after this date (20230908 or 2023-09-08)
    #[arg(long, value_name = "DATE")]
    pub not_after: Option<String>,

    /// Max lines per file; an entry and its continuation lines are never split
    #[arg(long, default_value_t = 50_000)]
    pub chunk_size: usize,

    /// No file will be written
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Builds the run configuration, validating the date bounds.
    pub fn to_config(&self) -> Result<SplitConfig, ChainsawError> {
        let mut config = SplitConfig::new()
            .with_chunk_size(self.chunk_size)?
            .with_output_dir(&self.output)
            .with_dry_run(self.dry_run);

        if let Some(ref date) = self.not_before {
            config = config.with_not_before_str(date)?;
        }
        if let Some(ref date) = self.not_after {
            config = config.with_not_after_str(date)?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["chainsaw", "-f", "app.log"]).unwrap();
        assert_eq!(args.file, PathBuf::from("app.log"));
        assert_eq!(args.output, PathBuf::from("cut/"));
        assert_eq!(args.chunk_size, 50_000);
        assert!(!args.dry_run);

        let config = args.to_config().unwrap();
        assert_eq!(config, SplitConfig::default());
    }

    #[test]
    fn test_file_is_required() {
        assert!(Args::try_parse_from(["chainsaw"]).is_err());
    }

    #[test]
    fn test_all_options() {
        let args = Args::try_parse_from([
            "chainsaw",
            "--file",
            "app.log",
            "-o",
            "out",
            "--not-before",
            "20230901",
            "--not-after",
            "2023-09-30",
            "--chunk-size",
            "10",
            "--dry-run",
        ])
        .unwrap();
        let config = args.to_config().unwrap();
        assert_eq!(config.not_before, Some(20230901));
        assert_eq!(config.not_after, Some(20230930));
        assert_eq!(config.chunk_size, 10);
        assert!(config.dry_run);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_bad_date_is_config_error() {
        let args =
            Args::try_parse_from(["chainsaw", "-f", "a.log", "--not-before", "2023-13-01"]).unwrap();
        assert!(args.to_config().unwrap_err().is_config());
    }

    #[test]
    fn test_zero_chunk_size_is_config_error() {
        let args = Args::try_parse_from(["chainsaw", "-f", "a.log", "--chunk-size", "0"]).unwrap();
        assert!(matches!(
            args.to_config(),
            Err(ChainsawError::InvalidChunkSize(0))
        ));
    }
}
