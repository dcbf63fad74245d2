
use clap::Parser;
use chrono::Datelike;
use lazy_static::lazy_static;
use log::{info, warn};
use std::fs::File;
use std::path::{Path, PathBuf};

lazy_static! {
    /// Stores the full version string we plan to use.
    /// # Examples
    /// * `0.3.0-6bb9635-dirty` - while on a dirty branch
    /// * `0.3.0-6bb9635` - with a fresh commit
    pub static ref FULL_VERSION: String = format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("VERGEN_GIT_DESCRIBE"));
}

/// Exit status for a missing or unreadable instance argument
pub const USAGE_EXIT_CODE: i32 = 1;

#[derive(Clone, Parser)]
#[clap(author,
    version = &**FULL_VERSION,
    about,
    after_help = format!("Copyright (C) 2004-{}     Pacific Biosciences of California, Inc.
This program comes with ABSOLUTELY NO WARRANTY; it is intended for
Research Use Only and not for use in diagnostic procedures.", chrono::Utc::now().year()))]
pub struct Settings {
    /// Serialized read set instance (optionally gzip compressed)
    #[clap(value_name = "INSTANCE")]
    #[clap(help_heading = Some("Input/Output"))]
    pub instance_filename: Option<PathBuf>,

    /// Output per-read summary file (optional, csv/tsv)
    #[clap(long = "summary-file")]
    #[clap(value_name = "FILE")]
    #[clap(help_heading = Some("Input/Output"))]
    pub summary_filename: Option<PathBuf>,

    /// Enable verbose output
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Merge all reads sharing a source ID into a single read before rendering
    #[clap(long = "merge-sources")]
    #[clap(help_heading = Some("Read Processing"))]
    pub merge_sources: bool,

    /// Only render a coverage-bounded selection of reads with at most this many reads spanning each variant
    #[clap(long = "max-coverage")]
    #[clap(value_name = "COVERAGE")]
    #[clap(help_heading = Some("Read Processing"))]
    pub max_coverage: Option<usize>,

    /// Disables selection of bridging reads that join disconnected components
    #[clap(long = "no-bridging")]
    #[clap(help_heading = Some("Read Processing"))]
    pub disable_bridging: bool
}

/// Checks that a path is a regular file we are allowed to open
/// # Arguments
/// * `filename` - the file path to check
fn is_readable_file(filename: &Path) -> bool {
    filename.is_file() && File::open(filename).is_ok()
}

/// Prints the two-line usage message and exits
fn usage() -> ! {
    let program: String = std::env::args().next()
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    eprintln!("Usage: {program} [options] <readset.instance>");
    eprintln!("Deserializes a read set instance and prints it in canonical text form.");
    std::process::exit(USAGE_EXIT_CODE);
}

pub fn get_raw_settings() -> Settings {
    Settings::parse()
}

/// Do some additional checks here, we may increase these as we go.
/// Also can modify settings if needed since we're passing it around.
/// # Arguments
/// * `settings` - the raw settings, nothing has been checked other than what clap does for us.
pub fn check_settings(settings: Settings) -> Settings {
    // the instance is required, but we want our own usage message instead of the clap one
    match settings.instance_filename.as_ref() {
        Some(filename) if is_readable_file(filename) => {
            info!("Read set instance: \"{}\"", filename.display());
        },
        Some(filename) => {
            eprintln!("Instance file is missing or unreadable: \"{}\"", filename.display());
            usage();
        },
        None => usage()
    };

    if let Some(ref filename) = settings.summary_filename {
        info!("Read summary file: \"{}\"", filename.display());
    }

    info!("Read processing:");
    info!("\tMerge reads by source ID: {}", if settings.merge_sources { "ENABLED" } else { "DISABLED" });
    match settings.max_coverage {
        Some(max_coverage) => {
            info!("\tRead selection maximum coverage: {}", max_coverage);
            info!("\tBridging reads: {}", if settings.disable_bridging { "DISABLED" } else { "ENABLED" });
            if max_coverage == 0 {
                warn!("\tA maximum coverage of 0 will exclude every read.");
            }
        },
        None => {
            info!("\tRead selection: DISABLED");
            if settings.disable_bridging {
                warn!("\tOption \"--no-bridging\" has no effect without \"--max-coverage\".");
            }
        }
    };

    //send the settings back
    settings
}
