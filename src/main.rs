
use readset_dump::cli::{Settings, USAGE_EXIT_CODE, check_settings, get_raw_settings};
use readset_dump::codec::CodecError;
use readset_dump::data_types::read_set::ReadSet;
use readset_dump::loader::{LoadError, load_read_set};
use readset_dump::read_selection::select_reads;
use readset_dump::writers::read_summary::ReadSummaryWriter;

use log::{LevelFilter, debug, error, info};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    // get the settings
    let settings: Settings = get_raw_settings();
    let filter_level: LevelFilter = match settings.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };

    // immediately setup logging first
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    // okay, now we can check all the other settings
    let cli_settings: Settings = check_settings(settings);
    let instance_filename: PathBuf = match cli_settings.instance_filename.clone() {
        Some(f) => f,
        None => {
            error!("No read set instance was provided");
            std::process::exit(USAGE_EXIT_CODE);
        }
    };

    let start_time: Instant = Instant::now();
    let mut read_set: ReadSet = match load_read_set(&instance_filename) {
        Ok(rs) => rs,
        Err(e) => {
            error!("Error while loading read set: {}", e);
            let code = match e {
                LoadError::Io { .. } | LoadError::Codec { source: CodecError::Io(_), .. } => exitcode::IOERR,
                LoadError::Codec { .. } => exitcode::DATAERR
            };
            std::process::exit(code);
        }
    };
    debug!("Read set covers {} distinct positions", read_set.positions().len());

    if cli_settings.merge_sources {
        let num_before: usize = read_set.len();
        if let Err(e) = read_set.merge_all_sources() {
            error!("Error while merging reads by source ID: {}", e);
            std::process::exit(exitcode::DATAERR);
        }
        info!("Merged {} reads into {} by source ID", num_before, read_set.len());
    }

    if let Some(max_coverage) = cli_settings.max_coverage {
        let selection = select_reads(&read_set, max_coverage, !cli_settings.disable_bridging);
        info!("Selected {} of {} reads in {} iterations ({} reads had fewer than 2 variants)",
            selection.selected.len(), read_set.len(), selection.num_iterations, selection.num_unusable);
        read_set = match read_set.subset(&selection.selected) {
            Ok(rs) => rs,
            Err(e) => {
                error!("Error while building selected read set: {}", e);
                std::process::exit(exitcode::SOFTWARE);
            }
        };
    }

    if let Some(ref filename) = cli_settings.summary_filename {
        let write_result = ReadSummaryWriter::new(filename)
            .and_then(|mut writer| writer.write_read_set(&read_set));
        if let Err(e) = write_result {
            error!("Error while writing read summary: {}", e);
            std::process::exit(exitcode::IOERR);
        }
    }

    // the canonical text goes to stdout, everything else is logged to stderr
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", read_set.to_canonical_string()).and_then(|_| handle.flush()) {
        error!("Error while writing read set: {}", e);
        std::process::exit(exitcode::IOERR);
    }

    info!("Rendered {} reads in {} ms", read_set.len(), start_time.elapsed().as_millis());
}
