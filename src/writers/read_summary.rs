
use serde::Serialize;
use std::fs::File;
use std::path::Path;

use crate::data_types::read_set::ReadSet;

/// This is a wrapper for writing out a per-read summary to a file
pub struct ReadSummaryWriter {
    /// Handle for the CSV writer
    csv_writer: csv::Writer<File>
}

/// Contains all the data written to each row of our summary file
#[derive(Serialize)]
struct ReadSummaryRow {
    /// the index of the read in the set
    read_index: usize,
    /// the read name, empty if unset
    read_name: Option<String>,
    /// the fragment grouping key
    source_id: Option<u64>,
    /// the originating sample
    sample_id: Option<u64>,
    /// the number of variant observations
    num_observations: usize,
    /// the first observed position
    first_position: Option<u64>,
    /// the last observed position
    last_position: Option<u64>
}

impl ReadSummaryWriter {
    /// Creates a new writer for a given filename
    /// # Arguments
    /// * `filename` - the path to write the summary to (tsv/csv)
    pub fn new(filename: &Path) -> csv::Result<ReadSummaryWriter> {
        // modify the delimiter to "," if it ends with .csv
        let is_csv: bool = filename.extension().unwrap_or_default() == "csv";
        let delimiter: u8 = if is_csv { b',' } else { b'\t' };
        let csv_writer: csv::Writer<File> = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(filename)?;
        Ok(ReadSummaryWriter {
            csv_writer
        })
    }

    /// Writes one row per read, in index order.
    /// # Arguments
    /// * `read_set` - the reads to summarize
    /// # Errors
    /// * if the csv_writer has any errors
    pub fn write_read_set(&mut self, read_set: &ReadSet) -> csv::Result<()> {
        for (read_index, read) in read_set.iter().enumerate() {
            let row = ReadSummaryRow {
                read_index,
                read_name: read.name().map(|n| n.to_string()),
                source_id: read.source_id(),
                sample_id: read.sample_id(),
                num_observations: read.len(),
                first_position: read.first_position(),
                last_position: read.last_position()
            };
            self.csv_writer.serialize(&row)?;
        }
        self.csv_writer.flush()?;
        Ok(())
    }
}
