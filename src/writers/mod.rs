
/// Contains the writer for per-read summary files
pub mod read_summary;
