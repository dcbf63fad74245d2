
/// CLI functionality and checks
pub mod cli;
/// Binary serialization of read sets, including legacy format upgrades
pub mod codec;
/// Contains the read and read set data model
pub mod data_types;
/// Opens serialized instances from disk and renders them
pub mod loader;
/// Coverage-bounded greedy read selection
pub mod read_selection;
/// Contains all the various output writer functionality
pub mod writers;
