
use crate::codec::{decode, encode, CodecError};
use crate::data_types::read_set::ReadSet;

use flate2::read::MultiGzDecoder;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// The two leading bytes of any gzip stream
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("error reading {path:?}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("error decoding {path:?}: {source}")]
    Codec { path: PathBuf, source: CodecError }
}

/// Reads the full contents of a file, transparently decompressing gzip input.
/// # Arguments
/// * `path` - the file to read
fn read_all_bytes(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut raw: Vec<u8> = vec![];
    BufReader::new(File::open(path)?).read_to_end(&mut raw)?;

    if raw.starts_with(&GZIP_MAGIC) {
        let mut decompressed: Vec<u8> = vec![];
        MultiGzDecoder::new(&raw[..]).read_to_end(&mut decompressed)?;
        debug!("Decompressed {} gzip bytes into {} bytes", raw.len(), decompressed.len());
        Ok(decompressed)
    } else {
        Ok(raw)
    }
}

/// Loads a serialized read set from a file.
/// # Arguments
/// * `path` - the serialized instance, plain or gzip compressed
/// # Errors
/// * `LoadError::Io` if the file cannot be opened or read
/// * `LoadError::Codec` if the contents are not a valid read set
pub fn load_read_set(path: &Path) -> Result<ReadSet, LoadError> {
    let bytes = read_all_bytes(path)
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    let read_set = decode(&bytes)
        .map_err(|source| LoadError::Codec { path: path.to_path_buf(), source })?;
    info!("Loaded {} reads from {:?}", read_set.len(), path);
    Ok(read_set)
}

/// Loads a serialized read set and renders it in canonical form.
/// # Arguments
/// * `path` - the serialized instance
/// # Errors
/// * anything `load_read_set` returns
pub fn run(path: &Path) -> Result<String, LoadError> {
    let read_set = load_read_set(path)?;
    Ok(read_set.to_canonical_string())
}

/// Writes a read set to a file in the current format version.
/// # Arguments
/// * `path` - the output file, created or truncated
/// * `read_set` - the reads to save
/// # Errors
/// * `LoadError::Io` if the file cannot be created or flushed
/// * `LoadError::Codec` if encoding fails
pub fn save_read_set(path: &Path, read_set: &ReadSet) -> Result<(), LoadError> {
    let file = File::create(path)
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    let mut writer = BufWriter::new(file);
    encode(read_set, &mut writer)
        .map_err(|source| LoadError::Codec { path: path.to_path_buf(), source })?;
    writer.flush()
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    Ok(())
}
