
/*!
Binary serialization for a ReadSet.
All values are little-endian.

Version 2 (current):
```text
magic            4 bytes  "RDST"
version          u16      2
allele_encoding  u8       0 = single byte allele index, 255 = unknown
quality_encoding u8       0 = u32 Phred-like integer
num_reads        u64
per read:
    name_flag    u8 (0/1), then name_len u32 + UTF-8 bytes when set
    source_flag  u8 (0/1), then source_id u64 when set
    sample_flag  u8 (0/1), then sample_id u64 when set
    num_obs      u64
    per observation: position u64, allele u8, quality u32
```

Version 1 (legacy, upgraded on load):
```text
magic "RDST", version u16 = 1, num_reads u64
per read:
    name_len u32 + UTF-8 bytes (empty means no name)
    source_id i64, sample_id i64 (-1 means absent)
    num_obs u64
    per observation: position i64, allele u8, quality i32
```
Any other version is rejected.
*/

use crate::data_types::observations::{Allele, Observation};
use crate::data_types::read::Read;
use crate::data_types::read_set::ReadSet;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, trace};
use std::io::{Cursor, Read as IoRead, Write};

/// Marks the start of every serialized read set
pub const MAGIC: &[u8; 4] = b"RDST";
/// The version written by `encode`
pub const CURRENT_VERSION: u16 = 2;
/// The oldest version we can still upgrade on load
pub const MIN_SUPPORTED_VERSION: u16 = 1;

// fixed record sizes, used to bound counts before allocating
const V1_READ_MIN_BYTES: usize = 4 + 8 + 8 + 8;
const V1_OBSERVATION_BYTES: usize = 8 + 1 + 4;
const V2_READ_MIN_BYTES: usize = 1 + 1 + 1 + 8;
const V2_OBSERVATION_BYTES: usize = 8 + 1 + 4;

/// Sentinel used by version 1 for an absent integer field
const V1_ABSENT: i64 = -1;

/// How alleles are stored in the observation records
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum_macros::FromRepr)]
pub enum AlleleEncoding {
    /// one byte, 0 = REF, 1-254 = ALT index, 255 = unknown
    ByteIndex = 0
}

/// How qualities are stored in the observation records
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum_macros::FromRepr)]
pub enum QualityEncoding {
    /// unsigned 32-bit Phred-like integer
    PhredU32 = 0
}

#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("unsupported format: {found}, supported versions are {}-{}", MIN_SUPPORTED_VERSION, CURRENT_VERSION)]
    UnsupportedVersion { found: String },
    #[error("corrupt data: {0}")]
    CorruptData(String),
    #[error("cannot encode read {read_index}: {reason}")]
    Unencodable { read_index: usize, reason: String },
    #[error("I/O error during serialization: {0}")]
    Io(#[from] std::io::Error)
}

/// Writes a read set to the given writer in the current format version.
/// # Arguments
/// * `read_set` - the reads to serialize
/// * `writer` - the destination of the bytes
/// # Errors
/// * if the writer fails
/// * if a read name is too long to record
pub fn encode<W: Write>(read_set: &ReadSet, writer: &mut W) -> Result<(), CodecError> {
    writer.write_all(MAGIC)?;
    writer.write_u16::<LittleEndian>(CURRENT_VERSION)?;
    writer.write_u8(AlleleEncoding::ByteIndex as u8)?;
    writer.write_u8(QualityEncoding::PhredU32 as u8)?;
    writer.write_u64::<LittleEndian>(read_set.len() as u64)?;

    for (read_index, read) in read_set.iter().enumerate() {
        match read.name() {
            Some(name) => {
                let name_len: u32 = encoded_name_len(name.len(), read_index)?;
                writer.write_u8(1)?;
                writer.write_u32::<LittleEndian>(name_len)?;
                writer.write_all(name.as_bytes())?;
            },
            None => writer.write_u8(0)?
        };
        write_optional_u64(writer, read.source_id())?;
        write_optional_u64(writer, read.sample_id())?;

        writer.write_u64::<LittleEndian>(read.len() as u64)?;
        for observation in read.observations().iter() {
            writer.write_u64::<LittleEndian>(observation.position())?;
            writer.write_u8(observation.allele().to_byte())?;
            writer.write_u32::<LittleEndian>(observation.quality())?;
        }
    }
    trace!("Encoded {} reads", read_set.len());
    Ok(())
}

/// Convenience wrapper that encodes into a new byte vector.
pub fn encode_to_vec(read_set: &ReadSet) -> Result<Vec<u8>, CodecError> {
    let mut buffer: Vec<u8> = vec![];
    encode(read_set, &mut buffer)?;
    Ok(buffer)
}

/// Name lengths are stored as u32, anything longer cannot be written
fn encoded_name_len(len: usize, read_index: usize) -> Result<u32, CodecError> {
    u32::try_from(len).map_err(|_| CodecError::Unencodable {
        read_index,
        reason: format!("name length {len} exceeds the {} byte limit", u32::MAX)
    })
}

fn write_optional_u64<W: Write>(writer: &mut W, value: Option<u64>) -> std::io::Result<()> {
    match value {
        Some(v) => {
            writer.write_u8(1)?;
            writer.write_u64::<LittleEndian>(v)
        },
        None => writer.write_u8(0)
    }
}

/// Reads all of `reader` and decodes it into a read set.
/// # Errors
/// * if the reader fails
/// * anything `decode` returns
pub fn decode_from_reader<R: IoRead>(reader: &mut R) -> Result<ReadSet, CodecError> {
    let mut buffer: Vec<u8> = vec![];
    reader.read_to_end(&mut buffer)?;
    decode(&buffer)
}

/// Decodes a complete serialized read set, re-validating every read.
/// # Arguments
/// * `bytes` - the full serialized stream
/// # Errors
/// * `UnsupportedVersion` if the version or encodings are not ones we understand
/// * `CorruptData` if the stream is truncated, has trailing data, or breaks a read invariant
pub fn decode(bytes: &[u8]) -> Result<ReadSet, CodecError> {
    let mut decoder = Decoder::new(bytes);

    let magic = decoder.read_bytes(MAGIC.len(), "magic")?;
    if magic != MAGIC {
        return Err(CodecError::CorruptData(format!("bad magic {magic:?}, this is not a serialized read set")));
    }

    let version: u16 = decoder.read_u16("version")?;
    let read_set = match version {
        1 => {
            debug!("Upgrading version 1 read set on load");
            decoder.read_v1()?
        },
        2 => {
            let allele_byte = decoder.read_u8("allele encoding")?;
            if AlleleEncoding::from_repr(allele_byte).is_none() {
                return Err(CodecError::UnsupportedVersion { found: format!("allele encoding {allele_byte}") });
            }
            let quality_byte = decoder.read_u8("quality encoding")?;
            if QualityEncoding::from_repr(quality_byte).is_none() {
                return Err(CodecError::UnsupportedVersion { found: format!("quality encoding {quality_byte}") });
            }
            decoder.read_v2()?
        },
        v => return Err(CodecError::UnsupportedVersion { found: format!("version {v}") })
    };

    if decoder.remaining() > 0 {
        return Err(CodecError::CorruptData(format!("{} unexpected bytes after the final read", decoder.remaining())));
    }
    debug!("Decoded {} reads from {} bytes", read_set.len(), bytes.len());
    Ok(read_set)
}

/// Bounds-checked reader over an in-memory stream
struct Decoder<'a> {
    cursor: Cursor<&'a [u8]>
}

impl<'a> Decoder<'a> {
    fn new(bytes: &'a [u8]) -> Decoder<'a> {
        Decoder {
            cursor: Cursor::new(bytes)
        }
    }

    /// Number of bytes not yet consumed
    fn remaining(&self) -> usize {
        let total = self.cursor.get_ref().len();
        total.saturating_sub(self.cursor.position() as usize)
    }

    fn truncated(&self, field: &str) -> CodecError {
        CodecError::CorruptData(format!("stream truncated while reading {field} at byte {}", self.cursor.position()))
    }

    fn read_u8(&mut self, field: &str) -> Result<u8, CodecError> {
        self.cursor.read_u8().map_err(|_| self.truncated(field))
    }

    fn read_u16(&mut self, field: &str) -> Result<u16, CodecError> {
        self.cursor.read_u16::<LittleEndian>().map_err(|_| self.truncated(field))
    }

    fn read_u32(&mut self, field: &str) -> Result<u32, CodecError> {
        self.cursor.read_u32::<LittleEndian>().map_err(|_| self.truncated(field))
    }

    fn read_u64(&mut self, field: &str) -> Result<u64, CodecError> {
        self.cursor.read_u64::<LittleEndian>().map_err(|_| self.truncated(field))
    }

    fn read_i32(&mut self, field: &str) -> Result<i32, CodecError> {
        self.cursor.read_i32::<LittleEndian>().map_err(|_| self.truncated(field))
    }

    fn read_i64(&mut self, field: &str) -> Result<i64, CodecError> {
        self.cursor.read_i64::<LittleEndian>().map_err(|_| self.truncated(field))
    }

    /// Reads exactly `len` bytes, failing before any allocation if they are not all present
    fn read_bytes(&mut self, len: usize, field: &str) -> Result<&'a [u8], CodecError> {
        if len > self.remaining() {
            return Err(self.truncated(field));
        }
        let data: &'a [u8] = *self.cursor.get_ref();
        let start = self.cursor.position() as usize;
        let bytes: &'a [u8] = &data[start..start + len];
        self.cursor.set_position((start + len) as u64);
        Ok(bytes)
    }

    /// Reads a u64 count and makes sure that many records of `record_bytes` could fit in the rest of the stream
    fn read_count(&mut self, field: &str, record_bytes: usize) -> Result<usize, CodecError> {
        let count: u64 = self.read_u64(field)?;
        let max_count: u64 = (self.remaining() / record_bytes) as u64;
        if count > max_count {
            return Err(CodecError::CorruptData(format!(
                "{field} of {count} cannot fit in the remaining {} bytes", self.remaining()
            )));
        }
        Ok(count as usize)
    }

    fn read_name(&mut self, len: usize, read_index: usize) -> Result<String, CodecError> {
        let field = format!("name of read {read_index}");
        let bytes = self.read_bytes(len, &field)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| CodecError::CorruptData(format!("{field} is not valid UTF-8: {e}")))
    }

    fn read_flag(&mut self, field: &str) -> Result<bool, CodecError> {
        match self.read_u8(field)? {
            0 => Ok(false),
            1 => Ok(true),
            f => Err(CodecError::CorruptData(format!("{field} presence flag must be 0 or 1, found {f}")))
        }
    }

    fn read_v2(&mut self) -> Result<ReadSet, CodecError> {
        let num_reads = self.read_count("read count", V2_READ_MIN_BYTES)?;
        let mut read_set = ReadSet::new();
        for read_index in 0..num_reads {
            let name = if self.read_flag(&format!("name of read {read_index}"))? {
                let name_len = self.read_u32(&format!("name length of read {read_index}"))? as usize;
                Some(self.read_name(name_len, read_index)?)
            } else {
                None
            };
            let source_id = if self.read_flag(&format!("source id of read {read_index}"))? {
                Some(self.read_u64(&format!("source id of read {read_index}"))?)
            } else {
                None
            };
            let sample_id = if self.read_flag(&format!("sample id of read {read_index}"))? {
                Some(self.read_u64(&format!("sample id of read {read_index}"))?)
            } else {
                None
            };

            let num_obs = self.read_count(&format!("observation count of read {read_index}"), V2_OBSERVATION_BYTES)?;
            let mut observations: Vec<Observation> = Vec::with_capacity(num_obs);
            for obs_index in 0..num_obs {
                let field = format!("observation {obs_index} of read {read_index}");
                let position = self.read_u64(&field)?;
                let allele = Allele::from_byte(self.read_u8(&field)?);
                let quality = self.read_u32(&field)?;
                observations.push(Observation::new(position, allele, quality));
            }

            read_set.add(build_read(read_index, name, source_id, sample_id, observations)?);
        }
        Ok(read_set)
    }

    fn read_v1(&mut self) -> Result<ReadSet, CodecError> {
        let num_reads = self.read_count("read count", V1_READ_MIN_BYTES)?;
        let mut read_set = ReadSet::new();
        for read_index in 0..num_reads {
            let name_len = self.read_u32(&format!("name length of read {read_index}"))? as usize;
            let name = self.read_name(name_len, read_index)?;
            let name = if name.is_empty() { None } else { Some(name) };

            let source_id = upgrade_optional(
                self.read_i64(&format!("source id of read {read_index}"))?,
                "source id", read_index
            )?;
            let sample_id = upgrade_optional(
                self.read_i64(&format!("sample id of read {read_index}"))?,
                "sample id", read_index
            )?;

            let num_obs = self.read_count(&format!("observation count of read {read_index}"), V1_OBSERVATION_BYTES)?;
            let mut observations: Vec<Observation> = Vec::with_capacity(num_obs);
            for obs_index in 0..num_obs {
                let field = format!("observation {obs_index} of read {read_index}");
                let position = self.read_i64(&field)?;
                let allele = Allele::from_byte(self.read_u8(&field)?);
                let quality = self.read_i32(&field)?;
                let position: u64 = position.try_into()
                    .map_err(|_| CodecError::CorruptData(format!("{field} has negative position {position}")))?;
                let quality: u32 = quality.try_into()
                    .map_err(|_| CodecError::CorruptData(format!("{field} has negative quality {quality}")))?;
                observations.push(Observation::new(position, allele, quality));
            }

            read_set.add(build_read(read_index, name, source_id, sample_id, observations)?);
        }
        Ok(read_set)
    }
}

/// Converts a version 1 sentinel integer into an optional value
fn upgrade_optional(value: i64, label: &str, read_index: usize) -> Result<Option<u64>, CodecError> {
    match value {
        V1_ABSENT => Ok(None),
        v if v < 0 => Err(CodecError::CorruptData(format!("{label} of read {read_index} is negative ({v})"))),
        v => Ok(Some(v as u64))
    }
}

/// Builds a read from decoded fields, turning any invariant failure into corrupt data
fn build_read(
    read_index: usize, name: Option<String>, source_id: Option<u64>, sample_id: Option<u64>,
    observations: Vec<Observation>
) -> Result<Read, CodecError> {
    Read::from_observations(name, source_id, sample_id, observations)
        .map_err(|e| CodecError::CorruptData(format!("read {read_index}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_read_set() -> ReadSet {
        let mut read_set = ReadSet::new();
        let mut r1 = Read::new(Some("r1".to_string()), Some(1), None);
        r1.add_observation(100, Allele::Reference, 30).unwrap();
        r1.add_observation(105, Allele::Alternate(1), 25).unwrap();
        read_set.add(r1);

        let mut r2 = Read::new(None, Some(0), Some(0));
        r2.add_observation(0, Allele::Unknown, 0).unwrap();
        r2.add_observation(u64::MAX, Allele::Alternate(4), u32::MAX).unwrap();
        read_set.add(r2);

        read_set.add(Read::new(Some(String::new()), None, Some(12)));
        read_set
    }

    /// Builds the stream header with a given version and the standard encodings
    fn header(version: u16) -> Vec<u8> {
        let mut bytes: Vec<u8> = MAGIC.to_vec();
        bytes.write_u16::<LittleEndian>(version).unwrap();
        if version == 2 {
            bytes.write_u8(0).unwrap();
            bytes.write_u8(0).unwrap();
        }
        bytes
    }

    fn corrupt_message(result: Result<ReadSet, CodecError>) -> String {
        match result {
            Err(CodecError::CorruptData(message)) => message,
            other => panic!("expected CorruptData, got {other:?}")
        }
    }

    #[test]
    fn test_round_trip() {
        let read_set = example_read_set();
        let bytes = encode_to_vec(&read_set).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, read_set);
        assert_eq!(decoded.to_canonical_string(), read_set.to_canonical_string());

        // an empty name and zero ids must stay distinct from absent ones
        assert_eq!(decoded.get(2).unwrap().name(), Some(""));
        assert_eq!(decoded.get(1).unwrap().source_id(), Some(0));
        assert_eq!(decoded.get(0).unwrap().sample_id(), None);

        let empty = ReadSet::new();
        assert_eq!(decode(&encode_to_vec(&empty).unwrap()).unwrap(), empty);
    }

    #[test]
    fn test_known_scenario() {
        let mut read_set = ReadSet::new();
        let mut read = Read::new(Some("r1".to_string()), Some(1), None);
        read.add_observation(100, Allele::Reference, 30).unwrap();
        read.add_observation(105, Allele::Alternate(1), 25).unwrap();
        read_set.add(read.clone());

        let bytes = encode_to_vec(&read_set).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.get(0).unwrap(), &read);
        assert_eq!(decoded.to_canonical_string(), "r1 (1, -): 100:REF/30, 105:ALT/25");
    }

    #[test]
    fn test_allele_byte_range_round_trip() {
        // every allele a read accepts must come back unchanged
        let mut read = Read::new(Some("alleles".to_string()), None, None);
        for value in 0..=u8::MAX {
            read.add_observation(value as u64, Allele::from_byte(value), value as u32).unwrap();
        }
        let mut read_set = ReadSet::new();
        read_set.add(read);
        assert_eq!(decode(&encode_to_vec(&read_set).unwrap()).unwrap(), read_set);

        // ALT indices that would collide with the REF or unknown bytes never reach the encoder
        let mut read = Read::new(Some("r".to_string()), None, None);
        for index in [0_u8, u8::MAX] {
            assert!(read.add_observation(1, Allele::Alternate(index), 9).is_err());
            let observations = vec![Observation::new(1, Allele::Alternate(index), 9)];
            assert!(Read::from_observations(None, None, None, observations).is_err());
        }
        assert!(read.is_empty());
    }

    #[test]
    fn test_name_length_limit() {
        assert_eq!(encoded_name_len(12, 0).unwrap(), 12);
        assert_eq!(encoded_name_len(u32::MAX as usize, 0).unwrap(), u32::MAX);
        if let Some(too_long) = (u32::MAX as usize).checked_add(1) {
            assert!(matches!(
                encoded_name_len(too_long, 3),
                Err(CodecError::Unencodable { read_index: 3, .. })
            ));
        }
    }

    #[test]
    fn test_decode_from_reader() {
        let read_set = example_read_set();
        let bytes = encode_to_vec(&read_set).unwrap();
        let mut reader = Cursor::new(bytes);
        assert_eq!(decode_from_reader(&mut reader).unwrap(), read_set);
    }

    #[test]
    fn test_version_gate() {
        let mut bytes = header(3);
        // a claimed huge read count would be corrupt, but the version is checked first
        bytes.write_u64::<LittleEndian>(u64::MAX).unwrap();
        assert!(matches!(decode(&bytes), Err(CodecError::UnsupportedVersion { .. })));

        let bytes = header(0);
        assert!(matches!(decode(&bytes), Err(CodecError::UnsupportedVersion { .. })));

        let mut bytes = MAGIC.to_vec();
        bytes.write_u16::<LittleEndian>(2).unwrap();
        bytes.write_u8(0).unwrap();
        bytes.write_u8(7).unwrap();
        bytes.write_u64::<LittleEndian>(0).unwrap();
        assert!(matches!(decode(&bytes), Err(CodecError::UnsupportedVersion { .. })));
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = encode_to_vec(&example_read_set()).unwrap();
        bytes[0] = b'X';
        assert!(corrupt_message(decode(&bytes)).contains("magic"));
        assert!(matches!(decode(&[]), Err(CodecError::CorruptData(_))));
    }

    #[test]
    fn test_truncation() {
        let bytes = encode_to_vec(&example_read_set()).unwrap();
        // every strict prefix must fail cleanly
        for cut in 0..bytes.len() {
            assert!(matches!(decode(&bytes[..cut]), Err(CodecError::CorruptData(_))), "prefix of {cut} bytes decoded");
        }

        let mut extended = bytes.clone();
        extended.push(0);
        assert!(corrupt_message(decode(&extended)).contains("unexpected bytes"));
    }

    #[test]
    fn test_unbounded_counts() {
        let mut bytes = header(2);
        bytes.write_u64::<LittleEndian>(u64::MAX).unwrap();
        assert!(corrupt_message(decode(&bytes)).contains("read count"));

        let mut bytes = header(2);
        bytes.write_u64::<LittleEndian>(1).unwrap();
        bytes.extend_from_slice(&[0, 0, 0]);
        bytes.write_u64::<LittleEndian>(1_000_000_000).unwrap();
        bytes.extend_from_slice(&[0; 13]);
        assert!(corrupt_message(decode(&bytes)).contains("observation count of read 0"));

        let mut bytes = header(2);
        bytes.write_u64::<LittleEndian>(1).unwrap();
        bytes.write_u8(1).unwrap();
        bytes.write_u32::<LittleEndian>(u32::MAX).unwrap();
        bytes.extend_from_slice(&[0; 11]);
        assert!(corrupt_message(decode(&bytes)).contains("name of read 0"));
    }

    #[test]
    fn test_duplicate_position() {
        let mut bytes = header(2);
        bytes.write_u64::<LittleEndian>(1).unwrap();
        bytes.extend_from_slice(&[0, 0, 0]);
        bytes.write_u64::<LittleEndian>(2).unwrap();
        for _ in 0..2 {
            bytes.write_u64::<LittleEndian>(50).unwrap();
            bytes.write_u8(0).unwrap();
            bytes.write_u32::<LittleEndian>(10).unwrap();
        }
        let message = corrupt_message(decode(&bytes));
        assert!(message.contains("read 0"));
        assert!(message.contains("unique and ascending"));
    }

    #[test]
    fn test_bad_flag() {
        let mut bytes = header(2);
        bytes.write_u64::<LittleEndian>(1).unwrap();
        bytes.extend_from_slice(&[2, 0, 0]);
        bytes.write_u64::<LittleEndian>(0).unwrap();
        assert!(corrupt_message(decode(&bytes)).contains("presence flag"));
    }

    /// Appends a version 1 read record
    fn push_v1_read(bytes: &mut Vec<u8>, name: &str, source_id: i64, sample_id: i64, obs: &[(i64, u8, i32)]) {
        bytes.write_u32::<LittleEndian>(name.len() as u32).unwrap();
        bytes.extend_from_slice(name.as_bytes());
        bytes.write_i64::<LittleEndian>(source_id).unwrap();
        bytes.write_i64::<LittleEndian>(sample_id).unwrap();
        bytes.write_u64::<LittleEndian>(obs.len() as u64).unwrap();
        for &(position, allele, quality) in obs.iter() {
            bytes.write_i64::<LittleEndian>(position).unwrap();
            bytes.write_u8(allele).unwrap();
            bytes.write_i32::<LittleEndian>(quality).unwrap();
        }
    }

    #[test]
    fn test_v1_upgrade() {
        let mut bytes = header(1);
        bytes.write_u64::<LittleEndian>(2).unwrap();
        push_v1_read(&mut bytes, "r1", 1, -1, &[(100, 0, 30), (105, 1, 25)]);
        push_v1_read(&mut bytes, "", -1, 0, &[]);

        let read_set = decode(&bytes).unwrap();
        assert_eq!(read_set.to_canonical_string(), "r1 (1, -): 100:REF/30, 105:ALT/25\n- (-, 0):");

        // upgraded sets always write out as the current version
        let upgraded = encode_to_vec(&read_set).unwrap();
        assert_eq!(&upgraded[4..6], &CURRENT_VERSION.to_le_bytes());
        assert_eq!(decode(&upgraded).unwrap(), read_set);
    }

    #[test]
    fn test_v1_negative_values() {
        let mut bytes = header(1);
        bytes.write_u64::<LittleEndian>(1).unwrap();
        push_v1_read(&mut bytes, "r1", -5, -1, &[]);
        assert!(corrupt_message(decode(&bytes)).contains("source id of read 0 is negative"));

        let mut bytes = header(1);
        bytes.write_u64::<LittleEndian>(1).unwrap();
        push_v1_read(&mut bytes, "r1", 1, -1, &[(-3, 0, 30)]);
        assert!(corrupt_message(decode(&bytes)).contains("negative position"));

        let mut bytes = header(1);
        bytes.write_u64::<LittleEndian>(1).unwrap();
        push_v1_read(&mut bytes, "r1", 1, -1, &[(3, 0, -30)]);
        assert!(corrupt_message(decode(&bytes)).contains("negative quality"));
    }
}
