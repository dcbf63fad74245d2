
use crate::data_types::observations::{Allele, Observation};

use std::fmt;

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum ReadError {
    #[error("observation positions must be unique and ascending, position {position} violates this")]
    InvariantViolation { position: u64 },
    #[error("ALT index {index} at position {position} is outside 1..=254")]
    InvalidAllele { position: u64, index: u8 }
}

/// Rejects ALT indices that share a byte value with REF or unknown
fn check_allele(position: u64, allele: Allele) -> Result<(), ReadError> {
    match allele {
        Allele::Alternate(index) if !allele.is_valid() => Err(ReadError::InvalidAllele { position, index }),
        _ => Ok(())
    }
}

/// Container for the variant observations of a single sequencing fragment.
/// Observations are always sorted by position and no position is repeated.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Read {
    /// the observations, sorted ascending by position
    observations: Vec<Observation>,
    /// the read name, if known
    name: Option<String>,
    /// groups reads from the same physical fragment (e.g. mate pairs)
    source_id: Option<u64>,
    /// the originating sample in multi-sample data
    sample_id: Option<u64>
}

impl Read {
    /// Creates a new read with no observations.
    /// # Arguments
    /// * `name` - optional read name
    /// * `source_id` - optional fragment grouping key
    /// * `sample_id` - optional sample identifier
    pub fn new(name: Option<String>, source_id: Option<u64>, sample_id: Option<u64>) -> Read {
        Read {
            observations: vec![],
            name,
            source_id,
            sample_id
        }
    }

    /// Creates a read from a list of observations that is already in position order.
    /// # Arguments
    /// * `name` - optional read name
    /// * `source_id` - optional fragment grouping key
    /// * `sample_id` - optional sample identifier
    /// * `observations` - the observations, must be strictly ascending by position
    /// # Errors
    /// * if any position is less than or equal to the one before it
    /// * if any ALT index is outside 1..=254
    pub fn from_observations(
        name: Option<String>, source_id: Option<u64>, sample_id: Option<u64>,
        observations: Vec<Observation>
    ) -> Result<Read, ReadError> {
        if let Some(pair) = observations.windows(2).find(|w| w[0].position() >= w[1].position()) {
            return Err(ReadError::InvariantViolation { position: pair[1].position() });
        }
        for observation in observations.iter() {
            check_allele(observation.position(), observation.allele())?;
        }
        Ok(Read {
            observations,
            name,
            source_id,
            sample_id
        })
    }

    /// Inserts an observation, keeping the observations in position order.
    /// # Arguments
    /// * `position` - the coordinate of the variant
    /// * `allele` - the observed allele
    /// * `quality` - the Phred-like quality of the allele
    /// # Errors
    /// * if this read already has an observation at `position`
    /// * if `allele` is an ALT index outside 1..=254
    pub fn add_observation(&mut self, position: u64, allele: Allele, quality: u32) -> Result<(), ReadError> {
        check_allele(position, allele)?;
        match self.observations.binary_search_by_key(&position, |o| o.position()) {
            Ok(_) => Err(ReadError::InvariantViolation { position }),
            Err(insert_index) => {
                self.observations.insert(insert_index, Observation::new(position, allele, quality));
                Ok(())
            }
        }
    }

    /// Returns the observation at a given position, if this read covers it
    pub fn observation_at(&self, position: u64) -> Option<&Observation> {
        self.observations.binary_search_by_key(&position, |o| o.position())
            .ok()
            .map(|i| &self.observations[i])
    }

    /// Returns the number of observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Iterator over the observed positions in ascending order
    pub fn positions(&self) -> impl Iterator<Item = u64> + '_ {
        self.observations.iter().map(|o| o.position())
    }

    pub fn first_position(&self) -> Option<u64> {
        self.observations.first().map(|o| o.position())
    }

    pub fn last_position(&self) -> Option<u64> {
        self.observations.last().map(|o| o.position())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn source_id(&self) -> Option<u64> {
        self.source_id
    }

    pub fn sample_id(&self) -> Option<u64> {
        self.sample_id
    }

    /// Replaces the observations wholesale, only the owning set does this after validating a merge.
    pub(crate) fn set_observations(&mut self, observations: Vec<Observation>) {
        debug_assert!(observations.windows(2).all(|w| w[0].position() < w[1].position()));
        self.observations = observations;
    }
}

/// Writes an optional value, using "-" when it is absent
fn fmt_optional<T: fmt::Display>(f: &mut fmt::Formatter<'_>, value: Option<T>) -> fmt::Result {
    match value {
        Some(v) => write!(f, "{v}"),
        None => write!(f, "-")
    }
}

impl fmt::Display for Read {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_optional(f, self.name.as_deref())?;
        write!(f, " (")?;
        fmt_optional(f, self.source_id)?;
        write!(f, ", ")?;
        fmt_optional(f, self.sample_id)?;
        write!(f, "):")?;
        for (i, observation) in self.observations.iter().enumerate() {
            let separator = if i == 0 { " " } else { ", " };
            write!(f, "{separator}{observation}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_observation_sorted() {
        let mut read = Read::new(Some("r1".to_string()), None, None);
        read.add_observation(200, Allele::Alternate(1), 10).unwrap();
        read.add_observation(50, Allele::Reference, 20).unwrap();
        read.add_observation(120, Allele::Unknown, 0).unwrap();
        assert_eq!(read.len(), 3);
        assert_eq!(read.positions().collect::<Vec<u64>>(), vec![50, 120, 200]);
        assert_eq!(read.first_position(), Some(50));
        assert_eq!(read.last_position(), Some(200));
    }

    #[test]
    fn test_duplicate_position() {
        let mut read = Read::new(None, Some(1), None);
        read.add_observation(100, Allele::Reference, 30).unwrap();
        assert_eq!(
            read.add_observation(100, Allele::Alternate(1), 30),
            Err(ReadError::InvariantViolation { position: 100 })
        );
        // failed insert leaves the read alone
        assert_eq!(read.len(), 1);
        assert_eq!(read.observation_at(100).unwrap().allele(), Allele::Reference);
    }

    #[test]
    fn test_from_observations() {
        let good = vec![
            Observation::new(1, Allele::Reference, 5),
            Observation::new(4, Allele::Alternate(1), 5)
        ];
        let read = Read::from_observations(None, None, Some(2), good).unwrap();
        assert_eq!(read.sample_id(), Some(2));

        let unsorted = vec![
            Observation::new(4, Allele::Reference, 5),
            Observation::new(1, Allele::Alternate(1), 5)
        ];
        assert_eq!(
            Read::from_observations(None, None, None, unsorted),
            Err(ReadError::InvariantViolation { position: 1 })
        );
    }

    #[test]
    fn test_invalid_alt_index() {
        let mut read = Read::default();
        assert_eq!(
            read.add_observation(5, Allele::Alternate(0), 10),
            Err(ReadError::InvalidAllele { position: 5, index: 0 })
        );
        assert_eq!(
            read.add_observation(6, Allele::Alternate(255), 10),
            Err(ReadError::InvalidAllele { position: 6, index: 255 })
        );
        assert!(read.is_empty());

        let observations = vec![
            Observation::new(1, Allele::Reference, 5),
            Observation::new(2, Allele::Alternate(0), 5)
        ];
        assert_eq!(
            Read::from_observations(None, None, None, observations),
            Err(ReadError::InvalidAllele { position: 2, index: 0 })
        );
    }

    #[test]
    fn test_observation_at() {
        let mut read = Read::default();
        read.add_observation(10, Allele::Reference, 3).unwrap();
        read.add_observation(20, Allele::Alternate(2), 4).unwrap();
        assert_eq!(read.observation_at(20), Some(&Observation::new(20, Allele::Alternate(2), 4)));
        assert_eq!(read.observation_at(15), None);
        assert_eq!(Read::default().observation_at(0), None);
    }

    #[test]
    fn test_display() {
        let mut read = Read::new(Some("r1".to_string()), Some(1), None);
        read.add_observation(100, Allele::Reference, 30).unwrap();
        read.add_observation(105, Allele::Alternate(1), 25).unwrap();
        assert_eq!(read.to_string(), "r1 (1, -): 100:REF/30, 105:ALT/25");

        // absent and zero values are distinct
        let empty = Read::new(None, Some(0), Some(0));
        assert_eq!(empty.to_string(), "- (0, 0):");
    }
}
