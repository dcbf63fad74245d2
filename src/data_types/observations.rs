
use std::fmt;

/// Byte value reserved for an allele that could not be determined
pub const UNKNOWN_ALLELE_BYTE: u8 = u8::MAX;
/// The largest ALT index that has its own byte value
pub const MAX_ALT_INDEX: u8 = UNKNOWN_ALLELE_BYTE - 1;

/// The allele reported by a read at a variant position.
/// Multi-allelic sites are supported through the ALT index.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Allele {
    /// Matches the reference allele, index 0
    Reference,
    /// Matches an alternate allele, the index is 1-based into the ALT list (1..=254)
    Alternate(u8),
    /// The read overlaps the position but the allele could not be assigned
    Unknown
}

impl Allele {
    /// Creates an ALT allele, returning None if `index` is outside 1..=254
    pub fn alternate(index: u8) -> Option<Allele> {
        if (1..=MAX_ALT_INDEX).contains(&index) {
            Some(Allele::Alternate(index))
        } else {
            None
        }
    }

    /// False only for an `Alternate` whose index collides with the REF or unknown byte
    pub fn is_valid(self) -> bool {
        match self {
            Allele::Alternate(index) => (1..=MAX_ALT_INDEX).contains(&index),
            _ => true
        }
    }

    /// Converts the allele into its single byte representation.
    pub fn to_byte(self) -> u8 {
        match self {
            Allele::Reference => 0,
            Allele::Alternate(index) => index,
            Allele::Unknown => UNKNOWN_ALLELE_BYTE
        }
    }

    /// Converts a single byte back into an allele, every byte value is valid.
    pub fn from_byte(value: u8) -> Allele {
        match value {
            0 => Allele::Reference,
            UNKNOWN_ALLELE_BYTE => Allele::Unknown,
            index => Allele::Alternate(index)
        }
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Allele::Reference => write!(f, "REF"),
            Allele::Alternate(1) => write!(f, "ALT"),
            Allele::Alternate(index) => write!(f, "ALT{index}"),
            Allele::Unknown => write!(f, "?")
        }
    }
}

/// A single (position, allele, quality) triple reported by a read.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Observation {
    /// the 0-based coordinate of the variant
    position: u64,
    /// the allele the read supports at this position
    allele: Allele,
    /// Phred-like confidence in the allele assignment
    quality: u32
}

impl Observation {
    /// Creates a new observation.
    /// # Arguments
    /// * `position` - the coordinate of the variant
    /// * `allele` - the allele observed in the read
    /// * `quality` - the Phred-like quality of the assignment
    pub fn new(position: u64, allele: Allele, quality: u32) -> Observation {
        Observation {
            position,
            allele,
            quality
        }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn allele(&self) -> Allele {
        self.allele
    }

    pub fn quality(&self) -> u32 {
        self.quality
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.position, self.allele, self.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allele_bytes() {
        assert_eq!(Allele::from_byte(0), Allele::Reference);
        assert_eq!(Allele::from_byte(1), Allele::Alternate(1));
        assert_eq!(Allele::from_byte(3), Allele::Alternate(3));
        assert_eq!(Allele::from_byte(255), Allele::Unknown);
        for value in 0..=u8::MAX {
            assert_eq!(Allele::from_byte(value).to_byte(), value);
        }
    }

    #[test]
    fn test_alternate_range() {
        assert_eq!(Allele::alternate(0), None);
        assert_eq!(Allele::alternate(1), Some(Allele::Alternate(1)));
        assert_eq!(Allele::alternate(MAX_ALT_INDEX), Some(Allele::Alternate(254)));
        assert_eq!(Allele::alternate(255), None);
        assert!(!Allele::Alternate(0).is_valid());
        assert!(!Allele::Alternate(255).is_valid());
        assert!(Allele::Reference.is_valid());
        assert!(Allele::Unknown.is_valid());
    }

    #[test]
    fn test_display() {
        assert_eq!(Allele::Reference.to_string(), "REF");
        assert_eq!(Allele::Alternate(1).to_string(), "ALT");
        assert_eq!(Allele::Alternate(2).to_string(), "ALT2");
        assert_eq!(Allele::Unknown.to_string(), "?");
        assert_eq!(Observation::new(100, Allele::Reference, 30).to_string(), "100:REF/30");
        assert_eq!(Observation::new(7, Allele::Alternate(3), 0).to_string(), "7:ALT3/0");
    }
}
