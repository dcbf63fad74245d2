
/// Contains the Allele and Observation types that make up a read
pub mod observations;
/// Contains the Read type, an ordered set of observations from one sequencing fragment
pub mod read;
/// Contains the ReadSet type, the full collection of reads for one phasing problem
pub mod read_set;
