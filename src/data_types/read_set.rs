
use crate::data_types::observations::{Allele, Observation};
use crate::data_types::read::Read;

use log::{debug, trace};
use std::collections::BTreeMap;
use std::fmt;

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum ReadSetError {
    #[error("read index {index} is out of range for a read set of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    #[error("reads with source id {source_id} disagree at position {position}: {first} vs {second}")]
    ConflictingObservation { source_id: u64, position: u64, first: Allele, second: Allele }
}

/// An ordered collection of reads forming one phasing problem instance.
/// Reads are indexed by insertion order, and that order is preserved for rendering and downstream phasing.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReadSet {
    /// the reads in insertion order
    reads: Vec<Read>
}

impl ReadSet {
    pub fn new() -> ReadSet {
        Self::default()
    }

    /// Adds a read to the end of the set and returns its index.
    pub fn add(&mut self, read: Read) -> usize {
        self.reads.push(read);
        self.reads.len() - 1
    }

    /// Returns the read at a given index.
    /// # Errors
    /// * if `index` is not a valid index into the set
    pub fn get(&self, index: usize) -> Result<&Read, ReadSetError> {
        self.reads.get(index).ok_or(ReadSetError::IndexOutOfRange { index, size: self.reads.len() })
    }

    /// Returns the number of reads in the set
    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Read> {
        self.reads.iter()
    }

    pub fn reads(&self) -> &[Read] {
        &self.reads
    }

    /// Returns the sorted, de-duplicated list of every position observed by any read.
    pub fn positions(&self) -> Vec<u64> {
        let mut positions: Vec<u64> = self.reads.iter()
            .flat_map(|r| r.positions())
            .collect();
        positions.sort_unstable();
        positions.dedup();
        positions
    }

    /// Creates a new read set containing copies of the reads at the given indices, in the given order.
    /// # Errors
    /// * if any index is out of range
    pub fn subset(&self, indices: &[usize]) -> Result<ReadSet, ReadSetError> {
        let reads = indices.iter()
            .map(|&i| self.get(i).cloned())
            .collect::<Result<Vec<Read>, ReadSetError>>()?;
        Ok(ReadSet { reads })
    }

    /// Summarizes the source ids for the reads at the given indices as "source:count" pairs.
    /// Reads without a source id are counted under "-", and an empty index list returns "n/a".
    /// # Errors
    /// * if any index is out of range
    pub fn source_id_counts(&self, indices: &[usize]) -> Result<String, ReadSetError> {
        if indices.is_empty() {
            return Ok("n/a".to_string());
        }
        let mut counts: BTreeMap<Option<u64>, usize> = BTreeMap::new();
        for &index in indices.iter() {
            *counts.entry(self.get(index)?.source_id()).or_insert(0) += 1;
        }
        Ok(counts.iter()
            .map(|(source_id, count)| match source_id {
                Some(s) => format!("{s}:{count}"),
                None => format!("-:{count}")
            })
            .collect::<Vec<String>>()
            .join(", "))
    }

    /// Combines every read with the given source id into a single read.
    /// The merged read takes the place of the first read in the group and the others are removed,
    /// so any reads after the removed ones shift down.
    /// Observations that agree on the allele keep the higher quality.
    /// The merged read keeps the name and sample id of the first read in the group,
    /// values from the other reads are dropped even when they differ.
    /// Returns the index of the merged read, or None if no read has the source id.
    /// # Arguments
    /// * `source_id` - the fragment key to merge on
    /// # Errors
    /// * if two reads in the group report different alleles at the same position; the set is unchanged in this case
    pub fn merge_by_source(&mut self, source_id: u64) -> Result<Option<usize>, ReadSetError> {
        let group: Vec<usize> = self.reads.iter().enumerate()
            .filter(|(_i, r)| r.source_id() == Some(source_id))
            .map(|(i, _r)| i)
            .collect();

        let first_index = match group.first() {
            Some(&i) => i,
            None => return Ok(None)
        };
        if group.len() == 1 {
            return Ok(Some(first_index));
        }

        // build the full merged result before touching any read
        let mut merged: Vec<Observation> = self.reads[first_index].observations().to_vec();
        for &index in group[1..].iter() {
            merged = merge_observations(&merged, self.reads[index].observations())
                .map_err(|(position, first, second)| ReadSetError::ConflictingObservation {
                    source_id, position, first, second
                })?;
        }

        trace!("Merged {} reads with source id {} into {} observations", group.len(), source_id, merged.len());
        self.reads[first_index].set_observations(merged);
        for &index in group[1..].iter().rev() {
            self.reads.remove(index);
        }
        Ok(Some(first_index))
    }

    /// Merges every source id group in the set, in order of first appearance.
    /// Either every group merges or the set is left unchanged.
    /// # Errors
    /// * if any group contains conflicting observations
    pub fn merge_all_sources(&mut self) -> Result<(), ReadSetError> {
        let mut source_ids: Vec<u64> = vec![];
        for source_id in self.reads.iter().filter_map(|r| r.source_id()) {
            if !source_ids.contains(&source_id) {
                source_ids.push(source_id);
            }
        }

        let mut merged_set: ReadSet = self.clone();
        for &source_id in source_ids.iter() {
            merged_set.merge_by_source(source_id)?;
        }
        debug!("Merged {} reads into {} across {} source ids", self.len(), merged_set.len(), source_ids.len());
        *self = merged_set;
        Ok(())
    }

    /// Renders every read on its own line in index order; no trailing newline after the last read.
    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }
}

impl<'a> IntoIterator for &'a ReadSet {
    type Item = &'a Read;
    type IntoIter = std::slice::Iter<'a, Read>;

    fn into_iter(self) -> Self::IntoIter {
        self.reads.iter()
    }
}

impl fmt::Display for ReadSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, read) in self.reads.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{read}")?;
        }
        Ok(())
    }
}

/// Two-pointer merge of two sorted observation lists.
/// On a conflict, returns the position and the two disagreeing alleles.
fn merge_observations(a: &[Observation], b: &[Observation]) -> Result<Vec<Observation>, (u64, Allele, Allele)> {
    let mut merged: Vec<Observation> = Vec::with_capacity(a.len() + b.len());
    let mut i: usize = 0;
    let mut j: usize = 0;
    while i < a.len() && j < b.len() {
        let (oa, ob) = (a[i], b[j]);
        if oa.position() < ob.position() {
            merged.push(oa);
            i += 1;
        } else if ob.position() < oa.position() {
            merged.push(ob);
            j += 1;
        } else {
            if oa.allele() != ob.allele() {
                return Err((oa.position(), oa.allele(), ob.allele()));
            }
            merged.push(Observation::new(oa.position(), oa.allele(), oa.quality().max(ob.quality())));
            i += 1;
            j += 1;
        }
    }
    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);
    Ok(merged)
}
