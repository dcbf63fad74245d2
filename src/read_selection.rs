
use crate::data_types::read::Read;
use crate::data_types::read_set::ReadSet;

use log::{debug, info};
use priority_queue::PriorityQueue;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Priority of a read during selection: (score, initial score, minimum quality, lower index first)
type ReadPriority = (i64, i64, u32, Reverse<usize>);

/// The outcome of selecting a coverage-bounded subset of reads
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReadSelection {
    /// the selected read indices, ascending
    pub selected: Vec<usize>,
    /// maps every variant position to the smallest position in its connected component under the selected reads
    pub components: HashMap<u64, u64>,
    /// the number of reads with fewer than two observations, these are never selected
    pub num_unusable: usize,
    /// the number of selection rounds performed
    pub num_iterations: usize
}

/// Tracks how many selected reads span each variant index
struct CoverageMonitor {
    coverage: Vec<usize>
}

impl CoverageMonitor {
    fn new(num_variants: usize) -> CoverageMonitor {
        CoverageMonitor {
            coverage: vec![0; num_variants]
        }
    }

    /// Maximum coverage over `begin..end`, 0 for an empty range
    fn max_coverage(&self, begin: usize, end: usize) -> usize {
        self.coverage[begin..end].iter().copied().max().unwrap_or(0)
    }

    fn add_read(&mut self, begin: usize, end: usize) {
        for c in self.coverage[begin..end].iter_mut() {
            *c += 1;
        }
    }
}

/// Union-find over variant indices; roots are always the smallest index in the component
struct ComponentFinder {
    parents: Vec<usize>
}

impl ComponentFinder {
    fn new(num_variants: usize) -> ComponentFinder {
        ComponentFinder {
            parents: (0..num_variants).collect()
        }
    }

    fn find(&mut self, index: usize) -> usize {
        let mut root = index;
        while self.parents[root] != root {
            root = self.parents[root];
        }
        // path compression
        let mut current = index;
        while self.parents[current] != root {
            let next = self.parents[current];
            self.parents[current] = root;
            current = next;
        }
        root
    }

    fn merge(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a < root_b {
            self.parents[root_b] = root_a;
        } else if root_b < root_a {
            self.parents[root_a] = root_b;
        }
    }

    /// Joins every variant in `variant_indices` into one component
    fn merge_all(&mut self, variant_indices: &[usize]) {
        if let Some((&first, rest)) = variant_indices.split_first() {
            for &other in rest.iter() {
                self.merge(first, other);
            }
        }
    }
}

/// Shared lookup tables for a selection run
struct SelectionContext<'a> {
    read_set: &'a ReadSet,
    /// the variant indices covered by each read, ascending
    read_variants: Vec<Vec<usize>>,
    /// the reads covering each variant index
    variant_reads: Vec<Vec<usize>>,
    max_coverage: usize
}

impl<'a> SelectionContext<'a> {
    fn new(read_set: &'a ReadSet, positions: &[u64], max_coverage: usize) -> SelectionContext<'a> {
        let position_index: HashMap<u64, usize> = positions.iter().enumerate()
            .map(|(i, &p)| (p, i))
            .collect();
        let mut variant_reads: Vec<Vec<usize>> = vec![vec![]; positions.len()];
        let read_variants: Vec<Vec<usize>> = read_set.iter().enumerate()
            .map(|(read_index, read)| {
                read.positions()
                    .map(|p| {
                        // every read position is in the index by construction
                        let variant_index = position_index[&p];
                        variant_reads[variant_index].push(read_index);
                        variant_index
                    })
                    .collect()
            })
            .collect();

        SelectionContext {
            read_set,
            read_variants,
            variant_reads,
            max_coverage
        }
    }

    fn read(&self, read_index: usize) -> &Read {
        &self.read_set.reads()[read_index]
    }

    /// The variant index range spanned by a read, end exclusive
    fn span(&self, read_index: usize) -> (usize, usize) {
        let variants = &self.read_variants[read_index];
        match (variants.first(), variants.last()) {
            (Some(&begin), Some(&end)) => (begin, end + 1),
            _ => (0, 0)
        }
    }

    /// Scores a read by the variants it covers minus the gaps in its span, then by its lowest quality
    fn score(&self, read_index: usize) -> ReadPriority {
        let (begin, end) = self.span(read_index);
        let covered = self.read_variants[read_index].len() as i64;
        let gaps = (end - begin) as i64 - covered;
        let min_quality = self.read(read_index).observations().iter()
            .map(|o| o.quality())
            .min()
            .unwrap_or(0);
        (covered - gaps, covered - gaps, min_quality, Reverse(read_index))
    }

    fn build_queue(&self, read_indices: &BTreeSet<usize>) -> PriorityQueue<usize, ReadPriority> {
        let mut pqueue: PriorityQueue<usize, ReadPriority> = PriorityQueue::new();
        for &read_index in read_indices.iter() {
            pqueue.push(read_index, self.score(read_index));
        }
        pqueue
    }

    /// Greedily picks reads that each cover at least one variant not yet covered in this slice.
    /// Returns the reads picked and the reads rejected for exceeding the coverage limit.
    fn select_slice(&self, pqueue: &mut PriorityQueue<usize, ReadPriority>, coverage: &mut CoverageMonitor) -> (Vec<usize>, Vec<usize>) {
        let mut covered: HashSet<usize> = Default::default();
        let mut slice: Vec<usize> = vec![];
        let mut violating: Vec<usize> = vec![];

        while let Some((read_index, _priority)) = pqueue.pop() {
            let new_variants: Vec<usize> = self.read_variants[read_index].iter()
                .copied()
                .filter(|v| !covered.contains(v))
                .collect();
            let (begin, end) = self.span(read_index);

            if coverage.max_coverage(begin, end) >= self.max_coverage {
                violating.push(read_index);
            } else if !new_variants.is_empty() {
                coverage.add_read(begin, end);
                slice.push(read_index);

                // reads still in the queue lose one point for each variant this read just covered
                let mut decrements: HashMap<usize, i64> = Default::default();
                for &variant_index in new_variants.iter() {
                    covered.insert(variant_index);
                    for &other in self.variant_reads[variant_index].iter() {
                        if pqueue.get_priority(&other).is_some() {
                            *decrements.entry(other).or_insert(0) += 1;
                        }
                    }
                }
                for (other, decrement) in decrements.into_iter() {
                    pqueue.change_priority_by(&other, |priority| priority.0 -= decrement);
                }
            }
        }
        (slice, violating)
    }
}

/// Selects a subset of reads such that no variant is spanned by more than `max_coverage` selected reads,
/// preferring reads that cover many variants with few gaps.
/// Reads are picked in rounds; each round covers as many variants as possible, then (optionally) adds
/// bridging reads that connect otherwise disjoint components.
/// # Arguments
/// * `read_set` - the reads to select from
/// * `max_coverage` - the maximum number of selected reads allowed to span a variant
/// * `bridging` - if true, also select reads that join separate connected components
pub fn select_reads(read_set: &ReadSet, max_coverage: usize, bridging: bool) -> ReadSelection {
    let positions: Vec<u64> = read_set.positions();
    let context = SelectionContext::new(read_set, &positions, max_coverage);
    info!("Running read selection for {} reads covering {} variants (bridging {})",
        read_set.len(), positions.len(), if bridging { "ON" } else { "OFF" });

    let mut coverage = CoverageMonitor::new(positions.len());
    let mut selected: BTreeSet<usize> = BTreeSet::new();
    let mut undecided: BTreeSet<usize> = read_set.iter().enumerate()
        .filter(|(_i, r)| r.len() >= 2)
        .map(|(i, _r)| i)
        .collect();
    let num_unusable: usize = read_set.len() - undecided.len();

    let mut num_iterations: usize = 0;
    while !undecided.is_empty() {
        let mut pqueue = context.build_queue(&undecided);
        let (slice, violating) = context.select_slice(&mut pqueue, &mut coverage);
        for read_index in slice.iter().chain(violating.iter()) {
            undecided.remove(read_index);
        }
        selected.extend(slice.iter().copied());

        // components from just this slice, bridging reads join them
        let mut component_finder = ComponentFinder::new(positions.len());
        for &read_index in slice.iter() {
            component_finder.merge_all(&context.read_variants[read_index]);
        }

        let mut bridging_reads: Vec<usize> = vec![];
        if bridging {
            let mut pqueue = context.build_queue(&undecided);
            while let Some((read_index, _priority)) = pqueue.pop() {
                let (begin, end) = context.span(read_index);
                if coverage.max_coverage(begin, end) >= max_coverage {
                    undecided.remove(&read_index);
                    continue;
                }

                let covered_blocks: HashSet<usize> = context.read_variants[read_index].iter()
                    .map(|&v| component_finder.find(v))
                    .collect();
                if covered_blocks.len() < 2 {
                    continue;
                }

                bridging_reads.push(read_index);
                selected.insert(read_index);
                coverage.add_read(begin, end);
                undecided.remove(&read_index);
                component_finder.merge_all(&context.read_variants[read_index]);
            }
        }

        num_iterations += 1;
        info!("... iteration {}: selected {} reads (source: {}) to cover positions and {} reads (source: {}) for bridging; {} reads left undecided",
            num_iterations,
            slice.len(), read_set.source_id_counts(&slice).unwrap_or_default(),
            bridging_reads.len(), read_set.source_id_counts(&bridging_reads).unwrap_or_default(),
            undecided.len()
        );
    }

    // final components are built from everything that was selected
    let mut component_finder = ComponentFinder::new(positions.len());
    for &read_index in selected.iter() {
        component_finder.merge_all(&context.read_variants[read_index]);
    }
    let components: HashMap<u64, u64> = positions.iter().enumerate()
        .map(|(i, &p)| (p, positions[component_finder.find(i)]))
        .collect();
    debug!("Read selection kept {} of {} reads, {} reads were unusable", selected.len(), read_set.len(), num_unusable);

    ReadSelection {
        selected: selected.into_iter().collect(),
        components,
        num_unusable,
        num_iterations
    }
}
