use std::collections::HashMap;
use std::io::Write;

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::align::codon::back_translate;
use crate::align::{AlignConfig, AlignError, MultipleAligner};
use crate::core::types::{AlignedRecord, SequenceRecord, SequenceType};
use crate::output::corpus::write_aligned_record;
use crate::parsing::fasta::FastaEntry;
use crate::store::SequenceStore;

/// The stored sequences of one cluster, split by type
#[derive(Debug, Clone)]
pub struct ClusterSequences {
    pub cluster: String,
    pub proteins: Vec<SequenceRecord>,
    pub nucleotides: Vec<SequenceRecord>,
}

impl ClusterSequences {
    pub fn new(cluster: impl Into<String>, records: Vec<SequenceRecord>) -> Self {
        let (proteins, rest): (Vec<_>, Vec<_>) = records
            .into_iter()
            .partition(|r| r.seqtype == SequenceType::Protein);
        let nucleotides = rest
            .into_iter()
            .filter(|r| r.seqtype == SequenceType::Nucleotide)
            .collect();

        Self {
            cluster: cluster.into(),
            proteins,
            nucleotides,
        }
    }
}

/// Aligned records of one cluster: nucleotides first, then proteins
#[derive(Debug, Clone, Default)]
pub struct AlignedCluster {
    pub records: Vec<AlignedRecord>,
    /// Nucleotide sequences too short for their aligned protein
    pub dropped: usize,
}

/// Counts reported after an alignment run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlignSummary {
    pub clusters_aligned: usize,
    /// Clusters with fewer than two protein sequences
    pub clusters_skipped: usize,
    pub nucleotide_records: usize,
    pub protein_records: usize,
    pub dropped_nucleotides: usize,
}

/// Align the proteins of a cluster and back-translate its nucleotides.
///
/// A nucleotide sequence is kept only if it covers every residue of its
/// aligned protein; proteins are kept regardless.
pub fn align_cluster<A: MultipleAligner + ?Sized>(
    sequences: &ClusterSequences,
    aligner: &A,
) -> Result<AlignedCluster, AlignError> {
    let input: Vec<FastaEntry> = sequences
        .proteins
        .iter()
        .map(|p| FastaEntry::new(p.seqid.clone(), p.seq.clone()))
        .collect();
    let aligned = aligner.align(&input)?;

    let nucleotide_by_id: HashMap<&str, &SequenceRecord> = sequences
        .nucleotides
        .iter()
        .map(|n| (n.seqid.as_str(), n))
        .collect();
    let protein_by_id: HashMap<&str, &SequenceRecord> = sequences
        .proteins
        .iter()
        .map(|p| (p.seqid.as_str(), p))
        .collect();

    let mut result = AlignedCluster::default();
    let mut proteins = Vec::with_capacity(aligned.len());

    for aa in aligned {
        let nucleotide = nucleotide_by_id.get(aa.id.as_str()).copied();

        if let Some(na) = nucleotide {
            match back_translate(&aa.sequence, &na.seq) {
                Some(codons) => result.records.push(AlignedRecord {
                    cluster_id: sequences.cluster.clone(),
                    sequence_id: na.seqid.clone(),
                    sequence_type: SequenceType::Nucleotide,
                    aligned_sequence: codons,
                    genome: Some(na.genome.clone()),
                }),
                None => {
                    debug!(
                        "{}: nucleotide sequence of {} shorter than its protein, dropped",
                        sequences.cluster, aa.id
                    );
                    result.dropped += 1;
                }
            }
        }

        let genome = nucleotide
            .or_else(|| protein_by_id.get(aa.id.as_str()).copied())
            .map(|r| r.genome.clone());
        proteins.push(AlignedRecord {
            cluster_id: sequences.cluster.clone(),
            sequence_id: aa.id,
            sequence_type: SequenceType::Protein,
            aligned_sequence: aa.sequence,
            genome,
        });
    }

    result.records.extend(proteins);
    Ok(result)
}

/// Aligns every cluster of a store and writes the alignment corpus
pub struct ClusterAligner<'a, A: MultipleAligner> {
    store: &'a SequenceStore,
    aligner: &'a A,
    config: AlignConfig,
}

impl<'a, A: MultipleAligner> ClusterAligner<'a, A> {
    pub fn new(store: &'a SequenceStore, aligner: &'a A, config: AlignConfig) -> Self {
        Self {
            store,
            aligner,
            config,
        }
    }

    /// Align all clusters with at least `min_members` members.
    ///
    /// Clusters are read from the store in batches, aligned in parallel and
    /// written in cluster-name order, so the output does not depend on the
    /// number of threads.
    pub fn run<W: Write>(
        &self,
        writer: &mut W,
        progress: &ProgressBar,
    ) -> Result<AlignSummary, AlignError> {
        let clusters = self.store.clusters_with_min_members(self.config.min_members)?;
        progress.set_length(clusters.len() as u64);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()?;
        debug!(
            "Aligning {} clusters on {} threads",
            clusters.len(),
            pool.current_num_threads()
        );

        let mut summary = AlignSummary::default();

        for batch in clusters.chunks(self.config.batch_size.max(1)) {
            let mut jobs = Vec::with_capacity(batch.len());
            for size in batch {
                let records = self.store.cluster_sequences(&size.cluster)?;
                let sequences = ClusterSequences::new(size.cluster.clone(), records);
                if sequences.proteins.len() < 2 {
                    summary.clusters_skipped += 1;
                    progress.inc(1);
                } else {
                    jobs.push(sequences);
                }
            }

            let aligner = self.aligner;
            let aligned: Vec<AlignedCluster> = pool.install(|| {
                jobs.par_iter()
                    .map(|sequences| align_cluster(sequences, aligner))
                    .collect::<Result<Vec<_>, _>>()
            })?;

            for cluster in aligned {
                for record in &cluster.records {
                    write_aligned_record(writer, record)?;
                    match record.sequence_type {
                        SequenceType::Nucleotide => summary.nucleotide_records += 1,
                        _ => summary.protein_records += 1,
                    }
                }
                summary.dropped_nucleotides += cluster.dropped;
                summary.clusters_aligned += 1;
                progress.inc(1);
            }
        }

        info!(
            "Aligned {} clusters ({} skipped with fewer than two proteins)",
            summary.clusters_aligned, summary.clusters_skipped
        );
        Ok(summary)
    }
}
