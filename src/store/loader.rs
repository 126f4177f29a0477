//! Loading annotated genomes and Roary clusters into the store.
//!
//! Annotations are expected in Prokka's layout:
//!
//! ```text
//! <annotation_dir>/<accession>/<accession>.faa   protein sequences
//! <annotation_dir>/<accession>/<accession>.ffn   nucleotide sequences
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use serde::Serialize;
use tracing::{debug, info};

use crate::core::types::{GenomeAccession, SequenceRecord, SequenceType};
use crate::parsing::accession::AccessionSet;
use crate::parsing::fasta::read_fasta_file;
use crate::parsing::roary::{parse_clusters_file, CLUSTERED_PROTEINS};
use crate::store::{SequenceStore, StoreError};
use crate::utils::validation::validate_path_component;

/// Counts reported after a load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub genomes: usize,
    pub sequences: usize,
    /// Rows in the `cluster` table, one per cluster member
    pub cluster_rows: usize,
    /// Distinct cluster names
    pub clusters: usize,
}

/// Path of an annotation file for one genome
pub fn annotation_path(
    annotation_dir: &Path,
    accession: &GenomeAccession,
    extension: &str,
) -> Result<PathBuf, StoreError> {
    let name = validate_path_component(accession.as_str())?;
    Ok(annotation_dir
        .join(name)
        .join(format!("{name}.{extension}")))
}

/// Read the protein and nucleotide genes of one genome
pub fn read_genome_sequences(
    annotation_dir: &Path,
    accession: &GenomeAccession,
) -> Result<Vec<SequenceRecord>, StoreError> {
    let mut records = Vec::new();

    for (extension, seqtype) in [("faa", SequenceType::Protein), ("ffn", SequenceType::Nucleotide)] {
        let path = annotation_path(annotation_dir, accession, extension)?;
        let entries = read_fasta_file(&path)?;
        debug!(
            "{}: {} {} sequences from {}",
            accession,
            entries.len(),
            seqtype,
            path.display()
        );
        records.extend(entries.into_iter().map(|entry| {
            SequenceRecord::new(accession.clone(), entry.id, seqtype.clone(), entry.sequence)
        }));
    }

    Ok(records)
}

/// Fills a [`SequenceStore`] from annotation and cluster files
pub struct SequenceLoader<'a> {
    store: &'a SequenceStore,
}

impl<'a> SequenceLoader<'a> {
    pub fn new(store: &'a SequenceStore) -> Self {
        Self { store }
    }

    /// Recreate the `sequence` table and load every genome, one transaction per genome.
    ///
    /// Returns the number of sequences loaded.
    pub fn load_genomes(
        &self,
        accessions: &AccessionSet,
        annotation_dir: &Path,
        progress: &ProgressBar,
    ) -> Result<usize, StoreError> {
        self.store.create_sequence_table()?;
        progress.set_length(accessions.count() as u64);

        let mut loaded = 0;
        for accession in accessions.iter() {
            let records = read_genome_sequences(annotation_dir, accession)?;
            self.store.insert_sequences(&records)?;
            loaded += records.len();
            progress.inc(1);
        }

        info!(
            "Loaded {} sequences from {} genomes",
            loaded,
            accessions.count()
        );
        Ok(loaded)
    }

    /// Recreate the `cluster` table from `<roary_dir>/clustered_proteins`.
    ///
    /// Returns (membership rows, distinct clusters).
    pub fn load_clusters(&self, roary_dir: &Path) -> Result<(usize, usize), StoreError> {
        self.store.create_cluster_table()?;

        let assignments = parse_clusters_file(&roary_dir.join(CLUSTERED_PROTEINS))?;
        self.store.insert_clusters(&assignments)?;

        let clusters: HashSet<&str> = assignments.iter().map(|a| a.cluster.as_str()).collect();
        info!(
            "Loaded {} cluster memberships in {} clusters",
            assignments.len(),
            clusters.len()
        );
        Ok((assignments.len(), clusters.len()))
    }

    /// Run a full load: genomes, clusters, then indices
    pub fn load_all(
        &self,
        accessions: &AccessionSet,
        annotation_dir: &Path,
        roary_dir: &Path,
        progress: &ProgressBar,
    ) -> Result<LoadSummary, StoreError> {
        self.load_genomes(accessions, annotation_dir, progress)?;
        let (cluster_rows, clusters) = self.load_clusters(roary_dir)?;
        self.store.create_indices()?;
        debug!(
            "Indices on sequence table: {}",
            self.store.sequence_indices()?.join(", ")
        );

        Ok(LoadSummary {
            genomes: accessions.count(),
            sequences: self.store.sequence_count()?,
            cluster_rows,
            clusters,
        })
    }
}
