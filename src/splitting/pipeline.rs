use std::io::Write;

use indicatif::ProgressBar;
use serde::Serialize;
use tracing::{info, warn};

use crate::output::alignment::write_sub_clusters;
use crate::parsing::alignment::AlignmentCorpus;
use crate::splitting::profile::split_cluster;
use crate::splitting::selector::CoreClusterSelector;
use crate::splitting::SplitError;

/// Options for core-gene extraction
#[derive(Debug, Clone, Default)]
pub struct ExtractConfig {
    /// Treat a cluster with more members than genomes as a data integrity error
    /// instead of skipping it
    pub strict: bool,
}

/// Counts accumulated over one extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractSummary {
    /// Clusters in the corpus
    pub clusters_seen: usize,
    /// Core clusters processed
    pub core_clusters: usize,
    /// Sub-clusters written
    pub sub_clusters: usize,
    /// Sequence records written
    pub sequences_written: usize,
    /// Core clusters that needed more than one sub-cluster
    pub split_clusters: usize,
    /// Clusters with more members than genomes
    pub oversized_clusters: usize,
}

/// Selects the core clusters of a corpus, splits them by indel profile and
/// writes the sub-clusters
#[derive(Debug, Clone)]
pub struct CoreGeneExtractor {
    selector: CoreClusterSelector,
    config: ExtractConfig,
}

impl CoreGeneExtractor {
    pub fn new(num_genomes: usize) -> Self {
        Self::with_config(num_genomes, ExtractConfig::default())
    }

    pub fn with_config(num_genomes: usize, config: ExtractConfig) -> Self {
        Self {
            selector: CoreClusterSelector::new(num_genomes),
            config,
        }
    }

    /// Run extraction over `corpus`, appending to `writer`.
    ///
    /// The writer is neither flushed nor closed. `progress` is advanced once per
    /// core cluster; pass `ProgressBar::hidden()` when no display is wanted.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::OversizedCluster` in strict mode,
    /// `SplitError::LengthMismatch` for a cluster whose aligned lengths differ,
    /// or `SplitError::Io` if writing fails. Output written before the error is
    /// left in place.
    pub fn run<W: Write>(
        &self,
        corpus: &AlignmentCorpus,
        writer: &mut W,
        progress: &ProgressBar,
    ) -> Result<ExtractSummary, SplitError> {
        let num_genomes = self.selector.num_genomes();
        let mut summary = ExtractSummary {
            clusters_seen: corpus.len(),
            ..ExtractSummary::default()
        };

        if self.config.strict {
            self.selector.check_sizes(corpus)?;
        }

        for cluster in corpus.iter().filter(|c| c.len() > num_genomes) {
            summary.oversized_clusters += 1;
            warn!(
                "Skipping cluster {}: {} members for {} genomes",
                cluster.id,
                cluster.len(),
                num_genomes
            );
        }

        progress.set_length(corpus.iter().filter(|c| self.selector.is_core(c)).count() as u64);

        for cluster in self.selector.select(corpus) {
            let sub_clusters = split_cluster(cluster)?;
            summary.sequences_written += write_sub_clusters(writer, &sub_clusters)?;
            summary.sub_clusters += sub_clusters.len();
            if sub_clusters.len() > 1 {
                summary.split_clusters += 1;
            }
            summary.core_clusters += 1;
            progress.inc(1);
        }

        info!(
            "Extracted {} core clusters into {} sub-clusters ({} split by indel profile)",
            summary.core_clusters, summary.sub_clusters, summary.split_clusters
        );
        Ok(summary)
    }
}
