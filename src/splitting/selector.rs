use crate::core::cluster::Cluster;
use crate::splitting::SplitError;

/// Picks the clusters that hold exactly one sequence per genome
#[derive(Debug, Clone, Copy)]
pub struct CoreClusterSelector {
    num_genomes: usize,
}

impl CoreClusterSelector {
    pub fn new(num_genomes: usize) -> Self {
        Self { num_genomes }
    }

    pub fn num_genomes(&self) -> usize {
        self.num_genomes
    }

    /// True if the cluster has exactly `num_genomes` members
    pub fn is_core(&self, cluster: &Cluster) -> bool {
        cluster.len() == self.num_genomes
    }

    /// Lazily yield the core clusters, in input order.
    ///
    /// Only the member count is checked; one sequence per genome is
    /// guaranteed upstream by how clusters are built.
    pub fn select<'a, I>(&self, clusters: I) -> impl Iterator<Item = &'a Cluster> + 'a
    where
        I: IntoIterator<Item = &'a Cluster> + 'a,
        I::IntoIter: 'a,
    {
        let selector = *self;
        clusters.into_iter().filter(move |c| selector.is_core(c))
    }

    /// Fail on the first cluster with more members than there are genomes
    ///
    /// # Errors
    ///
    /// Returns `SplitError::OversizedCluster` naming the offending cluster.
    pub fn check_sizes<'a, I>(&self, clusters: I) -> Result<(), SplitError>
    where
        I: IntoIterator<Item = &'a Cluster>,
    {
        match clusters.into_iter().find(|c| c.len() > self.num_genomes) {
            Some(cluster) => Err(SplitError::OversizedCluster {
                cluster: cluster.id.clone(),
                members: cluster.len(),
                genomes: self.num_genomes,
            }),
            None => Ok(()),
        }
    }
}
