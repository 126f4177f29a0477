use std::path::Path;

use rusqlite::{params, Connection};

use crate::core::types::{ClusterAssignment, GenomeAccession, SequenceRecord, SequenceType};
use crate::store::StoreError;

/// A cluster name and its member count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSize {
    pub cluster: String,
    pub members: usize,
}

/// SQLite-backed sequence store
pub struct SequenceStore {
    conn: Connection,
}

impl SequenceStore {
    /// Open (or create) a store at the given path
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;
        Ok(Self { conn })
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Drop and recreate the `sequence` table
    pub fn create_sequence_table(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "DROP TABLE IF EXISTS sequence;
             CREATE TABLE sequence(
                genome VARCHAR(255),
                seqid VARCHAR(255),
                seqtype VARCHAR(255),
                seq TEXT
             );",
        )?;
        Ok(())
    }

    /// Drop and recreate the `cluster` table
    pub fn create_cluster_table(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "DROP TABLE IF EXISTS cluster;
             CREATE TABLE cluster(cluster VARCHAR(255), seqid VARCHAR(255));",
        )?;
        Ok(())
    }

    /// Create lookup indices on the `sequence` table
    pub fn create_indices(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_seq_genome ON sequence(genome);
             CREATE INDEX IF NOT EXISTS idx_seqid ON sequence(seqid);
             CREATE INDEX IF NOT EXISTS idx_seqtype ON sequence(seqtype);",
        )?;
        Ok(())
    }

    /// Insert sequences in a single transaction
    pub fn insert_sequences(&self, records: &[SequenceRecord]) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare("INSERT INTO sequence VALUES (?1, ?2, ?3, ?4)")?;
            for record in records {
                stmt.execute(params![
                    record.genome.as_str(),
                    &record.seqid,
                    record.seqtype.as_str(),
                    &record.seq,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Insert cluster assignments in a single transaction
    pub fn insert_clusters(&self, assignments: &[ClusterAssignment]) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare("INSERT INTO cluster VALUES (?1, ?2)")?;
            for assignment in assignments {
                stmt.execute(params![&assignment.cluster, &assignment.seqid])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Clusters with at least `min_members` membership rows, ordered by name
    pub fn clusters_with_min_members(
        &self,
        min_members: usize,
    ) -> Result<Vec<ClusterSize>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT cluster, COUNT(*) FROM cluster
             GROUP BY cluster HAVING COUNT(*) >= ?1
             ORDER BY cluster",
        )?;
        let clusters = stmt
            .query_map(params![min_members as i64], |row| {
                let members: i64 = row.get(1)?;
                Ok(ClusterSize {
                    cluster: row.get(0)?,
                    members: usize::try_from(members).unwrap_or_default(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(clusters)
    }

    /// All stored sequences (both types) of the members of a cluster
    pub fn cluster_sequences(&self, cluster: &str) -> Result<Vec<SequenceRecord>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT sequence.genome, sequence.seqid, sequence.seqtype, sequence.seq
             FROM cluster, sequence
             WHERE cluster.cluster = ?1 AND cluster.seqid = sequence.seqid
             ORDER BY sequence.rowid",
        )?;
        let records = stmt
            .query_map(params![cluster], |row| {
                let genome: String = row.get(0)?;
                let seqtype: String = row.get(2)?;
                Ok(SequenceRecord {
                    genome: GenomeAccession::new(genome),
                    seqid: row.get(1)?,
                    seqtype: SequenceType::parse(&seqtype),
                    seq: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Number of rows in the `sequence` table
    pub fn sequence_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sequence", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Names of the indices defined on the `sequence` table
    pub fn sequence_indices(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'index' AND tbl_name = 'sequence'
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }
}
