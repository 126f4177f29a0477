use std::io::Write;

use crate::core::types::AlignedRecord;

/// Write one alignment corpus line: `cluster,seqid,seqtype,aligned_seq,genome`.
///
/// A record without a genome is written with an empty last field.
///
/// # Errors
///
/// Returns any error raised by the underlying writer.
pub fn write_aligned_record<W: Write>(writer: &mut W, record: &AlignedRecord) -> std::io::Result<()> {
    writeln!(
        writer,
        "{},{},{},{},{}",
        record.cluster_id,
        record.sequence_id,
        record.sequence_type,
        record.aligned_sequence,
        record.genome.as_ref().map_or("", |g| g.as_str())
    )
}
