use std::io::Write;

use crate::core::cluster::SubCluster;

/// Line terminating each sub-cluster block
pub const GROUP_TERMINATOR: &str = "=";

/// Write sub-clusters as FASTA records, each block followed by a `=` line.
///
/// ```text
/// >group_1_0|seq_a
/// ATGAAA
/// >group_1_0|seq_b
/// ATGAAG
/// =
/// ```
///
/// Returns the number of records written.
///
/// # Errors
///
/// Returns any error raised by the underlying writer.
pub fn write_sub_clusters<W: Write>(
    writer: &mut W,
    sub_clusters: &[SubCluster],
) -> std::io::Result<usize> {
    let mut written = 0;
    for sub in sub_clusters {
        for record in &sub.records {
            writeln!(writer, ">{}", record.id)?;
            writeln!(writer, "{}", record.sequence)?;
            written += 1;
        }
        writeln!(writer, "{GROUP_TERMINATOR}")?;
    }
    Ok(written)
}
