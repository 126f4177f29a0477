use crate::core::cluster::GAP;

/// Thread a nucleotide coding sequence through an aligned protein.
///
/// Each protein gap becomes a gap codon (`---`); each residue consumes the next
/// codon of `nucleotides`. Trailing nucleotides beyond the last residue (the
/// stop codon in an annotated CDS) are dropped. Returns `None` if the
/// nucleotide sequence runs out before the protein does.
pub fn back_translate(aligned_protein: &str, nucleotides: &str) -> Option<String> {
    let nt = nucleotides.as_bytes();
    let mut aln = String::with_capacity(aligned_protein.len() * 3);
    let mut codon = 0;

    for residue in aligned_protein.chars() {
        if residue == GAP {
            aln.push_str("---");
        } else {
            let start = codon * 3;
            let triplet = nt.get(start..start + 3)?;
            aln.push_str(std::str::from_utf8(triplet).ok()?);
            codon += 1;
        }
    }

    Some(aln)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_translate() {
        assert_eq!(
            back_translate("M-K", "ATGAAA").as_deref(),
            Some("ATG---AAA")
        );
        assert_eq!(back_translate("--M", "ATG").as_deref(), Some("------ATG"));
    }

    #[test]
    fn test_trailing_stop_codon_dropped() {
        assert_eq!(back_translate("MK", "ATGAAATAA").as_deref(), Some("ATGAAA"));
    }

    #[test]
    fn test_nucleotides_run_out() {
        assert_eq!(back_translate("MKV", "ATGAAA"), None);
        assert_eq!(back_translate("M", "AT"), None);
    }

    #[test]
    fn test_aligned_length_is_three_per_column() {
        let protein = "M--KV-L";
        let aln = back_translate(protein, "ATGAAAGTTCTG").unwrap();
        assert_eq!(aln.len(), protein.len() * 3);
        assert_eq!(aln.replace('-', ""), "ATGAAAGTTCTG");
    }

    #[test]
    fn test_all_gap_protein() {
        assert_eq!(back_translate("---", "").as_deref(), Some("---------"));
    }
}
