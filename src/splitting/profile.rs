//! Splitting a core cluster into gap-compatible sub-clusters.
//!
//! Members whose aligned sequences have gaps at exactly the same columns form
//! one sub-cluster. Sub-clusters are numbered by the order in which their
//! profile is first met while scanning the members, so the output is fully
//! determined by the input order.

use std::collections::HashMap;

use tracing::debug;

use crate::core::cluster::{Cluster, ClusterMember, GapProfile, SplitRecord, SubCluster};
use crate::splitting::SplitError;

/// Group members by gap profile, keeping first-seen profile order and
/// member order within each group.
///
/// # Errors
///
/// Returns `SplitError::LengthMismatch` if the members are not all the same
/// aligned length.
pub fn group_by_profile(
    cluster: &Cluster,
) -> Result<Vec<(GapProfile, Vec<&ClusterMember>)>, SplitError> {
    let mut groups: Vec<(GapProfile, Vec<&ClusterMember>)> = Vec::new();

    // Index: profile -> position in `groups`
    let mut profile_to_group: HashMap<GapProfile, usize> = HashMap::new();
    let mut expected_len: Option<usize> = None;

    for member in &cluster.members {
        let profile = GapProfile::of(&member.aligned_sequence);

        match expected_len {
            None => expected_len = Some(profile.len()),
            Some(expected) if expected != profile.len() => {
                return Err(SplitError::LengthMismatch {
                    cluster: cluster.id.clone(),
                    sequence_id: member.sequence_id.clone(),
                    expected,
                    found: profile.len(),
                });
            }
            Some(_) => {}
        }

        if let Some(&idx) = profile_to_group.get(&profile) {
            groups[idx].1.push(member);
        } else {
            profile_to_group.insert(profile.clone(), groups.len());
            groups.push((profile, vec![member]));
        }
    }

    Ok(groups)
}

/// Split a cluster into sub-clusters of identical gap profile.
///
/// Every member lands in exactly one sub-cluster, stripped of gaps and
/// relabeled `{cluster}_{sub_index}|{sequence_id}`. A cluster without indel
/// variation comes back as a single sub-cluster; one where every profile
/// differs comes back fully fragmented, which is still a valid result.
///
/// # Errors
///
/// Returns `SplitError::LengthMismatch` if the members are not all the same
/// aligned length.
pub fn split_cluster(cluster: &Cluster) -> Result<Vec<SubCluster>, SplitError> {
    let groups = group_by_profile(cluster)?;

    let mut sub_clusters = Vec::with_capacity(groups.len());
    for (sub_index, (profile, members)) in groups.into_iter().enumerate() {
        let mut sub = SubCluster {
            cluster_id: cluster.id.clone(),
            sub_index,
            records: Vec::with_capacity(members.len()),
        };
        let label = sub.label();
        sub.records.extend(members.into_iter().map(|m| SplitRecord {
            id: format!("{label}|{}", m.sequence_id),
            sequence: m.ungapped(),
        }));

        debug!(
            "{label}: {} members, {} gap columns",
            sub.len(),
            profile.gap_count()
        );
        sub_clusters.push(sub);
    }

    if sub_clusters.len() > 1 {
        debug!(
            "Cluster {} split into {} sub-clusters by indel profile",
            cluster.id,
            sub_clusters.len()
        );
    }

    Ok(sub_clusters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cluster::GAP;
    use std::collections::HashSet;

    fn ids(sub: &SubCluster) -> Vec<&str> {
        sub.records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_no_indel_variation_gives_one_sub_cluster() {
        let cluster = Cluster::new("c1").with_members(&[("s1", "AC"), ("s2", "AG"), ("s3", "TT")]);

        let subs = split_cluster(&cluster).unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].label(), "c1_0");
        assert_eq!(ids(&subs[0]), vec!["c1_0|s1", "c1_0|s2", "c1_0|s3"]);
        let seqs: Vec<&str> = subs[0].records.iter().map(|r| r.sequence.as_str()).collect();
        assert_eq!(seqs, vec!["AC", "AG", "TT"]);
    }

    #[test]
    fn test_differing_gap_position_splits() {
        let cluster =
            Cluster::new("c2").with_members(&[("s1", "AC-"), ("s2", "AC-"), ("s3", "A-C")]);

        let subs = split_cluster(&cluster).unwrap();
        assert_eq!(subs.len(), 2);

        assert_eq!(subs[0].sub_index, 0);
        assert_eq!(ids(&subs[0]), vec!["c2_0|s1", "c2_0|s2"]);
        assert!(subs[0].records.iter().all(|r| r.sequence == "AC"));

        // Same residues after stripping, still a separate sub-cluster
        assert_eq!(subs[1].sub_index, 1);
        assert_eq!(ids(&subs[1]), vec!["c2_1|s3"]);
        assert_eq!(subs[1].records[0].sequence, "AC");
    }

    #[test]
    fn test_profiles_numbered_in_first_seen_order() {
        let cluster = Cluster::new("g").with_members(&[
            ("a", "-AC"),
            ("b", "AC-"),
            ("c", "-GT"),
            ("d", "A-C"),
            ("e", "TT-"),
        ]);

        let subs = split_cluster(&cluster).unwrap();
        let labelled: Vec<Vec<&str>> = subs.iter().map(ids).collect();
        assert_eq!(
            labelled,
            vec![
                vec!["g_0|a", "g_0|c"],
                vec!["g_1|b", "g_1|e"],
                vec!["g_2|d"],
            ]
        );
    }

    #[test]
    fn test_every_profile_unique_fragments_fully() {
        let cluster =
            Cluster::new("x").with_members(&[("a", "A--"), ("b", "-A-"), ("c", "--A")]);

        let subs = split_cluster(&cluster).unwrap();
        assert_eq!(subs.len(), 3);
        assert!(subs.iter().all(|s| s.len() == 1));
        assert!(subs.iter().all(|s| s.records[0].sequence == "A"));
    }

    #[test]
    fn test_partition_properties() {
        let members = [
            ("s1", "ATG---AAA"),
            ("s2", "ATGCCCAAA"),
            ("s3", "ATG---AAG"),
            ("s4", "AT-CCCAAA"),
            ("s5", "ATGCCCAAT"),
            ("s6", "---CCCAAA"),
        ];
        let cluster = Cluster::new("grp").with_members(&members);

        let subs = split_cluster(&cluster).unwrap();

        let distinct: HashSet<GapProfile> =
            members.iter().map(|(_, s)| GapProfile::of(s)).collect();
        assert_eq!(subs.len(), distinct.len());

        // Total: every input member appears exactly once
        let written: Vec<&str> = subs
            .iter()
            .flat_map(|s| s.records.iter())
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(written.len(), members.len());
        let unique: HashSet<&str> = written.iter().copied().collect();
        assert_eq!(unique.len(), written.len());

        for (seqid, aligned) in &members {
            let record = subs
                .iter()
                .flat_map(|s| s.records.iter())
                .find(|r| r.id.ends_with(&format!("|{seqid}")))
                .unwrap();
            assert_eq!(record.sequence, aligned.replace(GAP, ""));
            assert!(!record.sequence.contains(GAP));
        }

        // Same sub-cluster iff same gap profile
        for sub in &subs {
            let profiles: HashSet<GapProfile> = sub
                .records
                .iter()
                .map(|r| {
                    let seqid = r.id.split_once('|').unwrap().1;
                    let (_, aligned) = members.iter().find(|(id, _)| *id == seqid).unwrap();
                    GapProfile::of(aligned)
                })
                .collect();
            assert_eq!(profiles.len(), 1);
        }
    }

    #[test]
    fn test_split_is_deterministic() {
        let cluster = Cluster::new("d").with_members(&[
            ("a", "A-GT"),
            ("b", "ACGT"),
            ("c", "A-GA"),
            ("d", "ACG-"),
        ]);
        assert_eq!(split_cluster(&cluster).unwrap(), split_cluster(&cluster).unwrap());
    }

    #[test]
    fn test_unequal_lengths_are_rejected() {
        let cluster = Cluster::new("bad").with_members(&[("a", "AC-"), ("b", "AC-T")]);

        match split_cluster(&cluster) {
            Err(SplitError::LengthMismatch {
                cluster,
                sequence_id,
                expected,
                found,
            }) => {
                assert_eq!(cluster, "bad");
                assert_eq!(sequence_id, "b");
                assert_eq!(expected, 3);
                assert_eq!(found, 4);
            }
            other => panic!("expected length mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_sequence_ids_with_separator_are_kept_verbatim() {
        let cluster = Cluster::new("c").with_members(&[("gnl|Prokka|x_1", "AT")]);
        let subs = split_cluster(&cluster).unwrap();
        assert_eq!(subs[0].records[0].id, "c_0|gnl|Prokka|x_1");
    }

    #[test]
    fn test_empty_cluster() {
        let subs = split_cluster(&Cluster::new("empty")).unwrap();
        assert!(subs.is_empty());
    }

    #[test]
    fn test_record_ids_carry_sub_cluster_label() {
        let cluster =
            Cluster::new("group_9").with_members(&[("a", "A-T"), ("b", "AT-"), ("c", "A-T")]);
        for sub in split_cluster(&cluster).unwrap() {
            let prefix = format!("{}|", sub.label());
            assert!(sub.records.iter().all(|r| r.id.starts_with(&prefix)));
        }
    }
}
