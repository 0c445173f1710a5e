//! Content fingerprints and near-duplicate clustering
//!
//! The fingerprint is a rolling 64-bit signature: rotate left by one, then
//! add the character's code point, wrapping at 2^64. It is order sensitive,
//! so two documents built from the same characters in a different order
//! almost always get different fingerprints.

use crate::models::DocumentRecord;

/// Default Hamming distance (in bits) under which two documents are near
pub const DEFAULT_THRESHOLD_BITS: u32 = 3;

/// Rolling fingerprint over the Unicode scalar values of `text`
pub fn fingerprint(text: &str) -> u64 {
    text.chars()
        .fold(0u64, |acc, c| acc.rotate_left(1).wrapping_add(c as u64))
}

/// Number of differing bits between two fingerprints
pub fn hamming(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

/// Group near-duplicate documents.
///
/// Documents are visited in lexicographic path order. Each unassigned
/// document seeds a cluster and pulls in every later unassigned document
/// within `threshold_bits` of the seed itself. Closeness to other members
/// does not count, so chains `a~b~c` with `a` far from `c` leave `c` out.
/// Single-member clusters are dropped.
pub fn cluster(records: &[DocumentRecord], threshold_bits: u32) -> Vec<Vec<String>> {
    let entries: Vec<(&str, u64)> = records
        .iter()
        .map(|r| (r.path.as_str(), r.fingerprint))
        .collect();
    cluster_fingerprints(&entries, threshold_bits)
}

/// Seed clustering over `(path, fingerprint)` pairs in any order
pub fn cluster_fingerprints(entries: &[(&str, u64)], threshold_bits: u32) -> Vec<Vec<String>> {
    let mut sorted: Vec<(&str, u64)> = entries.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    sorted.dedup_by(|a, b| a.0 == b.0);

    let mut assigned = vec![false; sorted.len()];
    let mut clusters = Vec::new();

    for (i, &(seed_path, seed_fp)) in sorted.iter().enumerate() {
        if assigned[i] {
            continue;
        }
        let mut members = vec![seed_path.to_string()];
        for (j, &(path, fp)) in sorted.iter().enumerate().skip(i + 1) {
            if !assigned[j] && hamming(seed_fp, fp) <= threshold_bits {
                assigned[j] = true;
                members.push(path.to_string());
            }
        }
        if members.len() > 1 {
            assigned[i] = true;
            clusters.push(members);
        }
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_known_values() {
        assert_eq!(fingerprint(""), 0);
        assert_eq!(fingerprint("a"), 97);
        // rotl(97, 1) + 98
        assert_eq!(fingerprint("ab"), 97 * 2 + 98);
    }

    #[test]
    fn test_fingerprint_is_order_sensitive() {
        assert_ne!(fingerprint("ab"), fingerprint("ba"));
        assert_ne!(fingerprint("listen"), fingerprint("silent"));
    }

    #[test]
    fn test_fingerprint_wraps_without_overflow() {
        let long = "\u{10FFFF}".repeat(10_000);
        let a = fingerprint(&long);
        assert_eq!(a, fingerprint(&long));
    }

    #[test]
    fn test_hamming() {
        assert_eq!(hamming(0, 0), 0);
        assert_eq!(hamming(0b1011, 0b0001), 2);
        assert_eq!(hamming(0, u64::MAX), 64);
    }

    #[test]
    fn test_seed_clustering_is_not_transitive() {
        // a~b (2 bits), b~c (2 bits), a vs c (4 bits)
        let a = 0b0000_0000u64;
        let b = 0b0000_0011u64;
        let c = 0b0000_1111u64;
        let clusters = cluster_fingerprints(&[("c.md", c), ("a.md", a), ("b.md", b)], 3);
        assert_eq!(clusters, vec![vec!["a.md".to_string(), "b.md".to_string()]]);
    }

    #[test]
    fn test_seed_pulls_members_far_from_each_other() {
        // b and c are 4 bits apart but both within 2 of the seed a
        let a = 0b0000_0000u64;
        let b = 0b0000_0011u64;
        let c = 0b0000_1100u64;
        let clusters = cluster_fingerprints(&[("a.md", a), ("b.md", b), ("c.md", c)], 3);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0], vec!["a.md", "b.md", "c.md"]);
    }

    #[test]
    fn test_singletons_excluded_and_clusters_disjoint() {
        let clusters = cluster_fingerprints(
            &[
                ("a.md", 0),
                ("b.md", 1),
                ("c.md", u64::MAX),
                ("d.md", u64::MAX - 1),
                ("e.md", 0xFF00_FF00),
            ],
            DEFAULT_THRESHOLD_BITS,
        );
        assert_eq!(
            clusters,
            vec![vec!["a.md".to_string(), "b.md".to_string()], vec!["c.md".to_string(), "d.md".to_string()]]
        );
    }

    #[test]
    fn test_threshold_zero_groups_identical_only() {
        let clusters = cluster_fingerprints(&[("a.md", 7), ("b.md", 7), ("c.md", 6)], 0);
        assert_eq!(clusters, vec![vec!["a.md".to_string(), "b.md".to_string()]]);
    }

    #[test]
    fn test_empty_corpus() {
        assert!(cluster(&[], 3).is_empty());
    }
}
