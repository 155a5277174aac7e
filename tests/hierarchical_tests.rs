#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use hiclust::clustering::{
        ClusteringOutcome, ClusteringParams, DistanceKind, HierarchicalClustering,
        Linkage, PartitionSnapshot,
    };
    use hiclust::core::{feature_vectors_from_records, FeatureVector};
    use ndarray::Array2;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::{Distribution, Normal};

    fn random_rows(rows: usize, cols: usize, seed: u64) -> Vec<FeatureVector<f64>> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 3.0).unwrap();
        feature_vectors_from_records((0..rows).map(|i| {
            let values: Vec<Option<f64>> = (0..cols)
                .map(|_| {
                    // Roughly one coordinate in ten is missing.
                    if rng.random_range(0..10) == 0 {
                        None
                    } else {
                        Some(normal.sample(&mut rng))
                    }
                })
                .collect();
            (format!("r{}", i), values)
        }))
    }

    fn run(
        rows: Vec<FeatureVector<f64>>,
        linkage: Linkage,
        distance: DistanceKind,
        target: usize,
        use_cache: bool,
    ) -> ClusteringOutcome<f64> {
        let params = ClusteringParams::new(linkage, distance, target).with_cache(use_cache);
        HierarchicalClustering::new(params, rows)
            .expect("valid configuration")
            .fit()
            .expect("Clustering failed")
    }

    fn groups(partition: &PartitionSnapshot) -> Vec<Vec<String>> {
        let mut groups: Vec<Vec<String>> = partition
            .members()
            .into_iter()
            .map(|m| m.into_iter().map(String::from).collect())
            .collect();
        groups.sort();
        groups
    }

    #[test]
    fn test_clustering() {
        let data = Array2::from_shape_vec(
            (6, 2),
            vec![1.0, 2.0, 1.5, 2.5, 8.0, 8.0, 8.5, 8.5, 4.0, 4.0, 4.5, 4.5],
        )
        .unwrap();

        let params = ClusteringParams::new(Linkage::Complete, DistanceKind::Euclidean, 3);
        let outcome = HierarchicalClustering::from_array(params, data.view())
            .unwrap()
            .fit()
            .expect("Clustering failed");

        assert_eq!(outcome.partition.cluster_count(), 3);
        for size in outcome.partition.sizes() {
            assert!(size <= 2);
        }
    }

    #[test]
    fn test_four_points_on_a_line() {
        let rows = feature_vectors_from_records(
            [1.0, 2.0, 9.0, 10.0]
                .iter()
                .map(|&x| (format!("{}", x), vec![Some(x)])),
        );
        let outcome = run(rows, Linkage::Single, DistanceKind::Euclidean, 2, true);

        assert_eq!(
            groups(&outcome.partition),
            vec![vec!["1".to_string(), "2".to_string()], vec!["9".to_string(), "10".to_string()]]
        );
        let trace: Vec<(usize, f64)> = outcome
            .fusion_trace
            .iter()
            .map(|s| (s.cluster_count, s.distance))
            .collect();
        assert_eq!(trace, vec![(3, 1.0), (2, 1.0), (1, 7.0)]);
    }

    #[test]
    fn test_trace_length_and_counts() {
        for n in 1..12 {
            for linkage in Linkage::ALL {
                let outcome = run(random_rows(n, 3, n as u64), linkage, DistanceKind::Euclidean, 1, true);
                let counts: Vec<usize> = outcome.fusion_trace.iter().map(|s| s.cluster_count).collect();
                let expected: Vec<usize> = (1..n).rev().collect();
                assert_eq!(counts, expected, "n = {}, {} linkage", n, linkage);
            }
        }
    }

    #[test]
    fn test_every_row_is_a_leaf_exactly_once() {
        let rows = random_rows(25, 4, 7);
        let ids: HashSet<String> = rows.iter().map(|r| r.id().to_string()).collect();

        for linkage in Linkage::ALL {
            let outcome = run(rows.clone(), linkage, DistanceKind::Manhattan, 4, false);
            let leaf_ids = outcome.root.row_ids();

            assert_eq!(outcome.root.leaf_count(), 25);
            assert_eq!(leaf_ids.len(), 25);
            let unique: HashSet<String> = leaf_ids.iter().map(|id| id.to_string()).collect();
            assert_eq!(unique, ids);
        }
    }

    #[test]
    fn test_single_linkage_is_monotonic() {
        for seed in 0..5 {
            let outcome = run(random_rows(30, 3, seed), Linkage::Single, DistanceKind::Euclidean, 3, true);
            assert!(outcome.fusion_trace.is_monotonic(), "seed {}", seed);
        }
    }

    #[test]
    fn test_merged_distance_is_a_minimum() {
        // Replays the run step by step and checks each merge against a brute-force scan.
        let rows = random_rows(15, 2, 11);
        for linkage in Linkage::ALL {
            let params = ClusteringParams::new(linkage, DistanceKind::Euclidean, 1);
            let mut engine = HierarchicalClustering::new(params, rows.clone()).unwrap();
            let metric = DistanceKind::Euclidean.metric::<f64>();

            while engine.clusters().len() > 1 {
                let clusters = engine.clusters();
                let mut minimum = f64::INFINITY;
                for i in 0..clusters.len() {
                    for j in (i + 1)..clusters.len() {
                        let d = linkage.compute(clusters[i].leaves(), clusters[j].leaves(), |p, q| {
                            let (lo, hi) = if p < q { (p, q) } else { (q, p) };
                            metric.compute(&rows[lo], &rows[hi])
                        });
                        minimum = minimum.min(d);
                    }
                }
                let fusion = engine.step().unwrap();
                assert_eq!(fusion.distance, minimum, "{} linkage", linkage);
            }
        }
    }

    #[test]
    fn test_cache_does_not_change_results() {
        for seed in 0..4 {
            let rows = random_rows(20, 5, 100 + seed);
            for linkage in Linkage::ALL {
                for distance in [DistanceKind::Euclidean, DistanceKind::Manhattan] {
                    let cached = run(rows.clone(), linkage, distance, 5, true);
                    let uncached = run(rows.clone(), linkage, distance, 5, false);
                    assert_eq!(cached.fusion_trace, uncached.fusion_trace);
                    assert_eq!(cached.partition, uncached.partition);
                }
            }
        }
    }

    #[test]
    fn test_target_equal_to_row_count_is_all_singletons() {
        let rows = random_rows(9, 2, 3);
        let params = ClusteringParams::new(Linkage::Average, DistanceKind::Euclidean, 9);
        let engine = HierarchicalClustering::new(params, rows).unwrap();

        // Captured before any merge.
        let snapshot = engine.partition().cloned().unwrap();
        assert!(engine.fusion_trace().is_empty());

        let outcome = engine.fit().unwrap();
        assert_eq!(outcome.partition, snapshot);
        let labels: HashSet<usize> = snapshot.assignments().iter().copied().collect();
        assert_eq!(labels.len(), 9);
    }

    #[test]
    fn test_target_above_row_count_is_all_singletons() {
        let outcome = run(random_rows(4, 2, 5), Linkage::Complete, DistanceKind::Euclidean, 40, true);
        assert_eq!(outcome.partition.cluster_count(), 4);
        assert_eq!(outcome.partition.sizes(), vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_target_one_is_a_single_cluster() {
        let outcome = run(random_rows(12, 3, 9), Linkage::Average, DistanceKind::Manhattan, 1, true);
        assert_eq!(outcome.partition.cluster_count(), 1);
        assert!(outcome.partition.assignments().iter().all(|&c| c == 0));
        assert_eq!(outcome.partition.label_of("r5").as_deref(), Some("cluster_0"));
    }

    #[test]
    fn test_dendrogram_cut_matches_snapshot() {
        let rows = random_rows(18, 3, 21);
        for linkage in Linkage::ALL {
            for k in 1..=18 {
                let outcome = run(rows.clone(), linkage, DistanceKind::Euclidean, k, true);
                assert!(
                    outcome.partition_at(k).same_grouping(&outcome.partition),
                    "{} linkage, k = {}",
                    linkage,
                    k
                );
            }
        }
    }

    #[test]
    fn test_nan_coordinate_propagates_into_merge_distances() {
        let rows = feature_vectors_from_records(vec![
            ("a", vec![Some(0.0)]),
            ("b", vec![Some(1.0)]),
            ("c", vec![Some(f64::NAN)]),
            ("d", vec![Some(10.0)]),
        ]);
        let outcome = run(rows, Linkage::Single, DistanceKind::Euclidean, 2, false);

        let steps = outcome.fusion_trace.steps();
        assert_eq!(steps.iter().map(|s| s.cluster_count).collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(steps[0].distance, 1.0);
        // The first scanned pair after (a, b) is (c, d); a NaN current best is never beaten.
        assert!(steps[1].distance.is_nan());
        assert!(steps[2].distance.is_nan());
        assert!(!outcome.fusion_trace.is_monotonic());

        assert_eq!(outcome.root.leaf_count(), 4);
        assert!(outcome.root.height().is_nan());
        assert_eq!(
            groups(&outcome.partition),
            vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string(), "d".to_string()]]
        );
    }
}
