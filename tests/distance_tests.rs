#[cfg(test)]
mod tests {
    use hiclust::clustering::{DistanceKind, DistanceMetric};
    use hiclust::core::FeatureVector;
    use hiclust::distances::{EuclideanDistance, ManhattanDistance};
    use ndarray::array;

    #[test]
    fn test_euclidean_distance() {
        let point1 = FeatureVector::dense("p", 0, array![1.0f64, 2.0, 3.0]);
        let point2 = FeatureVector::dense("q", 1, array![4.0f64, 5.0, 6.0]);
        let distance = EuclideanDistance.compute(&point1, &point2);
        assert!((distance - 5.19615242).abs() < 1e-6);
    }

    #[test]
    fn test_manhattan_distance() {
        let point1 = FeatureVector::dense("p", 0, array![1.0f64, 2.0, 3.0]);
        let point2 = FeatureVector::dense("q", 1, array![4.0f64, 5.0, 6.0]);
        let distance = ManhattanDistance.compute(&point1, &point2);
        assert_eq!(distance, 9.0);
    }

    #[test]
    fn test_euclidean_distance_f32() {
        let point1 = FeatureVector::dense("p", 0, array![0.0f32, 0.0]);
        let point2 = FeatureVector::dense("q", 1, array![3.0f32, 4.0]);
        let distance: f32 = EuclideanDistance.compute(&point1, &point2);
        assert!((distance - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_metric_from_kind_with_missing_values() {
        let point1 = FeatureVector::new("p", 0, vec![Some(1.0f32), None, Some(2.0)]);
        let point2 = FeatureVector::new("q", 1, vec![Some(4.0f32), Some(0.0)]);

        let euclidean = DistanceKind::Euclidean.metric::<f32>();
        let manhattan = DistanceKind::Manhattan.metric::<f32>();
        assert_eq!(euclidean.compute(&point1, &point2), 3.0);
        assert_eq!(manhattan.compute(&point1, &point2), 3.0);
    }
}
