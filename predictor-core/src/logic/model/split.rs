//! Stratified train/test split

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::TrainingError;

/// Row partitions of one dataset
#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub y_train: Array1<usize>,
    pub x_test: Array2<f64>,
    pub y_test: Array1<usize>,
}

impl Split {
    pub fn train_len(&self) -> usize {
        self.y_train.len()
    }

    pub fn test_len(&self) -> usize {
        self.y_test.len()
    }
}

/// Test indices per class: `round(n_class * test_ratio)`, at least one row
/// on each side. Both index lists are returned sorted.
pub fn stratified_indices(
    y: ArrayView1<usize>,
    class_names: &[String],
    test_ratio: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), TrainingError> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(TrainingError::InvalidConfig(format!(
            "test ratio must be in (0, 1), got {}",
            test_ratio
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for (class, name) in class_names.iter().enumerate() {
        let mut members: Vec<usize> = y
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == class)
            .map(|(i, _)| i)
            .collect();

        if members.len() < 2 {
            return Err(TrainingError::InsufficientData {
                class: name.clone(),
                count: members.len(),
            });
        }

        members.shuffle(&mut rng);
        let n_test = ((members.len() as f64 * test_ratio).round() as usize)
            .clamp(1, members.len() - 1);

        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok((train, test))
}

pub fn stratified_split(
    x: ArrayView2<f64>,
    y: ArrayView1<usize>,
    class_names: &[String],
    test_ratio: f64,
    seed: u64,
) -> Result<Split, TrainingError> {
    let (train, test) = stratified_indices(y, class_names, test_ratio, seed)?;
    Ok(Split {
        x_train: x.select(Axis(0), &train),
        y_train: y.select(Axis(0), &train),
        x_test: x.select(Axis(0), &test),
        y_test: y.select(Axis(0), &test),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    fn classes() -> Vec<String> {
        vec!["Fail".to_string(), "Pass".to_string()]
    }

    #[test]
    fn test_preserves_class_ratio() {
        // 40 of class 0, 60 of class 1
        let y = Array::from_iter((0..100).map(|i| usize::from(i >= 40)));
        let (train, test) = stratified_indices(y.view(), &classes(), 0.2, 42).unwrap();

        assert_eq!(test.len(), 20);
        assert_eq!(train.len(), 80);
        assert_eq!(test.iter().filter(|&&i| y[i] == 0).count(), 8);
        assert_eq!(test.iter().filter(|&&i| y[i] == 1).count(), 12);
    }

    #[test]
    fn test_partitions_are_disjoint_and_complete() {
        let y = Array::from_iter((0..37).map(|i| i % 3 % 2));
        let (train, test) = stratified_indices(y.view(), &classes(), 0.25, 7).unwrap();
        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..37).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let y = Array::from_iter((0..50).map(|i| i % 2));
        let a = stratified_indices(y.view(), &classes(), 0.2, 42).unwrap();
        let b = stratified_indices(y.view(), &classes(), 0.2, 42).unwrap();
        let c = stratified_indices(y.view(), &classes(), 0.2, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.1, c.1);
    }

    #[test]
    fn test_singleton_class_rejected() {
        let mut y = Array::from_elem(10, 1usize);
        y[0] = 0;
        assert!(matches!(
            stratified_indices(y.view(), &classes(), 0.2, 42),
            Err(TrainingError::InsufficientData { count: 1, .. })
        ));
    }

    #[test]
    fn test_bad_ratio_rejected() {
        let y = Array::from_iter((0..10).map(|i| i % 2));
        assert!(stratified_indices(y.view(), &classes(), 1.0, 42).is_err());
        assert!(stratified_indices(y.view(), &classes(), 0.0, 42).is_err());
    }

    #[test]
    fn test_split_matrices() {
        let x = Array2::from_shape_fn((20, 3), |(i, j)| (i * 3 + j) as f64);
        let y = Array::from_iter((0..20).map(|i| i % 2));
        let s = stratified_split(x.view(), y.view(), &classes(), 0.2, 1).unwrap();
        assert_eq!(s.x_train.dim(), (16, 3));
        assert_eq!(s.x_test.dim(), (4, 3));
        // Rows stay aligned with their labels.
        for (row, &label) in s.x_test.rows().into_iter().zip(s.y_test.iter()) {
            let i = (row[0] / 3.0) as usize;
            assert_eq!(i % 2, label);
        }
    }
}
