//! Held-out evaluation metrics
//!
//! Weighted averages weight each class by its support in `y_true`.
//! A class with no predicted members has precision 0 (no NaN).

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Per-class confusion counts for a binary problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Confusion {
    /// `counts[true][predicted]`
    pub counts: [[usize; 2]; 2],
}

impl Confusion {
    pub fn from_labels(y_true: ArrayView1<usize>, y_pred: ArrayView1<usize>) -> Self {
        let mut counts = [[0usize; 2]; 2];
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            counts[t.min(1)][p.min(1)] += 1;
        }
        Self { counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn support(&self, class: usize) -> usize {
        self.counts[class].iter().sum()
    }

    fn predicted(&self, class: usize) -> usize {
        self.counts[0][class] + self.counts[1][class]
    }

    fn precision(&self, class: usize) -> f64 {
        ratio(self.counts[class][class], self.predicted(class))
    }

    fn recall(&self, class: usize) -> f64 {
        ratio(self.counts[class][class], self.support(class))
    }

    fn f1(&self, class: usize) -> f64 {
        let (p, r) = (self.precision(class), self.recall(class));
        if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Accuracy and support-weighted precision / recall / F1
pub fn evaluate(y_true: ArrayView1<usize>, y_pred: ArrayView1<usize>) -> Metrics {
    let cm = Confusion::from_labels(y_true, y_pred);
    let total = cm.total();
    if total == 0 {
        return Metrics::default();
    }

    let weighted = |f: &dyn Fn(usize) -> f64| -> f64 {
        (0..2)
            .map(|c| f(c) * cm.support(c) as f64)
            .sum::<f64>()
            / total as f64
    };

    Metrics {
        accuracy: ratio(cm.counts[0][0] + cm.counts[1][1], total),
        precision: weighted(&|c| cm.precision(c)),
        recall: weighted(&|c| cm.recall(c)),
        f1: weighted(&|c| cm.f1(c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_perfect_predictions() {
        let y = array![0usize, 1, 1, 0, 1];
        let m = evaluate(y.view(), y.view());
        assert_eq!(m, Metrics { accuracy: 1.0, precision: 1.0, recall: 1.0, f1: 1.0 });
    }

    #[test]
    fn test_weighted_scores() {
        // class 0: support 2, class 1: support 4
        let y_true = array![0usize, 0, 1, 1, 1, 1];
        let y_pred = array![0usize, 1, 1, 1, 1, 0];
        let m = evaluate(y_true.view(), y_pred.view());

        // p0 = 1/2, r0 = 1/2, f0 = 1/2; p1 = 3/4, r1 = 3/4, f1 = 3/4
        assert_abs_diff_eq!(m.accuracy, 4.0 / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.precision, (0.5 * 2.0 + 0.75 * 4.0) / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.recall, 4.0 / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.f1, (0.5 * 2.0 + 0.75 * 4.0) / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_predicted_class_has_no_nan() {
        let y_true = array![0usize, 1, 1, 1];
        let y_pred = array![1usize, 1, 1, 1];
        let m = evaluate(y_true.view(), y_pred.view());
        assert!(m.f1.is_finite() && m.precision.is_finite());
        // class 0 contributes 0; class 1: p = 3/4, r = 1, f = 6/7
        assert_abs_diff_eq!(m.f1, 0.75 * (6.0 / 7.0), epsilon = 1e-12);
    }

    #[test]
    fn test_empty_input() {
        let empty = ndarray::Array1::<usize>::zeros(0);
        assert_eq!(evaluate(empty.view(), empty.view()), Metrics::default());
    }
}
