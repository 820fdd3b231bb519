use crate::{Error, Result};

/// Dense, row-major N x N table of precomputed pairwise similarity scores.
///
/// Higher is more similar. Scores are not bounded, but the presentation layer
/// assumes 0..=1 when turning them into percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    /// Build from row-major data. Fails unless `data.len() == n * n` and every
    /// score is finite.
    pub fn new(n: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != n * n {
            return Err(Error::InvalidRequest(format!(
                "similarity data has {} values, expected {}",
                data.len(),
                n * n
            )));
        }
        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidRequest(format!(
                "non-finite similarity score at row {}, column {}",
                pos / n.max(1),
                pos % n.max(1)
            )));
        }
        Ok(Self { n, data })
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != n) {
            return Err(Error::DimensionMismatch {
                expected: n,
                rows: n,
                cols: bad.len(),
            });
        }
        Self::new(n, rows.into_iter().flatten().collect())
    }

    /// Number of rows (and columns)
    #[inline]
    pub fn dim(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.n {
            return None;
        }
        let start = index * self.n;
        Some(&self.data[start..start + self.n])
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.row(i).and_then(|r| r.get(j).copied())
    }

    /// Largest `|m[i][j] - m[j][i]|` over the matrix
    pub fn max_asymmetry(&self) -> f64 {
        let mut worst = 0.0f64;
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                let d = (self.data[i * self.n + j] - self.data[j * self.n + i]).abs();
                worst = worst.max(d);
            }
        }
        worst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_row_major() {
        let m = SimilarityMatrix::new(2, vec![1.0, 0.3, 0.3, 1.0]).unwrap();
        assert_eq!(m.dim(), 2);
        assert_eq!(m.row(1), Some(&[0.3, 1.0][..]));
        assert_eq!(m.get(0, 1), Some(0.3));
        assert!(m.row(2).is_none());
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(SimilarityMatrix::new(3, vec![0.0; 8]).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = SimilarityMatrix::new(2, vec![1.0, f64::NAN, 0.5, 1.0]).unwrap_err();
        assert!(err.to_string().contains("row 0, column 1"));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = SimilarityMatrix::from_rows(vec![vec![1.0, 0.2], vec![0.2]]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { cols: 1, .. }));
    }

    #[test]
    fn test_asymmetry() {
        let m = SimilarityMatrix::from_rows(vec![vec![1.0, 0.4], vec![0.1, 1.0]]).unwrap();
        assert!((m.max_asymmetry() - 0.3).abs() < 1e-12);
        let sym = SimilarityMatrix::from_rows(vec![vec![1.0, 0.4], vec![0.4, 1.0]]).unwrap();
        assert_eq!(sym.max_asymmetry(), 0.0);
    }
}
