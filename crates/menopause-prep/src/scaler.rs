//! Per-column standardization to zero mean and unit variance.

use tracing::{debug, instrument};

use crate::artifact;
use crate::error::PrepError;

const ARTIFACT_KIND: &str = "scaler";

/// Learned per-column statistics.
///
/// Uses the population standard deviation (divides by n, not n-1). A
/// zero-variance column keeps a scale of 1.0, so it transforms to all
/// zeros instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Learn column means and standard deviations from a row-major matrix.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`PrepError::EmptyDataset`] | zero rows, or rows with zero columns |
    /// | [`PrepError::ColumnCountMismatch`] | rows have inconsistent widths |
    /// | [`PrepError::NonFiniteValue`] | any value is NaN or infinite |
    #[instrument(skip_all, fields(n_rows = rows.len()))]
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self, PrepError> {
        let n_columns = rows.first().map_or(0, Vec::len);
        if n_columns == 0 {
            return Err(PrepError::EmptyDataset);
        }
        validate(rows, n_columns)?;

        let n = rows.len() as f64;
        let mut mean = vec![0.0f64; n_columns];
        for row in rows {
            for (m, &v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut variance = vec![0.0f64; n_columns];
        for row in rows {
            for ((var, &v), &m) in variance.iter_mut().zip(row).zip(&mean) {
                *var += (v - m).powi(2);
            }
        }

        // Constant columns are detected exactly; the summed mean may be off by
        // an ulp, which would leave tiny non-zero outputs.
        let mut n_constant = 0usize;
        let mut scale = Vec::with_capacity(n_columns);
        for col in 0..n_columns {
            let first = rows[0][col];
            if rows.iter().all(|row| row[col] == first) {
                mean[col] = first;
                scale.push(1.0);
                n_constant += 1;
            } else {
                let std = (variance[col] / n).sqrt();
                // Spread too small to represent: dividing would blow up.
                if std.is_normal() {
                    scale.push(std);
                } else {
                    scale.push(1.0);
                    n_constant += 1;
                }
            }
        }
        debug!(n_columns, n_constant, "scaler fitted");

        Ok(Self { mean, scale })
    }

    /// Fit on `rows` and return the fitted scaler with the transformed rows.
    ///
    /// # Errors
    ///
    /// Same as [`StandardScaler::fit`].
    pub fn fit_transform(rows: &[Vec<f64>]) -> Result<(Self, Vec<Vec<f64>>), PrepError> {
        let scaler = Self::fit(rows)?;
        let transformed = scaler.transform(rows)?;
        Ok((scaler, transformed))
    }

    /// Apply the learned statistics to new rows.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`PrepError::ColumnCountMismatch`] | a row's width differs from the fitted width |
    /// | [`PrepError::NonFiniteValue`] | any value is NaN or infinite |
    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, PrepError> {
        validate(rows, self.n_columns())?;
        Ok(rows.iter().map(|row| self.transform_row(row)).collect())
    }

    /// Apply the learned statistics to a single row of the fitted width.
    ///
    /// # Errors
    ///
    /// Same as [`StandardScaler::transform`].
    pub fn transform_one(&self, row: &[f64]) -> Result<Vec<f64>, PrepError> {
        validate(std::slice::from_ref(&row), self.n_columns())?;
        Ok(self.transform_row(row))
    }

    fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&v, (&m, &s))| (v - m) / s)
            .collect()
    }

    /// Return the per-column means.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Return the per-column divisors (1.0 for zero-variance columns).
    #[must_use]
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Return the number of columns the scaler was fitted on.
    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.mean.len()
    }

    /// Encode as a versioned binary blob.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Serialize`] if bincode encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PrepError> {
        artifact::to_bytes(ARTIFACT_KIND, self)
    }

    /// Decode a blob produced by [`StandardScaler::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Deserialize`], [`PrepError::WrongArtifact`] or
    /// [`PrepError::IncompatibleVersion`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrepError> {
        artifact::from_bytes(ARTIFACT_KIND, bytes)
    }
}

fn validate<R: AsRef<[f64]>>(rows: &[R], n_columns: usize) -> Result<(), PrepError> {
    for (row_idx, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != n_columns {
            return Err(PrepError::ColumnCountMismatch {
                row: row_idx,
                expected: n_columns,
                got: row.len(),
            });
        }
        if let Some(column) = row.iter().position(|v| !v.is_finite()) {
            return Err(PrepError::NonFiniteValue {
                row: row_idx,
                column,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Vec<f64>> {
        vec![
            vec![1.0, 10.0, 3.0],
            vec![2.0, 20.0, 3.0],
            vec![3.0, 30.0, 3.0],
            vec![4.0, 40.0, 3.0],
            vec![5.0, 50.0, 3.0],
        ]
    }

    #[test]
    fn columns_have_zero_mean_unit_variance() {
        let (_, out) = StandardScaler::fit_transform(&sample()).unwrap();
        let n = out.len() as f64;
        for col in 0..2 {
            let mean = out.iter().map(|r| r[col]).sum::<f64>() / n;
            let var = out.iter().map(|r| (r[col] - mean).powi(2)).sum::<f64>() / n;
            assert!(mean.abs() < 1e-10, "col {col} mean = {mean}");
            assert!((var - 1.0).abs() < 1e-10, "col {col} var = {var}");
        }
    }

    #[test]
    fn population_std_is_used() {
        let scaler = StandardScaler::fit(&sample()).unwrap();
        assert!((scaler.mean()[0] - 3.0).abs() < 1e-12);
        assert!((scaler.scale()[0] - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn constant_column_becomes_zero() {
        let (scaler, out) = StandardScaler::fit_transform(&sample()).unwrap();
        assert!((scaler.scale()[2] - 1.0).abs() < f64::EPSILON);
        assert!(out.iter().all(|r| r[2] == 0.0));
    }

    #[test]
    fn vanishing_spread_treated_as_constant() {
        let (scaler, out) = StandardScaler::fit_transform(&[vec![1e-200], vec![2e-200]]).unwrap();
        assert_eq!(scaler.scale(), [1.0]);
        assert!(out.iter().flatten().all(|v| v.is_finite() && v.abs() < 1e-100));
    }

    #[test]
    fn transform_matches_fit_transform() {
        let data = sample();
        let (scaler, fitted) = StandardScaler::fit_transform(&data).unwrap();
        let again = scaler.transform(&data).unwrap();
        for (a, b) in fitted.iter().flatten().zip(again.iter().flatten()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn transform_one_matches_batch() {
        let data = sample();
        let (scaler, fitted) = StandardScaler::fit_transform(&data).unwrap();
        assert_eq!(scaler.transform_one(&data[3]).unwrap(), fitted[3]);
    }

    #[test]
    fn empty_input_rejected() {
        assert!(matches!(
            StandardScaler::fit(&[]),
            Err(PrepError::EmptyDataset)
        ));
    }

    #[test]
    fn width_mismatch_rejected() {
        let scaler = StandardScaler::fit(&sample()).unwrap();
        let err = scaler.transform(&[vec![1.0, 2.0]]).unwrap_err();
        assert!(matches!(
            err,
            PrepError::ColumnCountMismatch { row: 0, expected: 3, got: 2 }
        ));
    }

    #[test]
    fn non_finite_rejected() {
        let mut data = sample();
        data[1][1] = f64::INFINITY;
        assert!(matches!(
            StandardScaler::fit(&data),
            Err(PrepError::NonFiniteValue { row: 1, column: 1 })
        ));
    }

    #[test]
    fn bytes_round_trip() {
        let scaler = StandardScaler::fit(&sample()).unwrap();
        let restored = StandardScaler::from_bytes(&scaler.to_bytes().unwrap()).unwrap();
        assert_eq!(scaler, restored);
    }
}
