use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

const MAGIC: &[u8; 4] = b"SWLR";
const PIVOT_EPSILON: f64 = 1e-12;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("sample has {found} features, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("no training samples")]
    Empty,
    #[error("normal equations are singular")]
    Singular,
    #[error("model file is corrupt: {0}")]
    Corrupt(&'static str),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Labelled samples, all with the same number of features.
#[derive(Clone, Debug, Default)]
pub struct TrainingSet {
    dimension: Option<usize>,
    features: Vec<f64>,
    labels: Vec<f64>,
}

impl TrainingSet {
    pub fn new() -> TrainingSet {
        TrainingSet::default()
    }

    /// The first sample fixes the dimension; later samples must match it.
    pub fn push(&mut self, features: &[f64], label: f64) -> Result<(), ModelError> {
        match self.dimension {
            Some(expected) if expected != features.len() => {
                return Err(ModelError::DimensionMismatch {
                    expected,
                    found: features.len(),
                })
            }
            Some(_) => {}
            None => self.dimension = Some(features.len()),
        }

        self.features.extend_from_slice(features);
        self.labels.push(label);

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    fn samples(&self) -> impl Iterator<Item = (&[f64], f64)> {
        let dimension = self.dimension.unwrap_or(0).max(1);

        self.features
            .chunks(dimension)
            .zip(self.labels.iter().copied())
    }
}

/// `bias + weights . features`, fitted by ridge regression.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearModel {
    bias: f64,
    weights: Vec<f64>,
}

impl LinearModel {
    pub fn new(bias: f64, weights: Vec<f64>) -> LinearModel {
        LinearModel { bias, weights }
    }

    /// Solves `(XᵀX + λI) w = Xᵀy` where `X` carries a leading column of
    /// ones for the bias.
    pub fn fit(set: &TrainingSet, lambda: f64) -> Result<LinearModel, ModelError> {
        let dimension = match set.dimension() {
            Some(dimension) if !set.is_empty() => dimension,
            _ => return Err(ModelError::Empty),
        };

        let size = dimension + 1;
        let mut normal = vec![vec![0.0; size]; size];
        let mut rhs = vec![0.0; size];
        let mut row = vec![0.0; size];

        for (features, label) in set.samples() {
            row[0] = 1.0;
            row[1..].copy_from_slice(features);

            for i in 0..size {
                rhs[i] += row[i] * label;
                for j in 0..size {
                    normal[i][j] += row[i] * row[j];
                }
            }
        }

        for (i, normal_row) in normal.iter_mut().enumerate() {
            normal_row[i] += lambda;
        }

        let solution = solve(normal, rhs).ok_or(ModelError::Singular)?;

        Ok(LinearModel {
            bias: solution[0],
            weights: solution[1..].to_vec(),
        })
    }

    pub fn predict(&self, features: &[f64]) -> f64 {
        self.bias
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(weight, feature)| weight * feature)
                .sum::<f64>()
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Writes the model, creating missing parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut bytes = Vec::with_capacity(4 + 4 + 8 * (self.weights.len() + 1));
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&(self.weights.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&self.bias.to_le_bytes());
        for weight in &self.weights {
            bytes.extend_from_slice(&weight.to_le_bytes());
        }

        fs::write(path, bytes)?;

        Ok(())
    }

    pub fn load(path: &Path) -> Result<LinearModel, ModelError> {
        LinearModel::from_bytes(&fs::read(path)?)
    }

    fn from_bytes(bytes: &[u8]) -> Result<LinearModel, ModelError> {
        if bytes.len() < 16 || &bytes[0..4] != MAGIC {
            return Err(ModelError::Corrupt("missing header"));
        }

        let mut dimension = [0; 4];
        dimension.copy_from_slice(&bytes[4..8]);
        let dimension = u32::from_le_bytes(dimension) as usize;

        if bytes.len() != 8 + 8 * (dimension + 1) {
            return Err(ModelError::Corrupt("length does not match dimension"));
        }

        let mut values = bytes[8..].chunks(8).map(|chunk| {
            let mut value = [0; 8];
            value.copy_from_slice(chunk);
            f64::from_le_bytes(value)
        });

        let bias = values.next().ok_or(ModelError::Corrupt("missing bias"))?;

        Ok(LinearModel {
            bias,
            weights: values.collect(),
        })
    }
}

/// Gaussian elimination with partial pivoting.
fn solve(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Option<Vec<f64>> {
    let size = rhs.len();

    for column in 0..size {
        let pivot = (column..size).max_by(|&a, &b| {
            matrix[a][column]
                .abs()
                .partial_cmp(&matrix[b][column].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

        if matrix[pivot][column].abs() < PIVOT_EPSILON {
            return None;
        }

        matrix.swap(column, pivot);
        rhs.swap(column, pivot);

        for row in column + 1..size {
            let factor = matrix[row][column] / matrix[column][column];
            if factor == 0.0 {
                continue;
            }

            for k in column..size {
                matrix[row][k] -= factor * matrix[column][k];
            }
            rhs[row] -= factor * rhs[column];
        }
    }

    let mut solution = vec![0.0; size];
    for row in (0..size).rev() {
        let tail: f64 = (row + 1..size)
            .map(|k| matrix[row][k] * solution[k])
            .sum();
        solution[row] = (rhs[row] - tail) / matrix[row][row];
    }

    Some(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn recovers_a_linear_relationship() {
        let mut set = TrainingSet::new();
        for a in 0..5 {
            for b in 0..5 {
                let (a, b) = (f64::from(a), f64::from(b));
                set.push(&[a, b], 1.0 + 2.0 * a - 0.5 * b).unwrap();
            }
        }

        let model = LinearModel::fit(&set, 1e-4).unwrap();

        assert!((model.bias() - 1.0).abs() < 1e-2);
        assert!((model.weights()[0] - 2.0).abs() < 1e-2);
        assert!((model.weights()[1] + 0.5).abs() < 1e-2);
        assert!((model.predict(&[3.0, 1.0]) - 6.5).abs() < 1e-2);
    }

    #[test]
    fn rejects_mismatched_samples() {
        let mut set = TrainingSet::new();
        set.push(&[1.0, 2.0, 3.0], 1.0).unwrap();

        let err = set.push(&[1.0, 2.0], 0.0).unwrap_err();

        assert!(matches!(
            err,
            ModelError::DimensionMismatch {
                expected: 3,
                found: 2
            }
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn empty_set_cannot_be_fitted() {
        assert!(matches!(
            LinearModel::fit(&TrainingSet::new(), 1e-4),
            Err(ModelError::Empty)
        ));
    }

    #[test]
    fn regularisation_handles_constant_features() {
        let mut set = TrainingSet::new();
        for _ in 0..10 {
            set.push(&[-1.0, -1.0], 1.0).unwrap();
        }

        let model = LinearModel::fit(&set, 1e-4).unwrap();

        assert!((model.predict(&[-1.0, -1.0]) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn saves_and_loads_into_new_directories() {
        let dir = env::temp_dir().join(format!("sweeper-model-{}", std::process::id()));
        let path = dir.join("nested").join("linear.bin");
        let model = LinearModel::new(0.25, vec![1.5, -2.0, 9.0]);

        model.save(&path).unwrap();
        let loaded = LinearModel::load(&path).unwrap();

        assert_eq!(loaded, model);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn rejects_corrupt_files() {
        assert!(matches!(
            LinearModel::from_bytes(b"SWLR\x02\0\0\0"),
            Err(ModelError::Corrupt(_))
        ));

        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"XXXX");
        bytes.extend_from_slice(&[0; 12]);
        assert!(matches!(
            LinearModel::from_bytes(&bytes),
            Err(ModelError::Corrupt(_))
        ));
    }
}
