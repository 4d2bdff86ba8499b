use crate::error::{Result, SpectroError};

/// Frames x bins energies, one row per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct BinMatrix {
    rows: Vec<Vec<f64>>,
    columns: usize,
}

/// Bin counts before and after pruning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PruneReport {
    pub before: usize,
    pub after: usize,
}

impl BinMatrix {
    pub fn new(columns: usize) -> Self {
        Self {
            rows: Vec::new(),
            columns,
        }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>, columns: usize) -> Result<Self> {
        let mut matrix = Self::new(columns);
        for row in rows {
            matrix.push_row(row)?;
        }
        Ok(matrix)
    }

    pub fn push_row(&mut self, row: Vec<f64>) -> Result<()> {
        if row.len() != self.columns {
            return Err(SpectroError::InvalidBinCount {
                bins: self.columns,
                len: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn frames(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.frames(), self.columns)
    }

    /// Largest value anywhere in the matrix, 0 when empty.
    pub fn max(&self) -> f64 {
        self.rows
            .iter()
            .flatten()
            .copied()
            .fold(0.0f64, f64::max)
    }

    /// Per-column maximum across all frames.
    pub fn column_max(&self) -> Vec<f64> {
        let mut peaks = vec![0.0f64; self.columns];
        for row in &self.rows {
            for (peak, &v) in peaks.iter_mut().zip(row) {
                *peak = peak.max(v);
            }
        }
        peaks
    }

    /// Divides every entry by the global maximum.
    ///
    /// A matrix whose maximum is zero (silence, or no frames at all) has no
    /// meaningful scale and is rejected with [`SpectroError::EmptyOrSilentInput`].
    pub fn normalized(&self) -> Result<BinMatrix> {
        let peak = self.max();
        if peak <= 0.0 || !peak.is_finite() {
            return Err(SpectroError::EmptyOrSilentInput);
        }
        Ok(BinMatrix {
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().map(|v| v / peak).collect())
                .collect(),
            columns: self.columns,
        })
    }

    /// Keeps the columns whose peak is at least `min_density`, in order.
    pub fn pruned(&self, min_density: f64) -> (BinMatrix, PruneReport) {
        let keep: Vec<usize> = self
            .column_max()
            .iter()
            .enumerate()
            .filter(|(_, &peak)| peak >= min_density)
            .map(|(i, _)| i)
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| keep.iter().map(|&i| row[i]).collect())
            .collect();
        let report = PruneReport {
            before: self.columns,
            after: keep.len(),
        };
        (
            BinMatrix {
                rows,
                columns: keep.len(),
            },
            report,
        )
    }
}
