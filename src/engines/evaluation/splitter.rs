use crate::error::{PivotgenError, Result};

/// Train prefix and held-out suffix of one close series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataSplit<'a> {
    pub train: &'a [f64],
    pub test: &'a [f64],
}

/// Single chronological cut at a fixed fraction of the series
#[derive(Debug, Clone, Copy)]
pub struct SimpleSplitter {
    train_fraction: f64,
}

impl SimpleSplitter {
    pub fn new(train_fraction: f64) -> Self {
        Self { train_fraction }
    }

    pub fn split<'a>(&self, data: &'a [f64]) -> Result<DataSplit<'a>> {
        let total_rows = data.len();
        let train_rows = (total_rows as f64 * self.train_fraction) as usize;

        if train_rows == 0 || train_rows >= total_rows {
            return Err(PivotgenError::Validation(format!(
                "Invalid split: {} of {} rows for training",
                train_rows, total_rows
            )));
        }

        let (train, test) = data.split_at(train_rows);
        Ok(DataSplit { train, test })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_truncates_toward_zero() {
        let data: Vec<f64> = (0..10).map(f64::from).collect();
        let split = SimpleSplitter::new(0.25).split(&data).unwrap();
        assert_eq!(split.train.len(), 2);
        assert_eq!(split.test.len(), 8);
    }

    #[test]
    fn test_split_rejects_empty_side() {
        assert!(SimpleSplitter::new(0.2).split(&[1.0, 2.0]).is_err());
        assert!(SimpleSplitter::new(0.5).split(&[]).is_err());
    }
}
