//! Indirection table fill policies.

use super::context::RXFH_INDIR_NO_CHANGE;

/// Fill policy rejected its parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FillError {
    /// A parameter is out of its valid domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Every weight is zero.
    #[error("at least one weight must be non-zero")]
    NoEffectiveWeight,

    /// Weights add up to more than the table can hold.
    #[error("total weight {total} exceeds the size of the indirection table ({size})")]
    WeightExceedsCapacity {
        /// Sum of all weights.
        total: u64,
        /// Table length.
        size: usize,
    },

    /// A ring index does not fit in 32 bits.
    #[error("ring index overflows 32 bits")]
    Overflow,
}

/// How to fill the RSS indirection table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillAction {
    /// Spread flows evenly over `n` rings starting at `start`.
    Equal {
        /// First ring.
        start: u32,
        /// Number of rings.
        n: u32,
    },
    /// Spread flows over rings `start..start + weights.len()` in
    /// proportion to `weights`.
    Weighted {
        /// First ring.
        start: u32,
        /// One weight per ring.
        weights: Vec<u32>,
    },
    /// Reset the table to the driver default.
    Default,
    /// Delete the RSS context.
    Delete,
}

impl FillAction {
    /// Check parameters without a table.
    ///
    /// Catches everything [`fill`](Self::fill) can reject except the
    /// capacity check, which needs the table length.
    pub fn validate(&self) -> Result<(), FillError> {
        match self {
            FillAction::Equal { start, n } => {
                if *n == 0 {
                    return Err(FillError::InvalidParameter(
                        "number of rings must be non-zero".to_string(),
                    ));
                }
                start.checked_add(n - 1).ok_or(FillError::Overflow)?;
                Ok(())
            }
            FillAction::Weighted { start, weights } => {
                if weights.iter().all(|&w| w == 0) {
                    return Err(FillError::NoEffectiveWeight);
                }
                let last = u32::try_from(weights.len() - 1).map_err(|_| FillError::Overflow)?;
                start.checked_add(last).ok_or(FillError::Overflow)?;
                Ok(())
            }
            FillAction::Default | FillAction::Delete => Ok(()),
        }
    }

    /// Whether this policy writes table entries.
    pub fn writes_table(&self) -> bool {
        matches!(self, FillAction::Equal { .. } | FillAction::Weighted { .. })
    }

    /// Apply the policy to `table`.
    ///
    /// Returns the number of entries written: the table length for
    /// `Equal` and `Weighted`, 0 for `Default`, and
    /// [`RXFH_INDIR_NO_CHANGE`] for `Delete`. `Default` and `Delete` never
    /// touch the table. On error the table is left unmodified.
    pub fn fill(&self, table: &mut [u32]) -> Result<u32, FillError> {
        match self {
            FillAction::Equal { start, n } => {
                self.validate()?;
                let len = table_len(table)?;
                for (i, entry) in table.iter_mut().enumerate() {
                    *entry = start + (i as u32 % n);
                }
                Ok(len)
            }
            FillAction::Weighted { start, weights } => {
                self.validate()?;
                fill_weighted(table, *start, weights)
            }
            FillAction::Default => Ok(0),
            FillAction::Delete => Ok(RXFH_INDIR_NO_CHANGE),
        }
    }
}

fn table_len(table: &[u32]) -> Result<u32, FillError> {
    u32::try_from(table.len()).map_err(|_| FillError::Overflow)
}

/// Run `j` owns the indices below `len * (w[0] + .. + w[j]) / sum`.
fn fill_weighted(table: &mut [u32], start: u32, weights: &[u32]) -> Result<u32, FillError> {
    let filled = table_len(table)?;
    let sum: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    if sum == 0 {
        return Err(FillError::NoEffectiveWeight);
    }

    let len = table.len() as u64;
    if sum > len {
        return Err(FillError::WeightExceedsCapacity {
            total: sum,
            size: table.len(),
        });
    }

    let mut partial = 0u64;
    let mut run = 0usize;
    for (i, entry) in table.iter_mut().enumerate() {
        while i as u64 >= len * partial / sum {
            partial += u64::from(weights[run]);
            run += 1;
        }
        // `run` has already moved one past the run owning `i`.
        *entry = start + (run - 1) as u32;
    }

    Ok(filled)
}
