//! This module defines [`TrustThreshold`].

use std::fmt;

use light_client_utils::ensure;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::TendermintClientError;

/// Fraction of the trusted validator set's voting power that must sign a non-adjacent header.
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Copy, Debug)]
pub struct TrustThreshold {
    /// The numerator of the fraction
    pub numerator: u64,
    /// The denominator of the fraction
    pub denominator: u64,
}

impl TrustThreshold {
    /// The default trust level of one third.
    pub const ONE_THIRD: Self = Self {
        numerator: 1,
        denominator: 3,
    };

    /// Two thirds, the threshold a commit must strictly exceed for its own validator set.
    pub const TWO_THIRDS: Self = Self {
        numerator: 2,
        denominator: 3,
    };

    /// Creates a validated trust threshold.
    /// # Errors
    /// Returns an error if the fraction is not within [1/3, 1].
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, TendermintClientError> {
        let threshold = Self {
            numerator,
            denominator,
        };
        threshold.validate()?;
        Ok(threshold)
    }

    /// Checks that the fraction is within [1/3, 1].
    /// # Errors
    /// Returns an error if the fraction is out of range or the denominator is zero.
    pub fn validate(&self) -> Result<(), TendermintClientError> {
        let numerator = u128::from(self.numerator);
        let denominator = u128::from(self.denominator);
        ensure!(
            denominator != 0 && numerator * 3 >= denominator && numerator <= denominator,
            TendermintClientError::InvalidTrustThreshold {
                numerator: self.numerator,
                denominator: self.denominator,
            }
        );
        Ok(())
    }

    /// Returns true if `signed / total >= numerator / denominator`, using exact integer
    /// arithmetic.
    #[must_use]
    pub fn is_reached_by(&self, signed: u64, total: u64) -> bool {
        u128::from(signed) * u128::from(self.denominator)
            >= u128::from(total) * u128::from(self.numerator)
    }

    /// Returns true if `signed / total > numerator / denominator`.
    #[must_use]
    pub fn is_exceeded_by(&self, signed: u64, total: u64) -> bool {
        u128::from(signed) * u128::from(self.denominator)
            > u128::from(total) * u128::from(self.numerator)
    }
}

impl Default for TrustThreshold {
    fn default() -> Self {
        Self::ONE_THIRD
    }
}

impl fmt::Display for TrustThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
