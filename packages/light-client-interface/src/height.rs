//! This module defines [`Height`].

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Height of a remote chain, ordered by revision first and block height second.
#[derive(
    Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Default,
)]
pub struct Height {
    /// The revision number
    #[serde(default)]
    pub revision_number: u64,
    /// The block height within the revision
    pub revision_height: u64,
}

impl Height {
    /// Creates a new height.
    #[must_use]
    pub const fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revision_number,
            revision_height,
        }
    }

    /// The zero height marks an unset height (e.g. a client that is not frozen).
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Returns true if both components are zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.revision_number == 0 && self.revision_height == 0
    }

    /// Returns the next block height within the same revision.
    #[must_use]
    pub const fn increment(self) -> Self {
        Self::new(self.revision_number, self.revision_height.saturating_add(1))
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::Height;

    #[rstest]
    #[case(Height::new(0, 10), Height::new(0, 11))]
    #[case(Height::new(0, 100), Height::new(1, 1))]
    #[case(Height::new(1, 5), Height::new(2, 0))]
    fn test_height_ordering(#[case] lower: Height, #[case] higher: Height) {
        assert!(lower < higher);
        assert_eq!(lower.max(higher), higher);
    }

    #[test]
    fn test_zero_and_display() {
        assert!(Height::default().is_zero());
        assert!(!Height::new(0, 1).is_zero());
        assert_eq!(Height::new(4, 12).to_string(), "4-12");
        assert_eq!(Height::new(4, 12).increment(), Height::new(4, 13));
    }

    #[test]
    fn test_revision_number_defaults_to_zero() {
        let height: Height = serde_json::from_str(r#"{"revision_height":7}"#).unwrap();
        assert_eq!(height, Height::new(0, 7));
    }
}
