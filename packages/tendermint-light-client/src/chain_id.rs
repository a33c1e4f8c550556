//! Revision parsing of chain identifiers.
//!
//! A chain id is in revision format when it ends in `-{N}` where `N` is a decimal number without
//! leading zeros, e.g. `cosmoshub-4`. Any other chain id has revision number zero.

/// Splits a chain id in revision format into its name and revision number.
#[must_use]
pub fn split_revision(chain_id: &str) -> Option<(&str, u64)> {
    let (name, suffix) = chain_id.rsplit_once('-')?;
    if name.is_empty() || name.ends_with('-') || suffix.starts_with('0') {
        return None;
    }
    if !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    suffix.parse().ok().map(|revision| (name, revision))
}

/// Returns the revision number encoded in the chain id, zero if it is not in revision format.
#[must_use]
pub fn revision_number(chain_id: &str) -> u64 {
    split_revision(chain_id).map_or(0, |(_, revision)| revision)
}

/// Returns the chain id with its revision number replaced by `revision`.
///
/// Chain ids that are not in revision format are returned unchanged.
#[must_use]
pub fn with_revision(chain_id: &str, revision: u64) -> String {
    split_revision(chain_id).map_or_else(
        || chain_id.to_string(),
        |(name, _)| format!("{name}-{revision}"),
    )
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("cosmoshub-4", 4)]
    #[case("testchain-1", 1)]
    #[case("evmos_9001-2", 2)]
    #[case("a-b-c-12", 12)]
    #[case("gaia-18446744073709551615", u64::MAX)]
    #[case("testchain", 0)]
    #[case("testchain-0", 0)]
    #[case("testchain-01", 0)]
    #[case("testchain--1", 0)]
    #[case("-1", 0)]
    #[case("testchain-", 0)]
    #[case("testchain-1a", 0)]
    #[case("gaia-18446744073709551616", 0)]
    fn test_revision_number(#[case] chain_id: &str, #[case] expected: u64) {
        assert_eq!(revision_number(chain_id), expected);
        assert_eq!(split_revision(chain_id).is_some(), expected != 0);
    }

    #[rstest]
    #[case("testchain-1", 2, "testchain-2")]
    #[case("a-b-7", 8, "a-b-8")]
    #[case("testchain", 2, "testchain")]
    #[case("testchain-0", 3, "testchain-0")]
    fn test_with_revision(#[case] chain_id: &str, #[case] revision: u64, #[case] expected: &str) {
        assert_eq!(with_revision(chain_id, revision), expected);
    }
}
