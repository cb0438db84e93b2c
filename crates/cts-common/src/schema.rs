//! Schema versioning and compatibility.

/// Current schema version for serialized action reports.
///
/// Follows semver: MAJOR.MINOR.PATCH
/// - MAJOR: Breaking changes (field removals, type changes)
/// - MINOR: Additive changes (new optional fields)
/// - PATCH: Bug fixes, documentation
pub const SCHEMA_VERSION: &str = "1.0.0";

fn major(version: &str) -> Option<u32> {
    version.split('.').next().and_then(|s| s.parse::<u32>().ok())
}

/// Check if a report schema version can be read by this build.
pub fn is_compatible(version: &str) -> bool {
    match (major(SCHEMA_VERSION), major(version)) {
        (Some(current), Some(other)) => current == other,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_same_major_compatible() {
        assert!(is_compatible("1.0.0"));
        assert!(is_compatible("1.1.0"));
        assert!(is_compatible("1.99.99"));
    }

    #[test]
    fn test_different_major_incompatible() {
        assert!(!is_compatible("0.9.0"));
        assert!(!is_compatible("2.0.0"));
    }

    #[test]
    fn test_garbage_incompatible() {
        assert!(!is_compatible(""));
        assert!(!is_compatible("v1.0.0"));
    }

    proptest! {
        #[test]
        fn any_minor_patch_of_current_major_is_compatible(minor in 0u32..1000, patch in 0u32..1000) {
            let version = format!("1.{}.{}", minor, patch);
            prop_assert!(is_compatible(&version));
        }
    }
}
