//! Compile-time build information, shown by `simulate --version`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_not_empty() {
        assert!(!BUILD_COMMIT.is_empty());
        assert!(!BUILD_DATE.is_empty());
    }

    #[test]
    fn test_build_commit_format() {
        // 7-char short hash, or "unknown" outside a git checkout
        assert!(BUILD_COMMIT == "unknown" || BUILD_COMMIT.len() == 7);
    }
}
