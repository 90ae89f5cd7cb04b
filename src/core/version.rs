//! Build metadata generated by the build script

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// On-disk layout version written into the package metadata
pub fn storage_format_version() -> u32 {
    STORAGE_FORMAT_VERSION.parse().unwrap_or(0)
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// One-line description used by `--version`
pub fn long_version() -> String {
    format!(
        "{} (storage format {}, built {}, git {})",
        env!("CARGO_PKG_VERSION"),
        storage_format_version(),
        build_time(),
        git_hash()
    )
}
