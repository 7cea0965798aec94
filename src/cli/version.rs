//! Version command handler

/// Git commit baked in at build time, if the build provided one
const GIT_COMMIT: Option<&str> = option_env!("REFLECTOR_GIT_COMMIT");
const BUILD_DATE: Option<&str> = option_env!("REFLECTOR_BUILD_DATE");

/// Display version information
pub fn display_version() {
    println!("cluster-reflector version {}", env!("CARGO_PKG_VERSION"));
    println!("Git commit: {}", GIT_COMMIT.unwrap_or("unknown"));
    println!("Build date: {}", BUILD_DATE.unwrap_or("unknown"));
}

/// Version fields attached to the startup log line
pub fn build_info() -> (&'static str, &'static str, &'static str) {
    (
        env!("CARGO_PKG_VERSION"),
        GIT_COMMIT.unwrap_or("unknown"),
        BUILD_DATE.unwrap_or("unknown"),
    )
}
