//! Build identification captured by build.rs

pub const GIT_HASH: &str = env!("GIT_HASH");
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
pub const BUILD_PROFILE: &str = env!("BUILD_PROFILE");

/// One-line startup banner, e.g. `pcat-fr v0.1.0 [1a2b3c4d] built 2024-05-01T10:00:00Z (release)`
pub fn banner(tool: &str, version: &str) -> String {
    format!(
        "{} v{} [{}] built {} ({})",
        tool, version, GIT_HASH, BUILD_TIMESTAMP, BUILD_PROFILE
    )
}
