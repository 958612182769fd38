/// The combined "built on <host> at <time>" string stamped by build.rs.
pub fn build_info() -> &'static str {
    option_env!("DAEMONMASTER_BUILD_INFO").unwrap_or("build info unavailable")
}

pub fn banner() -> String {
    format!(
        "daemonmaster {} ({})",
        env!("CARGO_PKG_VERSION"),
        build_info()
    )
}
