pub mod build_info;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod launcher;
pub mod probe;
pub mod shutdown;
pub mod store;

/// One timestamped event line to stderr so operators can see what the
/// controller decided and why.
pub(crate) fn dm_event(component: &str, msg: impl AsRef<str>) {
    let ts = chrono::Local::now().format("%Y-%m-%d_%H:%M:%S%.3f");
    eprintln!("{ts} [{component}] {}", msg.as_ref());
}
