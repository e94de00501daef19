pub mod build;
pub mod resolve;
pub mod search;
pub mod stats;
pub mod version;

#[cfg(test)]
pub mod testing;

pub use build::Build;
pub use resolve::Resolve;
pub use stats::Stats;
pub use version::Version;
