//! SeaORM entities of the build catalog

pub mod build;
pub mod build_hash;
pub mod minecraft_version;
pub mod project_version;
pub mod server_type;

pub use build_hash::Algorithm;
pub use minecraft_version::VersionType;
pub use server_type::ServerType;
