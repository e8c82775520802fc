//! Storage infrastructure: the mapping file and the configuration file.
//!
//! - `mapping_store` owns the durable TagIdentifier -> ActionName table and
//!   implements the application's
//!   [`MappingRepository`](crate::application::MappingRepository).
//! - `config` reads the optional TOML configuration file with defaults for
//!   every setting.
//!
//! Both use TOML so an operator can read and hand-edit them.

pub mod config;
pub mod mapping_store;

pub use mapping_store::TomlMappingStore;
