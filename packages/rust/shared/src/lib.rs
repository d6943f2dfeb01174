//! Shared types, error model, and configuration for CrowdMint.
//!
//! This crate is the foundation depended on by the other CrowdMint crates.
//! It provides:
//! - [`CrowdMintError`] — the unified error type
//! - Domain types ([`CampaignView`], [`Category`], [`Backers`], [`QuerySpec`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AggregateConfig, AppConfig, RegistryConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{CrowdMintError, Result};
pub use types::{Backers, CampaignView, Category, CategoryFilter, QuerySpec, SortKey};
