//! # rgsync-codec
//!
//! Codec leaves for the sync pipeline:
//! - [`compress`] — per-entry zlib codec
//! - [`marshal`] — the container's structured-dump wire format
//! - [`container`] — split/join for the script container, whole-file
//!   read/write for data containers
//! - [`text`] — deterministic sorted-key YAML for [`rgsync_core::Value`]
//! - [`manifest`] — the fixed-width export digest and filename derivation

pub mod compress;
pub mod container;
pub mod error;
pub mod manifest;
pub mod marshal;
pub mod text;

pub use error::CodecError;
