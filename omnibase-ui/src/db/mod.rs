//! Database operations for the OmniBase service
//!
//! One module per collection plus settings and the external API cache.
//! Schema lives in `omnibase-common`.

pub mod cache;
pub mod games;
pub mod movies;
pub mod settings;
pub mod tracks;
