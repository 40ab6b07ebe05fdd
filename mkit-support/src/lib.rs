//! # mkit support
//!
//! Small, dependency-light helpers shared by the mkit crates:
//! - String transformers ([`affix`], [`case`])
//! - Function composition ([`transform`])
//! - Text rendering for error messages ([`rendering`])

pub mod affix;
pub mod case;
pub mod rendering;
pub mod transform;
