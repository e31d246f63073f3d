//! Pipeline stages for the changelog image migration.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different target encoding) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! scan ──▶ fetch ──▶ transcode ──▶ rewrite
//! (regex)  (HTTP)    (JPEG + MD5)  (substitute)
//! ```
//!
//! 1. [`scan`]      — find distinct tracked image URLs in the document
//! 2. [`fetch`]     — download each URL; the only stage with network I/O,
//!    and the only one allowed to fail per-URL without consequence
//! 3. [`transcode`] — re-encode as JPEG, content-address into the cache,
//!    derive the document-relative path
//! 4. [`rewrite`]   — pure text substitution of old URLs for cached paths

pub mod fetch;
pub mod rewrite;
pub mod scan;
pub mod transcode;
