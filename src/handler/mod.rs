//! Request handler module
//!
//! Path resolution, directory listings and the static file pipeline that
//! ties them together. Resolution and listing are strategies injected
//! through `AppState`, so the pipeline depends only on their traits.

pub mod encoding;
pub mod files;
pub mod listing;
pub mod resolve;
pub mod router;

// Re-export main entry point and strategy types
pub use listing::{DirectoryEntry, DirectoryLister, HtmlLister, Listing};
pub use resolve::{PathResolver, ResolvedPath, RootResolver};
pub use router::handle_request;
