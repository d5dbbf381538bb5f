//! HTTP protocol layer module
//!
//! Response builders, content-type lookup and HTTP-date handling, kept
//! apart from path resolution and listing.

pub mod date;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_501_response, build_file_response,
    build_listing_response, build_redirect_response,
};
