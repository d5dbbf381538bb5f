//! dirserve: a minimal static file HTTP server
//!
//! Serves files under a root directory and renders a listing for
//! directories that have no index file. Request paths are confined to the
//! root by dropping unsafe segments instead of resolving them.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
