// Server module entry point
// Listener creation, accept loop, connection serving and shutdown signal

mod accept;
mod connection;
mod listener;
mod signal;

pub use accept::run;
pub use listener::create_listener;
pub use signal::shutdown_signal;
