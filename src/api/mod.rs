pub mod cors;
mod handlers;
mod routes;
mod server;

pub use routes::router;

// Re-export HTTP server for use in main
pub use server::ApiServer;
