//! HTTP surface of the proxy: configuration, middleware, handlers, error
//! mapping, and the server lifecycle.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod shutdown;

pub use config::*;
pub use error::ProxyError;
pub use handlers::AppState;
pub use module::ProxyModule;
pub use shutdown::*;
