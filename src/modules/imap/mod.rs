pub mod client;
pub mod executor;
pub mod session;
