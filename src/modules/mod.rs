pub mod common;
pub mod error;
pub mod imap;
pub mod logger;
pub mod message;
pub mod rest;
pub mod settings;
pub mod utils;
