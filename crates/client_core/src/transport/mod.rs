//! Record service transports: remote HTTP and in-process.

pub mod http;
pub mod local;
