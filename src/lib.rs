pub mod compress;
pub mod config;
pub mod error;
pub mod header_utils;
pub mod io_struct;
pub mod logging;
pub mod proxy_state;
pub mod server;
pub mod summarizer;
pub mod upstream;
