//! Process-level infrastructure shared by the broadcast service: command line
//! and environment configuration, and console logging.

pub mod config;
pub mod logging;
