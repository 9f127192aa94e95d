pub mod access_control;
pub mod cli;
pub mod conf;
pub mod handler;
pub mod logging;
pub mod runtime;
