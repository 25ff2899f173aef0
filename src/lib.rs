pub mod config;
pub mod pager;
pub mod process;
pub mod prompt;
pub mod session;
pub mod stats;
