mod atomic;
mod basic;
mod config;
mod interface;
mod lock;
mod state;
mod status;

pub use atomic::*;
pub use basic::*;
pub use config::*;
pub use interface::*;
pub use lock::*;
pub use status::*;
