pub mod category;
pub mod config;
pub mod log;
pub mod todo;

pub use category::*;
pub use config::*;
pub use log::*;
pub use todo::*;
