pub mod device_handler;
pub mod error;
pub mod server;

pub use device_handler::*;
pub use error::*;
pub use server::*;
