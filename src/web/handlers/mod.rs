pub mod ats_handlers;
pub mod system_handlers;

pub use ats_handlers::*;
pub use system_handlers::*;
