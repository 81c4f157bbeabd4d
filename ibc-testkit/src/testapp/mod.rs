mod context;
mod transfer;

pub use context::*;
pub use transfer::*;
