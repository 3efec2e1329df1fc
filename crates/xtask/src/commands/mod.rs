//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod drops;
mod duel;
mod roll;
mod validate;

pub use drops::Drops;
pub use duel::Duel;
pub use roll::Roll;
pub use validate::Validate;
