//! Domain model: yards, week keys and weekly stock records.

pub mod record;
pub mod week;
pub mod yard;

pub use record::*;
pub use week::*;
pub use yard::*;
