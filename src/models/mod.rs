pub mod enums;
pub mod phase_data;

pub use enums::*;
pub use phase_data::*;
