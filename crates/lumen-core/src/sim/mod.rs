pub mod color;
pub mod fields;
pub mod simulator;

pub use color::*;
pub use fields::*;
pub use simulator::*;
