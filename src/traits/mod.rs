pub mod factory;
pub mod unit;

pub use factory::{UnitDescriptor, UnitFactory};
pub use unit::Unit;
