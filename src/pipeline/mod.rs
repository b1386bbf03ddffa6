//! Pipeline module - load, encode, split, train and evaluate

pub mod encoder;
pub mod evaluate;
pub mod loader;
pub mod matrix;
pub mod model;
pub mod split;
pub mod target;

pub use encoder::*;
pub use evaluate::*;
pub use loader::*;
pub use matrix::*;
pub use model::*;
pub use split::*;
pub use target::*;
