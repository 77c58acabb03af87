pub mod config;
pub mod economics;
pub mod error;
pub mod genesis;
pub mod node;

pub use economics::Economic;
pub use error::EconError;
pub use genesis::Genesis;
