pub mod demo;
pub mod error;
pub mod net;
pub mod phy;
pub mod sim;
pub mod topo;
pub mod viz;

pub use error::{Error, Result};

#[cfg(test)]
mod test;
