//! 错误类型汇总

use thiserror::Error;

use crate::net::TopologyError;
use crate::sim::RegistryError;
use crate::topo::SpecError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
