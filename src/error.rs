use std::io;

use thiserror::Error;

use crate::arithmetic::format::FormatError;
use crate::arithmetic::real::RealError;
use crate::configuration::config::ConfigError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Real(#[from] RealError),

    #[error("bad output format: {0}")]
    Format(#[from] FormatError),

    #[error("cannot write output: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
