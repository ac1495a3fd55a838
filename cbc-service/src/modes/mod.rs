//! Cipher modes implementation

pub mod cbc;

pub use cbc::*;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Block chaining modes understood by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherMode {
    #[default]
    Cbc,
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherMode::Cbc => f.write_str("CBC"),
        }
    }
}
