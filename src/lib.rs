pub mod boundary;
pub mod build;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod git;
pub mod process;
pub mod ui;

pub use error::{ReleaseError, Result};
