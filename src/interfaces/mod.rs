//! Management interfaces

pub mod cli;
