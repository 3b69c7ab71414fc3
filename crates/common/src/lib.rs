//! Common utilities, constants, and resources used across the forseti codebase.
//!
//! This crate provides shared functionality for the forseti toolkit, including
//! EVM bytecode helpers, the solc version model, and general utility functions.

/// Constants used throughout the forseti codebase.
pub mod constants;

/// Utilities for working with EVM bytecode and opcodes.
pub mod ether;

/// General utility functions and types for common tasks.
pub mod utils;
