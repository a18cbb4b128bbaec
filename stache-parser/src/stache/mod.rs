//! Main module for stache library functionality

pub mod error;
pub mod formats;
pub mod lexing;
pub mod loader;
pub mod parsing;
pub mod range;
pub mod testing;
pub mod token;
