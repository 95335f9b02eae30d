//! Teacup library exports for testing

pub mod core;
pub mod fs;
pub mod tui;

#[cfg(test)]
pub mod test_support;
