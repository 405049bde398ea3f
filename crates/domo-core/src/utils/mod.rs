//! Utility functions for stack introspection.

pub mod stack;
