//! Core domain types: the extension family, file references, and errors.

pub mod errors;
pub mod extensions;
pub mod model;
