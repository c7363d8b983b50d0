//! Core interfaces of the object model.

pub mod object;

pub use object::ObjectOps;
