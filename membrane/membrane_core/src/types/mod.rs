//! Data types of the dynamic value model.

pub mod descriptor;
pub mod key;
pub mod value;

pub use descriptor::PropertyDescriptor;
pub use key::{PropertyKey, Symbol};
pub use value::{ObjectClass, Value};
