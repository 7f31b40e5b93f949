//! Binding specifications and the endpoint catalog.
//!
//! A [`BindingSpec`] is built once per endpoint, either in code with the
//! [`FieldSpec`] / [`RecordShape`] builders or by loading a catalog document
//! with [`load_catalog`]. Specs are immutable and can be shared freely
//! between threads.

mod load;
mod types;

pub use load::*;
pub use types::*;
