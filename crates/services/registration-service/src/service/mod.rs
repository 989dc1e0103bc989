//! Business logic layer.

mod registrar;

pub use registrar::{UserRegistrar, UserRegistration};
