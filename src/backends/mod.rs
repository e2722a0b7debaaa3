//! Concrete completion backends.

pub mod gateway;
