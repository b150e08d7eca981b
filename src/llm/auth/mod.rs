//! Credential sources for provider backends

pub mod adc;
