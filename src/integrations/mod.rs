//! Operating system integrations

pub mod system;
