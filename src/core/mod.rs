//! Core application logic

pub mod app;
pub mod assembler;
pub mod events;
pub mod input;
pub mod scheduler;
pub mod state;
