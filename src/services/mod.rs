// src/services/mod.rs

pub mod attendance;
pub mod overtime;
pub mod slip;
