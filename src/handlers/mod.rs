// src/handlers/mod.rs

pub mod attendance;
pub mod employee;
pub mod general;
pub mod loan;
pub mod slip;
