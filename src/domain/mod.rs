//! Core domain types and logic.

pub mod category;
pub mod dividend;
pub mod engine;
pub mod error;
pub mod lot;
pub mod summary;
pub mod transaction;
pub mod views;
