//! Port traits: the seams between the P&L engine and its collaborators.

pub mod activity_port;
pub mod config_port;
pub mod report_port;
