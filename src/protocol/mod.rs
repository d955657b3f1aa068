//! Host protocol handling.
//!
//! A line-oriented stdin/stdout protocol: the parser turns lines into
//! requests, and the JSON helpers decode snapshots and encode the orders
//! sent back.

pub mod json;
pub mod parser;

pub use json::{format_orders, parse_snapshot, ProtocolError};
pub use parser::{parse_command, Request};
