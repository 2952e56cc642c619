//! Application core — pure domain logic, zero I/O.
//!
//! The poll → authorize → route → execute → reply pipeline for both
//! controller personalities.  All interaction with hardware and the chat
//! service happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without a board or a network.

pub mod commands;
pub mod controller;
pub mod events;
pub mod guard;
pub mod ports;
pub mod router;
pub mod service;
