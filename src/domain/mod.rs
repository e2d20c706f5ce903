//! Domain modules (vertical slices): types, wire types, sub-clients, state.

pub mod position;
pub mod trade;
