//! Domain types for the routing agent
//!
//! Turns, steps, and observations shared by memory, the router, and the API.

mod observation;
mod step;
mod turn;

pub use observation::*;
pub use step::*;
pub use turn::*;
