//! Site generation
//!
//! Seeded site distributions for building diagrams without hand-made input.

mod scatter;

pub use scatter::{jittered_grid_sites, scatter_sites, ScatterOptions};
