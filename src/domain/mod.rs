//! Domain models independent of the terminal and the RPC transport
//!
//! - `particles`: the decorative particle engine behind the cards

pub mod particles;

pub use particles::{
    FieldBounds, Link, Particle, ParticleError, ParticleField, ParticleOptions, Rgb,
};
