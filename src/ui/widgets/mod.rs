pub mod particles;

pub use particles::ParticleCanvas;
