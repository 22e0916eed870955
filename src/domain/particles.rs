//! Particle engine for the decorative backdrop
//!
//! Particles live in a virtual pixel space derived from the terminal size
//! (one cell is 8x16 "pixels"), drift in a random direction and bounce off
//! the edges. Pairs closer than the link distance are joined by a line.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;

/// Virtual pixels per terminal column
pub const CELL_WIDTH: f64 = 8.0;
/// Virtual pixels per terminal row
pub const CELL_HEIGHT: f64 = 16.0;

#[derive(Debug, Error, PartialEq)]
pub enum ParticleError {
    #[error("invalid color {0:?} (expected #rrggbb)")]
    InvalidColor(String),
    #[error("invalid particle size range {min}..{max}")]
    InvalidSize { min: f64, max: f64 },
    #[error("invalid particle speed {0}")]
    InvalidSpeed(f64),
    #[error("invalid opacity {0} (expected 0.0..=1.0)")]
    InvalidOpacity(f64),
    #[error("fps limit must be greater than zero")]
    ZeroFps,
    #[error("density area must be positive, got {0}")]
    InvalidDensityArea(f64),
    #[error("empty drawing area {width}x{height}")]
    EmptyArea { width: f64, height: f64 },
}

/// Link rendering options
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LinkOptions {
    pub enable: bool,
    pub color: Option<String>,
    pub distance: f64,
    pub opacity: f64,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            enable: true,
            color: None,
            distance: 150.0,
            opacity: 0.5,
        }
    }
}

/// Particle engine options, read from the `[particles]` config table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleOptions {
    pub background: String,
    pub color: String,
    pub fps_limit: u32,
    pub links: LinkOptions,
    pub speed: f64,
    pub number: u32,
    /// Area (in thousands of virtual pixels) that holds `number` particles.
    /// `None` places exactly `number` particles regardless of size.
    pub density_area: Option<f64>,
    pub opacity: f64,
    pub size_min: f64,
    pub size_max: f64,
}

impl Default for ParticleOptions {
    fn default() -> Self {
        Self {
            background: "#0d1117".to_string(),
            color: "#38bdf8".to_string(),
            fps_limit: 60,
            links: LinkOptions::default(),
            speed: 2.0,
            number: 80,
            density_area: Some(800.0),
            opacity: 0.6,
            size_min: 2.0,
            size_max: 6.0,
        }
    }
}

impl ParticleOptions {
    pub fn validate(&self) -> Result<(), ParticleError> {
        Rgb::parse(&self.background)?;
        Rgb::parse(&self.color)?;
        if let Some(color) = self.links.color.as_deref() {
            Rgb::parse(color)?;
        }
        if self.fps_limit == 0 {
            return Err(ParticleError::ZeroFps);
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(ParticleError::InvalidSpeed(self.speed));
        }
        for opacity in [self.opacity, self.links.opacity] {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(ParticleError::InvalidOpacity(opacity));
            }
        }
        if !(self.size_min > 0.0 && self.size_min <= self.size_max) {
            return Err(ParticleError::InvalidSize {
                min: self.size_min,
                max: self.size_max,
            });
        }
        if let Some(area) = self.density_area {
            if !(area.is_finite() && area > 0.0) {
                return Err(ParticleError::InvalidDensityArea(area));
            }
        }
        Ok(())
    }

    /// Number of particles to place in the given bounds
    pub fn particle_count(&self, bounds: FieldBounds) -> usize {
        match self.density_area {
            Some(area) => {
                let factor = (bounds.width * bounds.height / 1000.0) / area;
                (self.number as f64 * factor).round() as usize
            }
            None => self.number as usize,
        }
    }
}

/// 24-bit color parsed from `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn parse(value: &str) -> Result<Self, ParticleError> {
        let invalid = || ParticleError::InvalidColor(value.to_string());
        let payload = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if payload.len() != 6 {
            return Err(invalid());
        }
        let bytes = hex::decode(payload).map_err(|_| invalid())?;
        Ok(Rgb(bytes[0], bytes[1], bytes[2]))
    }

    /// Blend toward `base` by `1 - alpha`
    pub fn blend(self, base: Rgb, alpha: f64) -> Rgb {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f64 * alpha + bg as f64 * (1.0 - alpha)).round() as u8;
        Rgb(mix(self.0, base.0), mix(self.1, base.1), mix(self.2, base.2))
    }
}

/// Size of the drawing area in virtual pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub width: f64,
    pub height: f64,
}

impl FieldBounds {
    pub fn from_cells(cols: u16, rows: u16) -> Self {
        Self {
            width: cols as f64 * CELL_WIDTH,
            height: rows as f64 * CELL_HEIGHT,
        }
    }

    fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
}

/// A line between two particles closer than the link distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: (f64, f64),
    pub to: (f64, f64),
    /// 0.0 (at the link distance) to the configured link opacity (touching)
    pub strength: f64,
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    options: ParticleOptions,
    bounds: FieldBounds,
    particles: Vec<Particle>,
    background: Rgb,
    color: Rgb,
    link_color: Rgb,
}

impl ParticleField {
    /// Validate the options and seed a field from OS entropy
    pub fn load(options: ParticleOptions, bounds: FieldBounds) -> Result<Self, ParticleError> {
        let mut rng = StdRng::seed_from_u64(rand::rng().random());
        Self::seed(options, bounds, &mut rng)
    }

    pub fn seed<R: Rng>(
        options: ParticleOptions,
        bounds: FieldBounds,
        rng: &mut R,
    ) -> Result<Self, ParticleError> {
        options.validate()?;
        if bounds.is_empty() {
            return Err(ParticleError::EmptyArea {
                width: bounds.width,
                height: bounds.height,
            });
        }

        let background = Rgb::parse(&options.background)?;
        let color = Rgb::parse(&options.color)?;
        let link_color = match options.links.color.as_deref() {
            Some(value) => Rgb::parse(value)?,
            None => color,
        };

        let count = options.particle_count(bounds);
        let particles = (0..count)
            .map(|_| {
                let radius = rng.random_range(options.size_min..=options.size_max);
                let angle = rng.random_range(0.0..std::f64::consts::TAU);
                let velocity = rng.random_range(0.5..=1.0);
                Particle {
                    x: rng.random_range(0.0..bounds.width),
                    y: rng.random_range(0.0..bounds.height),
                    vx: angle.cos() * velocity,
                    vy: angle.sin() * velocity,
                    radius,
                }
            })
            .collect();

        Ok(Self {
            options,
            bounds,
            particles,
            background,
            color,
            link_color,
        })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> FieldBounds {
        self.bounds
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Particle color already blended with the configured opacity
    pub fn particle_color(&self) -> Rgb {
        self.color.blend(self.background, self.options.opacity)
    }

    pub fn link_color(&self) -> Rgb {
        self.link_color
    }

    /// Minimum time between simulation steps
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.options.fps_limit as f64)
    }

    /// Advance the simulation; movement is `speed` pixels per frame at the fps limit
    pub fn step(&mut self, elapsed: Duration) {
        let frames = elapsed.as_secs_f64() * self.options.fps_limit as f64;
        let distance = self.options.speed * frames;
        let FieldBounds { width, height } = self.bounds;

        for particle in &mut self.particles {
            particle.x += particle.vx * distance;
            particle.y += particle.vy * distance;

            if particle.x < 0.0 {
                particle.x = -particle.x;
                particle.vx = particle.vx.abs();
            } else if particle.x > width {
                particle.x = 2.0 * width - particle.x;
                particle.vx = -particle.vx.abs();
            }
            if particle.y < 0.0 {
                particle.y = -particle.y;
                particle.vy = particle.vy.abs();
            } else if particle.y > height {
                particle.y = 2.0 * height - particle.y;
                particle.vy = -particle.vy.abs();
            }

            // A single huge step can overshoot twice
            particle.x = particle.x.clamp(0.0, width);
            particle.y = particle.y.clamp(0.0, height);
        }
    }

    /// Rescale positions to new bounds; empty bounds are ignored
    pub fn resize(&mut self, bounds: FieldBounds) {
        if bounds.is_empty() || bounds == self.bounds {
            return;
        }
        let sx = bounds.width / self.bounds.width;
        let sy = bounds.height / self.bounds.height;
        for particle in &mut self.particles {
            particle.x = (particle.x * sx).clamp(0.0, bounds.width);
            particle.y = (particle.y * sy).clamp(0.0, bounds.height);
        }
        self.bounds = bounds;
    }

    pub fn links(&self) -> Vec<Link> {
        let links = &self.options.links;
        if !links.enable {
            return Vec::new();
        }
        let mut out = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance = (a.x - b.x).hypot(a.y - b.y);
                if distance < links.distance {
                    out.push(Link {
                        from: (a.x, a.y),
                        to: (b.x, b.y),
                        strength: (1.0 - distance / links.distance) * links.opacity,
                    });
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(options: ParticleOptions, bounds: FieldBounds) -> ParticleField {
        let mut rng = StdRng::seed_from_u64(7);
        ParticleField::seed(options, bounds, &mut rng).unwrap()
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(Rgb::parse("#38bdf8").unwrap(), Rgb(0x38, 0xbd, 0xf8));
        assert!(Rgb::parse("38bdf8").is_err());
        assert!(Rgb::parse("#38bd").is_err());
        assert!(Rgb::parse("#zzzzzz").is_err());
    }

    #[test]
    fn test_density_scales_count() {
        let options = ParticleOptions::default();
        // 100x50 cells = 800x800 px = 640 thousand px; 640 / 800 * 80 = 64
        let bounds = FieldBounds::from_cells(100, 50);
        assert_eq!(options.particle_count(bounds), 64);

        let fixed = ParticleOptions {
            density_area: None,
            ..ParticleOptions::default()
        };
        assert_eq!(fixed.particle_count(bounds), 80);
    }

    #[test]
    fn test_seed_places_particles_inside_bounds() {
        let bounds = FieldBounds::from_cells(80, 24);
        let field = seeded(ParticleOptions::default(), bounds);
        assert_eq!(
            field.particles().len(),
            ParticleOptions::default().particle_count(bounds)
        );
        for p in field.particles() {
            assert!((0.0..=bounds.width).contains(&p.x));
            assert!((0.0..=bounds.height).contains(&p.y));
            assert!((2.0..=6.0).contains(&p.radius));
        }
    }

    #[test]
    fn test_step_bounces_at_edges() {
        let bounds = FieldBounds::from_cells(40, 10);
        let mut field = seeded(ParticleOptions::default(), bounds);
        for _ in 0..500 {
            field.step(Duration::from_millis(50));
        }
        for p in field.particles() {
            assert!((0.0..=bounds.width).contains(&p.x), "x out of bounds: {}", p.x);
            assert!((0.0..=bounds.height).contains(&p.y), "y out of bounds: {}", p.y);
        }
    }

    #[test]
    fn test_step_reflects_velocity() {
        let bounds = FieldBounds {
            width: 100.0,
            height: 100.0,
        };
        let options = ParticleOptions {
            number: 1,
            density_area: None,
            speed: 1.0,
            fps_limit: 10,
            ..ParticleOptions::default()
        };
        let mut field = seeded(options, bounds);
        field.particles[0] = Particle {
            x: 99.0,
            y: 50.0,
            vx: 1.0,
            vy: 0.0,
            radius: 2.0,
        };
        // 1 second at 10 fps and speed 1 = 10 px
        field.step(Duration::from_secs(1));
        let p = &field.particles()[0];
        assert!((p.x - 91.0).abs() < 1e-9);
        assert!(p.vx < 0.0);
    }

    #[test]
    fn test_links_respect_distance() {
        let options = ParticleOptions {
            number: 3,
            density_area: None,
            ..ParticleOptions::default()
        };
        let mut field = seeded(options, FieldBounds::from_cells(100, 50));
        let at = |x: f64| Particle {
            x,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            radius: 2.0,
        };
        field.particles = vec![at(0.0), at(75.0), at(500.0)];
        let links = field.links();
        assert_eq!(links.len(), 1);
        assert!((links[0].strength - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_resize_scales_positions() {
        let mut field = seeded(ParticleOptions::default(), FieldBounds::from_cells(50, 20));
        let before: Vec<f64> = field.particles().iter().map(|p| p.x).collect();
        field.resize(FieldBounds::from_cells(100, 20));
        for (old, p) in before.iter().zip(field.particles()) {
            assert!((p.x - old * 2.0).abs() < 1e-9);
        }
        field.resize(FieldBounds::from_cells(0, 0));
        assert_eq!(field.bounds(), FieldBounds::from_cells(100, 20));
    }

    #[test]
    fn test_invalid_options_fail() {
        let mut rng = StdRng::seed_from_u64(1);
        let bounds = FieldBounds::from_cells(80, 24);

        let bad_color = ParticleOptions {
            color: "blue".to_string(),
            ..ParticleOptions::default()
        };
        assert_eq!(
            ParticleField::seed(bad_color, bounds, &mut rng).unwrap_err(),
            ParticleError::InvalidColor("blue".to_string())
        );

        let bad_size = ParticleOptions {
            size_min: 6.0,
            size_max: 2.0,
            ..ParticleOptions::default()
        };
        assert!(matches!(
            ParticleField::seed(bad_size, bounds, &mut rng),
            Err(ParticleError::InvalidSize { .. })
        ));

        assert!(matches!(
            ParticleField::seed(
                ParticleOptions::default(),
                FieldBounds::from_cells(0, 24),
                &mut rng
            ),
            Err(ParticleError::EmptyArea { .. })
        ));
    }

    #[test]
    fn test_options_from_toml() {
        let options: ParticleOptions = toml::from_str(
            r##"
            color = "#ff0000"
            number = 10

            [links]
            enable = false
            "##,
        )
        .unwrap();
        assert_eq!(options.color, "#ff0000");
        assert_eq!(options.number, 10);
        assert!(!options.links.enable);
        assert_eq!(options.links.distance, 150.0);
        assert_eq!(options.background, "#0d1117");
    }
}
