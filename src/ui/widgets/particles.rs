//! Braille canvas rendering of the particle backdrop

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line, Points},
        Widget,
    },
};

use crate::domain::{ParticleField, Rgb};

/// Full-area particle layer; the field is simulated elsewhere
pub struct ParticleCanvas<'a> {
    field: &'a ParticleField,
}

impl<'a> ParticleCanvas<'a> {
    pub fn new(field: &'a ParticleField) -> Self {
        Self { field }
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

impl<'a> Widget for ParticleCanvas<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let bounds = self.field.bounds();
        let background = self.field.background();
        let link_color = self.field.link_color();
        // Canvas y grows upwards
        let flip = |y: f64| bounds.height - y;

        let links = self.field.links();
        let points: Vec<(f64, f64)> = self
            .field
            .particles()
            .iter()
            .map(|p| (p.x, flip(p.y)))
            .collect();

        Canvas::default()
            .marker(Marker::Braille)
            .background_color(color(background))
            .x_bounds([0.0, bounds.width])
            .y_bounds([0.0, bounds.height])
            .paint(|ctx| {
                for link in &links {
                    ctx.draw(&Line {
                        x1: link.from.0,
                        y1: flip(link.from.1),
                        x2: link.to.0,
                        y2: flip(link.to.1),
                        color: color(link_color.blend(background, link.strength)),
                    });
                }
                ctx.layer();
                ctx.draw(&Points {
                    coords: &points,
                    color: color(self.field.particle_color()),
                });
            })
            .render(area, buf);
    }
}
