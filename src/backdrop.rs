//! Colour-pulse backdrops shown by the demo gallery.

use crate::effect::EffectDescriptor;

/// A full-screen clear colour oscillating between `base` and `accent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backdrop {
    pub base: [f32; 3],
    pub accent: [f32; 3],
    /// Radians per unit of animation time.
    pub speed: f32,
}

impl Backdrop {
    pub const fn new(base: [f32; 3], accent: [f32; 3], speed: f32) -> Self {
        Self { base, accent, speed }
    }

    /// Colour at animation time `t`.
    pub fn colour_at(&self, t: f32) -> [f32; 3] {
        let mix = (t * self.speed).sin() * 0.5 + 0.5;
        let mut out = [0.0; 3];
        for (i, channel) in out.iter_mut().enumerate() {
            *channel = self.base[i] + (self.accent[i] - self.base[i]) * mix;
        }
        out
    }
}

/// The gallery in display order.
pub fn gallery() -> Vec<EffectDescriptor<Backdrop>> {
    vec![
        EffectDescriptor::new("aurora", "Aurora", Backdrop::new([0.02, 0.10, 0.16], [0.10, 0.75, 0.55], 1.0))
            .with_description("Slow green sweep over deep blue"),
        EffectDescriptor::new("ember", "Ember", Backdrop::new([0.15, 0.02, 0.0], [0.95, 0.35, 0.05], 2.5)),
        EffectDescriptor::new("tide", "Tide", Backdrop::new([0.0, 0.05, 0.2], [0.2, 0.55, 0.9], 0.6))
            .with_description("Breathing ocean blues"),
        EffectDescriptor::new("nebula", "Nebula", Backdrop::new([0.08, 0.0, 0.12], [0.7, 0.2, 0.8], 1.4)),
        EffectDescriptor::new("moss", "Moss", Backdrop::new([0.03, 0.08, 0.02], [0.35, 0.6, 0.2], 0.8)),
        EffectDescriptor::new("dusk", "Dusk", Backdrop::new([0.1, 0.05, 0.2], [0.95, 0.55, 0.4], 1.1))
            .with_description("Sunset orange fading to violet"),
    ]
}
