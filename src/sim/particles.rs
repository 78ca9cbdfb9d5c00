//! Particle types animating transport through the chip.
//!
//! Three populations with distinct lifecycles: medium tracers recycle
//! forever in a fixed pool, drug particles spawn at the inlet and retire at
//! the outlet, and diffusion particles are seeded once per run and settle
//! into the gel.

use glam::Vec2;

use crate::chip::ChannelSide;

/// Medium tracer riding a perfusion channel.
///
/// The pool is created once at startup; a tracer leaving the visible span
/// wraps back to the left instead of despawning.
#[derive(Debug, Clone, Copy)]
pub struct FlowParticle {
    /// Position on the chip (μm)
    pub position_um: Vec2,
    /// Downstream speed at unit flow rate (μm/s)
    pub speed_um_per_sec: f32,
    /// Which channel the tracer rides
    pub side: ChannelSide,
}

/// Drug bolus particle traveling down a channel.
///
/// Spawned at the inlet while perfusion is active, dropped once it passes
/// the outlet. Live count is capped.
#[derive(Debug, Clone, Copy)]
pub struct DrugParticle {
    /// Position on the chip (μm)
    pub position_um: Vec2,
    /// Downstream speed at unit flow rate (μm/s)
    pub speed_um_per_sec: f32,
    /// Which channel carries the particle
    pub side: ChannelSide,
}

/// Drug molecule working its way into the gel.
///
/// Each particle owns a target depth; it settles toward it at a fixed speed
/// and then holds, jittering sideways every frame to suggest Brownian motion.
#[derive(Debug, Clone, Copy)]
pub struct DiffusionParticle {
    /// Position on the chip (μm)
    pub position_um: Vec2,
    /// Depth at which the particle comes to rest (μm)
    pub target_depth_um: f32,
    /// Settling speed (μm/s)
    pub speed_um_per_sec: f32,
    /// Whether the particle settles downward (top batch) or upward (bottom batch)
    pub descending: bool,
}

impl DiffusionParticle {
    /// Whether the particle has reached its target depth.
    ///
    /// The comparison is directional, so a particle that overshoots by a
    /// fraction of a frame still counts as settled and stops moving.
    pub fn settled(&self) -> bool {
        if self.descending {
            self.position_um.y >= self.target_depth_um
        } else {
            self.position_um.y <= self.target_depth_um
        }
    }
}
