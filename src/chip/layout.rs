//! Chip plane geometry.
//!
//! The device is laid out in a 2D micrometre coordinate system: x runs
//! left to right along the flow direction, y runs downward. Two perfusion
//! channels sandwich the tissue gel, and every placement, spawn, and
//! hit-test query goes through this layout.

use glam::Vec2;

use crate::config::ChipParameters;

/// Width of the zone at x = 0 treated as the inlet for hover purposes (μm)
pub const INLET_ZONE_UM: f32 = 350.0;

/// Which of the two perfusion channels an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSide {
    /// Channel above the gel
    Top,
    /// Channel below the gel
    Bottom,
}

impl ChannelSide {
    /// Both sides, in rendering order
    pub const BOTH: [ChannelSide; 2] = [ChannelSide::Top, ChannelSide::Bottom];
}

/// Derived band geometry of the chip
///
/// Stacked top to bottom: top channel, gel region, bottom channel.
/// The inlet sits at x = 0, the outlet at `channel_length_um`.
#[derive(Debug, Clone)]
pub struct ChipLayout {
    /// Channel length (μm)
    pub channel_length_um: f32,
    /// Height of each perfusion channel (μm)
    pub channel_height_um: f32,
    /// Height of the gel region (μm)
    pub gel_height_um: f32,
}

impl ChipLayout {
    pub fn new(params: &ChipParameters) -> Self {
        Self {
            channel_length_um: params.channel_length_um,
            channel_height_um: params.channel_height_um,
            gel_height_um: params.gel_height_um,
        }
    }

    /// X coordinate where medium and drug enter the channels
    pub fn inlet_x(&self) -> f32 {
        0.0
    }

    /// Right bound of the visible channel span; particles wrap or retire here
    pub fn outlet_x(&self) -> f32 {
        self.channel_length_um
    }

    /// Total stacked height of both channels plus the gel (μm)
    pub fn total_height_um(&self) -> f32 {
        2.0 * self.channel_height_um + self.gel_height_um
    }

    /// Y coordinate of the gel's upper edge (bottom of the top channel)
    pub fn gel_top_y(&self) -> f32 {
        self.channel_height_um
    }

    /// Y coordinate of the gel's lower edge (top of the bottom channel)
    pub fn gel_bottom_y(&self) -> f32 {
        self.channel_height_um + self.gel_height_um
    }

    /// Y coordinate of the gel midline
    pub fn gel_mid_y(&self) -> f32 {
        self.channel_height_um + 0.5 * self.gel_height_um
    }

    /// Vertical band `(y_top, y_bottom)` of one channel
    pub fn channel_band(&self, side: ChannelSide) -> (f32, f32) {
        match side {
            ChannelSide::Top => (0.0, self.channel_height_um),
            ChannelSide::Bottom => (self.gel_bottom_y(), self.total_height_um()),
        }
    }

    /// Vertical band `(y_top, y_bottom)` of the gel half adjacent to one channel
    pub fn gel_half(&self, side: ChannelSide) -> (f32, f32) {
        match side {
            ChannelSide::Top => (self.gel_top_y(), self.gel_mid_y()),
            ChannelSide::Bottom => (self.gel_mid_y(), self.gel_bottom_y()),
        }
    }

    /// Which channel, if any, contains the point
    pub fn channel_at(&self, point_um: Vec2) -> Option<ChannelSide> {
        if point_um.x < 0.0 || point_um.x > self.channel_length_um {
            return None;
        }
        for side in ChannelSide::BOTH {
            let (y0, y1) = self.channel_band(side);
            if point_um.y >= y0 && point_um.y <= y1 {
                return Some(side);
            }
        }
        None
    }

    /// Whether the point lies inside the gel region
    pub fn in_gel(&self, point_um: Vec2) -> bool {
        point_um.x >= 0.0
            && point_um.x <= self.channel_length_um
            && point_um.y >= self.gel_top_y()
            && point_um.y <= self.gel_bottom_y()
    }

    /// Whether the point lies in the inlet zone of either channel
    pub fn near_inlet(&self, point_um: Vec2) -> bool {
        point_um.x >= 0.0 && point_um.x <= INLET_ZONE_UM && self.channel_at(point_um).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChipParameters;

    fn layout() -> ChipLayout {
        ChipLayout::new(&ChipParameters::default())
    }

    #[test]
    fn test_bands_stack_without_gaps() {
        let layout = layout();
        let (top0, top1) = layout.channel_band(ChannelSide::Top);
        let (bot0, bot1) = layout.channel_band(ChannelSide::Bottom);

        assert_eq!(top0, 0.0);
        assert_eq!(top1, layout.gel_top_y());
        assert_eq!(bot0, layout.gel_bottom_y());
        assert_eq!(bot1, layout.total_height_um());
    }

    #[test]
    fn test_gel_halves_meet_at_midline() {
        let layout = layout();
        let (_, upper_end) = layout.gel_half(ChannelSide::Top);
        let (lower_start, _) = layout.gel_half(ChannelSide::Bottom);
        assert_eq!(upper_end, lower_start);
        assert_eq!(upper_end, layout.gel_mid_y());
    }

    #[test]
    fn test_point_queries() {
        let layout = layout();
        let mid_top_channel = Vec2::new(3000.0, 0.5 * layout.channel_height_um);
        let mid_gel = Vec2::new(3000.0, layout.gel_mid_y());
        let inlet = Vec2::new(50.0, 0.5 * layout.channel_height_um);
        let outside = Vec2::new(-10.0, 100.0);

        assert_eq!(layout.channel_at(mid_top_channel), Some(ChannelSide::Top));
        assert!(layout.in_gel(mid_gel));
        assert!(!layout.in_gel(mid_top_channel));
        assert!(layout.near_inlet(inlet));
        assert!(!layout.near_inlet(mid_gel));
        assert_eq!(layout.channel_at(outside), None);
    }
}
