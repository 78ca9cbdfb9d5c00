//! Chip-space to screen-space mapping.

use crate::chip::ChipLayout;

/// Uniform-scale transform between chip micrometers and screen pixels.
///
/// The API works in scalar pairs so callers can mix it freely with
/// whichever vector type their side of the boundary uses.
#[derive(Debug, Clone, Copy)]
pub struct ViewTransform {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl ViewTransform {
    /// Fit the whole chip into the screen area left of the side panel
    pub fn fit(
        layout: &ChipLayout,
        screen_w: f32,
        screen_h: f32,
        panel_w: f32,
        margin: f32,
    ) -> Self {
        let avail_w = (screen_w - panel_w - 2.0 * margin).max(1.0);
        let avail_h = (screen_h - 2.0 * margin).max(1.0);

        let scale_x = avail_w / layout.channel_length_um;
        let scale_y = avail_h / layout.total_height_um();
        let scale = scale_x.min(scale_y);

        Self {
            scale,
            offset_x: margin,
            offset_y: (screen_h - layout.total_height_um() * scale) / 2.0,
        }
    }

    /// Chip point (µm) to screen pixels
    pub fn to_screen(&self, x_um: f32, y_um: f32) -> (f32, f32) {
        (
            self.offset_x + x_um * self.scale,
            self.offset_y + y_um * self.scale,
        )
    }

    /// Screen pixels back to a chip point (µm)
    pub fn to_chip(&self, x_px: f32, y_px: f32) -> (f32, f32) {
        (
            (x_px - self.offset_x) / self.scale,
            (y_px - self.offset_y) / self.scale,
        )
    }

    /// Scale a chip length (µm) to pixels
    pub fn scale_len(&self, len_um: f32) -> f32 {
        len_um * self.scale
    }
}
