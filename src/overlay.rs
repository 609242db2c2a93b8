//! Display surface and the hand overlay drawn on it.
//!
//! Each frame is drawn as video first, then per hand: a segment from the
//! wrist to every fingertip and a marker on the wrist and each tip.

use crate::landmarks::{HandObservation, LandmarkPoint, RELEVANT_LANDMARKS};
use crate::video::VideoFrame;
use std::io::Write;
use std::path::Path;

/// Colour and width for a segment or marker. Colours are `0xAARRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: u32,
    pub line_width: f32,
}

/// Wrist-to-fingertip connectors.
pub const CONNECTOR_STROKE: Stroke = Stroke {
    color: 0xFFFF_A800,
    line_width: 0.5,
};

/// Landmark markers.
pub const MARKER_STROKE: Stroke = Stroke {
    color: 0xFFFF_0000,
    line_width: 3.0,
};

/// A 2D raster target in normalized coordinates.
pub trait Surface {
    fn clear(&mut self);
    fn draw_frame(&mut self, frame: &VideoFrame);
    fn draw_segment(&mut self, from: &LandmarkPoint, to: &LandmarkPoint, stroke: &Stroke);
    fn draw_marker(&mut self, at: &LandmarkPoint, stroke: &Stroke);
}

/// Draw the wrist/fingertip overlay for one hand.
pub fn draw_hand_overlay<S: Surface + ?Sized>(surface: &mut S, hand: &HandObservation) {
    let wrist = hand.wrist();
    for &index in &RELEVANT_LANDMARKS[1..] {
        if let Some(tip) = hand.point(index) {
            surface.draw_segment(wrist, tip, &CONNECTOR_STROKE);
        }
    }
    for &index in &RELEVANT_LANDMARKS {
        if let Some(point) = hand.point(index) {
            surface.draw_marker(point, &MARKER_STROKE);
        }
    }
}

/// Surface that draws nothing.
#[derive(Debug, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn clear(&mut self) {}
    fn draw_frame(&mut self, _frame: &VideoFrame) {}
    fn draw_segment(&mut self, _from: &LandmarkPoint, _to: &LandmarkPoint, _stroke: &Stroke) {}
    fn draw_marker(&mut self, _at: &LandmarkPoint, _stroke: &Stroke) {}
}

/// Software ARGB framebuffer.
pub struct RasterSurface {
    width: usize,
    height: usize,
    buf: Vec<u32>,
}

impl RasterSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            buf: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn buffer(&self) -> &[u32] {
        &self.buf
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.buf[y * self.width + x])
    }

    /// Write the buffer as a binary PPM (P6), dropping alpha.
    pub fn write_ppm(&self, path: &Path) -> Result<(), SurfaceError> {
        let mut out = Vec::with_capacity(self.buf.len() * 3 + 32);
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        for &px in &self.buf {
            out.extend_from_slice(&[(px >> 16) as u8, (px >> 8) as u8, px as u8]);
        }
        std::fs::write(path, out)?;
        Ok(())
    }

    /// Normalized point in pixel space. `None` for non-finite coordinates.
    fn to_pixel(&self, p: &LandmarkPoint) -> Option<(f64, f64)> {
        if !(p.x.is_finite() && p.y.is_finite()) {
            return None;
        }
        Some((
            f64::from(p.x) * self.width as f64,
            f64::from(p.y) * self.height as f64,
        ))
    }

    /// Liang-Barsky clip of a pixel-space segment to the surface grown by
    /// `pad` on every side.
    fn clip(&self, from: (f64, f64), to: (f64, f64), pad: f64) -> Option<((f64, f64), (f64, f64))> {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        let edges = [
            (-dx, from.0 + pad),
            (dx, self.width as f64 + pad - from.0),
            (-dy, from.1 + pad),
            (dy, self.height as f64 + pad - from.1),
        ];
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                if t > t1 {
                    return None;
                }
                t0 = t0.max(t);
            } else {
                if t < t0 {
                    return None;
                }
                t1 = t1.min(t);
            }
        }
        Some((
            (from.0 + t0 * dx, from.1 + t0 * dy),
            (from.0 + t1 * dx, from.1 + t1 * dy),
        ))
    }

    fn put(&mut self, x: i64, y: i64, color: u32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.buf[y as usize * self.width + x as usize] = color;
    }

    fn fill_disc(&mut self, cx: i64, cy: i64, radius: i64, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }
}

impl Surface for RasterSurface {
    fn clear(&mut self) {
        self.buf.fill(0);
    }

    /// Nearest-neighbour scale of the frame onto the whole surface.
    fn draw_frame(&mut self, frame: &VideoFrame) {
        if frame.width == 0 || frame.height == 0 {
            return;
        }
        for y in 0..self.height {
            let sy = y * frame.height / self.height;
            for x in 0..self.width {
                let sx = x * frame.width / self.width;
                if let Some(px) = frame.pixel(sx, sy) {
                    self.buf[y * self.width + x] = px;
                }
            }
        }
    }

    fn draw_segment(&mut self, from: &LandmarkPoint, to: &LandmarkPoint, stroke: &Stroke) {
        let (Some(from), Some(to)) = (self.to_pixel(from), self.to_pixel(to)) else {
            return;
        };
        let radius = (stroke.line_width / 2.0).floor() as i64;
        // Endpoints stay within a pixel of the disc reach, so the walk is
        // bounded by the surface size.
        let Some((start, end)) = self.clip(from, to, (radius + 1) as f64) else {
            return;
        };
        let (mut x0, mut y0) = (start.0.round() as i64, start.1.round() as i64);
        let (x1, y1) = (end.0.round() as i64, end.1.round() as i64);

        // Bresenham
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if radius == 0 {
                self.put(x0, y0, stroke.color);
            } else {
                self.fill_disc(x0, y0, radius, stroke.color);
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn draw_marker(&mut self, at: &LandmarkPoint, stroke: &Stroke) {
        let Some((x, y)) = self.to_pixel(at) else {
            return;
        };
        let radius = stroke.line_width.round().max(1.0) as i64;
        let margin = (radius + 1) as f64;
        let cx = x.round().clamp(-margin, self.width as f64 + margin) as i64;
        let cy = y.round().clamp(-margin, self.height as f64 + margin) as i64;
        self.fill_disc(cx, cy, radius, stroke.color);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("failed to write surface: {0}")]
    Io(#[from] std::io::Error),
}
