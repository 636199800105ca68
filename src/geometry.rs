//! Frame geometry: mapping normalized landmarks onto the render surface.
//!
//! The video is drawn with "cover" scaling: it is scaled up until it fills the
//! surface and the overflow is cropped evenly on both sides. A landmark reported
//! in normalized source-frame coordinates must go through the same transform to
//! land on the pixel the viewer sees.

use crate::constants::PERCENT;
use crate::utils::safe_cast::f64_round_to_u32_clamp;
use serde::{Deserialize, Serialize};

/// Landmark position normalized to the source frame, each axis in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Position in render-surface (CSS) pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scale into device pixels for a backing store of the given pixel ratio
    #[must_use]
    pub fn to_device(self, device_pixel_ratio: f64) -> Self {
        Self {
            x: self.x * device_pixel_ratio,
            y: self.y * device_pixel_ratio,
        }
    }

    /// Euclidean distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Native resolution of the video stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceFrameSize {
    pub width: f64,
    pub height: f64,
}

impl SourceFrameSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A source is usable once both dimensions are known and positive
    #[must_use]
    pub fn is_sized(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Current render surface dimensions and orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGeometry {
    /// Width in CSS pixels
    pub width: f64,
    /// Height in CSS pixels
    pub height: f64,
    /// Device pixels per CSS pixel
    pub device_pixel_ratio: f64,
    /// Horizontal axis flipped (front-facing camera convention)
    pub mirrored: bool,
}

impl SurfaceGeometry {
    #[must_use]
    pub const fn new(width: f64, height: f64, device_pixel_ratio: f64, mirrored: bool) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
            mirrored,
        }
    }

    #[must_use]
    pub fn is_sized(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Backing-store size in device pixels, `round(width * dpr) x round(height * dpr)`
    #[must_use]
    pub fn backing_size(&self) -> (u32, u32) {
        let dpr = if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        };
        (
            f64_round_to_u32_clamp(self.width * dpr, 0, u32::MAX),
            f64_round_to_u32_clamp(self.height * dpr, 0, u32::MAX),
        )
    }

    /// Convert a percent-of-surface position into surface pixels
    #[must_use]
    pub fn percent_to_screen(&self, x_pct: f64, y_pct: f64) -> ScreenPoint {
        ScreenPoint::new(x_pct / PERCENT * self.width, y_pct / PERCENT * self.height)
    }
}

/// Cover-fit transform of a source frame into a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    pub scale: f64,
    pub scaled_width: f64,
    pub scaled_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl CoverFit {
    /// Compute the cover-fit transform, or `None` while either side is unsized
    #[must_use]
    pub fn compute(source: SourceFrameSize, surface: &SurfaceGeometry) -> Option<Self> {
        if !source.is_sized() || !surface.is_sized() {
            return None;
        }

        let scale = (surface.width / source.width).max(surface.height / source.height);
        let scaled_width = source.width * scale;
        let scaled_height = source.height * scale;

        Some(Self {
            scale,
            scaled_width,
            scaled_height,
            offset_x: (surface.width - scaled_width) / 2.0,
            offset_y: (surface.height - scaled_height) / 2.0,
        })
    }
}

/// Maps normalized landmarks to surface pixels
///
/// Holds no cached dimensions: every call reads the geometry it is given, so a
/// resize is honored on the very next frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameGeometryMapper;

impl FrameGeometryMapper {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Map a normalized landmark onto the surface
    ///
    /// Returns `None` when the geometry is unavailable (source not yet sized or
    /// surface collapsed to zero).
    #[must_use]
    pub fn map(
        &self,
        point: NormalizedPoint,
        source: SourceFrameSize,
        surface: &SurfaceGeometry,
    ) -> Option<ScreenPoint> {
        let fit = CoverFit::compute(source, surface)?;

        let nx = if surface.mirrored { 1.0 - point.x } else { point.x };
        let x = (nx * source.width).mul_add(fit.scale, fit.offset_x);
        // No vertical mirroring in any mode
        let y = (point.y * source.height).mul_add(fit.scale, fit.offset_y);

        Some(ScreenPoint::new(x, y))
    }
}
