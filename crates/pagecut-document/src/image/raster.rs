// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster buffer — a downscaled RGBA working copy of the source image with a
// lazily materialized pixel cache that is committed back with `flush()`.

use std::cell::OnceCell;

use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use pagecut_core::error::{PagecutError, Result};
use tracing::{debug, info, instrument, trace};

use super::classify::is_bin_black;

/// Working copy of one source image.
///
/// Two layers are kept: the committed *surface* and a pixel cache. The cache
/// is snapshotted from the surface on first access; writes land in the cache
/// and reach the surface only on [`RasterBuffer::flush`]. Every read goes
/// through the cache, so reads always observe the latest writes.
#[derive(Debug, Clone)]
pub struct RasterBuffer {
    original_width: u32,
    original_height: u32,
    surface: RgbaImage,
    cache: OnceCell<RgbaImage>,
    dirty: bool,
}

/// Compute the working dimensions for an image of `width` x `height` whose
/// short side is capped at `size_limit`.
///
/// Returns `(width, height, scale)`. The scale is 1 when the short side is
/// already below the limit. Both dimensions are at least 1.
pub fn working_dimensions(width: u32, height: u32, size_limit: u32) -> (u32, u32, f64) {
    let short_side = width.min(height);
    let scale = if short_side < size_limit {
        1.0
    } else {
        size_limit as f64 / short_side as f64
    };
    let scaled = |len: u32| ((len as f64 * scale).round() as u32).max(1);
    (scaled(width), scaled(height), scale)
}

impl RasterBuffer {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>, size_limit: u32) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            PagecutError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        Self::from_dynamic(&img, size_limit)
    }

    /// Decode raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8], size_limit: u32) -> Result<Self> {
        let img = image::load_from_memory(data).map_err(|err| {
            PagecutError::ImageError(format!("failed to decode image: {}", err))
        })?;
        Self::from_dynamic(&img, size_limit)
    }

    /// Build a buffer from an already-decoded image.
    pub fn from_dynamic(image: &DynamicImage, size_limit: u32) -> Result<Self> {
        Self::from_rgba(image.to_rgba8(), size_limit)
    }

    /// Build a buffer from RGBA pixels, downscaling so the short side does not
    /// exceed `size_limit`.
    pub fn from_rgba(image: RgbaImage, size_limit: u32) -> Result<Self> {
        let (original_width, original_height) = image.dimensions();
        if original_width == 0 || original_height == 0 {
            return Err(PagecutError::ImageError(format!(
                "image has no pixels ({original_width}x{original_height})"
            )));
        }

        let (width, height, scale) =
            working_dimensions(original_width, original_height, size_limit);
        let surface = if (width, height) == (original_width, original_height) {
            image
        } else {
            image::imageops::resize(&image, width, height, FilterType::Triangle)
        };

        info!(
            original_width,
            original_height,
            width,
            height,
            scale,
            "Raster buffer ready"
        );

        Ok(Self {
            original_width,
            original_height,
            surface,
            cache: OnceCell::new(),
            dirty: false,
        })
    }

    // -- Accessors ------------------------------------------------------------

    /// Working width in pixels.
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    /// Working height in pixels.
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// Shorter working dimension.
    pub fn short_side(&self) -> u32 {
        self.width().min(self.height())
    }

    /// Shorter dimension of the source image, before downscaling.
    pub fn original_short_side(&self) -> u32 {
        self.original_width.min(self.original_height)
    }

    pub fn original_width(&self) -> u32 {
        self.original_width
    }

    pub fn original_height(&self) -> u32 {
        self.original_height
    }

    /// Working-to-original scale factor (1 when no downscaling happened).
    pub fn scale(&self) -> f64 {
        self.width() as f64 / self.original_width as f64
    }

    /// The committed surface. Unflushed writes are not visible here.
    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// Whether the cache holds writes the surface has not seen.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flush and return the committed image.
    pub fn into_image(mut self) -> RgbaImage {
        self.flush();
        self.surface
    }

    // -- Pixel access ---------------------------------------------------------

    /// Current pixel contents, snapshotting the surface on first use.
    pub fn pixels(&self) -> &RgbaImage {
        self.cache.get_or_init(|| {
            trace!(
                width = self.surface.width(),
                height = self.surface.height(),
                "Materializing pixel cache"
            );
            self.surface.clone()
        })
    }

    fn pixels_mut(&mut self) -> &mut RgbaImage {
        if self.cache.get().is_none() {
            let _ = self.cache.set(self.surface.clone());
        }
        self.cache.get_mut().expect("pixel cache materialized above")
    }

    /// Read one pixel. Panics if `(x, y)` is out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels().get_pixel(x, y)
    }

    /// Read one pixel at signed coordinates, `None` outside the image.
    pub fn pixel_at(&self, x: i64, y: i64) -> Option<Rgba<u8>> {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return None;
        }
        Some(self.pixel(x as u32, y as u32))
    }

    /// Overwrite one pixel in the cache. Panics if `(x, y)` is out of bounds.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: Rgba<u8>) {
        self.pixels_mut().put_pixel(x, y, rgba);
        self.dirty = true;
    }

    /// Commit cached writes to the surface.
    pub fn flush(&mut self) {
        if !self.dirty {
            return;
        }
        if let Some(cache) = self.cache.get() {
            self.surface.clone_from(cache);
            debug!("Pixel cache flushed to surface");
        }
        self.dirty = false;
    }

    /// Display-rule classification of an in-bounds pixel.
    pub fn is_bin_black(&self, x: u32, y: u32) -> bool {
        is_bin_black(&self.pixel(x, y))
    }

    pub fn is_bin_white(&self, x: u32, y: u32) -> bool {
        !self.is_bin_black(x, y)
    }

    /// Display-rule classification at signed coordinates. Pixels outside the
    /// image count as white.
    pub fn is_bin_black_at(&self, x: i64, y: i64) -> bool {
        self.pixel_at(x, y).is_some_and(|px| is_bin_black(&px))
    }

    /// In-bounds pixels of the `(2 * range + 1)^2` square around `(x, y)`,
    /// excluding the center. No wraparound or padding at the edges.
    pub fn neighbors(&self, x: i64, y: i64, range: u32) -> impl Iterator<Item = Rgba<u8>> + '_ {
        let r = range as i64;
        (-r..=r)
            .flat_map(move |dx| (-r..=r).map(move |dy| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .filter_map(move |(dx, dy)| self.pixel_at(x + dx, y + dy))
    }
}
