// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page analyzer — an analysis session bound to one source image.

use std::time::Instant;

use image::DynamicImage;
use pagecut_core::error::{PagecutError, Result};
use pagecut_core::{
    AnalysisConfig, AnchorBox, AnchorOptions, DenoiseOptions, Gap, Padding, PageLayout,
};
use tracing::{info, instrument};

use crate::image::RasterBuffer;
use crate::scan::{anchor, enhance, gap, padding};

/// Owns the working raster of one page and runs the layout detectors on it.
///
/// Binarize and denoise rewrite the buffer in place and cannot be undone.
/// Detectors read whatever the buffer holds, so call [`PageAnalyzer::binarize`]
/// first for stable results.
///
/// ```ignore
/// let mut analyzer = PageAnalyzer::open("page.png", AnalysisConfig::default())?;
/// analyzer.binarize().denoise();
/// let layout = analyzer.detect_layout();
/// let anchor = analyzer.pick_anchor(0.05, 0.05)?;
/// ```
#[derive(Debug, Clone)]
pub struct PageAnalyzer {
    buffer: RasterBuffer,
    config: AnalysisConfig,
}

impl PageAnalyzer {
    // -- Construction ---------------------------------------------------------

    /// Load an image file and build the working buffer.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>, config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let buffer = RasterBuffer::open(path, config.effective_size_limit())?;
        Ok(Self { buffer, config })
    }

    /// Decode raw encoded bytes (JPEG, PNG, TIFF, etc.).
    #[instrument(skip(data, config), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8], config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let buffer = RasterBuffer::from_bytes(data, config.effective_size_limit())?;
        Ok(Self { buffer, config })
    }

    /// Wrap an already-decoded image.
    pub fn from_dynamic(image: &DynamicImage, config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let buffer = RasterBuffer::from_dynamic(image, config.effective_size_limit())?;
        Ok(Self { buffer, config })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn buffer(&self) -> &RasterBuffer {
        &self.buffer
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Working width in pixels.
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Working height in pixels.
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn original_width(&self) -> u32 {
        self.buffer.original_width()
    }

    pub fn original_height(&self) -> u32 {
        self.buffer.original_height()
    }

    /// Commit any pending pixel writes to the buffer's surface.
    pub fn flush(&mut self) {
        self.buffer.flush();
    }

    /// Consume the analyzer and return the working buffer.
    pub fn into_buffer(self) -> RasterBuffer {
        self.buffer
    }

    // -- Passes (mutate the buffer) -------------------------------------------

    /// Reduce the buffer to pure black and white.
    pub fn binarize(&mut self) -> &mut Self {
        let buffer = &mut self.buffer;
        timed(self.config.debugging, "binarize", || enhance::binarize(buffer));
        self
    }

    /// Denoise with the configured options.
    pub fn denoise(&mut self) -> &mut Self {
        let options = self.config.denoise;
        let buffer = &mut self.buffer;
        timed(self.config.debugging, "denoise", || enhance::denoise(buffer, options));
        self
    }

    /// Denoise with explicit options.
    pub fn denoise_with(&mut self, options: DenoiseOptions) -> Result<&mut Self> {
        options.validate()?;
        let buffer = &mut self.buffer;
        timed(self.config.debugging, "denoise", || enhance::denoise(buffer, options));
        Ok(self)
    }

    // -- Detectors (read-only) ------------------------------------------------

    pub fn find_padding(&self) -> Padding {
        timed(self.config.debugging, "find_padding", || padding::find_padding(&self.buffer))
    }

    pub fn find_gap(&self) -> Option<Gap> {
        timed(self.config.debugging, "find_gap", || gap::find_gap(&self.buffer))
    }

    pub fn find_gap_from(&self, from: f64) -> Option<Gap> {
        timed(self.config.debugging, "find_gap", || gap::find_gap_from(&self.buffer, from))
    }

    /// Locate the anchor marker nearest a normalized seed point using the
    /// configured search options.
    pub fn pick_anchor(&self, nx: f64, ny: f64) -> Result<AnchorBox> {
        self.pick_anchor_with(nx, ny, &self.config.anchor)
    }

    pub fn pick_anchor_with(&self, nx: f64, ny: f64, options: &AnchorOptions) -> Result<AnchorBox> {
        timed(self.config.debugging, "pick_anchor", || {
            anchor::pick_anchor(&self.buffer, nx, ny, options)
        })
    }

    /// Padding and column gap in one call.
    pub fn detect_layout(&self) -> PageLayout {
        PageLayout {
            padding: self.find_padding(),
            gap: self.find_gap(),
        }
    }

    /// Pick every seed in order, keeping each outcome.
    pub fn pick_anchors(&self, seeds: &[(f64, f64)]) -> Vec<Result<AnchorBox>> {
        seeds
            .iter()
            .map(|&(nx, ny)| self.pick_anchor(nx, ny))
            .collect()
    }
}

impl TryFrom<DynamicImage> for PageAnalyzer {
    type Error = PagecutError;

    fn try_from(image: DynamicImage) -> Result<Self> {
        Self::from_dynamic(&image, AnalysisConfig::default())
    }
}

/// Run `pass`, logging its wall time when `enabled`.
fn timed<T>(enabled: bool, pass: &'static str, run: impl FnOnce() -> T) -> T {
    if !enabled {
        return run();
    }
    let start = Instant::now();
    let out = run();
    info!(pass, elapsed_ms = start.elapsed().as_millis() as u64, "Pass timing");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::image::classify::{BLACK, WHITE};
    use image::{ImageFormat, Rgba, RgbaImage};

    fn config(size_limit: u32) -> AnalysisConfig {
        AnalysisConfig {
            size_limit,
            ..Default::default()
        }
    }

    fn analyzer_for(image: RgbaImage, config: AnalysisConfig) -> PageAnalyzer {
        PageAnalyzer::from_dynamic(&DynamicImage::ImageRgba8(image), config).expect("analyzer")
    }

    /// Two striped columns with anchor markers near two corners, on a light
    /// gray background.
    fn two_column_page() -> RgbaImage {
        let mut image = RgbaImage::from_pixel(1000, 1000, Rgba([235, 235, 230, 255]));
        fixtures::text_block(&mut image, 100, 150, 330, 850);
        fixtures::text_block(&mut image, 420, 150, 900, 850);
        fixtures::fill(&mut image, 48, 48, 53, 53);
        fixtures::fill(&mut image, 948, 948, 953, 953);
        image
    }

    #[test]
    fn detect_layout_on_two_column_page() {
        let mut analyzer = analyzer_for(two_column_page(), config(1000));
        analyzer.binarize().denoise();

        let layout = analyzer.detect_layout();

        assert!(layout.padding.left < layout.padding.right);
        assert!(layout.padding.top < layout.padding.bottom);
        let gap = layout.gap.expect("two columns");
        assert!(gap.left >= 0.33 && gap.right <= 0.43, "{gap:?}");
        assert_eq!(gap.middle, (gap.left + gap.right) / 2.0);
        assert_eq!(layout.columns().len(), 2);
    }

    #[test]
    fn anchors_survive_binarize_and_denoise() {
        let mut analyzer = analyzer_for(two_column_page(), config(1000));
        analyzer.binarize().denoise();

        let results = analyzer.pick_anchors(&[(0.05, 0.05), (0.95, 0.95), (0.5, 0.05)]);

        let first = results[0].as_ref().expect("top-left marker");
        assert!((first.left - 0.0475).abs() < 1e-9);
        let second = results[1].as_ref().expect("bottom-right marker");
        assert!((second.right - 0.9525).abs() < 1e-9);
        assert!(matches!(results[2], Err(PagecutError::AnchorNotFound { .. })));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let run = || {
            let mut analyzer = analyzer_for(two_column_page(), config(1000));
            analyzer.binarize().denoise();
            (
                analyzer.detect_layout(),
                analyzer.pick_anchor(0.05, 0.05).expect("anchor"),
                analyzer.into_buffer().into_image(),
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn debugging_does_not_change_results() {
        let image = DynamicImage::ImageRgba8(two_column_page());
        let mut quiet = PageAnalyzer::from_dynamic(&image, config(1000)).expect("analyzer");
        let mut loud = PageAnalyzer::from_dynamic(
            &image,
            AnalysisConfig {
                debugging: true,
                ..config(1000)
            },
        )
        .expect("analyzer");

        quiet.binarize();
        loud.binarize();

        assert_eq!(quiet.detect_layout(), loud.detect_layout());
        assert_eq!(quiet.buffer().surface(), loud.buffer().surface());
    }

    #[test]
    fn all_white_page() {
        let mut analyzer = analyzer_for(fixtures::white(800, 600), config(600));
        analyzer.binarize();

        let layout = analyzer.detect_layout();

        assert_eq!(layout.padding.left, 0.05);
        assert_eq!(layout.padding.right, 0.95);
        assert_eq!(layout.padding.top, 0.05);
        assert_eq!(layout.padding.bottom, 0.95);
        assert_eq!(layout.gap, None);
        assert!(analyzer.pick_anchor(0.5, 0.5).is_err());
    }

    #[test]
    fn large_images_are_downscaled() {
        let analyzer = analyzer_for(fixtures::white(2400, 1200), AnalysisConfig::default());
        assert_eq!((analyzer.width(), analyzer.height()), (1200, 600));
        assert_eq!((analyzer.original_width(), analyzer.original_height()), (2400, 1200));
    }

    #[test]
    fn size_limit_below_minimum_is_raised() {
        let analyzer = analyzer_for(fixtures::white(1000, 1000), config(100));
        assert_eq!(analyzer.width(), 500);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bad = AnalysisConfig {
            denoise: DenoiseOptions {
                throttle: 2.0,
                range: 1,
            },
            ..Default::default()
        };
        let image = DynamicImage::ImageRgba8(fixtures::white(10, 10));
        let result = PageAnalyzer::from_dynamic(&image, bad);
        assert!(matches!(result, Err(PagecutError::InvalidConfig(_))));
    }

    #[test]
    fn from_bytes_decodes_png() {
        let mut image = fixtures::white(64, 48);
        image.put_pixel(3, 4, BLACK);
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .expect("encode png");

        let analyzer = PageAnalyzer::from_bytes(&png, AnalysisConfig::default()).expect("decode");

        assert_eq!((analyzer.width(), analyzer.height()), (64, 48));
        assert_eq!(analyzer.buffer().pixel(3, 4), BLACK);
        assert_eq!(analyzer.buffer().pixel(0, 0), WHITE);
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        let result = PageAnalyzer::from_bytes(b"not an image", AnalysisConfig::default());
        assert!(matches!(result, Err(PagecutError::ImageError(_))));
    }

    #[test]
    fn denoise_with_validates_options() {
        let mut analyzer = PageAnalyzer::try_from(DynamicImage::ImageRgba8(fixtures::white(10, 10)))
            .expect("analyzer");
        let result = analyzer.denoise_with(DenoiseOptions {
            throttle: -0.1,
            range: 1,
        });
        assert!(result.is_err());
    }
}
