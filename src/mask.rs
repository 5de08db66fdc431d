//! Disc masking of skin images.

use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbaImage};
use tracing::{debug, warn};

use crate::resources::{ImageResolver, ResourceId};

// ============================================================================
// DISC MASK
// ============================================================================

/// Coverage of the circle inscribed in a `width`×`height` raster: 255 for
/// pixels whose center lies within radius `min(width, height) / 2` of the
/// raster center, 0 elsewhere.
pub fn disc_coverage(width: u32, height: u32) -> GrayImage {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let radius = width.min(height) as f32 / 2.0;
    GrayImage::from_fn(width, height, |x, y| {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        if dx * dx + dy * dy <= radius * radius {
            Luma([0xff])
        } else {
            Luma([0x00])
        }
    })
}

/// Returns a copy of `source` clipped to its inscribed disc.
///
/// The coverage disc is drawn into a transparent raster of the same size and
/// the source is composited onto it source-in: the disc keeps its alpha
/// shape, the source supplies color and alpha.
pub fn disc_clip(source: &RgbaImage) -> RgbaImage {
    let (width, height) = source.dimensions();
    let coverage = disc_coverage(width, height);
    let mut output = RgbaImage::new(width, height);
    for (x, y, out) in output.enumerate_pixels_mut() {
        let mask = coverage.get_pixel(x, y)[0] as u16;
        let src = source.get_pixel(x, y);
        let alpha = (src[3] as u16 * mask / 255) as u8;
        if alpha > 0 {
            *out = image::Rgba([src[0], src[1], src[2], alpha]);
        }
    }
    output
}

/// Unfiltered rescale to the destination size.
pub fn scale_to(source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if source.dimensions() == (width, height) {
        return source.clone();
    }
    imageops::resize(source, width, height, FilterType::Nearest)
}

// ============================================================================
// MASK CACHE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct MaskKey {
    id: ResourceId,
    width: u32,
    height: u32,
}

#[derive(Debug, Default)]
struct MaskSlot {
    key: Option<MaskKey>,
    image: Option<Arc<RgbaImage>>,
}

impl MaskSlot {
    fn prepare(
        &mut self,
        id: Option<ResourceId>,
        width: u32,
        height: u32,
        resolver: &dyn ImageResolver,
    ) {
        let Some(id) = id else {
            self.clear();
            return;
        };
        let key = MaskKey { id, width, height };
        if self.key.as_ref() == Some(&key) {
            return;
        }
        if width == 0 || height == 0 {
            self.clear();
            return;
        }

        self.image = match resolver.resolve(id) {
            Ok(source) => {
                debug!(%id, width, height, "rebuilding disc mask");
                Some(Arc::new(disc_clip(&scale_to(&source, width, height))))
            }
            Err(err) => {
                warn!(%id, error = %err, "image resource unavailable, drawing without it");
                None
            }
        };
        self.key = Some(key);
    }

    fn clear(&mut self) {
        self.key = None;
        self.image = None;
    }
}

/// Disc-masked finished and unfinished skins, baked at surface size.
#[derive(Debug, Default)]
pub struct MaskCache {
    finished: MaskSlot,
    unfinished: MaskSlot,
}

impl MaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings both masks in line with the current surface size and resource
    /// identifiers. Slots whose size and identifier are unchanged are kept.
    pub fn prepare(
        &mut self,
        size: (u32, u32),
        finished: Option<ResourceId>,
        unfinished: Option<ResourceId>,
        resolver: &dyn ImageResolver,
    ) {
        let (width, height) = size;
        self.finished.prepare(finished, width, height, resolver);
        self.unfinished.prepare(unfinished, width, height, resolver);
    }

    /// Drops both masks so the next [`MaskCache::prepare`] rebuilds them.
    pub fn invalidate(&mut self) {
        self.finished.clear();
        self.unfinished.clear();
    }

    pub fn finished(&self) -> Option<&Arc<RgbaImage>> {
        self.finished.image.as_ref()
    }

    pub fn unfinished(&self) -> Option<&Arc<RgbaImage>> {
        self.unfinished.image.as_ref()
    }
}
