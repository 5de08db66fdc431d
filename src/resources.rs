//! Image resources referenced by identifier.
//!
//! The indicator only ever stores [`ResourceId`]s; rasters are decoded on
//! demand so that masks can be rebuilt at whatever size the surface has.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use image::RgbaImage;

use crate::error::{Error, Result};

/// Identifier of an image resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub i32);

impl ResourceId {
    /// Sentinel used by the persisted snapshot for "no drawable".
    pub const NONE_RAW: i32 = -1;

    pub fn to_raw(id: Option<ResourceId>) -> i32 {
        id.map_or(Self::NONE_RAW, |id| id.0)
    }

    pub fn from_raw(raw: i32) -> Option<ResourceId> {
        (raw != Self::NONE_RAW).then_some(ResourceId(raw))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the encoded bytes of an image come from.
#[derive(Clone, PartialEq, Debug)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// Decodes an [`ImageSource`] into an RGBA raster.
pub fn load_image_from_source(source: &ImageSource) -> Result<RgbaImage> {
    let decoded = match source {
        ImageSource::Path(path) => image::open(path)?,
        ImageSource::Bytes(bytes) => image::load_from_memory(bytes)?,
    };
    Ok(decoded.to_rgba8())
}

/// Turns resource identifiers into decoded rasters.
pub trait ImageResolver {
    fn resolve(&self, id: ResourceId) -> Result<RgbaImage>;
}

/// In-memory table of image resources.
#[derive(Debug, Default, Clone)]
pub struct ResourceRegistry {
    sources: HashMap<ResourceId, ImageSource>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: ResourceId, source: ImageSource) -> Option<ImageSource> {
        self.sources.insert(id, source)
    }

    pub fn with(mut self, id: ResourceId, source: ImageSource) -> Self {
        self.register(id, source);
        self
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.sources.contains_key(&id)
    }
}

impl ImageResolver for ResourceRegistry {
    fn resolve(&self, id: ResourceId) -> Result<RgbaImage> {
        let source = self.sources.get(&id).ok_or(Error::UnknownResource(id))?;
        load_image_from_source(source)
    }
}
