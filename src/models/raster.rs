//! Raster image buffers produced by the rendering service. Kept in memory
//! for the lifetime of one sale; never written to a shared path.

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImageFormat {
    Png,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
        }
    }
}

#[derive(Clone, Debug)]
pub struct RasterImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl RasterImage {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            format: ImageFormat::Png,
        }
    }
}
