//! geoTIFF conversion configuration types

/// TIFF compression methods
#[derive(Debug, Clone, Copy)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced
    DeflateBalanced,
}

impl TiffCompression {
    /// `GTiff` creation options selecting this compression.
    pub(crate) fn creation_options(self) -> &'static [(&'static str, &'static str)] {
        match self {
            TiffCompression::None => &[("COMPRESS", "NONE")],
            TiffCompression::Lzw => &[("COMPRESS", "LZW")],
            TiffCompression::DeflateFast => &[("COMPRESS", "DEFLATE"), ("ZLEVEL", "1")],
            TiffCompression::DeflateBalanced => &[("COMPRESS", "DEFLATE"), ("ZLEVEL", "6")],
            TiffCompression::DeflateBest => &[("COMPRESS", "DEFLATE"), ("ZLEVEL", "9")],
        }
    }
}

/// Configuration for writing one geoTIFF
#[derive(Debug, Clone)]
pub struct GeoTiffConfig {
    /// Compression method to use
    pub compression: TiffCompression,
    /// Store samples as 32-bit floats instead of 8-bit integers
    pub as_float: bool,
}

impl Default for GeoTiffConfig {
    fn default() -> Self {
        Self {
            compression: TiffCompression::None,
            as_float: false,
        }
    }
}

impl GeoTiffConfig {
    pub fn builder() -> GeoTiffConfigBuilder {
        GeoTiffConfigBuilder::default()
    }
}

/// Builder for GeoTiffConfig
#[derive(Default)]
pub struct GeoTiffConfigBuilder {
    compression: Option<TiffCompression>,
    as_float: Option<bool>,
}

impl GeoTiffConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn as_float(mut self, as_float: bool) -> Self {
        self.as_float = Some(as_float);
        self
    }

    pub fn build(self) -> GeoTiffConfig {
        let default = GeoTiffConfig::default();
        GeoTiffConfig {
            compression: self.compression.unwrap_or(default.compression),
            as_float: self.as_float.unwrap_or(default.as_float),
        }
    }
}
