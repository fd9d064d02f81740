//! Conversion settings
//!
//! Built once at startup: defaults, then an optional TOML file, then
//! command-line overrides.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, warn};

use crate::loader::{ColorSpace, Dpi};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::validation;

pub const DEFAULT_INPUT_DIRECTORY: &str = "testImages";
pub const DEFAULT_OUTPUT_FILE: &str = "output_compressed.tif";
pub const DEFAULT_COMPRESSION: &str = "jpeg";
pub const DEFAULT_QUALITY: u8 = 30;

/// Table holding the settings in a configuration file
const CONVERSION_TABLE: &str = "conversion";

/// Settings for one conversion run
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    pub input_directory: PathBuf,
    pub output_file: PathBuf,
    /// Compression name, resolved by the page writer
    pub compression: String,
    pub color_space: ColorSpace,
    /// 0-100, used by JPEG only
    pub quality: u8,
    /// Resolution for images that carry none
    pub dpi: Dpi,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        ConversionConfig {
            input_directory: PathBuf::from(DEFAULT_INPUT_DIRECTORY),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            compression: DEFAULT_COMPRESSION.to_string(),
            color_space: ColorSpace::YCbCr,
            quality: DEFAULT_QUALITY,
            dpi: Dpi::default(),
        }
    }
}

impl ConversionConfig {
    /// Load settings from a TOML file, starting from the defaults
    pub fn from_toml_file(path: &Path) -> TiffResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| TiffError::ConfigError(format!(
            "Cannot read {}: {}", path.display(), e)))?;

        debug!("Loaded configuration file {}", path.display());
        Self::from_toml_str(&contents)
    }

    /// Parse settings from TOML text, starting from the defaults
    ///
    /// Only the `[conversion]` table is read; missing keys keep their
    /// default value.
    pub fn from_toml_str(content: &str) -> TiffResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(TiffError::ConfigError(format!("Failed to parse TOML: {}", e))),
        };

        let mut config = ConversionConfig::default();

        let table = match toml_value.get(CONVERSION_TABLE) {
            Some(value) => value.as_table().ok_or_else(|| TiffError::ConfigError(format!(
                "[{}] must be a table", CONVERSION_TABLE)))?,
            None => {
                warn!("Configuration has no [{}] table, using defaults", CONVERSION_TABLE);
                return Ok(config);
            }
        };

        for (key, value) in table {
            match key.as_str() {
                "input_directory" => config.input_directory = PathBuf::from(Self::string_value(key, value)?),
                "output_file" => config.output_file = PathBuf::from(Self::string_value(key, value)?),
                "compression" => config.compression = Self::string_value(key, value)?.to_string(),
                "color_space" => config.color_space = ColorSpace::from_str(Self::string_value(key, value)?)?,
                "quality" => {
                    let quality = value.as_integer().ok_or_else(|| TiffError::ConfigError(
                        "quality must be an integer".to_string()))?;
                    config.quality = parse_quality(quality)?;
                },
                "dpi" => config.dpi = Self::dpi_value(value)?,
                other => warn!("Ignoring unknown configuration key '{}'", other),
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn string_value<'v>(key: &str, value: &'v toml::Value) -> TiffResult<&'v str> {
        value.as_str().ok_or_else(|| TiffError::ConfigError(format!("{} must be a string", key)))
    }

    /// `dpi = [x, y]` or `dpi = n`
    fn dpi_value(value: &toml::Value) -> TiffResult<Dpi> {
        let component = |v: &toml::Value| -> TiffResult<u32> {
            let n = v.as_integer().ok_or_else(|| TiffError::ConfigError(
                "dpi values must be integers".to_string()))?;
            validation::validate_range(n, 1, u32::MAX as i64, "dpi")?;
            Ok(n as u32)
        };

        match value {
            toml::Value::Array(items) if items.len() == 2 => Ok(Dpi::new(component(&items[0])?, component(&items[1])?)),
            toml::Value::Integer(_) => {
                let n = component(value)?;
                Ok(Dpi::new(n, n))
            },
            _ => Err(TiffError::ConfigError("dpi must be [x, y] or a single integer".to_string())),
        }
    }

    /// Checks values that the type system does not already guarantee
    pub fn validate(&self) -> TiffResult<()> {
        validation::validate_range(self.quality, 0, 100, "quality")?;

        if self.dpi.x == 0 || self.dpi.y == 0 {
            return Err(TiffError::ConfigError(format!("dpi must be positive, got {}", self.dpi)));
        }

        if self.compression.trim().is_empty() {
            return Err(TiffError::ConfigError("compression must not be empty".to_string()));
        }

        Ok(())
    }
}

impl fmt::Display for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} (compression {}, quality {}, color space {}, default dpi {})",
               self.input_directory.display(), self.output_file.display(),
               self.compression, self.quality, self.color_space, self.dpi)
    }
}

/// Validates a quality value from the command line or a file
pub fn parse_quality(value: i64) -> TiffResult<u8> {
    validation::validate_range(value, 0, 100, "quality")?;
    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConversionConfig::default();
        assert_eq!(config.input_directory, PathBuf::from("testImages"));
        assert_eq!(config.output_file, PathBuf::from("output_compressed.tif"));
        assert_eq!(config.compression, "jpeg");
        assert_eq!(config.color_space, ColorSpace::YCbCr);
        assert_eq!(config.quality, 30);
        assert_eq!(config.dpi, Dpi::new(100, 100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_table() {
        let config = ConversionConfig::from_toml_str(r#"
            [conversion]
            input_directory = "scans"
            output_file = "book.tif"
            compression = "zstd"
            color_space = "L"
            quality = 85
            dpi = [300, 150]
        "#).unwrap();

        assert_eq!(config.input_directory, PathBuf::from("scans"));
        assert_eq!(config.output_file, PathBuf::from("book.tif"));
        assert_eq!(config.compression, "zstd");
        assert_eq!(config.color_space, ColorSpace::Gray);
        assert_eq!(config.quality, 85);
        assert_eq!(config.dpi, Dpi::new(300, 150));
    }

    #[test]
    fn test_partial_table_keeps_defaults() {
        let config = ConversionConfig::from_toml_str("[conversion]\ndpi = 72\n").unwrap();
        assert_eq!(config.dpi, Dpi::new(72, 72));
        assert_eq!(config.compression, "jpeg");

        let empty = ConversionConfig::from_toml_str("").unwrap();
        assert_eq!(empty, ConversionConfig::default());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ConversionConfig::from_toml_str("[conversion]\nquality = 101\n"),
            Err(TiffError::ConfigError(_))
        ));
        assert!(matches!(
            ConversionConfig::from_toml_str("[conversion]\ndpi = [0, 72]\n"),
            Err(TiffError::ConfigError(_))
        ));
        assert!(matches!(
            ConversionConfig::from_toml_str("[conversion]\ndpi = [72]\n"),
            Err(TiffError::ConfigError(_))
        ));
        assert!(matches!(
            ConversionConfig::from_toml_str("[conversion]\ncolor_space = \"CMYK-bogus\"\n"),
            Err(TiffError::UnsupportedColorSpace(_))
        ));
        assert!(matches!(
            ConversionConfig::from_toml_str("[conversion\n"),
            Err(TiffError::ConfigError(_))
        ));
        assert!(matches!(
            ConversionConfig::from_toml_str("conversion = 3\n"),
            Err(TiffError::ConfigError(_))
        ));
    }

    #[test]
    fn test_parse_quality() {
        assert_eq!(parse_quality(0).unwrap(), 0);
        assert_eq!(parse_quality(100).unwrap(), 100);
        assert!(parse_quality(-1).is_err());
        assert!(parse_quality(255).is_err());
    }
}
