//! End-to-end tests for directory conversion

extern crate std;

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tempfile::tempdir;

use tiffstack::tiff::{read_page_pixels, read_pages};
use tiffstack::loader::color;
use tiffstack::{ColorSpace, ConversionConfig, Dpi, TiffError, TiffStack};

/// Builds a PNG with a pHYs chunk of `ppm` pixels per metre
fn png_with_phys(image: &RgbImage, ppm: u32) -> Vec<u8> {
    let mut png = Vec::new();
    DynamicImage::ImageRgb8(image.clone())
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();

    let mut chunk = b"pHYs".to_vec();
    chunk.extend_from_slice(&ppm.to_be_bytes());
    chunk.extend_from_slice(&ppm.to_be_bytes());
    chunk.push(1);
    let mut crc = flate2::Crc::new();
    crc.update(&chunk);

    let mut out = png[..33].to_vec();
    out.extend_from_slice(&9u32.to_be_bytes());
    out.extend_from_slice(&chunk);
    out.extend_from_slice(&crc.sum().to_be_bytes());
    out.extend_from_slice(&png[33..]);
    out
}

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb([(x * 3) as u8, (y * 5) as u8, ((x + y) % 256) as u8]))
}

fn stack(dir: &Path) -> TiffStack {
    TiffStack::new(Some(dir.join("tiffstack.log").to_str().unwrap())).unwrap()
}

#[test]
fn test_mixed_directory_scenario() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("testImages");
    fs::create_dir(&input).unwrap();

    gradient(200, 100).save_with_format(input.join("a.jpg"), ImageFormat::Jpeg).unwrap();
    fs::write(input.join("b.png"), png_with_phys(&gradient(200, 100), 2835)).unwrap();
    fs::write(input.join("c.jpg"), b"\xFF\xD8\xFF\xE0 truncated").unwrap();

    let output = dir.path().join("output_compressed.tif");
    let config = ConversionConfig {
        input_directory: input.clone(),
        output_file: output.clone(),
        ..ConversionConfig::default()
    };

    let result = stack(dir.path()).convert(&config).unwrap();
    std::assert_eq!(result.pages_written, 2);
    std::assert_eq!(result.skipped_files, std::vec!["c.jpg".to_string()]);

    let pages = read_pages(&output).unwrap();
    std::assert_eq!(pages.len(), 2);
    std::assert_eq!(pages[0].dpi(), Some((100, 100)));
    std::assert_eq!(pages[1].dpi(), Some((72, 72)));
    for page in &pages {
        std::assert_eq!((page.width, page.height), (200, 100));
        std::assert_eq!(page.samples_per_pixel, 3);
    }
}

#[test]
fn test_lossless_round_trip_matches_converted_pixels() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();

    let source = gradient(31, 17);
    source.save_with_format(input.join("only.png"), ImageFormat::Png).unwrap();
    let expected = color::rgb_to_ycbcr(source.as_raw());

    for compression in ["none", "tiff_adobe_deflate", "zstd"] {
        let output = dir.path().join(format!("{}.tif", compression));
        let config = ConversionConfig {
            input_directory: input.clone(),
            output_file: output.clone(),
            compression: compression.to_string(),
            ..ConversionConfig::default()
        };

        stack(dir.path()).convert(&config).unwrap();

        let (layout, pixels) = read_page_pixels(&output, 0).unwrap();
        std::assert_eq!(layout.color_space, ColorSpace::YCbCr);
        std::assert_eq!(pixels, expected, "{}", compression);
    }
}

#[test]
fn test_rgb_jpeg_pages_keep_their_colors() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    RgbImage::from_pixel(16, 16, Rgb([255, 0, 0])).save(input.join("red.png")).unwrap();
    RgbImage::from_pixel(16, 16, Rgb([0, 0, 255])).save(input.join("blue.png")).unwrap();

    let output = dir.path().join("out.tif");
    let config = ConversionConfig {
        input_directory: input,
        output_file: output.clone(),
        compression: "jpeg".to_string(),
        color_space: ColorSpace::Rgb,
        quality: 90,
        ..ConversionConfig::default()
    };

    std::assert_eq!(stack(dir.path()).convert(&config).unwrap().pages_written, 2);

    // First page is blue.png (sorted by name)
    let decoded = image::open(&output).unwrap().to_rgb8();
    let pixel = decoded.get_pixel(8, 8).0;
    std::assert!(pixel[0] < 25 && pixel[1] < 25 && pixel[2] > 230, "decoded to {:?}", pixel);
}

#[test]
fn test_jpeg_pages_keep_dimensions() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    gradient(40, 24).save_with_format(input.join("p1.png"), ImageFormat::Png).unwrap();
    gradient(16, 16).save_with_format(input.join("p2.jpeg"), ImageFormat::Jpeg).unwrap();

    let output = dir.path().join("out.tif");
    let config = ConversionConfig {
        input_directory: input,
        output_file: output.clone(),
        color_space: ColorSpace::Gray,
        quality: 80,
        dpi: Dpi::new(150, 150),
        ..ConversionConfig::default()
    };

    let tiffstack = stack(dir.path());
    std::assert_eq!(tiffstack.convert(&config).unwrap().pages_written, 2);

    let pages = tiffstack.inspect(&output).unwrap();
    std::assert_eq!((pages[0].width, pages[0].height), (40, 24));
    std::assert_eq!((pages[1].width, pages[1].height), (16, 16));
    std::assert_eq!(pages[0].samples_per_pixel, 1);
    std::assert_eq!(pages[0].dpi(), Some((150, 150)));

    std::assert_eq!(tiffstack.page_pixels(&output, 0).unwrap().len(), 40 * 24);
    std::assert_eq!(tiffstack.page_pixels(&output, 1).unwrap().len(), 16 * 16);
}

#[test]
fn test_empty_directory_keeps_previous_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("empty");
    fs::create_dir(&input).unwrap();

    let output = dir.path().join("out.tif");
    fs::write(&output, b"keep me").unwrap();

    let config = ConversionConfig {
        input_directory: input,
        output_file: output.clone(),
        ..ConversionConfig::default()
    };

    let result = stack(dir.path()).convert(&config);
    std::assert!(std::matches!(result, Err(TiffError::EmptyBatch)));
    std::assert_eq!(fs::read(&output).unwrap(), b"keep me");
}

#[test]
fn test_missing_directory() {
    let dir = tempdir().unwrap();
    let config = ConversionConfig {
        input_directory: dir.path().join("testImages"),
        output_file: dir.path().join("out.tif"),
        ..ConversionConfig::default()
    };

    let result = stack(dir.path()).convert(&config);
    std::assert!(std::matches!(result, Err(TiffError::DirectoryNotFound(_))));
    std::assert!(!dir.path().join("out.tif").exists());
}

#[test]
fn test_bogus_color_space_fails_before_writing() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("tiffstack.toml");
    fs::write(&config_path, "[conversion]\ncolor_space = \"CMYK-bogus\"\n").unwrap();

    let result = ConversionConfig::from_toml_file(&config_path);
    std::assert!(std::matches!(result, Err(TiffError::UnsupportedColorSpace(_))));
    std::assert!(!dir.path().join("output_compressed.tif").exists());
}
