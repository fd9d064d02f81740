use std::fs;
use std::io::Cursor;
use std::str::FromStr;

use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::{DynamicImage, ExtendedColorType, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::tempdir;

use super::color::{self, ColorSpace};
use super::dpi::{self, Dpi};
use super::ImageLoader;
use crate::tiff::errors::TiffError;

fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut out = Vec::new();
    image.write_to(&mut Cursor::new(&mut out), ImageFormat::Png).unwrap();
    out
}

/// Inserts a pHYs chunk right after IHDR
fn with_phys(png: &[u8], ppu_x: u32, ppu_y: u32, unit: u8) -> Vec<u8> {
    let mut chunk = Vec::new();
    chunk.extend_from_slice(b"pHYs");
    chunk.extend_from_slice(&ppu_x.to_be_bytes());
    chunk.extend_from_slice(&ppu_y.to_be_bytes());
    chunk.push(unit);

    let mut crc = flate2::Crc::new();
    crc.update(&chunk);

    // Signature (8) + IHDR chunk (4 + 4 + 13 + 4)
    let ihdr_end = 33;
    let mut out = png[..ihdr_end].to_vec();
    out.extend_from_slice(&9u32.to_be_bytes());
    out.extend_from_slice(&chunk);
    out.extend_from_slice(&crc.sum().to_be_bytes());
    out.extend_from_slice(&png[ihdr_end..]);
    out
}

fn jpeg_bytes(width: u32, height: u32, density: Option<PixelDensity>) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([40, 120, 200]));
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, 90);
    if let Some(density) = density {
        encoder.set_pixel_density(density);
    }
    encoder.encode(image.as_raw(), width, height, ExtendedColorType::Rgb8).unwrap();
    out
}

/// Big-endian EXIF TIFF with XResolution/YResolution and a unit
fn exif_block(x: u32, y: u32, unit: u16) -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM");
    tiff.extend_from_slice(&42u16.to_be_bytes());
    tiff.extend_from_slice(&8u32.to_be_bytes());

    // 3 entries: 2 + 36 + 4 = 42 bytes, rationals at 50 and 58
    tiff.extend_from_slice(&3u16.to_be_bytes());
    for (tag, offset) in [(282u16, 50u32), (283, 58)] {
        tiff.extend_from_slice(&tag.to_be_bytes());
        tiff.extend_from_slice(&5u16.to_be_bytes());
        tiff.extend_from_slice(&1u32.to_be_bytes());
        tiff.extend_from_slice(&offset.to_be_bytes());
    }
    tiff.extend_from_slice(&296u16.to_be_bytes());
    tiff.extend_from_slice(&3u16.to_be_bytes());
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&unit.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_be_bytes());

    for value in [x, y] {
        tiff.extend_from_slice(&value.to_be_bytes());
        tiff.extend_from_slice(&1u32.to_be_bytes());
    }

    let mut segment = b"Exif\0\0".to_vec();
    segment.extend_from_slice(&tiff);
    segment
}

/// Inserts an APP1 segment right after SOI
fn with_app1(jpeg: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

#[test]
fn test_color_space_names() {
    assert_eq!(ColorSpace::from_str("RGB").unwrap(), ColorSpace::Rgb);
    assert_eq!(ColorSpace::from_str("ycbcr").unwrap(), ColorSpace::YCbCr);
    assert_eq!(ColorSpace::from_str("L").unwrap(), ColorSpace::Gray);
    assert_eq!(ColorSpace::YCbCr.to_string(), "YCbCr");
    assert!(matches!(
        ColorSpace::from_str("CMYK-bogus"),
        Err(TiffError::UnsupportedColorSpace(name)) if name == "CMYK-bogus"
    ));
}

#[test]
fn test_ycbcr_reference_values() {
    let rgb = [255, 255, 255, 0, 0, 0, 255, 0, 0];
    assert_eq!(color::rgb_to_ycbcr(&rgb), vec![255, 128, 128, 0, 128, 128, 76, 85, 255]);
}

#[test]
fn test_ycbcr_inverse_is_close() {
    let rgb: Vec<u8> = (0..30u8).map(|v| v * 8).collect();
    let back = color::ycbcr_to_rgb(&color::rgb_to_ycbcr(&rgb));
    for (a, b) in rgb.iter().zip(back.iter()) {
        assert!((*a as i16 - *b as i16).abs() <= 2, "{} vs {}", a, b);
    }
}

#[test]
fn test_convert_drops_alpha() {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 0])));
    assert_eq!(color::convert(&image, ColorSpace::Rgb), [10u8, 20, 30].repeat(4));
    assert_eq!(color::convert(&image, ColorSpace::Gray).len(), 4);
}

#[test]
fn test_dpi_from_float() {
    assert_eq!(Dpi::from_float(71.99, 72.4), Some(Dpi::new(72, 72)));
    assert_eq!(Dpi::from_float(0.2, 72.0), None);
    assert_eq!(Dpi::from_float(-5.0, 72.0), None);
    assert_eq!(Dpi::from_float(f64::NAN, 72.0), None);
}

#[test]
fn test_dpi_parse() {
    assert_eq!("300,150".parse::<Dpi>().unwrap(), Dpi::new(300, 150));
    assert_eq!(" 96 ".parse::<Dpi>().unwrap(), Dpi::new(96, 96));
    assert!(matches!("0,100".parse::<Dpi>(), Err(TiffError::ConfigError(_))));
    assert!("abc".parse::<Dpi>().is_err());
    assert_eq!(Dpi::default(), Dpi::new(100, 100));
}

#[test]
fn test_png_phys() {
    let png = png_bytes(&DynamicImage::ImageRgb8(RgbImage::new(4, 4)));
    assert_eq!(dpi::read_embedded_dpi(&png), None);

    // 2835 px/m is 72 dpi
    assert_eq!(dpi::read_embedded_dpi(&with_phys(&png, 2835, 2835, 1)), Some(Dpi::new(72, 72)));
    // Unit 0 is an aspect ratio only
    assert_eq!(dpi::read_embedded_dpi(&with_phys(&png, 1, 1, 0)), None);
    assert_eq!(dpi::read_embedded_dpi(&with_phys(&png, 0, 0, 1)), None);
}

#[test]
fn test_jfif_density() {
    assert_eq!(dpi::read_embedded_dpi(&jpeg_bytes(8, 8, None)), None);
    assert_eq!(
        dpi::read_embedded_dpi(&jpeg_bytes(8, 8, Some(PixelDensity::dpi(150)))),
        Some(Dpi::new(150, 150))
    );
}

#[test]
fn test_exif_resolution() {
    let jpeg = jpeg_bytes(8, 8, None);

    let inch = with_app1(&jpeg, &exif_block(300, 200, 2));
    assert_eq!(dpi::read_embedded_dpi(&inch), Some(Dpi::new(300, 200)));

    // 40 dots/cm is 101.6 dpi
    let cm = with_app1(&jpeg, &exif_block(40, 40, 3));
    assert_eq!(dpi::read_embedded_dpi(&cm), Some(Dpi::new(102, 102)));

    let zero = with_app1(&jpeg, &exif_block(0, 0, 2));
    assert_eq!(dpi::read_embedded_dpi(&zero), None);

    let garbage = with_app1(&jpeg, b"Exif\0\0not a tiff");
    assert_eq!(dpi::read_embedded_dpi(&garbage), None);
}

#[test]
fn test_jfif_takes_precedence_over_exif() {
    let jpeg = jpeg_bytes(8, 8, Some(PixelDensity::dpi(72)));
    let both = with_app1(&jpeg, &exif_block(300, 300, 2));
    assert_eq!(dpi::read_embedded_dpi(&both), Some(Dpi::new(72, 72)));
}

#[test]
fn test_load_png_with_dpi() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("b.png");
    let png = png_bytes(&DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 10, Rgb([255, 0, 0]))));
    fs::write(&path, with_phys(&png, 2835, 2835, 1)).unwrap();

    let loader = ImageLoader::new(ColorSpace::YCbCr, Dpi::default());
    let image = loader.load(&path).unwrap();

    assert_eq!((image.width, image.height), (20, 10));
    assert_eq!(image.color_space, ColorSpace::YCbCr);
    assert_eq!(image.dpi, Dpi::new(72, 72));
    assert_eq!(image.source_name, "b.png");
    assert_eq!(image.pixels.len(), image.row_bytes() * 10);
    assert_eq!(&image.pixels[..3], &[76, 85, 255]);
}

#[test]
fn test_load_jpeg_uses_default_dpi() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.jpg");
    fs::write(&path, jpeg_bytes(200, 100, None)).unwrap();

    let loader = ImageLoader::new(ColorSpace::Gray, Dpi::new(100, 100));
    let image = loader.load(&path).unwrap();

    assert_eq!((image.width, image.height), (200, 100));
    assert_eq!(image.dpi, Dpi::new(100, 100));
    assert_eq!(image.pixels.len(), 200 * 100);
}

#[test]
fn test_load_corrupt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("c.jpg");
    fs::write(&path, b"this is not a jpeg").unwrap();

    let loader = ImageLoader::new(ColorSpace::Rgb, Dpi::default());
    match loader.load(&path) {
        Err(TiffError::ImageDecodeError { file, .. }) => assert_eq!(file, "c.jpg"),
        other => panic!("expected a decode error, got {:?}", other),
    }
}

#[test]
fn test_load_rejects_other_formats() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fake.png");
    let mut bmp = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(2, 2))
        .write_to(&mut Cursor::new(&mut bmp), ImageFormat::Bmp)
        .unwrap();
    fs::write(&path, bmp).unwrap();

    let loader = ImageLoader::new(ColorSpace::Rgb, Dpi::default());
    assert!(matches!(loader.load(&path), Err(TiffError::ImageDecodeError { .. })));
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let loader = ImageLoader::new(ColorSpace::Rgb, Dpi::default());
    assert!(matches!(
        loader.load(&dir.path().join("gone.png")),
        Err(TiffError::ImageDecodeError { .. })
    ));
}
