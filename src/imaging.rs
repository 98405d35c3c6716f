//! Grayscale image acquisition and output for the `svdrecon` binary.
//!
//! The decomposition code only sees a [`Matrix`] of finite intensities; this
//! module converts between those matrices and image files.

use crate::error::{Result, SvdError};
use crate::Matrix;
use image::{GrayImage, Luma};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;

/// Side length of the built-in test image.
pub const DEFAULT_SIZE: usize = 256;
pub const DEFAULT_SEED: u64 = 2014;

/// Loads an image file as 8-bit luminance intensities, one row per pixel row.
pub fn load_grayscale(path: &Path) -> Result<Matrix> {
    let img = image::open(path)
        .map_err(|e| SvdError::Image(format!("{}: {e}", path.display())))?
        .to_luma8();
    Ok(luma_to_matrix(&img))
}

pub fn luma_to_matrix(img: &GrayImage) -> Matrix {
    let (width, height) = img.dimensions();
    Matrix::from_shape_fn((height as usize, width as usize), |(r, c)| {
        f64::from(img.get_pixel(c as u32, r as u32)[0])
    })
}

/// Rounds and clamps intensities into `0..=255`.
pub fn matrix_to_luma(x: &Matrix) -> GrayImage {
    let (rows, cols) = x.dim();
    GrayImage::from_fn(cols as u32, rows as u32, |c, r| {
        Luma([x[[r as usize, c as usize]].round().clamp(0.0, 255.0) as u8])
    })
}

pub fn save_grayscale(x: &Matrix, path: &Path) -> Result<()> {
    matrix_to_luma(x)
        .save(path)
        .map_err(|e| SvdError::Image(format!("{}: {e}", path.display())))
}

/// Deterministic stand-in picture used when no input path is given:
/// a diagonal gradient with concentric rings and a little seeded noise.
pub fn default_image(size: usize, seed: u64) -> Matrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Matrix::random_using((size, size), Uniform::new(-8.0, 8.0), &mut rng);
    let scale = size.max(1) as f64;

    let mut img = Matrix::from_shape_fn((size, size), |(r, c)| {
        let y = r as f64 / scale;
        let x = c as f64 / scale;
        let radius = ((x - 0.5).powi(2) + (y - 0.5).powi(2)).sqrt();
        let rings = 0.5 + 0.5 * (radius * 40.0).cos();
        96.0 * x + 64.0 * y + 80.0 * rings
    });
    img += &noise;
    img.mapv_inplace(|v| v.clamp(0.0, 255.0));
    img
}
