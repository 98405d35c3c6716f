//! Singular value decomposition and rank-truncated reconstruction.
//!
//! This module provides:
//! - `Decomposer` / `decompose`: factor a matrix into `U · diag(S) · Vᵗ`
//! - `reconstruct`: rebuild a rank-k approximation from the leading k triplets
//! - `retention_levels` / `reconstruct_levels`: batch reconstructions for a
//!   list of retained fractions of the spectrum
//!
//! # Examples
//!
//! ## Decompose and reconstruct
//! ```rust
//! use svdrecon::{Matrix, decompose, reconstruct};
//! use ndarray::array;
//!
//! let x = array![
//!     [1.0, 2.0, 3.0, 4.0],
//!     [5.0, 6.0, 7.0, 8.0],
//!     [9.0, 10.0, 11.0, 12.0]
//! ];
//!
//! let svd = decompose(&x).unwrap();
//! assert_eq!(svd.rank(), 3);
//!
//! // Keep only the dominant singular triplet
//! let approx: Matrix = reconstruct(&svd, 1);
//! assert_eq!(approx.shape(), x.shape());
//!
//! // Keeping everything gives the original back
//! let full = reconstruct(&svd, svd.rank() as i64);
//! assert!((&full - &x).iter().all(|d| d.abs() < 1e-9));
//! ```
//!
//! ## Retention levels
//! ```rust
//! use svdrecon::{Decomposer, Layout, reconstruct_levels, retention_levels};
//! use ndarray::Array2;
//!
//! let x = Array2::from_shape_fn((40, 30), |(r, c)| ((r * c) % 7) as f64);
//! let svd = Decomposer::new().layout(Layout::Full).decompose(&x).unwrap();
//! assert_eq!(svd.u.shape(), &[40, 40]);
//!
//! let levels = retention_levels(svd.rank(), &[0.05, 0.10, 0.25, 0.50, 1.0]);
//! assert_eq!(levels, vec![1, 3, 7, 15, 30]);
//!
//! for rec in reconstruct_levels(&svd, &levels) {
//!     println!("k = {}: energy kept {:.4}", rec.k, svd.energy_ratio(rec.k));
//! }
//! ```

mod reconstruct;
mod svd;

pub use reconstruct::{
    Reconstruction, clamp_retention, reconstruct, reconstruct_levels, retention_levels,
};
pub use svd::{Decomposer, Decomposition, Layout, decompose};
