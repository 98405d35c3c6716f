pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod decomposition;
pub mod error;
pub mod imaging;
pub mod metrics;

pub use decomposition::{
    Decomposer, Decomposition, Layout, Reconstruction, clamp_retention, decompose, reconstruct,
    reconstruct_levels, retention_levels,
};
pub use error::{InputError, SvdError};

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;
