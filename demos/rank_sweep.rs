use svdrecon::imaging::default_image;
use svdrecon::metrics::{mean_squared_error, relative_error};
use svdrecon::{Decomposer, Layout, Matrix, decompose, reconstruct, retention_levels};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Rank-Truncated SVD Reconstruction ===\n");

    // A smooth synthetic picture compresses well; noise does not
    let image = default_image(128, 7);
    println!("Image shape: {} x {}", image.nrows(), image.ncols());

    let svd = decompose(&image)?;
    println!("Singular values: {}", svd.rank());
    println!(
        "Largest five: {:?}\n",
        svd.singular_values.iter().take(5).map(|s| format!("{s:.1}")).collect::<Vec<_>>()
    );

    println!("{:<12} {:>6} {:>14} {:>16} {:>12}", "Fraction", "k", "Energy kept", "Relative error", "MSE");
    println!("{}", "-".repeat(64));

    let fractions = [0.01, 0.05, 0.10, 0.25, 0.50, 1.0];
    for (&fraction, k) in fractions.iter().zip(retention_levels(svd.rank(), &fractions)) {
        let approx = reconstruct(&svd, k as i64);
        println!(
            "{:<12.2} {:>6} {:>14.6} {:>16.6} {:>12.4}",
            fraction,
            k,
            svd.energy_ratio(k),
            relative_error(&image, &approx)?,
            mean_squared_error(&image, &approx)?
        );
    }

    println!("\n=== Rectangular Inputs ===");
    let wide = Matrix::from_shape_fn((6, 15), |(r, c)| (r as f64 + 1.0) * (c as f64).sin());
    let full = Decomposer::new().layout(Layout::Full).decompose(&wide)?;
    println!(
        "Wide 6x15 (full layout): U {:?}, S {}, Vt {:?}",
        full.u.shape(),
        full.rank(),
        full.vt.shape()
    );
    println!("Numerical rank: {}", full.numerical_rank(1e-10));

    Ok(())
}
