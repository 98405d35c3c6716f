use approx::assert_abs_diff_eq;
use ndarray::{array, s};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::SeedableRng;
use rand::rngs::StdRng;
use svdrecon::metrics::{reconstruction_error, relative_error};
use svdrecon::{
    Decomposer, Decomposition, InputError, Layout, Matrix, SvdError, decompose, reconstruct,
    retention_levels,
};

fn random_matrix(rows: usize, cols: usize, seed: u64) -> Matrix {
    let mut rng = StdRng::seed_from_u64(seed);
    Matrix::random_using((rows, cols), Uniform::new(0.0, 255.0), &mut rng)
}

fn fixtures() -> Vec<(&'static str, Matrix)> {
    vec![
        ("square 4x4", random_matrix(4, 4, 1)),
        ("tall 10x6", random_matrix(10, 6, 2)),
        ("wide 6x10", random_matrix(6, 10, 3)),
        ("square 100x100", random_matrix(100, 100, 4)),
        ("constant 8x5", Matrix::from_elem((8, 5), 42.0)),
        ("identity 5x5", Matrix::eye(5)),
        ("single row", array![[1.0, -2.0, 3.0, 0.5]]),
        ("single column", array![[7.0], [0.0], [-1.0]]),
        ("hilbert 12x15", hilbert(12, 15)),
    ]
}

fn hilbert(rows: usize, cols: usize) -> Matrix {
    Matrix::from_shape_fn((rows, cols), |(i, j)| 1.0 / (i + j + 1) as f64)
}

fn check_invariants(name: &str, x: &Matrix, d: &Decomposition) {
    let r = x.nrows().min(x.ncols());
    assert_eq!(d.rank(), r, "{name}: rank");
    assert_eq!(d.shape(), x.dim(), "{name}: shape");

    let u = d.u.slice(s![.., ..r]);
    assert_abs_diff_eq!(u.t().dot(&u), Matrix::eye(r), epsilon = 1e-8);
    let vt = d.vt.slice(s![..r, ..]);
    assert_abs_diff_eq!(vt.dot(&vt.t()), Matrix::eye(r), epsilon = 1e-8);

    for i in 1..r {
        assert!(
            d.singular_values[i - 1] >= d.singular_values[i],
            "{name}: singular values not sorted"
        );
    }
    assert!(d.singular_values.iter().all(|&sigma| sigma >= 0.0));
}

#[test]
fn full_rank_reconstruction_matches_input() {
    for (name, x) in fixtures() {
        let d = decompose(&x).unwrap();
        check_invariants(name, &x, &d);

        let full = reconstruct(&d, d.rank() as i64);
        let err = relative_error(&x, &full).unwrap();
        assert!(err < 1e-6, "{name}: relative error {err}");
    }
}

#[test]
fn full_layout_matches_economy() {
    for (name, x) in fixtures() {
        let economy = decompose(&x).unwrap();
        let full = Decomposer::new().layout(Layout::Full).decompose(&x).unwrap();

        assert_eq!(full.u.shape(), &[x.nrows(), x.nrows()], "{name}");
        assert_eq!(full.vt.shape(), &[x.ncols(), x.ncols()], "{name}");
        assert_abs_diff_eq!(full.u.t().dot(&full.u), Matrix::eye(x.nrows()), epsilon = 1e-8);
        assert_abs_diff_eq!(full.vt.dot(&full.vt.t()), Matrix::eye(x.ncols()), epsilon = 1e-8);

        for k in 0..=economy.rank() as i64 {
            assert_abs_diff_eq!(reconstruct(&full, k), reconstruct(&economy, k), epsilon = 1e-9);
        }
    }
}

#[test]
fn error_is_monotone_in_k() {
    for (name, x) in fixtures() {
        let d = decompose(&x).unwrap();
        let scale = svdrecon::metrics::frobenius_norm(&x);

        let mut previous = f64::INFINITY;
        for k in 0..=d.rank() as i64 {
            let err = reconstruction_error(&x, &reconstruct(&d, k)).unwrap();
            assert!(err <= previous + 1e-9 * scale, "{name}: error rose at k = {k}");
            previous = err;
        }
    }
}

#[test]
fn extreme_magnitudes_reconstruct() {
    let base = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.5], [7.0, 8.0, 10.0]];
    let inputs = [
        ("3x3", base),
        ("tall 10x6", random_matrix(10, 6, 8)),
        ("wide 5x9", random_matrix(5, 9, 9)),
    ];

    for (name, x) in inputs {
        for scale in [1e-200, 1e-160, 1e160, 1e200] {
            let x = &x * scale;
            let d = decompose(&x).unwrap();
            check_invariants(name, &x, &d);

            let err = relative_error(&x, &reconstruct(&d, d.rank() as i64)).unwrap();
            assert!(err < 1e-6, "{name} * {scale}: relative error {err}");

            let norm = svdrecon::metrics::frobenius_norm(&x);
            let mut previous = f64::INFINITY;
            for k in 0..=d.rank() as i64 {
                let err = reconstruction_error(&x, &reconstruct(&d, k)).unwrap();
                assert!(err <= previous + 1e-9 * norm, "{name} * {scale}: error rose at k = {k}");
                previous = err;
            }
        }
    }
}

#[test]
fn zero_and_clamped_retention() {
    let x = random_matrix(9, 7, 5);
    let d = decompose(&x).unwrap();

    let zero = reconstruct(&d, 0);
    assert_eq!(zero, Matrix::zeros((9, 7)));
    assert_eq!(reconstruct(&d, -1), zero);
    assert_eq!(reconstruct(&d, 8), reconstruct(&d, 7));
    assert_eq!(reconstruct(&d, 1_000), reconstruct(&d, 7));
}

#[test]
fn invalid_inputs_are_rejected() {
    let nan = array![[1.0, f64::NAN], [0.0, 1.0]];
    let err = decompose(&nan).unwrap_err();
    assert!(matches!(
        err,
        SvdError::InvalidInput(InputError::NonFinite { row: 0, col: 1, value }) if value.is_nan()
    ));
    assert!(decompose(&nan).unwrap_err().is_invalid_input());

    let empty = Matrix::zeros((0, 0));
    assert_eq!(
        decompose(&empty).unwrap_err(),
        SvdError::InvalidInput(InputError::Empty { rows: 0, cols: 0 })
    );
}

#[test]
fn decomposition_is_shareable_across_threads() {
    let x = random_matrix(30, 20, 6);
    let d = decompose(&x).unwrap();
    let levels = retention_levels(d.rank(), &[0.05, 0.10, 0.25, 0.50, 1.0]);

    let parallel: Vec<Matrix> = std::thread::scope(|scope| {
        let handles: Vec<_> = levels
            .iter()
            .map(|&k| {
                let d = &d;
                scope.spawn(move || reconstruct(d, k as i64))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (&k, rec) in levels.iter().zip(&parallel) {
        assert_eq!(rec, &reconstruct(&d, k as i64));
    }
}
