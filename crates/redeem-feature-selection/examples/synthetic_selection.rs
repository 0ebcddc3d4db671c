use anyhow::Result;
use log::LevelFilter;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use redeem_feature_selection::{FeatureSet, IncrementalSelector, Scorer, SelectionConfig};

/// Scores a subset by the absolute Pearson's r between the sum of its
/// columns and the target.
struct SummedCorrelation {
    /// (n_samples, n_features) data matrix
    x: Array2<f64>,
    y: Array1<f64>,
}

impl Scorer<usize> for SummedCorrelation {
    fn score(&self, features: &FeatureSet<usize>) -> Result<f64> {
        if features.is_empty() {
            return Ok(0.0);
        }
        let mut summed = Array1::<f64>::zeros(self.x.nrows());
        for &f in features {
            if f >= self.x.ncols() {
                anyhow::bail!("no column for feature {}", f);
            }
            summed += &self.x.column(f);
        }
        Ok(r_regression(&summed, &self.y, true).abs())
    }

    fn name(&self) -> &str {
        "summed-correlation"
    }
}

/// Pearson's r between a single regressor and the target, centering both.
///
/// # Parameters
///
/// * `x` - A 1D array of shape (n_samples,) holding the regressor.
/// * `y` - A 1D array of shape (n_samples,) holding the target.
/// * `force_finite` - A boolean indicating whether a non-finite coefficient
///   (e.g. from a constant regressor) is replaced with 0.0.
///
/// # Returns
///
/// The correlation coefficient.
fn r_regression(x: &Array1<f64>, y: &Array1<f64>, force_finite: bool) -> f64 {
    let x_centered = x - x.mean().unwrap_or(0.0);
    let y_centered = y - y.mean().unwrap_or(0.0);

    let x_norm = x_centered.dot(&x_centered).sqrt();
    let y_norm = y_centered.dot(&y_centered).sqrt();
    let r = x_centered.dot(&y_centered) / x_norm / y_norm;

    if force_finite && !r.is_finite() {
        0.0
    } else {
        r
    }
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(
            env_logger::Env::default().filter_or("REDEEM_LOG", "error,redeem_feature_selection=info"),
        )
        .init();

    // 8 candidate features over 500 samples: the target depends on features
    // 0 and 1, feature 2 is a noisy copy of feature 0, the rest is noise.
    let n_samples = 500;
    let n_features = 8;
    let mut rng = StdRng::seed_from_u64(42);

    let mut x = Array2::from_shape_fn((n_samples, n_features), |_| rng.gen_range(-1.0..1.0));
    let jitter = Array1::from_shape_fn(n_samples, |_| rng.gen_range(-0.1..0.1));
    let noisy_copy = &x.column(0) + &jitter;
    x.column_mut(2).assign(&noisy_copy);

    let noise = Array1::from_shape_fn(n_samples, |_| rng.gen_range(-0.2..0.2));
    let y = &x.column(0) + &x.column(1) + &noise;

    println!("Synthetic X shape: {:?}", x.shape());
    println!("Synthetic y shape: {:?}", y.shape());

    let scorer = SummedCorrelation { x, y };
    let features: FeatureSet<usize> = (0..n_features).collect();

    for remove_redundant in [false, true] {
        let config = SelectionConfig::new(0.3, 2, remove_redundant);
        let report = IncrementalSelector::new(config)?.select_with_report(&features, &scorer)?;
        println!(
            "remove_redundant={} -> selected {:?}",
            remove_redundant,
            report.selected.to_vec()
        );
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
