//! Zero-mean Gaussian draws (Box–Muller).

use rand::Rng;

/// One sample from N(0, std²). A zero or non-finite `std` yields 0.
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, std: f64) -> f64 {
    if std == 0.0 || !std.is_finite() {
        return 0.0;
    }
    // gen() is in [0, 1); shift to (0, 1] so ln() stays finite.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    z * std.abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::stats::{mean, sample_std};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zero_std_is_noise_free() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(gaussian(&mut rng, 0.0), 0.0);
        assert_eq!(gaussian(&mut rng, f64::NAN), 0.0);
    }

    #[test]
    fn moments_match() {
        let mut rng = StdRng::seed_from_u64(7);
        let draws: Vec<f64> = (0..20_000).map(|_| gaussian(&mut rng, 3.0)).collect();
        assert!(mean(&draws).unwrap().abs() < 0.1);
        assert!((sample_std(&draws).unwrap() - 3.0).abs() < 0.1);
    }
}
