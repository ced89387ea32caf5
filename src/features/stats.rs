//! Summary statistics over numeric samples. Empty input is undefined, never an error.

/// Population mean and standard deviation.
pub fn mean_std(values: &[f64]) -> (Option<f64>, Option<f64>) {
    let Some(mean) = mean(values) else {
        return (None, None);
    };
    let n = values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (Some(mean), Some(variance.sqrt()))
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n − 1 denominator); undefined below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_undefined() {
        assert_eq!(mean_std(&[]), (None, None));
        assert_eq!(sample_std(&[]), None);
    }

    #[test]
    fn population_std() {
        let (m, s) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(m, Some(5.0));
        assert_eq!(s, Some(2.0));
    }

    #[test]
    fn single_value_has_zero_population_std() {
        assert_eq!(mean_std(&[3.5]), (Some(3.5), Some(0.0)));
        assert_eq!(sample_std(&[3.5]), None);
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        let s = sample_std(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((s - 1.290_994_448_735_805_6).abs() < 1e-12);
    }
}
