//! Numeric value generators.

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Generate a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> i64 {
    rng.gen_range(min..=max)
}

/// Sample `normal`, clamp it to `floor`, and truncate to an integer.
pub fn generate_floored_normal<R: Rng>(rng: &mut R, normal: &Normal<f64>, floor: i64) -> i64 {
    normal.sample(rng).max(floor as f64) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_int_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let v = generate_int_range(&mut rng, 10, 20);
            assert!((10..=20).contains(&v));
        }
    }

    #[test]
    fn test_floored_normal_mean_is_close() {
        let mut rng = StdRng::seed_from_u64(42);
        let normal = Normal::new(750.0, 90.0).unwrap();
        let n = 20_000;

        let sum: i64 = (0..n)
            .map(|_| generate_floored_normal(&mut rng, &normal, 20))
            .sum();
        let mean = sum as f64 / n as f64;

        // Truncation shifts the mean down by about half a unit.
        assert!((mean - 750.0).abs() < 5.0, "mean was {mean}");
    }

    #[test]
    fn test_floored_normal_respects_floor() {
        let mut rng = StdRng::seed_from_u64(1);
        // A mean far below the floor forces clamping on nearly every draw.
        let normal = Normal::new(-500.0, 90.0).unwrap();

        for _ in 0..1_000 {
            assert_eq!(generate_floored_normal(&mut rng, &normal, 20), 20);
        }
    }
}
