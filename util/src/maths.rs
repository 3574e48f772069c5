//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Meters per second in one mile per hour.
pub const MPS_PER_MPH: f64 = 0.44704;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Limit a value to the range `[min, max]`.
///
/// Unlike `f64::clamp` this does not panic if `min > max`, in which case the
/// bounds are swapped first.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T 
where
    T: Float
{
    let (lo, hi) = order(*min, *max);
    let mut ret = *value;

    if ret > hi {
        ret = hi
    }
    if ret < lo {
        ret = lo
    }

    ret
}

/// Return the pair `(a, b)` sorted so that the first element is the smallest.
pub fn order<T>(a: T, b: T) -> (T, T)
where
    T: Float
{
    (a.min(b), a.max(b))
}

/// Convert a speed in miles per hour to meters per second.
pub fn mph_to_mps(mph: f64) -> f64 {
    mph * MPS_PER_MPH
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&5f64, &0f64, &1f64), 1f64);
        assert_eq!(clamp(&-5f64, &0f64, &1f64), 0f64);
        assert_eq!(clamp(&0.5f64, &0f64, &1f64), 0.5f64);

        // Inverted bounds are reordered
        assert_eq!(clamp(&5f64, &1f64, &0f64), 1f64);
    }

    #[test]
    fn test_mph_to_mps() {
        assert!((mph_to_mps(1.0) - 0.44704).abs() < 1e-12);
        assert_eq!(mph_to_mps(0.0), 0.0);
    }
}
