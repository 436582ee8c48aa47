//! Regular axis construction and nearest-node lookup.

/// Evenly spaced points over `[start, end]`, inclusive of both ends.
///
/// `n == 0` yields an empty vector and `n == 1` yields `[start]`. The last
/// point is exactly `end` so that grid axes never overshoot their range.
///
/// # Examples
/// ```
/// use pricer_core::math::grid::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
/// assert!(linspace(0.0, 1.0, 0).is_empty());
/// ```
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Index of the element of `sorted` closest to `x`.
///
/// `sorted` must be in ascending order. Distance is absolute difference;
/// on a tie the smaller candidate wins, so the result never depends on
/// anything but the values themselves. Returns `None` for an empty slice.
///
/// # Examples
/// ```
/// use pricer_core::math::grid::nearest_index;
///
/// let strikes = [90.0, 100.0, 110.0];
/// assert_eq!(nearest_index(&strikes, 104.0), Some(1));
/// // Exactly halfway: the lower strike wins
/// assert_eq!(nearest_index(&strikes, 105.0), Some(1));
/// assert_eq!(nearest_index(&strikes, 500.0), Some(2));
///
/// let days: [u32; 3] = [7, 30, 60];
/// assert_eq!(nearest_index(&days, 45.0), Some(1));
/// ```
pub fn nearest_index<T>(sorted: &[T], x: f64) -> Option<usize>
where
    T: Copy + Into<f64>,
{
    if sorted.is_empty() {
        return None;
    }

    let upper = sorted.partition_point(|&v| v.into() < x);
    if upper == 0 {
        return Some(0);
    }
    if upper == sorted.len() {
        return Some(sorted.len() - 1);
    }

    let lower = upper - 1;
    let below = x - sorted[lower].into();
    let above = sorted[upper].into() - x;
    if below <= above {
        Some(lower)
    } else {
        Some(upper)
    }
}
