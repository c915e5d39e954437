// Coordinate helpers for a square, row-major grid

/// Row-major index of `(x, y)` in a `size`×`size` grid
#[inline]
pub fn to_index(size: usize, x: usize, y: usize) -> usize {
    y * size + x
}

/// Inverse of [`to_index`]
#[inline]
pub fn from_index(size: usize, index: usize) -> (usize, usize) {
    (index % size, index / size)
}

#[inline]
pub fn in_bounds(size: usize, x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && (x as usize) < size && (y as usize) < size
}

#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

#[inline]
pub fn saturate(value: f32) -> f32 {
    clamp(value, 0.0, 1.0)
}

#[inline]
pub fn is_border(size: usize, x: usize, y: usize) -> bool {
    x == 0 || y == 0 || x + 1 >= size || y + 1 >= size
}

/// Hermite smoothstep between two edges, saturated to [0, 1]
pub fn smoothstep(edge0: f32, edge1: f32, value: f32) -> f32 {
    let t = saturate((value - edge0) / (edge1 - edge0));
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_index_round_trip() {
        let size = 7;
        for y in 0..size {
            for x in 0..size {
                assert_eq!(from_index(size, to_index(size, x, y)), (x, y));
            }
        }
        assert_eq!(to_index(7, 3, 2), 17);
    }

    #[rstest]
    #[case(0, 0, true)]
    #[case(3, 3, true)]
    #[case(4, 0, false)]
    #[case(0, 4, false)]
    #[case(-1, 2, false)]
    #[case(2, -1, false)]
    fn test_in_bounds(#[case] x: i32, #[case] y: i32, #[case] expected: bool) {
        assert_eq!(in_bounds(4, x, y), expected);
    }

    #[rstest]
    #[case(-3.0, -1.0)]
    #[case(0.5, 0.5)]
    #[case(9.0, 2.0)]
    fn test_clamp(#[case] value: f32, #[case] expected: f32) {
        assert_eq!(clamp(value, -1.0, 2.0), expected);
    }

    #[test]
    fn test_border_detection() {
        assert!(is_border(5, 0, 2));
        assert!(is_border(5, 4, 2));
        assert!(is_border(5, 2, 0));
        assert!(is_border(5, 2, 4));
        assert!(!is_border(5, 2, 2));
    }

    #[test]
    fn test_smoothstep_edges() {
        assert_eq!(smoothstep(0.6, 0.9, 0.5), 0.0);
        assert_eq!(smoothstep(0.6, 0.9, 1.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }
}
