/// Linear progress of a fade driven by a host-owned millisecond clock.
///
/// `elapsed_ms` counts from the moment the fade began. Negative values clamp
/// to the start; a zero-length fade is always complete.
pub(crate) fn fade_progress(elapsed_ms: i64, duration_ms: u32) -> f32 {
    if duration_ms == 0 {
        return 1.0;
    }
    (elapsed_ms as f32 / duration_ms as f32).clamp(0.0, 1.0)
}

/// Blur radius for a fade at `progress`, never below one effect unit so an
/// active blur stays visible from the first frame.
pub(crate) fn fade_radius(progress: f32, target_radius: u32) -> f32 {
    (progress * target_radius as f32).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_increases_monotonically() {
        let mut last = 0.0;
        for elapsed in (0..=1200).step_by(16) {
            let sample = fade_progress(elapsed, 1000);
            assert!(sample >= last);
            last = sample;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn progress_clamps_out_of_range_clock() {
        assert_eq!(fade_progress(-50, 1000), 0.0);
        assert_eq!(fade_progress(5_000, 1000), 1.0);
        assert_eq!(fade_progress(0, 0), 1.0);
    }

    #[test]
    fn radius_has_floor_of_one() {
        assert_eq!(fade_radius(0.0, 10), 1.0);
        assert!((fade_radius(0.25, 10) - 2.5).abs() < 1e-6);
        assert_eq!(fade_radius(1.0, 10), 10.0);
        assert_eq!(fade_radius(1.0, 0), 1.0);
    }
}
