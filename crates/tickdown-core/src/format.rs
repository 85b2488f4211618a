//! Clock face formatting.
//!
//! Pure functions from a seconds count to the `HH:MM:SS[.fff]` face. All
//! arithmetic happens on integer scaled units so repeated formatting never
//! picks up float artifacts.

/// Format a seconds count as `HH:MM:SS`, or `HH:MM:SS.fff` with exactly
/// `fraction_digits` (1-3) digits when `show_fraction` is set.
///
/// Negative input is clamped to zero -- an overshooting clock must never
/// show a negative face. Hours are not wrapped: a three-digit hour count
/// simply widens the field.
pub fn format_clock(seconds: f64, show_fraction: bool, fraction_digits: u8) -> String {
    let digits = if show_fraction {
        u32::from(fraction_digits.clamp(1, 3))
    } else {
        0
    };
    let scale = 10u64.pow(digits);
    let scaled = (seconds.max(0.0) * scale as f64).round() as u64;
    let whole = scaled / scale;
    let frac = scaled % scale;

    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;

    if digits == 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!(
            "{hours:02}:{minutes:02}:{secs:02}.{frac:0width$}",
            width = digits as usize
        )
    }
}

/// The face shown before the first draw: all zeros at the configured
/// resolution.
pub fn placeholder(show_fraction: bool, fraction_digits: u8) -> String {
    format_clock(0.0, show_fraction, fraction_digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn whole_second_anchors() {
        assert_eq!(format_clock(0.0, false, 1), "00:00:00");
        assert_eq!(format_clock(59.0, false, 1), "00:00:59");
        assert_eq!(format_clock(60.0, false, 1), "00:01:00");
        assert_eq!(format_clock(3661.0, false, 1), "01:01:01");
    }

    #[test]
    fn fractional_faces() {
        assert_eq!(format_clock(45.5, true, 1), "00:00:45.5");
        assert_eq!(format_clock(45.5, true, 2), "00:00:45.50");
        assert_eq!(format_clock(45.5, true, 3), "00:00:45.500");
        assert_eq!(format_clock(0.25, true, 2), "00:00:00.25");
    }

    #[test]
    fn fraction_rounds_to_requested_digits() {
        assert_eq!(format_clock(1.999, true, 1), "00:00:02.0");
        assert_eq!(format_clock(59.99, true, 1), "00:01:00.0");
    }

    #[test]
    fn clamps_negative_input() {
        assert_eq!(format_clock(-5.0, false, 1), "00:00:00");
        assert_eq!(format_clock(-0.1, true, 2), "00:00:00.00");
    }

    #[test]
    fn hours_grow_past_two_digits() {
        assert_eq!(format_clock(360_000.0, false, 1), "100:00:00");
        assert_eq!(format_clock(90_061.0, false, 1), "25:01:01");
    }

    #[test]
    fn placeholder_matches_resolution() {
        assert_eq!(placeholder(false, 1), "00:00:00");
        assert_eq!(placeholder(true, 1), "00:00:00.0");
        assert_eq!(placeholder(true, 3), "00:00:00.000");
    }

    proptest! {
        #[test]
        fn plain_face_is_eight_chars_below_100h(secs in 0.0f64..359_999.0) {
            let face = format_clock(secs, false, 1);
            prop_assert_eq!(face.len(), 8);
            prop_assert_eq!(face.as_bytes()[2], b':');
            prop_assert_eq!(face.as_bytes()[5], b':');
        }

        #[test]
        fn fraction_digit_count_matches(secs in 0.0f64..86_400.0, digits in 1u8..=3) {
            let face = format_clock(secs, true, digits);
            let (_, frac) = face.split_once('.').unwrap();
            prop_assert_eq!(frac.len(), digits as usize);
        }
    }
}
