//! Property tests for the label line codec and box geometry.

use labelprep::classes::ClassId;
use labelprep::geom::{CornerBox, NormalizedBox};
use labelprep::yolo::{parse_line, YoloRecord};
use proptest::prelude::*;

/// Rounds to the six decimal places the text format preserves.
fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

proptest! {
    #[test]
    fn serialize_parse_round_trips_rounded_records(
        class in 0u32..1000,
        cx in -1.0f64..2.0,
        cy in -1.0f64..2.0,
        w in -1.0f64..2.0,
        h in -1.0f64..2.0,
    ) {
        let record = YoloRecord::new(
            ClassId(class),
            NormalizedBox::new(round6(cx), round6(cy), round6(w), round6(h)),
        );

        let parsed = parse_line(&record.to_line()).expect("round trip parses");
        prop_assert_eq!(parsed, record);
    }

    #[test]
    fn parse_line_never_panics(line in ".{0,200}") {
        let _ = parse_line(&line);
    }

    #[test]
    fn well_formed_lines_always_parse(
        class in 0u32..100,
        values in prop::array::uniform4(-1e3f64..1e3),
    ) {
        let line = format!(
            "{} {:.6} {:.6} {:.6} {:.6}",
            class, values[0], values[1], values[2], values[3]
        );
        prop_assert!(parse_line(&line).is_ok());
    }

    #[test]
    fn normalization_inverse_stays_within_one_pixel(
        width in 1u32..4000,
        height in 1u32..4000,
        fx1 in 0.0f64..1.0,
        fy1 in 0.0f64..1.0,
        fx2 in 0.0f64..1.0,
        fy2 in 0.0f64..1.0,
    ) {
        let corners = CornerBox::new(
            fx1 * width as f64,
            fy1 * height as f64,
            fx2 * width as f64,
            fy2 * height as f64,
        );

        let nbox = NormalizedBox::from_corners(corners, width as f64, height as f64)
            .expect("positive dimensions");
        let (x_min, y_min, x_max, y_max) = nbox.to_pixel_corners(width, height);

        prop_assert!((x_min as f64 - corners.x_min).abs() <= 1.0);
        prop_assert!((y_min as f64 - corners.y_min).abs() <= 1.0);
        prop_assert!((x_max as f64 - corners.x_max).abs() <= 1.0);
        prop_assert!((y_max as f64 - corners.y_max).abs() <= 1.0);
    }
}
