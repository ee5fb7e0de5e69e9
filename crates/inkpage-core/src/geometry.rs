//! Polyline sampling and proximity queries.
//!
//! The eraser never needs the exact distance to a stroke, only whether some
//! sampled point lies inside its radius, so the queries here walk the polyline
//! at fixed arc-length steps and stop as soon as the answer is known.

use kurbo::Point;

/// Arc-length spacing between samples used by the eraser.
pub const DEFAULT_SAMPLE_STEP: f64 = 5.0;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Walk `points` as a polyline, yielding a point every `step` units of arc
/// length, starting at the first point and ending at the last one.
///
/// The iterator borrows the points and can be recreated at any time; it never
/// allocates. A non-positive or non-finite `step` yields only the first and
/// last points.
pub fn sample(points: &[Point], step: f64) -> Samples<'_> {
    let step = if step.is_finite() && step > 0.0 {
        step
    } else {
        f64::INFINITY
    };
    Samples {
        points,
        step,
        segment: 0,
        next_offset: 0.0,
        last: None,
        finished: points.is_empty(),
    }
}

/// Lazy sample sequence produced by [`sample`].
#[derive(Debug, Clone)]
pub struct Samples<'a> {
    points: &'a [Point],
    step: f64,
    /// Index of the segment start point currently being walked.
    segment: usize,
    /// Distance along the current segment of the next sample.
    next_offset: f64,
    last: Option<Point>,
    finished: bool,
}

impl Iterator for Samples<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.finished {
            return None;
        }

        while self.segment + 1 < self.points.len() {
            let start = self.points[self.segment];
            let end = self.points[self.segment + 1];
            let length = start.distance(end);

            if self.next_offset < length {
                let point = start.lerp(end, self.next_offset / length);
                self.next_offset += self.step;
                self.last = Some(point);
                return Some(point);
            }

            self.next_offset -= length;
            self.segment += 1;
        }

        // Endpoint, unless the walk already landed on it.
        self.finished = true;
        let end = *self.points.last()?;
        if self.last == Some(end) {
            return None;
        }
        self.last = Some(end);
        Some(end)
    }
}

/// Minimum distance from `point` to any sample of the polyline.
///
/// When `threshold` is given the walk stops at the first sample within it and
/// that sample's distance is returned, so the result is only the true minimum
/// when nothing is within the threshold. Empty input yields infinity.
pub fn min_distance_to_stroke(
    points: &[Point],
    point: Point,
    step: f64,
    threshold: Option<f64>,
) -> f64 {
    let mut best = f64::INFINITY;
    for sample in sample(points, step) {
        let d = distance(sample, point);
        if d < best {
            best = d;
        }
        if threshold.is_some_and(|t| best <= t) {
            break;
        }
    }
    best
}

/// Whether any sample of the polyline lies within `radius` of `point`.
pub fn within_distance(points: &[Point], point: Point, step: f64, radius: f64) -> bool {
    min_distance_to_stroke(points, point, step, Some(radius)) <= radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn test_distance() {
        assert!((distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sample_straight_line() {
        let points = [Point::new(0.0, 0.0), Point::new(12.0, 0.0)];
        let samples: Vec<Point> = sample(&points, 5.0).collect();

        assert_eq!(samples.len(), 4);
        assert!(approx(samples[0], Point::new(0.0, 0.0)));
        assert!(approx(samples[1], Point::new(5.0, 0.0)));
        assert!(approx(samples[2], Point::new(10.0, 0.0)));
        assert!(approx(samples[3], Point::new(12.0, 0.0)));
    }

    #[test]
    fn test_sample_carries_offset_across_vertices() {
        // 3 units right, then 4 units down: second sample sits 2 units into the second leg.
        let points = [
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 4.0),
        ];
        let samples: Vec<Point> = sample(&points, 5.0).collect();

        assert_eq!(samples.len(), 3);
        assert!(approx(samples[1], Point::new(3.0, 2.0)));
        assert!(approx(samples[2], Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_sample_endpoint_not_duplicated() {
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let samples: Vec<Point> = sample(&points, 5.0).collect();

        assert_eq!(samples.len(), 3);
        assert!(approx(*samples.last().unwrap(), Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_sample_single_point() {
        let points = [Point::new(4.0, 2.0)];
        let samples: Vec<Point> = sample(&points, 5.0).collect();
        assert_eq!(samples, vec![Point::new(4.0, 2.0)]);
    }

    #[test]
    fn test_sample_empty() {
        assert_eq!(sample(&[], 5.0).count(), 0);
    }

    #[test]
    fn test_sample_zero_length_segments() {
        let points = [Point::new(1.0, 1.0), Point::new(1.0, 1.0), Point::new(1.0, 1.0)];
        let samples: Vec<Point> = sample(&points, 5.0).collect();
        assert_eq!(samples, vec![Point::new(1.0, 1.0)]);
    }

    #[test]
    fn test_sample_invalid_step_yields_endpoints() {
        let points = [Point::new(0.0, 0.0), Point::new(50.0, 0.0)];
        assert_eq!(sample(&points, 0.0).count(), 2);
        assert_eq!(sample(&points, f64::NAN).count(), 2);
    }

    #[test]
    fn test_sample_is_restartable() {
        let points = [Point::new(0.0, 0.0), Point::new(20.0, 0.0)];
        let first: Vec<Point> = sample(&points, 5.0).collect();
        let second: Vec<Point> = sample(&points, 5.0).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_min_distance() {
        let points = [Point::new(0.0, 0.0), Point::new(20.0, 0.0)];
        let d = min_distance_to_stroke(&points, Point::new(10.0, 3.0), 5.0, None);
        assert!((d - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_distance_short_circuits() {
        let points = [Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        // First sample is already inside the threshold; the true minimum (0.0) is never reached.
        let d = min_distance_to_stroke(&points, Point::new(50.0, 0.0), 5.0, Some(100.0));
        assert!((d - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_distance_empty_is_infinite() {
        assert!(min_distance_to_stroke(&[], Point::ZERO, 5.0, None).is_infinite());
    }

    #[test]
    fn test_within_distance() {
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        assert!(within_distance(&points, Point::new(5.0, 5.0), 5.0, 3.0));
        assert!(!within_distance(&points, Point::new(30.0, 0.0), 5.0, 3.0));
    }
}
