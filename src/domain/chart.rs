// Line chart geometry for a series of points
use crate::domain::reading::Point;
use serde::Serialize;

pub const CHART_WIDTH: f64 = 1000.0;
pub const CHART_HEIGHT: f64 = 260.0;
const MARGIN: f64 = 5.0;

/// Label anchor, in surface units.
pub const LABEL_X: f64 = 10.0;
pub const LABEL_Y: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Min and max of `v` in one pass. A flat series is widened to
    /// `[v - 1, v + 1]` so the vertical scale never collapses.
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min, mut max) = (first.v, first.v);
        for p in points {
            if p.v < min {
                min = p.v;
            }
            if p.v > max {
                max = p.v;
            }
        }
        if min == max {
            min -= 1.0;
            max += 1.0;
        }
        Some(Self { min, max })
    }
}

/// Everything drawn on the chart surface. An empty series yields an empty
/// surface: no vertices, no range, no label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartView {
    pub vertices: Vec<Vertex>,
    pub range: Option<ValueRange>,
    pub label: Option<String>,
}

impl ChartView {
    pub fn render(points: &[Point]) -> Self {
        let Some(range) = ValueRange::of(points) else {
            return Self::default();
        };

        // Both ends exist since the range is only defined for non-empty input
        // Offsets are taken in f64; an i64 difference can overflow
        let t0 = points[0].t as f64;
        let t1 = points[points.len() - 1].t as f64;
        let span = if t1 == t0 { 1.0 } else { t1 - t0 };

        let vertices = points
            .iter()
            .map(|p| Vertex {
                x: (p.t as f64 - t0) / span * CHART_WIDTH,
                y: (1.0 - (p.v - range.min) / (range.max - range.min))
                    * (CHART_HEIGHT - 2.0 * MARGIN)
                    + MARGIN,
            })
            .collect();

        let label = format!(
            "min={:.2} max={:.2} n={}",
            range.min,
            range.max,
            points.len()
        );

        Self {
            vertices,
            range: Some(range),
            label: Some(label),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// SVG path data: move to the first vertex, line to every other one.
    pub fn path_data(&self) -> String {
        let mut d = String::new();
        for (i, v) in self.vertices.iter().enumerate() {
            if i == 0 {
                d.push_str(&format!("M {} {}", v.x, v.y));
            } else {
                d.push_str(&format!(" L {} {}", v.x, v.y));
            }
        }
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[(i64, f64)]) -> Vec<Point> {
        values.iter().map(|&(t, v)| Point::new(t, v, 1)).collect()
    }

    #[test]
    fn test_empty_series_draws_nothing() {
        let chart = ChartView::render(&[]);
        assert!(chart.is_empty());
        assert_eq!(chart.label, None);
        assert_eq!(chart.range, None);
        assert_eq!(chart.path_data(), "");
    }

    #[test]
    fn test_two_point_scenario() {
        let pts = vec![Point::new(0, 10.0, 1), Point::new(60_000, 12.0, 2)];
        let chart = ChartView::render(&pts);

        assert_eq!(chart.label.as_deref(), Some("min=10.00 max=12.00 n=2"));
        assert_eq!(chart.vertices.len(), 2);
        assert_eq!(chart.vertices[0], Vertex { x: 0.0, y: 255.0 });
        assert_eq!(chart.vertices[1], Vertex { x: 1000.0, y: 5.0 });
        assert_eq!(chart.path_data(), "M 0 255 L 1000 5");
    }

    #[test]
    fn test_flat_series_is_padded() {
        let chart = ChartView::render(&points(&[(0, 21.5), (10, 21.5), (20, 21.5)]));
        let range = chart.range.unwrap();
        assert_eq!(range.min, 20.5);
        assert_eq!(range.max, 22.5);
        assert_eq!(chart.label.as_deref(), Some("min=20.50 max=22.50 n=3"));
        // Flat line sits in the vertical middle
        assert!(chart.vertices.iter().all(|v| v.y == 130.0));
    }

    #[test]
    fn test_single_point() {
        let chart = ChartView::render(&points(&[(1_700_000_000_000, 3.0)]));
        assert_eq!(chart.vertices, vec![Vertex { x: 0.0, y: 130.0 }]);
        assert_eq!(chart.path_data(), "M 0 130");
    }

    #[test]
    fn test_vertices_follow_point_order() {
        let pts = points(&[(0, 1.0), (25, 4.0), (50, 2.0), (75, 3.0), (100, 0.0)]);
        let chart = ChartView::render(&pts);

        assert_eq!(chart.vertices.len(), pts.len());
        let xs: Vec<f64> = chart.vertices.iter().map(|v| v.x).collect();
        assert_eq!(xs, vec![0.0, 250.0, 500.0, 750.0, 1000.0]);
        assert!(chart.vertices.iter().all(|v| (5.0..=255.0).contains(&v.y)));
        assert_eq!(chart.path_data().matches('L').count(), pts.len() - 1);
    }

    #[test]
    fn test_shared_timestamp_does_not_divide_by_zero() {
        let chart = ChartView::render(&points(&[(5, 1.0), (5, 2.0)]));
        assert!(chart.vertices.iter().all(|v| v.x == 0.0));
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let pts = points(&[
            (-5_000_000_000_000_000_000, 1.0),
            (0, 2.0),
            (5_000_000_000_000_000_000, 3.0),
        ]);
        let chart = ChartView::render(&pts);

        let xs: Vec<f64> = chart.vertices.iter().map(|v| v.x).collect();
        assert_eq!(xs, vec![0.0, 500.0, 1000.0]);
    }
}
