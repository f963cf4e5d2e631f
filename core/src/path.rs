//! Polyline path travelled by bloons and the corridor rectangles derived from it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{distance, Position};

/// Corridor width used by the standard track.
pub const DEFAULT_PATH_WIDTH: i32 = 20;

const STANDARD_WAYPOINTS: [(i32, i32); 15] = [
    (0, 113),
    (64, 113),
    (64, 54),
    (140, 54),
    (140, 174),
    (36, 174),
    (36, 216),
    (288, 216),
    (288, 149),
    (206, 149),
    (206, 94),
    (290, 94),
    (290, 28),
    (180, 28),
    (180, 0),
];

/// Reasons a path description may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PathError {
    /// A path needs at least one segment.
    #[error("path requires at least two waypoints, got {count}")]
    TooFewWaypoints {
        /// Number of waypoints supplied.
        count: usize,
    },
    /// The corridor must have a positive width.
    #[error("path width must be positive, got {width}")]
    InvalidWidth {
        /// Width supplied.
        width: i32,
    },
    /// Two consecutive waypoints coincide.
    #[error("segment {index} has zero length")]
    DegenerateSegment {
        /// Index of the zero-length segment.
        index: usize,
    },
}

/// Orientation of a corridor rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CorridorKind {
    /// Segment with constant `y`.
    Horizontal,
    /// Segment with constant `x`.
    Vertical,
    /// Any other segment.
    Diagonal,
}

/// Rectangle covering one path segment, widened by half the path width on each side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Corridor {
    kind: CorridorKind,
    corners: [Position; 4],
}

impl Corridor {
    fn between(from: Position, to: Position, half_width: i32) -> Self {
        if from.y() == to.y() {
            let (left, right) = (from.x().min(to.x()), from.x().max(to.x()));
            return Self {
                kind: CorridorKind::Horizontal,
                corners: [
                    Position::new(left, from.y() - half_width),
                    Position::new(right, from.y() - half_width),
                    Position::new(right, from.y() + half_width),
                    Position::new(left, from.y() + half_width),
                ],
            };
        }

        if from.x() == to.x() {
            let (top, bottom) = (from.y().min(to.y()), from.y().max(to.y()));
            return Self {
                kind: CorridorKind::Vertical,
                corners: [
                    Position::new(from.x() - half_width, top),
                    Position::new(from.x() + half_width, top),
                    Position::new(from.x() + half_width, bottom),
                    Position::new(from.x() - half_width, bottom),
                ],
            };
        }

        let length = distance(from, to).max(1);
        let dx = to.x() - from.x();
        let dy = to.y() - from.y();
        let offset_x = -dy * half_width / length;
        let offset_y = dx * half_width / length;
        Self {
            kind: CorridorKind::Diagonal,
            corners: [
                from.offset(offset_x, offset_y),
                to.offset(offset_x, offset_y),
                to.offset(-offset_x, -offset_y),
                from.offset(-offset_x, -offset_y),
            ],
        }
    }

    /// Orientation of the segment this corridor covers.
    #[must_use]
    pub const fn kind(&self) -> CorridorKind {
        self.kind
    }

    /// Corners in winding order, starting at the segment origin side.
    #[must_use]
    pub const fn corners(&self) -> [Position; 4] {
        self.corners
    }

    /// Reports whether an axis-aligned square overlaps the corridor.
    #[must_use]
    pub fn overlaps_square(&self, center: Position, half_extent: i32) -> bool {
        polygons_overlap(&self.corners, &square(center, half_extent))
    }
}

/// Straight piece of the path between two consecutive waypoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Segment {
    /// Waypoint the segment starts at.
    pub from: Position,
    /// Waypoint the segment ends at.
    pub to: Position,
    /// Pixel length of the segment.
    pub length: i32,
}

/// Immutable polyline path with its derived corridors and lengths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    waypoints: Vec<Position>,
    width: i32,
    corridors: Vec<Corridor>,
    segment_lengths: Vec<i32>,
    length: i64,
}

impl Path {
    /// Validates the waypoints and derives corridors and lengths.
    pub fn new(waypoints: Vec<Position>, width: i32) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }
        if width <= 0 {
            return Err(PathError::InvalidWidth { width });
        }
        if let Some(index) = waypoints.windows(2).position(|pair| pair[0] == pair[1]) {
            return Err(PathError::DegenerateSegment { index });
        }

        Ok(Self::build(waypoints, width))
    }

    /// The fifteen-waypoint track used by the standard game.
    #[must_use]
    pub fn standard() -> Self {
        let waypoints = STANDARD_WAYPOINTS
            .iter()
            .map(|&(x, y)| Position::new(x, y))
            .collect();
        Self::build(waypoints, DEFAULT_PATH_WIDTH)
    }

    fn build(waypoints: Vec<Position>, width: i32) -> Self {
        let half_width = width / 2;
        let corridors = waypoints
            .windows(2)
            .map(|pair| Corridor::between(pair[0], pair[1], half_width))
            .collect();
        let segment_lengths: Vec<i32> = waypoints
            .windows(2)
            .map(|pair| distance(pair[0], pair[1]))
            .collect();
        let length = segment_lengths.iter().map(|&value| i64::from(value)).sum();

        Self {
            waypoints,
            width,
            corridors,
            segment_lengths,
            length,
        }
    }

    /// Ordered waypoints.
    #[must_use]
    pub fn waypoints(&self) -> &[Position] {
        &self.waypoints
    }

    /// First waypoint, where bloons enter.
    #[must_use]
    pub fn start(&self) -> Position {
        self.waypoints[0]
    }

    /// Corridor width in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// One corridor per segment.
    #[must_use]
    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    /// Number of segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segment_lengths.len()
    }

    /// Segment starting at waypoint `index`.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<Segment> {
        let length = *self.segment_lengths.get(index)?;
        Some(Segment {
            from: self.waypoints[index],
            to: *self.waypoints.get(index + 1)?,
            length,
        })
    }

    /// Total pixel length of the path.
    #[must_use]
    pub const fn length(&self) -> i64 {
        self.length
    }

    /// Reports whether a square footprint touches the path.
    ///
    /// Each corridor is tested with a separating-axis check and each waypoint
    /// contributes a round joint of radius `width / 2`.
    #[must_use]
    pub fn blocks_footprint(&self, center: Position, half_extent: i32) -> bool {
        if self
            .corridors
            .iter()
            .any(|corridor| corridor.overlaps_square(center, half_extent))
        {
            return true;
        }

        let radius = i64::from(self.width / 2);
        self.waypoints.iter().any(|joint| {
            let nearest = Position::new(
                joint.x().clamp(center.x() - half_extent, center.x() + half_extent),
                joint.y().clamp(center.y() - half_extent, center.y() + half_extent),
            );
            joint.distance_squared(nearest) < radius * radius
        })
    }
}

fn square(center: Position, half_extent: i32) -> [Position; 4] {
    [
        center.offset(-half_extent, -half_extent),
        center.offset(half_extent, -half_extent),
        center.offset(half_extent, half_extent),
        center.offset(-half_extent, half_extent),
    ]
}

fn polygons_overlap(a: &[Position; 4], b: &[Position; 4]) -> bool {
    !(has_separating_edge(a, b) || has_separating_edge(b, a))
}

fn has_separating_edge(edges_from: &[Position; 4], other: &[Position; 4]) -> bool {
    (0..edges_from.len()).any(|index| {
        let start = edges_from[index];
        let end = edges_from[(index + 1) % edges_from.len()];
        let axis = (
            -(i64::from(end.y()) - i64::from(start.y())),
            i64::from(end.x()) - i64::from(start.x()),
        );
        if axis == (0, 0) {
            return false;
        }

        let (min_a, max_a) = project(edges_from, axis);
        let (min_b, max_b) = project(other, axis);
        max_a < min_b || max_b < min_a
    })
}

fn project(points: &[Position; 4], axis: (i64, i64)) -> (i64, i64) {
    points.iter().fold((i64::MAX, i64::MIN), |(low, high), point| {
        let value = i64::from(point.x()) * axis.0 + i64::from(point.y()) * axis.1;
        (low.min(value), high.max(value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_path_has_fourteen_segments() {
        let path = Path::standard();
        assert_eq!(path.segment_count(), 14);
        assert_eq!(path.start(), Position::new(0, 113));
        assert_eq!(path.segment(0).map(|segment| segment.length), Some(64));
        assert!(path.segment(14).is_none());
    }

    #[test]
    fn total_length_sums_segments() {
        let path = Path::standard();
        let summed: i64 = (0..path.segment_count())
            .filter_map(|index| path.segment(index))
            .map(|segment| i64::from(segment.length))
            .sum();
        assert_eq!(path.length(), summed);
    }

    #[test]
    fn invalid_descriptions_are_rejected() {
        assert_eq!(
            Path::new(vec![Position::new(0, 0)], 20),
            Err(PathError::TooFewWaypoints { count: 1 })
        );
        assert_eq!(
            Path::new(vec![Position::new(0, 0), Position::new(5, 0)], 0),
            Err(PathError::InvalidWidth { width: 0 })
        );
        assert_eq!(
            Path::new(
                vec![Position::new(0, 0), Position::new(5, 0), Position::new(5, 0)],
                10
            ),
            Err(PathError::DegenerateSegment { index: 1 })
        );
    }

    #[test]
    fn horizontal_corridor_extends_half_width_each_side() {
        let path = Path::new(vec![Position::new(10, 50), Position::new(90, 50)], 20)
            .expect("valid path");
        let corridor = path.corridors()[0];
        assert_eq!(corridor.kind(), CorridorKind::Horizontal);
        assert_eq!(corridor.corners()[0], Position::new(10, 40));
        assert_eq!(corridor.corners()[2], Position::new(90, 60));
    }

    #[test]
    fn footprints_near_the_corridor_are_blocked() {
        let path = Path::new(vec![Position::new(10, 50), Position::new(90, 50)], 20)
            .expect("valid path");
        assert!(path.blocks_footprint(Position::new(50, 50), 4));
        assert!(path.blocks_footprint(Position::new(50, 65), 6));
        assert!(!path.blocks_footprint(Position::new(50, 80), 6));
    }

    #[test]
    fn diagonal_corridors_block_along_their_length() {
        let path = Path::new(vec![Position::new(0, 0), Position::new(100, 100)], 20)
            .expect("valid path");
        assert_eq!(path.corridors()[0].kind(), CorridorKind::Diagonal);
        assert!(path.blocks_footprint(Position::new(50, 50), 2));
        assert!(!path.blocks_footprint(Position::new(80, 20), 4));
    }

    #[test]
    fn joints_round_off_corners() {
        let path = Path::new(
            vec![
                Position::new(0, 50),
                Position::new(50, 50),
                Position::new(50, 0),
            ],
            20,
        )
        .expect("valid path");
        assert!(path.blocks_footprint(Position::new(57, 57), 2));
        assert!(!path.blocks_footprint(Position::new(62, 62), 2));
    }
}
