// Pitch coordinate space shared by the classifiers and the layout generator.
//
// All positions are pixel coordinates on a fixed-size board: the origin is
// the top-left corner, `left` grows toward the right goal, `top` grows
// downward. The tracked ("green") team nominally attacks right-to-left and
// the generated ("red") side defends the right goal.

use serde::{Deserialize, Serialize};

pub const FIELD_WIDTH: f64 = 600.0;
pub const FIELD_HEIGHT: f64 = 300.0;
pub const CENTER_X: f64 = FIELD_WIDTH / 2.0;

/// Generated positions never render closer to an edge than this.
pub const EDGE_MARGIN: f64 = 10.0;

/// A raw board coordinate, e.g. the ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub left: f64,
    pub top: f64,
}

/// A roster slot with its current board position. Clients send these fresh
/// on every request; nothing is persisted between calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedPlayer {
    pub id: i32,
    pub left: f64,
    pub top: f64,
}

impl TrackedPlayer {
    pub fn position(&self) -> Point {
        Point {
            left: self.left,
            top: self.top,
        }
    }
}

/// Euclidean distance between two board points.
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = a.left - b.left;
    let dy = a.top - b.top;
    (dx * dx + dy * dy).sqrt()
}

/// Clamp a point into the playable area, `EDGE_MARGIN` off every edge.
pub fn clamp_to_pitch(p: Point) -> Point {
    Point {
        left: p.left.clamp(EDGE_MARGIN, FIELD_WIDTH - EDGE_MARGIN),
        top: p.top.clamp(EDGE_MARGIN, FIELD_HEIGHT - EDGE_MARGIN),
    }
}
