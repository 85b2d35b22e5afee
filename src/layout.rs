// Mirrored layout generation: turns a detected formation into concrete
// positions for the generated ("red") side on the right half of the pitch.

use rand::Rng;

use crate::formation::Formation;
use crate::pitch::{clamp_to_pitch, Point, TrackedPlayer, EDGE_MARGIN, FIELD_HEIGHT, FIELD_WIDTH};

/// Roster id reserved for the synthesized goalkeeper. Never appears in
/// any formation template.
pub const GOALKEEPER_ID: i32 = 23;

/// Uniform vertical jitter applied to each outfield anchor, in pitch units.
const ANCHOR_JITTER: f64 = 4.0;

/// Fraction of the ball's vertical deviation from the pitch middle that
/// the goalkeeper follows.
const KEEPER_BALL_TRACKING: f64 = 0.3;

/// Generate the mirrored side for a formation: the goalkeeper first, then
/// the ten template anchors reflected onto the right half.
///
/// Each anchor's horizontal position is the template's reflected across
/// the pitch width; its vertical position gets independent jitter. All
/// output coordinates are clamped to the playable area.
pub fn mirror_formation<R: Rng>(
    formation: Formation,
    ball: Point,
    rng: &mut R,
) -> Vec<TrackedPlayer> {
    let template = formation.template();
    let mut side = Vec::with_capacity(template.len() + 1);
    side.push(goalkeeper(ball));

    for anchor in template {
        let jitter = rng.gen_range(-ANCHOR_JITTER..ANCHOR_JITTER);
        let pos = clamp_to_pitch(Point {
            left: FIELD_WIDTH - anchor.zone.0,
            top: anchor.zone.1 + jitter,
        });
        side.push(TrackedPlayer {
            id: anchor.id,
            left: pos.left,
            top: pos.top,
        });
    }

    side
}

/// The goalkeeper guards the right goal line and tracks a fraction of the
/// ball's vertical movement around the pitch middle.
fn goalkeeper(ball: Point) -> TrackedPlayer {
    let middle = FIELD_HEIGHT / 2.0;
    let top = (middle + (ball.top - middle) * KEEPER_BALL_TRACKING)
        .clamp(EDGE_MARGIN, FIELD_HEIGHT - EDGE_MARGIN);
    TrackedPlayer {
        id: GOALKEEPER_ID,
        left: FIELD_WIDTH - EDGE_MARGIN,
        top,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn centered_ball() -> Point {
        Point {
            left: 300.0,
            top: 150.0,
        }
    }

    #[test]
    fn test_eleven_entries_keeper_first() {
        let mut rng = StdRng::seed_from_u64(7);
        for formation in Formation::ALL {
            let side = mirror_formation(formation, centered_ball(), &mut rng);
            assert_eq!(side.len(), 11, "{formation}");
            assert_eq!(side[0].id, GOALKEEPER_ID, "{formation}");
        }
    }

    #[test]
    fn test_keeper_id_never_collides_with_template() {
        for formation in Formation::ALL {
            assert!(formation
                .template()
                .iter()
                .all(|a| a.id != GOALKEEPER_ID));
        }
    }

    #[test]
    fn test_all_positions_within_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let high_ball = Point {
            left: 580.0,
            top: 295.0,
        };
        for formation in Formation::ALL {
            for _ in 0..50 {
                let side = mirror_formation(formation, high_ball, &mut rng);
                for p in &side {
                    assert!(p.left >= EDGE_MARGIN && p.left <= FIELD_WIDTH - EDGE_MARGIN);
                    assert!(p.top >= EDGE_MARGIN && p.top <= FIELD_HEIGHT - EDGE_MARGIN);
                }
            }
        }
    }

    #[test]
    fn test_anchors_are_reflected() {
        let mut rng = StdRng::seed_from_u64(1);
        let side = mirror_formation(Formation::FourFourTwo, centered_ball(), &mut rng);
        let template = Formation::FourFourTwo.template();
        // Entry i+1 corresponds to anchor i; left is a pure reflection
        for (anchor, generated) in template.iter().zip(side.iter().skip(1)) {
            assert_eq!(generated.id, anchor.id);
            assert_eq!(generated.left, FIELD_WIDTH - anchor.zone.0);
            // Vertical position stays within the jitter window
            assert!((generated.top - anchor.zone.1).abs() <= ANCHOR_JITTER);
        }
    }

    #[test]
    fn test_keeper_tracks_ball_vertically() {
        let mut rng = StdRng::seed_from_u64(3);
        let low_ball = Point {
            left: 100.0,
            top: 250.0,
        };
        let side = mirror_formation(Formation::FourThreeThree, low_ball, &mut rng);
        let keeper = side[0];
        // middle + 30% of (250 - 150) = 180
        assert_eq!(keeper.top, 180.0);
        assert_eq!(keeper.left, FIELD_WIDTH - EDGE_MARGIN);

        let side = mirror_formation(Formation::FourThreeThree, centered_ball(), &mut rng);
        assert_eq!(side[0].top, FIELD_HEIGHT / 2.0);
    }

    #[test]
    fn test_jitter_varies_between_calls() {
        let mut rng = StdRng::seed_from_u64(9);
        let a = mirror_formation(Formation::FourThreeThree, centered_ball(), &mut rng);
        let b = mirror_formation(Formation::FourThreeThree, centered_ball(), &mut rng);
        // The outfield tops are independently jittered; two runs matching
        // on every slot would mean the jitter is not being applied.
        let identical = a
            .iter()
            .skip(1)
            .zip(b.iter().skip(1))
            .all(|(x, y)| x.top == y.top);
        assert!(!identical);
    }
}
