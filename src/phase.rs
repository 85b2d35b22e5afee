// Phase-of-play classification from the current board snapshot.
//
// Two strategies exist: the canonical rule classifier below, and a
// team-shape variant that works from aggregate statistics of one side.
// Both are pure functions of the snapshot; neither keeps state.

use serde::{Deserialize, Serialize};

use crate::pitch::{Point, TrackedPlayer, CENTER_X};

/// Distance from the pitch center that marks a player as committed to
/// the far half. The guard line sits at `CENTER_X - PHASE_GUARD_BAND`.
pub const PHASE_GUARD_BAND: f64 = 50.0;

/// Coarse match situation. Wire labels match what the board frontend
/// expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "neutro")]
    Neutral,
    #[serde(rename = "defesa")]
    Defending,
    #[serde(rename = "ataque")]
    Attacking,
    #[serde(rename = "avançado")]
    Advanced,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Neutral => "neutro",
            Phase::Defending => "defesa",
            Phase::Attacking => "ataque",
            Phase::Advanced => "avançado",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn guard_line() -> f64 {
    CENTER_X - PHASE_GUARD_BAND
}

/// Classify the phase of play from the ball and both sides' positions.
///
/// Rules are checked in order; the first hit wins:
/// 1. ball in the far half and an opposing player past the guard line
///    -> Defending
/// 2. ball in the near half and an own player short of the guard line
///    -> Attacking
/// 3. every opposing player short of the guard line -> Advanced
/// 4. otherwise -> Neutral
///
/// The quantifier semantics are load-bearing: with no opposing players
/// at all, rule 3 is vacuously true and the phase is Advanced, never
/// Neutral.
pub fn classify_phase(ball: Point, own: &[TrackedPlayer], opposing: &[TrackedPlayer]) -> Phase {
    let guard = guard_line();
    if ball.left > CENTER_X && opposing.iter().any(|p| p.left > guard) {
        Phase::Defending
    } else if ball.left < CENTER_X && own.iter().any(|p| p.left < guard) {
        Phase::Attacking
    } else if opposing.iter().all(|p| p.left < guard) {
        Phase::Advanced
    } else {
        Phase::Neutral
    }
}

/// Aggregate statistics over one side's positions, the signal used by the
/// shape-based classifier variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamShape {
    /// Mean position of the side.
    pub mean: Point,
    /// Standard deviation of the horizontal spread.
    pub spread: f64,
    /// How many players stand in each horizontal third, left to right.
    pub thirds: [usize; 3],
}

impl TeamShape {
    /// Measure a side. Returns None for an empty side.
    pub fn measure(players: &[TrackedPlayer]) -> Option<TeamShape> {
        if players.is_empty() {
            return None;
        }
        let n = players.len() as f64;
        let mean_left = players.iter().map(|p| p.left).sum::<f64>() / n;
        let mean_top = players.iter().map(|p| p.top).sum::<f64>() / n;
        let variance = players
            .iter()
            .map(|p| (p.left - mean_left) * (p.left - mean_left))
            .sum::<f64>()
            / n;

        let third = crate::pitch::FIELD_WIDTH / 3.0;
        let mut thirds = [0usize; 3];
        for p in players {
            let idx = ((p.left / third) as usize).min(2);
            thirds[idx] += 1;
        }

        Some(TeamShape {
            mean: Point {
                left: mean_left,
                top: mean_top,
            },
            spread: variance.sqrt(),
            thirds,
        })
    }
}

/// Shape-based classifier variant: replaces the per-player existential and
/// universal checks with `mean ± spread` against the same guard line. An
/// empty opposing side still reads Advanced, mirroring the vacuous-truth
/// behavior of the rule classifier.
pub fn classify_phase_by_shape(
    ball: Point,
    own: &[TrackedPlayer],
    opposing: &[TrackedPlayer],
) -> Phase {
    let guard = guard_line();
    let opp = match TeamShape::measure(opposing) {
        Some(s) => s,
        None => return Phase::Advanced,
    };
    let own_shape = TeamShape::measure(own);

    if ball.left > CENTER_X && opp.mean.left + opp.spread > guard {
        Phase::Defending
    } else if ball.left < CENTER_X
        && own_shape.is_some_and(|s| s.mean.left - s.spread < guard)
    {
        Phase::Attacking
    } else if opp.mean.left + opp.spread < guard {
        Phase::Advanced
    } else {
        Phase::Neutral
    }
}
