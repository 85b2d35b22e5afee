// Formation detection: single-pass distance clustering over one team's
// tracked positions, then a left-to-right cluster-size signature matched
// against the known formation catalogue.

use serde::{Deserialize, Serialize};

use crate::pitch::TrackedPlayer;

/// A point joins the first existing cluster whose running centroid lies
/// within this radius.
pub const CLUSTER_RADIUS: f64 = 100.0;

/// Below this many tracked points the clusters are too sparse to mean
/// anything and detection short-circuits to the default formation.
pub const MIN_PLAYERS_FOR_DETECTION: usize = 8;

/// One anchor slot of a formation template: roster id plus the nominal
/// left-side position the slot occupies.
#[derive(Debug, Clone, Copy)]
pub struct Anchor {
    pub id: i32,
    pub zone: (f64, f64),
}

const fn anchor(id: i32, x: f64, y: f64) -> Anchor {
    Anchor { id, zone: (x, y) }
}

const FOUR_FOUR_TWO: [Anchor; 10] = [
    anchor(13, 70.0, 80.0),
    anchor(14, 70.0, 220.0),
    anchor(15, 100.0, 130.0),
    anchor(16, 100.0, 170.0),
    anchor(17, 200.0, 80.0),
    anchor(18, 200.0, 130.0),
    anchor(19, 200.0, 170.0),
    anchor(20, 200.0, 220.0),
    anchor(21, 320.0, 120.0),
    anchor(22, 320.0, 180.0),
];

const FOUR_THREE_THREE: [Anchor; 10] = [
    anchor(13, 80.0, 80.0),
    anchor(14, 80.0, 220.0),
    anchor(15, 100.0, 130.0),
    anchor(16, 100.0, 170.0),
    anchor(17, 210.0, 100.0),
    anchor(18, 210.0, 150.0),
    anchor(19, 210.0, 200.0),
    anchor(20, 320.0, 80.0),
    anchor(21, 330.0, 150.0),
    anchor(22, 320.0, 220.0),
];

const THREE_FIVE_TWO: [Anchor; 10] = [
    anchor(13, 80.0, 90.0),
    anchor(14, 80.0, 150.0),
    anchor(15, 80.0, 210.0),
    anchor(16, 190.0, 60.0),
    anchor(17, 200.0, 115.0),
    anchor(18, 200.0, 150.0),
    anchor(19, 200.0, 185.0),
    anchor(20, 190.0, 240.0),
    anchor(21, 320.0, 120.0),
    anchor(22, 320.0, 180.0),
];

const FOUR_TWO_THREE_ONE: [Anchor; 10] = [
    anchor(13, 70.0, 80.0),
    anchor(14, 70.0, 220.0),
    anchor(15, 100.0, 130.0),
    anchor(16, 100.0, 170.0),
    anchor(17, 180.0, 120.0),
    anchor(18, 180.0, 180.0),
    anchor(19, 260.0, 80.0),
    anchor(20, 270.0, 150.0),
    anchor(21, 260.0, 220.0),
    anchor(22, 340.0, 150.0),
];

const THREE_FOUR_THREE: [Anchor; 10] = [
    anchor(13, 80.0, 90.0),
    anchor(14, 80.0, 150.0),
    anchor(15, 80.0, 210.0),
    anchor(16, 200.0, 70.0),
    anchor(17, 200.0, 130.0),
    anchor(18, 200.0, 170.0),
    anchor(19, 200.0, 230.0),
    anchor(20, 320.0, 80.0),
    anchor(21, 330.0, 150.0),
    anchor(22, 320.0, 220.0),
];

/// The known tactical shapes. Serialized as the hyphenated label the
/// board frontend renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formation {
    #[serde(rename = "4-4-2")]
    FourFourTwo,
    #[serde(rename = "3-5-2")]
    ThreeFiveTwo,
    #[serde(rename = "4-2-3-1")]
    FourTwoThreeOne,
    #[serde(rename = "3-4-3")]
    ThreeFourThree,
    #[serde(rename = "4-3-3")]
    FourThreeThree,
}

/// Signature prefixes checked in order; the first match wins. The order
/// matters: "4-4-2" must be tried before "4-3-3" so a "4-4-2-..." tail
/// never falls through to a shorter shape.
const KNOWN_SIGNATURES: [(&str, Formation); 5] = [
    ("4-4-2", Formation::FourFourTwo),
    ("3-5-2", Formation::ThreeFiveTwo),
    ("4-2-3-1", Formation::FourTwoThreeOne),
    ("3-4-3", Formation::ThreeFourThree),
    ("4-3-3", Formation::FourThreeThree),
];

impl Formation {
    /// Fallback when fewer than `MIN_PLAYERS_FOR_DETECTION` points are supplied.
    pub const DEFAULT: Formation = Formation::FourThreeThree;

    pub const ALL: [Formation; 5] = [
        Formation::FourFourTwo,
        Formation::ThreeFiveTwo,
        Formation::FourTwoThreeOne,
        Formation::ThreeFourThree,
        Formation::FourThreeThree,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Formation::FourFourTwo => "4-4-2",
            Formation::ThreeFiveTwo => "3-5-2",
            Formation::FourTwoThreeOne => "4-2-3-1",
            Formation::ThreeFourThree => "3-4-3",
            Formation::FourThreeThree => "4-3-3",
        }
    }

    /// The ten outfield anchor slots for this shape, defined for the left
    /// side of the pitch. The goalkeeper is not part of any template.
    pub fn template(&self) -> &'static [Anchor] {
        match self {
            Formation::FourFourTwo => &FOUR_FOUR_TWO,
            Formation::ThreeFiveTwo => &THREE_FIVE_TWO,
            Formation::FourTwoThreeOne => &FOUR_TWO_THREE_ONE,
            Formation::ThreeFourThree => &THREE_FOUR_THREE,
            Formation::FourThreeThree => &FOUR_THREE_THREE,
        }
    }

    fn from_signature(signature: &str) -> Formation {
        for (prefix, formation) in KNOWN_SIGNATURES {
            if signature.starts_with(prefix) {
                return formation;
            }
        }
        Formation::FourFourTwo
    }
}

impl std::fmt::Display for Formation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

struct Cluster {
    center_x: f64,
    center_y: f64,
    count: usize,
}

/// Detect the formation of one team from its tracked positions.
///
/// Points are consumed in input order: each one either joins the first
/// cluster whose running centroid is within `CLUSTER_RADIUS`, updating the
/// centroid incrementally, or seeds a new cluster at its own position.
/// Reordering the same point set can therefore change the result; the
/// first-come points anchor the centroids on purpose.
pub fn classify(players: &[TrackedPlayer]) -> Formation {
    if players.len() < MIN_PLAYERS_FOR_DETECTION {
        return Formation::DEFAULT;
    }

    let mut clusters: Vec<Cluster> = Vec::new();
    for p in players {
        let found = clusters.iter_mut().find(|c| {
            let dx = p.left - c.center_x;
            let dy = p.top - c.center_y;
            (dx * dx + dy * dy).sqrt() < CLUSTER_RADIUS
        });
        match found {
            Some(c) => {
                let n = (c.count + 1) as f64;
                c.center_x = (c.center_x * (n - 1.0) + p.left) / n;
                c.center_y = (c.center_y * (n - 1.0) + p.top) / n;
                c.count += 1;
            }
            None => clusters.push(Cluster {
                center_x: p.left,
                center_y: p.top,
                count: 1,
            }),
        }
    }

    clusters.sort_by(|a, b| a.center_x.total_cmp(&b.center_x));
    let signature = clusters
        .iter()
        .map(|c| c.count.to_string())
        .collect::<Vec<_>>()
        .join("-");

    Formation::from_signature(&signature)
}
