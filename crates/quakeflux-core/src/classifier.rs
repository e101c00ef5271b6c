use std::fmt;

use serde::{Deserialize, Serialize};

/// Magnitude severity buckets in ascending order. Boundaries are right-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MagnitudeBucket {
    BelowThree,
    ThreeToFour,
    FourToFive,
    FiveToSix,
    SixPlus,
}

impl MagnitudeBucket {
    pub const ALL: [MagnitudeBucket; 5] = [
        MagnitudeBucket::BelowThree,
        MagnitudeBucket::ThreeToFour,
        MagnitudeBucket::FourToFive,
        MagnitudeBucket::FiveToSix,
        MagnitudeBucket::SixPlus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MagnitudeBucket::BelowThree => "M<3",
            MagnitudeBucket::ThreeToFour => "3–4",
            MagnitudeBucket::FourToFive => "4–5",
            MagnitudeBucket::FiveToSix => "5–6",
            MagnitudeBucket::SixPlus => "6+",
        }
    }
}

impl fmt::Display for MagnitudeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify_magnitude(magnitude: f64) -> MagnitudeBucket {
    if magnitude < 3.0 {
        MagnitudeBucket::BelowThree
    } else if magnitude < 4.0 {
        MagnitudeBucket::ThreeToFour
    } else if magnitude < 5.0 {
        MagnitudeBucket::FourToFive
    } else if magnitude < 6.0 {
        MagnitudeBucket::FiveToSix
    } else {
        MagnitudeBucket::SixPlus
    }
}
