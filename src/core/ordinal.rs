use crate::models::{Cleanliness, SocialLevel};

/// Enumerated lifestyle dimension with a fixed ordering of known values
pub trait Ordinal: Copy + PartialEq + 'static {
    /// Known values, lowest first
    const ORDER: &'static [Self];

    fn position(self) -> Option<usize> {
        Self::ORDER.iter().position(|v| *v == self)
    }
}

impl Ordinal for Cleanliness {
    const ORDER: &'static [Self] = &[
        Cleanliness::Relaxed,
        Cleanliness::Moderate,
        Cleanliness::VeryClean,
    ];
}

impl Ordinal for SocialLevel {
    const ORDER: &'static [Self] = &[
        SocialLevel::Quiet,
        SocialLevel::Moderate,
        SocialLevel::VerySocial,
    ];
}

/// Neutral score for values outside the known ordering
pub const UNRECOGNIZED_SCORE: u8 = 50;

/// Score two values of an ordered dimension (0-100)
///
/// score = round(100 - 75 * d / maxD), where d is the distance between the
/// two positions and maxD the largest possible distance. Adjacent values in a
/// three-value ordering score 63, opposite ends score 25.
pub fn ordinal_distance_score<T: Ordinal>(a: T, b: T) -> u8 {
    let (ia, ib) = match (a.position(), b.position()) {
        (Some(ia), Some(ib)) => (ia, ib),
        _ => return UNRECOGNIZED_SCORE,
    };

    if ia == ib {
        return 100;
    }

    let max_distance = T::ORDER.len().saturating_sub(1);
    if max_distance == 0 {
        return 100;
    }

    let distance = ia.abs_diff(ib) as f64;
    (100.0 - 75.0 * distance / max_distance as f64).round() as u8
}
