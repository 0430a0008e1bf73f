/// Quantiles used as band cut points.
pub const PERCENTILES: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// Points awarded per band step.
pub const BAND_STEP: u32 = 5;

/// Maps a peer rating onto a band score given the class cut points.
///
/// The score is the index of the lowest cut point strictly above `rating`
/// times [`BAND_STEP`]. A rating at (or above) the top cut gets the top band,
/// a rating below the first cut gets none.
///
/// | Rating vs cuts `[c0..c4]` | Band |
/// |---------------------------|------|
/// | `r < c0`                  | none |
/// | `c0 <= r < c1`            | 5    |
/// | `c1 <= r < c2`            | 10   |
/// | `c2 <= r < c3`            | 15   |
/// | `c3 <= r < c4`            | 20   |
/// | `r >= c4`                 | 25   |
pub fn band_score(rating: f64, cut_points: &[f64; 5]) -> Option<u32> {
    if rating.is_nan() {
        return None;
    }
    match cut_points.iter().position(|&cut| cut > rating) {
        Some(0) => None,
        Some(i) => Some(i as u32 * BAND_STEP),
        None => Some(cut_points.len() as u32 * BAND_STEP),
    }
}
