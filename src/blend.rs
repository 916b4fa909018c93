use crate::config::{Color, ThresholdBand};

/// The two color layers composited over a white primer to produce the
/// foreground sweep's blended appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BlendLayers {
    pub first: Color,
    pub first_alpha: f64,
    pub second: Color,
    pub second_alpha: f64,
}

/// Pick the two adjacent bands straddling `value` and their mixing weights.
///
/// Bands must be sorted ascending by `hi`. Weights interpolate linearly as
/// the value moves between the two bands' reference points: a band's
/// midpoint, except that the first band contributes its `lo` and the last
/// band its `hi`. Returns `None` when there is no pair to mix (fewer than
/// two bands, a value in a coverage gap, or degenerate reference points);
/// the renderer then falls back to a flat stroke.
pub(crate) fn blend_at(bands: &[ThresholdBand], value: f64) -> Option<BlendLayers> {
    let (i1, i2) = pick_pair(bands, value)?;
    let last = bands.len() - 1;
    let b1 = &bands[i1];
    let b2 = &bands[i2];
    let ref1 = if i1 == 0 { b1.lo } else { b1.midpoint() };
    let ref2 = if i2 == last { b2.hi } else { b2.midpoint() };
    if ref2 == ref1 {
        return None;
    }
    let first_alpha = (ref2 - value) / (ref2 - ref1);
    let second_alpha = 1.0 - first_alpha.abs();
    Some(BlendLayers {
        first: b1.color,
        first_alpha,
        second: b2.color,
        second_alpha,
    })
}

/// Indices of the two bands to mix for `value`, lower index first.
///
/// Interior bands split on their midpoint: a value strictly past it pairs
/// with the next band, a value at or before it pairs with the previous band
/// (a value exactly at the midpoint pairs with the previous band).
fn pick_pair(bands: &[ThresholdBand], value: f64) -> Option<(usize, usize)> {
    if bands.len() < 2 {
        return None;
    }
    let last = bands.len() - 1;
    if bands[0].contains(value) {
        return Some((0, 1));
    }
    if bands[last].contains(value) {
        return Some((last - 1, last));
    }
    for i in 1..last {
        if bands[i].contains(value) {
            return Some(if value > bands[i].midpoint() {
                (i, i + 1)
            } else {
                (i - 1, i)
            });
        }
    }
    None
}
