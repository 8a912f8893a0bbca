use super::TokenValidator;
use reachmap_core::model::LatLng;
use serde::{Deserialize, Serialize};

/// the shareable part of a position.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PositionState {
    pub time_budget: u64,
    pub origin: LatLng,
}

/// decimal places used for coordinates at a zoom level, `ceil(log2(zoom))`.
///
/// for zoom <= 1 the formula gives zero or fewer places; this returns 1
/// there instead of 0, since a token like `"52"` has no decimal point and
/// is rejected on read.
pub fn coordinate_precision(zoom: f64) -> usize {
    let precision = zoom.log2().ceil();
    if precision.is_finite() && precision > 1.0 {
        precision as usize
    } else {
        1
    }
}

/// flattens positions into `[time, lat, lng, ...]` tokens.
pub fn serialize<I>(states: I, zoom: f64) -> Vec<String>
where
    I: IntoIterator<Item = PositionState>,
{
    let precision = coordinate_precision(zoom);
    states
        .into_iter()
        .flat_map(|s| {
            [
                s.time_budget.to_string(),
                format!("{:.*}", precision, s.origin.lat),
                format!("{:.*}", precision, s.origin.lng),
            ]
        })
        .collect()
}

/// reads triples from the front of `tokens` until the first one with an
/// absent or invalid field. nothing after that triple is looked at.
pub fn parse_valid_prefix<S: AsRef<str>>(
    tokens: &[S],
    validator: &TokenValidator,
) -> Vec<PositionState> {
    let token = |i: usize| tokens.get(i).map(AsRef::as_ref);
    let mut states = vec![];
    for i in 0.. {
        let time = validator.time(token(3 * i));
        let lat = validator.coordinate(token(3 * i + 1));
        let lng = validator.coordinate(token(3 * i + 2));
        let (Some(time_budget), Some(lat), Some(lng)) = (time, lat, lng) else {
            break;
        };
        states.push(PositionState {
            time_budget,
            origin: LatLng::new(lat, lng),
        });
    }
    states
}
