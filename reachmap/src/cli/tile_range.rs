use super::CliError;
use crate::map::TileCoord;
use itertools::Itertools;
use std::str::FromStr;

/// an inclusive rectangle of tiles, "x0,y0,x1,y1".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl TileRange {
    pub fn tiles(&self, z: u32) -> Vec<TileCoord> {
        (self.y0..=self.y1)
            .cartesian_product(self.x0..=self.x1)
            .map(|(y, x)| TileCoord::new(x, y, z))
            .collect_vec()
    }
}

impl FromStr for TileRange {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| CliError::InvalidArgument {
            name: "tiles",
            reason,
        };
        let values = s
            .split(',')
            .map(|v| {
                v.trim()
                    .parse::<u32>()
                    .map_err(|e| invalid(format!("'{v}' is not a tile index: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let &[x0, y0, x1, y1] = values.as_slice() else {
            return Err(invalid(format!("expected 4 values, found {}", values.len())));
        };
        if x0 > x1 || y0 > y1 {
            return Err(invalid(String::from("range is empty")));
        }
        Ok(TileRange { x0, y0, x1, y1 })
    }
}
