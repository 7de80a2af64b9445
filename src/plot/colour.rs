// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colour maps for distinguishing antennas.

use colorous::Gradient;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

lazy_static::lazy_static! {
    pub(crate) static ref COLOUR_MAPS: String = ColourMap::iter().join(", ");
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub(crate) enum ColourMap {
    /// Diverging, blue to red.
    Coolwarm,
    Viridis,
    Rainbow,
}

impl Default for ColourMap {
    fn default() -> Self {
        ColourMap::Coolwarm
    }
}

impl ColourMap {
    /// The gradient to sample, and whether it runs backwards.
    fn gradient(self) -> (Gradient, bool) {
        match self {
            // RED_BLUE starts at red; coolwarm starts at blue.
            ColourMap::Coolwarm => (colorous::RED_BLUE, true),
            ColourMap::Viridis => (colorous::VIRIDIS, false),
            ColourMap::Rainbow => (colorous::RAINBOW, false),
        }
    }

    /// The colour at `t`, which is clamped to [0, 1].
    pub(crate) fn at(self, t: f64) -> (u8, u8, u8) {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let (gradient, reversed) = self.gradient();
        let c = gradient.eval_continuous(if reversed { 1.0 - t } else { t });
        (c.r, c.g, c.b)
    }

    /// The colour for antenna number `antenna`, with antenna numbers
    /// normalised over `0..num_antennas`.
    pub(crate) fn for_antenna(self, antenna: usize, num_antennas: usize) -> (u8, u8, u8) {
        let t = if num_antennas > 1 {
            antenna as f64 / (num_antennas - 1) as f64
        } else {
            0.0
        };
        self.at(t)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_colour_map_ends() {
        // Viridis runs from dark purple to yellow.
        assert_eq!(ColourMap::Viridis.at(0.0), (68, 1, 84));
        assert_eq!(ColourMap::Viridis.at(1.0), (253, 231, 37));

        // Coolwarm starts blue and ends red.
        let (r, _, b) = ColourMap::Coolwarm.at(0.0);
        assert!(b > r);
        let (r, _, b) = ColourMap::Coolwarm.at(1.0);
        assert!(r > b);

        // Out-of-range values are clamped.
        assert_eq!(ColourMap::Viridis.at(-3.0), ColourMap::Viridis.at(0.0));
        assert_eq!(ColourMap::Viridis.at(7.0), ColourMap::Viridis.at(1.0));
        assert_eq!(ColourMap::Rainbow.at(f64::NAN), ColourMap::Rainbow.at(0.0));
    }

    #[test]
    fn test_colour_maps_follow_their_gradients() {
        let c = colorous::RAINBOW.eval_continuous(0.25);
        assert_eq!(ColourMap::Rainbow.at(0.25), (c.r, c.g, c.b));
        let c = colorous::RED_BLUE.eval_continuous(0.75);
        assert_eq!(ColourMap::Coolwarm.at(0.25), (c.r, c.g, c.b));
    }

    #[test]
    fn test_antenna_colours() {
        let map = ColourMap::default();
        assert_eq!(map.for_antenna(0, 128), map.at(0.0));
        assert_eq!(map.for_antenna(127, 128), map.at(1.0));
        // A single antenna doesn't divide by zero.
        assert_eq!(map.for_antenna(0, 1), map.at(0.0));
    }

    #[test]
    fn test_parse_colour_maps() {
        assert_eq!(ColourMap::from_str("viridis").unwrap(), ColourMap::Viridis);
        assert!(ColourMap::from_str("jet").is_err());
        assert_eq!(COLOUR_MAPS.as_str(), "coolwarm, viridis, rainbow");
    }
}
