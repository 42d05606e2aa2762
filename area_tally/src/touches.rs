use log::debug;

use crate::config::*;

/// The names of the coordinate columns, in the order expected by
/// `TouchSet::from_components`.
pub const COORDINATE_COLUMNS: [&str; 8] = [
    "like1_x",
    "like1_y",
    "like2_x",
    "like2_y",
    "dislike1_x",
    "dislike1_y",
    "dislike2_x",
    "dislike2_y",
];

impl TouchSet {
    /// Assembles the touches from the raw components, in the order of
    /// `COORDINATE_COLUMNS`.
    ///
    /// A touch is present only if both its x and y are present. A lone x or y
    /// is dropped. NaN is understood as a missing value, infinities are
    /// rejected.
    pub fn from_components(components: &[Option<f64>; 8]) -> Result<TouchSet, TallyErrors> {
        for (idx, c) in components.iter().enumerate() {
            if let Some(v) = c {
                if v.is_infinite() {
                    return Err(TallyErrors::MalformedInput {
                        message: format!("{} is not finite: {}", COORDINATE_COLUMNS[idx], v),
                    });
                }
            }
        }
        let pair = |idx: usize| -> Option<Coord> {
            let x = components[idx].filter(|v| !v.is_nan());
            let y = components[idx + 1].filter(|v| !v.is_nan());
            match (x, y) {
                (Some(x), Some(y)) => Some(Coord::new(x, y)),
                (None, None) => None,
                _ => {
                    debug!(
                        "TouchSet::from_components: dropping partial coordinate {}/{}",
                        COORDINATE_COLUMNS[idx],
                        COORDINATE_COLUMNS[idx + 1]
                    );
                    None
                }
            }
        };
        Ok(TouchSet {
            like: [pair(0), pair(2)],
            dislike: [pair(4), pair(6)],
        })
    }

    pub fn get(&self, sentiment: Sentiment, slot: Slot) -> Option<Coord> {
        match sentiment {
            Sentiment::Like => self.like[slot.index()],
            Sentiment::Dislike => self.dislike[slot.index()],
        }
    }

    /// The present touches, slot by slot: like then dislike for each slot.
    pub fn present(&self) -> impl Iterator<Item = (Sentiment, Slot, Coord)> + '_ {
        Slot::ALL.into_iter().flat_map(move |slot| {
            [Sentiment::Like, Sentiment::Dislike]
                .into_iter()
                .filter_map(move |s| self.get(s, slot).map(|c| (s, slot, c)))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}
