pub use crate::config::*;
use crate::regions::RegionIndex;

use log::{debug, warn};
use std::collections::{HashMap, HashSet};

/// A builder for assembling the regions and the respondents of a survey from
/// tabular rows.
///
/// Region rows are grouped by name, in the order in which each name first
/// appears. Points keep their row order.
///
/// ```
/// pub use area_tally::builder::Builder;
/// # use area_tally::TallyErrors;
///
/// let mut builder = Builder::new();
/// for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
///     builder.add_region_point("R1", x, y);
/// }
/// builder.add_respondent_row(None, &[Some(0.5), Some(0.5), None, None, None, None, None, None])?;
///
/// let (regions, respondents) = builder.build()?;
/// assert_eq!(regions.len(), 1);
/// assert_eq!(respondents[0].id, "0");
///
/// # Ok::<(), TallyErrors>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub(crate) _regions: Vec<RegionDef>,
    pub(crate) _respondents: Vec<Respondent>,
    // Position of each region in _regions.
    pub(crate) _region_positions: HashMap<String, usize>,
    pub(crate) _seen_ids: HashSet<String>,
    pub(crate) _duplicate_rows: usize,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Adds one boundary point to the region with the given name.
    pub fn add_region_point(&mut self, name: &str, x: f64, y: f64) {
        if let Some(&pos) = self._region_positions.get(name) {
            self._regions[pos].boundary.push((x, y));
        } else {
            self._region_positions
                .insert(name.to_string(), self._regions.len());
            self._regions.push(RegionDef {
                name: name.to_string(),
                boundary: vec![(x, y)],
            });
        }
    }

    /// Adds a respondent from the raw components of its touches.
    ///
    /// id: the identifier of the respondent. If not provided, the position of
    /// the row (starting at 0) is used instead.
    pub fn add_respondent_row(
        &mut self,
        id: Option<String>,
        components: &[Option<f64>; 8],
    ) -> Result<(), TallyErrors> {
        let row_idx = self._respondents.len();
        let touches = TouchSet::from_components(components).map_err(|e| match e {
            TallyErrors::MalformedInput { message } => TallyErrors::MalformedInput {
                message: format!("respondent row {}: {}", row_idx, message),
            },
            e => e,
        })?;
        let id = id.unwrap_or_else(|| row_idx.to_string());
        if touches.is_empty() {
            debug!("add_respondent_row: respondent {:?} made no touch", id);
        }
        self.add_respondent(Respondent { id, touches });
        Ok(())
    }

    pub fn add_respondent(&mut self, respondent: Respondent) {
        if !self._seen_ids.insert(respondent.id.clone()) {
            self._duplicate_rows += 1;
            warn!(
                "add_respondent: respondent id {:?} appears more than once, its touches will be tallied together",
                respondent.id
            );
        }
        self._respondents.push(respondent);
    }

    /// Validates the regions and returns the inputs of a survey run.
    pub fn build(self) -> Result<(RegionIndex, Vec<Respondent>), TallyErrors> {
        if self._duplicate_rows > 0 {
            warn!(
                "build: {} respondent rows reuse an id already seen",
                self._duplicate_rows
            );
        }
        let index = RegionIndex::new(self._regions)?;
        Ok((index, self._respondents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_region_rows_by_first_appearance() {
        let mut b = Builder::new();
        b.add_region_point("b", 0.0, 0.0);
        b.add_region_point("a", 5.0, 5.0);
        b.add_region_point("b", 1.0, 0.0);
        b.add_region_point("a", 6.0, 5.0);
        b.add_region_point("b", 1.0, 1.0);
        b.add_region_point("a", 6.0, 6.0);
        let (index, respondents) = b.build().unwrap();
        assert_eq!(index.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(respondents.is_empty());
        assert_eq!(index.classify(&Coord::new(0.9, 0.1)), Some("b"));
        assert_eq!(index.classify(&Coord::new(5.9, 5.1)), Some("a"));
    }

    #[test]
    fn default_ids_are_row_positions() {
        let mut b = Builder::new();
        b.add_respondent_row(Some("abc".to_string()), &[None; 8])
            .unwrap();
        b.add_respondent_row(None, &[None; 8]).unwrap();
        let (_, respondents) = b.build().unwrap();
        let ids: Vec<&str> = respondents.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["abc", "1"]);
    }

    #[test]
    fn duplicate_ids_are_detected() {
        let mut b = Builder::new();
        for id in ["a", "b", "a", "c", "b", "a"] {
            b.add_respondent_row(Some(id.to_string()), &[None; 8])
                .unwrap();
        }
        assert_eq!(b._duplicate_rows, 3);
        assert_eq!(b._seen_ids.len(), 3);
        let (_, respondents) = b.build().unwrap();
        assert_eq!(respondents.len(), 6);
    }

    #[test]
    fn many_rows() {
        let mut b = Builder::new();
        for i in 0..50_000 {
            b.add_respondent_row(None, &[Some(1.0), Some(2.0), None, None, None, None, None, None])
                .unwrap();
            b.add_region_point(&format!("r{}", i % 100), i as f64, 0.0);
        }
        assert_eq!(b._duplicate_rows, 0);
        assert_eq!(b._regions.len(), 100);
        assert_eq!(b._regions[7].boundary.len(), 500);
        assert_eq!(b._respondents[49_999].id, "49999");
    }

    #[test]
    fn degenerate_region_fails_build() {
        let mut b = Builder::new();
        b.add_region_point("R1", 0.0, 0.0);
        b.add_region_point("R1", 1.0, 0.0);
        assert!(matches!(
            b.build(),
            Err(TallyErrors::DegenerateRegion { .. })
        ));
    }

    #[test]
    fn malformed_row_names_the_row() {
        let mut b = Builder::new();
        b.add_respondent_row(None, &[None; 8]).unwrap();
        let mut comps = [None; 8];
        comps[0] = Some(f64::NEG_INFINITY);
        match b.add_respondent_row(None, &comps) {
            Err(TallyErrors::MalformedInput { message }) => {
                assert!(message.starts_with("respondent row 1:"), "{}", message)
            }
            x => panic!("unexpected result {:?}", x),
        }
    }
}
