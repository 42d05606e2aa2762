use geo::algorithm::contains::Contains;
use geo::{LineString, Point, Polygon};
use log::debug;

use std::collections::HashSet;

use crate::config::*;

#[derive(Debug, Clone)]
struct Region {
    name: String,
    boundary: Polygon<f64>,
}

/// The named regions of the reference image, in definition order.
///
/// Containment follows `geo`: a point is inside a region only if it lies in
/// the interior of the polygon. Points exactly on an edge or on a vertex are
/// not contained by that region.
///
/// Regions may overlap. A point is attributed to the first region (in
/// definition order) that contains it.
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    regions: Vec<Region>,
}

impl RegionIndex {
    /// Builds the index, checking that every region is well-formed.
    ///
    /// The polygons are closed automatically: the last point does not need to
    /// repeat the first one.
    pub fn new(defs: Vec<RegionDef>) -> Result<RegionIndex, TallyErrors> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut regions: Vec<Region> = Vec::with_capacity(defs.len());
        for def in defs {
            if !seen.insert(def.name.clone()) {
                return Err(TallyErrors::DuplicateRegion { name: def.name });
            }
            // A closing point equal to the first one does not make a polygon less degenerate.
            let mut distinct = def.boundary.len();
            if distinct > 1 && def.boundary.first() == def.boundary.last() {
                distinct -= 1;
            }
            if distinct < 3 {
                return Err(TallyErrors::DegenerateRegion {
                    name: def.name,
                    points: distinct,
                });
            }
            if let Some((x, y)) = def
                .boundary
                .iter()
                .find(|(x, y)| !x.is_finite() || !y.is_finite())
            {
                return Err(TallyErrors::MalformedInput {
                    message: format!(
                        "region {:?} has a non-finite boundary point ({}, {})",
                        def.name, x, y
                    ),
                });
            }
            debug!(
                "RegionIndex::new: region {:?} with {} points",
                def.name, distinct
            );
            regions.push(Region {
                name: def.name,
                boundary: Polygon::new(LineString::from(def.boundary), vec![]),
            });
        }
        Ok(RegionIndex { regions })
    }

    /// The name of the first region containing the point, if any.
    pub fn classify(&self, point: &Coord) -> Option<&str> {
        let p = Point::new(point.x, point.y);
        self.regions
            .iter()
            .find(|r| r.boundary.contains(&p))
            .map(|r| r.name.as_str())
    }

    /// The region names, in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
