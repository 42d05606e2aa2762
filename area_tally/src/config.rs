// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A point on the reference image, in image coordinates.
///
/// Coordinates are always finite once they are part of a `Coord`.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Coord {
        Coord { x, y }
    }
}

/// The two sentiments a respondent can express with a touch.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Sentiment {
    Like,
    Dislike,
}

/// The ordinal position of a touch among the touches of the same sentiment.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::First, Slot::Second];

    /// The index of this slot in a two-element array.
    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    /// The number used for this slot in column names (1 or 2).
    pub fn number(self) -> u32 {
        self.index() as u32 + 1
    }
}

/// The touches recorded for one respondent.
///
/// Each slot is either a full coordinate or absent. There is no such thing as
/// a partially filled slot: see `TouchSet::from_components`.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct TouchSet {
    pub like: [Option<Coord>; 2],
    pub dislike: [Option<Coord>; 2],
}

#[derive(PartialEq, Debug, Clone)]
pub struct Respondent {
    pub id: String,
    pub touches: TouchSet,
}

/// A region as it is described in the input, before validation.
#[derive(PartialEq, Debug, Clone)]
pub struct RegionDef {
    pub name: String,
    pub boundary: Vec<(f64, f64)>,
}

// ******** Output data structures *********

/// A touch of a respondent, resolved to the region that contains it (if any).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ClassifiedTouch {
    pub respondent_id: String,
    pub sentiment: Sentiment,
    pub slot: Slot,
    pub region: Option<String>,
}

/// The number of like and dislike touches of one respondent in one region.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RespondentAreaCount {
    pub respondent_id: String,
    pub region: String,
    pub like: u64,
    pub dislike: u64,
}

/// The accumulated counts of a region, after a conflict rule was applied.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RegionTally {
    pub region: String,
    pub like: u64,
    pub dislike: u64,
}

/// Statistics for one area.
///
/// `none` is signed: under the pass-through rule a respondent may count both
/// as like and dislike in the same area, which pushes it below zero. It is
/// reported as is.
#[derive(PartialEq, Debug, Clone)]
pub struct AreaSummary {
    pub area: String,
    pub like: u64,
    pub dislike: u64,
    pub none: i64,
    pub total: u64,
    pub like_ratio: f64,
    pub dislike_ratio: f64,
    pub none_ratio: f64,
}

/// The change of the counts of an area when the cancellation rule is applied.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AreaDiff {
    pub area: String,
    pub like_diff: i64,
    pub dislike_diff: i64,
}

/// The coordinates kept for one respondent, slot by slot.
#[derive(PartialEq, Debug, Clone)]
pub struct CoordinateRow {
    pub respondent_id: String,
    pub like: [Option<Coord>; 2],
    pub dislike: [Option<Coord>; 2],
}

#[derive(PartialEq, Debug, Clone)]
pub struct SurveyResult {
    pub total: u64,
    /// Summary without the cancellation rule.
    pub before: Vec<AreaSummary>,
    /// Summary with the cancellation rule.
    pub after: Vec<AreaSummary>,
    pub diff: Vec<AreaDiff>,
    /// The coordinates that survive the cancellation, one row per respondent.
    pub filtered: Vec<CoordinateRow>,
    /// All the recorded coordinates, one row per respondent.
    pub all_touches: Vec<CoordinateRow>,
}

/// Errors that prevent the inputs from being built.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyErrors {
    MalformedInput { message: String },
    DegenerateRegion { name: String, points: usize },
    DuplicateRegion { name: String },
}

impl Error for TallyErrors {}

impl Display for TallyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyErrors::MalformedInput { message } => write!(f, "Malformed input: {}", message),
            TallyErrors::DegenerateRegion { name, points } => write!(
                f,
                "Region {:?} has {} boundary points, at least 3 are required",
                name, points
            ),
            TallyErrors::DuplicateRegion { name } => {
                write!(f, "Region {:?} is defined more than once", name)
            }
        }
    }
}

// ********* Configuration **********

/// What to do when a respondent touched the same area with both sentiments.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ConflictRule {
    /// The like and dislike touches of this respondent in this area are all
    /// dropped. There is no netting: 2 likes and 1 dislike count for nothing.
    CancelConflicts,
    /// All the touches are counted, regardless of conflicts.
    PassThrough,
}

impl ConflictRule {
    pub fn from_apply_rule(apply_rule: bool) -> ConflictRule {
        if apply_rule {
            ConflictRule::CancelConflicts
        } else {
            ConflictRule::PassThrough
        }
    }
}
