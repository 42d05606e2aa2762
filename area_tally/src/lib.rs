mod config;
pub mod builder;
pub mod manual;
pub mod regions;
pub mod touches;

use log::{debug, info, warn};

use std::collections::{HashMap, HashSet};

pub use crate::config::*;
pub use crate::regions::RegionIndex;
pub use crate::touches::COORDINATE_COLUMNS;

/// Resolves every present touch of a respondent to the first region that
/// contains it.
///
/// The touches are classified independently of each other. Touches outside
/// of all the regions are returned with no region.
pub fn classify_touches(respondent: &Respondent, index: &RegionIndex) -> Vec<ClassifiedTouch> {
    respondent
        .touches
        .present()
        .map(|(sentiment, slot, coord)| {
            let region = index.classify(&coord).map(|s| s.to_string());
            debug!(
                "classify_touches: respondent {:?} {:?} {:?} {:?} -> {:?}",
                respondent.id, sentiment, slot, coord, region
            );
            ClassifiedTouch {
                respondent_id: respondent.id.clone(),
                sentiment,
                slot,
                region,
            }
        })
        .collect()
}

/// Counts the like and dislike touches per respondent and per region.
///
/// Unclassified touches are ignored. The result is ordered by first appearance
/// of each (respondent, region) pair. Touches of respondents sharing the same
/// id are counted together.
pub fn count_per_area(classified: &[ClassifiedTouch]) -> Vec<RespondentAreaCount> {
    let mut positions: HashMap<(&str, &str), usize> = HashMap::new();
    let mut res: Vec<RespondentAreaCount> = Vec::new();
    for ct in classified.iter() {
        let region = match ct.region.as_deref() {
            Some(r) => r,
            None => continue,
        };
        let pos = *positions
            .entry((ct.respondent_id.as_str(), region))
            .or_insert_with(|| {
                res.push(RespondentAreaCount {
                    respondent_id: ct.respondent_id.clone(),
                    region: region.to_string(),
                    like: 0,
                    dislike: 0,
                });
                res.len() - 1
            });
        match ct.sentiment {
            Sentiment::Like => res[pos].like += 1,
            Sentiment::Dislike => res[pos].dislike += 1,
        }
    }
    res
}

/// Accumulates the per-respondent counts into region totals.
///
/// One tally is returned for each region of the index, in index order, even
/// for the regions that received no touch.
pub fn resolve(
    counts: &[RespondentAreaCount],
    index: &RegionIndex,
    rule: ConflictRule,
) -> Vec<RegionTally> {
    let mut tallies: Vec<RegionTally> = index
        .names()
        .map(|name| RegionTally {
            region: name.to_string(),
            like: 0,
            dislike: 0,
        })
        .collect();
    let positions: HashMap<String, usize> = tallies
        .iter()
        .enumerate()
        .map(|(idx, t)| (t.region.clone(), idx))
        .collect();

    for c in counts.iter() {
        let tally = match positions.get(&c.region) {
            Some(idx) => &mut tallies[*idx],
            None => {
                warn!(
                    "resolve: respondent {:?}: skipping unknown region {:?}",
                    c.respondent_id, c.region
                );
                continue;
            }
        };
        match rule {
            ConflictRule::CancelConflicts => {
                if c.like > 0 && c.dislike > 0 {
                    debug!(
                        "resolve: respondent {:?}: cancelling {} like(s) and {} dislike(s) in {:?}",
                        c.respondent_id, c.like, c.dislike, c.region
                    );
                } else if c.like > 0 {
                    tally.like += c.like;
                } else if c.dislike > 0 {
                    tally.dislike += c.dislike;
                }
            }
            ConflictRule::PassThrough => {
                tally.like += c.like;
                tally.dislike += c.dislike;
            }
        }
    }
    tallies
}

/// Turns region tallies into summary statistics over `total` respondents.
///
/// The ratios are all 0 when there is no respondent.
pub fn summarize(tallies: &[RegionTally], total: u64) -> Vec<AreaSummary> {
    let ratio = |n: f64| if total == 0 { 0.0 } else { n / (total as f64) };
    tallies
        .iter()
        .map(|t| {
            let none = total as i64 - t.like as i64 - t.dislike as i64;
            if none < 0 {
                warn!(
                    "summarize: area {:?}: like ({}) + dislike ({}) exceed the {} respondents",
                    t.region, t.like, t.dislike, total
                );
            }
            AreaSummary {
                area: t.region.clone(),
                like: t.like,
                dislike: t.dislike,
                none,
                total,
                like_ratio: ratio(t.like as f64),
                dislike_ratio: ratio(t.dislike as f64),
                none_ratio: ratio(none as f64),
            }
        })
        .collect()
}

/// The difference (after minus before) of the like and dislike counts.
///
/// Both summaries must come from the same region index: areas are matched by
/// position.
pub fn compare(before: &[AreaSummary], after: &[AreaSummary]) -> Vec<AreaDiff> {
    before
        .iter()
        .zip(after.iter())
        .map(|(b, a)| {
            debug_assert_eq!(b.area, a.area);
            AreaDiff {
                area: a.area.clone(),
                like_diff: a.like as i64 - b.like as i64,
                dislike_diff: a.dislike as i64 - b.dislike as i64,
            }
        })
        .collect()
}

/// The coordinates of a respondent that survive the cancellation rule.
///
/// A touch is kept only if it is inside a region, and if this region did not
/// receive touches of both sentiments from this respondent. In a conflicting
/// region, all the touches are dropped, whatever their number.
pub fn filter_coordinates(respondent: &Respondent, index: &RegionIndex) -> CoordinateRow {
    filter_classified(respondent, &classify_touches(respondent, index))
}

fn filter_classified(respondent: &Respondent, classified: &[ClassifiedTouch]) -> CoordinateRow {
    let like_regions = regions_of(classified, Sentiment::Like);
    let dislike_regions = regions_of(classified, Sentiment::Dislike);
    let cancelled: HashSet<&str> = like_regions
        .intersection(&dislike_regions)
        .cloned()
        .collect();

    let mut row = CoordinateRow {
        respondent_id: respondent.id.clone(),
        like: [None, None],
        dislike: [None, None],
    };
    for ct in classified.iter() {
        let kept = match ct.region.as_deref() {
            Some(region) => !cancelled.contains(region),
            None => false,
        };
        if !kept {
            continue;
        }
        let coord = respondent.touches.get(ct.sentiment, ct.slot);
        match ct.sentiment {
            Sentiment::Like => row.like[ct.slot.index()] = coord,
            Sentiment::Dislike => row.dislike[ct.slot.index()] = coord,
        }
    }
    row
}

fn regions_of(classified: &[ClassifiedTouch], sentiment: Sentiment) -> HashSet<&str> {
    classified
        .iter()
        .filter(|ct| ct.sentiment == sentiment)
        .filter_map(|ct| ct.region.as_deref())
        .collect()
}

/// All the recorded coordinates of a respondent, without classification.
pub fn all_touches(respondent: &Respondent) -> CoordinateRow {
    CoordinateRow {
        respondent_id: respondent.id.clone(),
        like: respondent.touches.like,
        dislike: respondent.touches.dislike,
    }
}

fn check_respondents(respondents: &[Respondent]) -> Result<(), TallyErrors> {
    for r in respondents.iter() {
        if let Some((s, slot, c)) = r
            .touches
            .present()
            .find(|(_, _, c)| !c.x.is_finite() || !c.y.is_finite())
        {
            return Err(TallyErrors::MalformedInput {
                message: format!(
                    "respondent {:?}: {:?} touch {} is not finite: ({}, {})",
                    r.id,
                    s,
                    slot.number(),
                    c.x,
                    c.y
                ),
            });
        }
    }
    Ok(())
}

/// Runs the aggregation with and without the cancellation rule.
///
/// Arguments:
/// * `respondents` the survey answers, one entry per row of the input
/// * `index` the regions of the reference image
pub fn run_survey_stats(
    respondents: &[Respondent],
    index: &RegionIndex,
) -> Result<SurveyResult, TallyErrors> {
    info!(
        "Processing {:?} respondents over {:?} regions",
        respondents.len(),
        index.len()
    );
    check_respondents(respondents)?;

    let classified: Vec<Vec<ClassifiedTouch>> = respondents
        .iter()
        .map(|r| classify_touches(r, index))
        .collect();
    let all_classified: Vec<ClassifiedTouch> = classified.iter().flatten().cloned().collect();
    let unclassified = all_classified.iter().filter(|ct| ct.region.is_none()).count();
    info!(
        "Classified {:?} touches, {:?} outside of all regions",
        all_classified.len(),
        unclassified
    );

    let counts = count_per_area(&all_classified);
    debug!("run_survey_stats: per respondent counts: {:?}", counts);

    let total = respondents.len() as u64;
    let before = summarize(&resolve(&counts, index, ConflictRule::PassThrough), total);
    let after = summarize(&resolve(&counts, index, ConflictRule::CancelConflicts), total);
    for s in after.iter() {
        info!(
            "Area {}: like {} dislike {} none {} (total {})",
            s.area, s.like, s.dislike, s.none, s.total
        );
    }
    let diff = compare(&before, &after);

    let filtered: Vec<CoordinateRow> = respondents
        .iter()
        .zip(classified.iter())
        .map(|(r, cts)| filter_classified(r, cts))
        .collect();
    let unfiltered: Vec<CoordinateRow> = respondents.iter().map(all_touches).collect();

    Ok(SurveyResult {
        total,
        before,
        after,
        diff,
        filtered,
        all_touches: unfiltered,
    })
}
