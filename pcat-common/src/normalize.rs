//! Quantity range normalization
//!
//! Within one identity group, ranged price points are rewritten so that their
//! ranges tile the quantities from the lowest minimum upward: sorted by
//! minimum, each upper bound is one below the next minimum, and the highest
//! range is left open.
//!
//! Flat price points (no minimum and no maximum) are never touched. Groups with
//! fewer than two ranged points are returned as they are. An existing maximum
//! below its minimum is overwritten like any other, except on a lone ranged
//! point, which is rejected.

use std::collections::BTreeMap;
use std::iter;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::NormalizeError;
use crate::model::{IdentityKey, PricePoint, QuantityRange, UpperBound};

/// What happens to the upper bound of the highest range in a group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinalBound {
    /// Always open-ended, discarding any finite maximum
    #[default]
    Open,
    /// Keep an existing finite maximum; open-ended only when there is none
    Keep,
}

/// How a container reacts to a group the normalizer refuses to rewrite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Fail the whole document; nothing is written
    #[default]
    FailDocument,
    /// Leave the offending group as it was and carry on
    SkipGroup,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub final_bound: FinalBound,
}

/// Partition price points by identity
pub fn group_by_identity(points: Vec<PricePoint>) -> BTreeMap<IdentityKey, Vec<PricePoint>> {
    let mut groups: BTreeMap<IdentityKey, Vec<PricePoint>> = BTreeMap::new();
    for point in points {
        groups.entry(point.identity().clone()).or_default().push(point);
    }
    groups
}

/// Reject groups the normalizer cannot turn into valid ranges
///
/// Ranged points must not share a minimum quantity. An inverted range is only
/// an error when it is the sole ranged point, since that point is passed
/// through as is.
pub fn check_group(points: &[PricePoint]) -> Result<(), NormalizeError> {
    let mut ranged: Vec<&PricePoint> = points.iter().filter(|p| p.is_ranged()).collect();
    ranged.sort_by_key(|p| effective_min(p));

    for pair in ranged.windows(2) {
        let min = effective_min(pair[0]);
        if min == effective_min(pair[1]) {
            return Err(NormalizeError::DuplicateMinimum {
                identity: pair[1].identity().clone(),
                min_quantity: min,
            });
        }
    }

    if let &[point] = ranged.as_slice() {
        let inverted = point.range().filter(QuantityRange::is_inverted);
        if let Some(QuantityRange { max: Some(max), .. }) = inverted {
            return Err(NormalizeError::InvertedRange {
                identity: point.identity().clone(),
                min: effective_min(point),
                max,
            });
        }
    }
    Ok(())
}

/// Rewrite the upper bounds of one identity group
///
/// Returns the flat points followed by the ranged points in ascending minimum
/// order. The input is returned unchanged when it holds at most one ranged
/// point.
pub fn normalize_group(
    points: Vec<PricePoint>,
    options: &NormalizeOptions,
) -> Result<Vec<PricePoint>, NormalizeError> {
    check_group(&points)?;

    let ranged_count = points.iter().filter(|p| p.is_ranged()).count();
    if ranged_count <= 1 {
        return Ok(points);
    }

    let (flat, mut ranged): (Vec<PricePoint>, Vec<PricePoint>) =
        points.into_iter().partition(|p| !p.is_ranged());
    ranged.sort_by_key(effective_min);

    let successors: Vec<Option<u64>> = ranged
        .iter()
        .skip(1)
        .map(|p| Some(effective_min(p)))
        .chain(iter::once(None))
        .collect();

    let rewritten = ranged.iter().zip(successors).map(|(point, next_min)| {
        let bound = match next_min {
            Some(next) => UpperBound::Inclusive(next - 1),
            None => final_bound(point, options.final_bound),
        };
        point.with_upper_bound(bound)
    });

    Ok(flat.into_iter().chain(rewritten).collect())
}

/// Normalized container contents
#[derive(Debug, Clone, Default)]
pub struct NormalizedPoints {
    /// All points, in their original array order
    pub points: Vec<PricePoint>,
    /// Groups left untouched under [`ConflictPolicy::SkipGroup`]
    pub skipped_groups: Vec<NormalizeError>,
}

/// Normalize every identity group of one container
pub fn normalize_points(
    points: Vec<PricePoint>,
    options: &NormalizeOptions,
    policy: ConflictPolicy,
) -> Result<NormalizedPoints, NormalizeError> {
    let mut result = NormalizedPoints::default();

    for (identity, group) in group_by_identity(points) {
        if let Err(e) = check_group(&group) {
            match policy {
                ConflictPolicy::FailDocument => return Err(e),
                ConflictPolicy::SkipGroup => {
                    warn!("Leaving group {} unchanged: {}", identity, e);
                    result.points.extend(group);
                    result.skipped_groups.push(e);
                    continue;
                }
            }
        }

        debug!("Normalizing group {} ({} points)", identity, group.len());
        result.points.extend(normalize_group(group, options)?);
    }

    result.points.sort_by_key(PricePoint::position);
    Ok(result)
}

fn effective_min(point: &PricePoint) -> u64 {
    point.range().map(|r| r.effective_min()).unwrap_or(1)
}

fn final_bound(point: &PricePoint, policy: FinalBound) -> UpperBound {
    let kept = point.range().filter(|r| !r.is_inverted()).and_then(|r| r.max);
    match (policy, kept) {
        (FinalBound::Keep, Some(max)) => UpperBound::Inclusive(max),
        _ => UpperBound::Open,
    }
}
