//! Ensemble combination of forecast sequences.
//!
//! Per day index, the contributing points are merged as:
//! - price: confidence-weighted mean Σ(p·c) / Σc (plain mean when Σc = 0)
//! - confidence: arithmetic mean
//! - bounds: union envelope (max upper, min lower)
//! - features: union of feature tags
//!
//! Sequences shorter than a day index simply do not contribute to that day.

use std::collections::BTreeSet;

use crate::domain::{ForecastPoint, ForecastSequence, ModelId};

/// Merge `sequences` into one sequence tagged "ensemble".
///
/// An empty input list, or a list of empty sequences, yields an empty
/// sequence; callers decide on a fallback.
pub fn combine(sequences: &[ForecastSequence]) -> ForecastSequence {
    let days = sequences.iter().map(Vec::len).max().unwrap_or(0);

    (0..days)
        .filter_map(|day| {
            let points: Vec<&ForecastPoint> =
                sequences.iter().filter_map(|seq| seq.get(day)).collect();
            combine_day(&points)
        })
        .collect()
}

fn combine_day(points: &[&ForecastPoint]) -> Option<ForecastPoint> {
    let first = points.first()?;
    let count = points.len() as f64;

    let weight: f64 = points.iter().map(|p| p.confidence).sum();
    let predicted = if weight > 0.0 {
        points.iter().map(|p| p.predicted * p.confidence).sum::<f64>() / weight
    } else {
        points.iter().map(|p| p.predicted).sum::<f64>() / count
    };

    let upper_bound = points
        .iter()
        .map(|p| p.upper_bound)
        .fold(f64::NEG_INFINITY, f64::max);
    let lower_bound = points
        .iter()
        .map(|p| p.lower_bound)
        .fold(f64::INFINITY, f64::min);

    let features_used: BTreeSet<String> = points
        .iter()
        .flat_map(|p| p.features_used.iter().cloned())
        .collect();

    Some(ForecastPoint {
        date: first.date,
        predicted,
        confidence: weight / count,
        upper_bound,
        lower_bound,
        model_used: ModelId::new(ModelId::ENSEMBLE),
        features_used,
    })
}
