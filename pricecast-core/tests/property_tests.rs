//! Property tests for numeric invariants.
//!
//! Uses proptest to verify:
//! 1. RSI stays in [0, 100] and is empty iff len <= period
//! 2. Bollinger bands are ordered upper >= middle >= lower
//! 3. EMA and SMA share their first value
//! 4. Ensemble price lies within the per-model price range, bounds envelope every model
//! 5. Model confidences decay to their floors, dates strictly increase
//! 6. Self-validation is perfect

use chrono::NaiveDate;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use pricecast_core::domain::PriceSeries;
use pricecast_core::ensemble::combine;
use pricecast_core::features::FeatureExtractor;
use pricecast_core::indicators::{bollinger_bands, ema, rsi, sma};
use pricecast_core::models::{ForecastModel, MeanReversionModel, TrendDecayModel};
use pricecast_core::validation::{predictions_as_realized, ValidationEngine};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_closes(min: usize, max: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_price(), min..max)
}

fn series(closes: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    PriceSeries::from_closes("PROP", start, closes).unwrap()
}

// ── 1. RSI ───────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_bounded(closes in arb_closes(0, 80), period in 1usize..20) {
        let out = rsi(&closes, period);
        prop_assert_eq!(out.is_empty(), closes.len() <= period);
        if !out.is_empty() {
            prop_assert_eq!(out.len(), closes.len() - period);
        }
        for v in out {
            prop_assert!((0.0..=100.0).contains(&v), "rsi out of range: {}", v);
        }
    }
}

// ── 2. Bollinger ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn bollinger_ordered(closes in arb_closes(1, 80), period in 1usize..25, mult in 0.0..4.0_f64) {
        let bands = bollinger_bands(&closes, period, mult);
        prop_assert_eq!(bands.upper.len(), bands.middle.len());
        prop_assert_eq!(bands.lower.len(), bands.middle.len());
        for i in 0..bands.middle.len() {
            prop_assert!(bands.upper[i] >= bands.middle[i]);
            prop_assert!(bands.middle[i] >= bands.lower[i]);
        }
    }
}

// ── 3. EMA / SMA seed ────────────────────────────────────────────────

proptest! {
    #[test]
    fn ema_sma_first_value_agree(closes in arb_closes(1, 60), period in 1usize..30) {
        let e = ema(&closes, period);
        let s = sma(&closes, period);
        prop_assert_eq!(e.len(), s.len());
        if let (Some(a), Some(b)) = (e.first(), s.first()) {
            prop_assert!((a - b).abs() < 1e-9);
        }
    }
}

// ── 4. Ensemble envelope ─────────────────────────────────────────────

proptest! {
    #[test]
    fn ensemble_within_model_range(
        closes in arb_closes(2, 60),
        horizon in 1usize..30,
        seed in any::<u64>(),
    ) {
        let bundle = FeatureExtractor::default().extract(&series(&closes));
        let mut rng = StdRng::seed_from_u64(seed);
        let a = TrendDecayModel.generate(&bundle, horizon, &mut rng);
        let b = MeanReversionModel.generate(&bundle, horizon, &mut rng);
        let combined = combine(&[a.clone(), b.clone()]);
        prop_assert_eq!(combined.len(), horizon);

        for (day, point) in combined.iter().enumerate() {
            let lo = a[day].predicted.min(b[day].predicted);
            let hi = a[day].predicted.max(b[day].predicted);
            prop_assert!(point.predicted >= lo - 1e-9 && point.predicted <= hi + 1e-9);
            prop_assert!(point.upper_bound >= a[day].upper_bound.max(b[day].upper_bound));
            prop_assert!(point.lower_bound <= a[day].lower_bound.min(b[day].lower_bound));
            prop_assert!((0.0..=1.0).contains(&point.confidence));
        }
    }
}

// ── 5. Model schedules ───────────────────────────────────────────────

proptest! {
    #[test]
    fn models_respect_schedules(
        closes in arb_closes(2, 60),
        horizon in 0usize..40,
        seed in any::<u64>(),
    ) {
        let bundle = FeatureExtractor::default().extract(&series(&closes));
        let last = bundle.last_date.unwrap();
        let models: [(&dyn ForecastModel, f64); 2] =
            [(&TrendDecayModel, 0.6), (&MeanReversionModel, 0.5)];

        for (model, floor) in models {
            let seq = model.generate(&bundle, horizon, &mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(seq.len(), horizon);
            if let Some(first) = seq.first() {
                prop_assert_eq!(first.date, last.succ_opt().unwrap());
            }
            for w in seq.windows(2) {
                prop_assert!(w[0].date < w[1].date);
                prop_assert!(w[1].confidence <= w[0].confidence);
            }
            for p in &seq {
                prop_assert!(p.predicted > 0.0);
                prop_assert!(p.confidence >= floor - 1e-12);
                prop_assert!(p.upper_bound > p.predicted && p.predicted > p.lower_bound);
            }
        }
    }
}

// ── 6. Validation round-trip ─────────────────────────────────────────

proptest! {
    #[test]
    fn self_validation_is_exact(closes in arb_closes(2, 40), horizon in 1usize..20, seed in any::<u64>()) {
        let bundle = FeatureExtractor::default().extract(&series(&closes));
        let forecast = TrendDecayModel.generate(&bundle, horizon, &mut StdRng::seed_from_u64(seed));
        let result = ValidationEngine.validate("PROP", &forecast, &predictions_as_realized(&forecast));
        prop_assert_eq!(result.overall_accuracy, 1.0);
        prop_assert_eq!(result.mape, 0.0);
        prop_assert_eq!(result.rmse, 0.0);
        prop_assert!(result.points.iter().all(|p| p.accuracy == Some(1.0)));
    }
}
