//! Stylized relative estrogen/progesterone levels for charting.
//!
//! This is decorative data visualization, not physiology: the curves
//! are piecewise linear ramps and sinusoids with bounded random jitter,
//! tuned to look plausible on a chart. The output must never be used as
//! a diagnostic signal or shown as a clinical measurement.

use std::f64::consts::PI;

use rand::Rng;

use crate::models::{HormoneLevels, LUTEAL_PHASE_DAYS};

/// Estimate relative hormone levels for a 1-indexed cycle day.
///
/// The random source is injected so tests (and snapshot-stable charts)
/// can supply a deterministic generator; production callers typically
/// pass [`rand::thread_rng`]. Because of the jitter this is not a pure
/// function of its arguments. Both outputs are clamped to a 0.1 floor
/// and rounded to 2 decimals.
pub fn hormone_levels<R: Rng + ?Sized>(
    cycle_day: u32,
    cycle_length: u32,
    rng: &mut R,
) -> HormoneLevels {
    let day = f64::from(cycle_day);
    let length = f64::from(cycle_length);
    let ovulation_day = length - LUTEAL_PHASE_DAYS as f64;

    let estrogen;
    let progesterone;

    if day <= 5.0 {
        // Menstrual: both hormones near baseline.
        estrogen = 1.0 + rng.gen::<f64>() * 0.3;
        progesterone = 0.3 + rng.gen::<f64>() * 0.2;
    } else if day < ovulation_day - 2.0 {
        // Follicular: estrogen ramps gradually, then sharply.
        let progress = (day - 5.0) / (ovulation_day - 7.0);
        estrogen = 1.0 + progress * 6.0 + (progress * PI).sin() * 2.0;
        progesterone = 0.3 + rng.gen::<f64>() * 0.4;
    } else if day <= ovulation_day + 1.0 {
        // Ovulation: estrogen peaks then drops, progesterone turns up.
        let progress = (day - (ovulation_day - 2.0)) / 3.0;
        estrogen = 8.5 - progress * 3.0 + rng.gen::<f64>() * 0.5;
        progesterone = 0.5 + progress * 2.0 + rng.gen::<f64>() * 0.3;
    } else {
        // Luteal: progesterone dominates, estrogen has a secondary
        // mid-phase rise; progesterone falls off absent pregnancy.
        let progress = (day - ovulation_day - 1.0) / (length - ovulation_day - 1.0);
        progesterone = if progress < 0.6 {
            2.5 + progress * 5.0 + rng.gen::<f64>() * 0.5
        } else {
            7.5 - (progress - 0.6) * 12.0 + rng.gen::<f64>() * 0.5
        };
        estrogen = 2.5 + (progress * PI).sin() * 2.0 + rng.gen::<f64>() * 0.5;
    }

    HormoneLevels {
        estrogen: round2(estrogen.max(0.1)),
        progesterone: round2(progesterone.max(0.1)),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    /// A StepRng stuck at zero makes every jitter term 0.0.
    fn no_jitter() -> StepRng {
        StepRng::new(0, 0)
    }

    #[test]
    fn menstrual_baseline_without_jitter() {
        let levels = hormone_levels(3, 28, &mut no_jitter());
        assert_eq!(levels.estrogen, 1.0);
        assert_eq!(levels.progesterone, 0.3);
    }

    #[test]
    fn ovulation_day_without_jitter() {
        // Day 14 of a 28-day cycle: ovulation progress 2/3.
        let levels = hormone_levels(14, 28, &mut no_jitter());
        assert_eq!(levels.estrogen, 6.5);
        assert_eq!(levels.progesterone, 1.83);
    }

    #[test]
    fn outputs_are_floored_and_rounded() {
        let mut rng = rand::thread_rng();
        for day in 1..=28 {
            let levels = hormone_levels(day, 28, &mut rng);
            for value in [levels.estrogen, levels.progesterone] {
                assert!(value >= 0.1, "day {day}: {value} below floor");
                let scaled = value * 100.0;
                assert!(
                    (scaled - scaled.round()).abs() < 1e-9,
                    "day {day}: {value} not rounded to 2 decimals"
                );
            }
        }
    }

    #[test]
    fn jitter_stays_bounded_in_menstrual_phase() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let levels = hormone_levels(1, 28, &mut rng);
            assert!(levels.estrogen >= 1.0 && levels.estrogen <= 1.3);
            assert!(levels.progesterone >= 0.3 && levels.progesterone <= 0.5);
        }
    }
}
