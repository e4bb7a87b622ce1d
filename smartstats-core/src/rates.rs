use smartstats_types::{BattingLine, PlayerGameStats, RateStats, SeasonPlayerStats};

/// Single home of the AVG/OBP/SLG formulas. Every call site that needs rates goes
/// through here so per-game edits and season totals can never disagree.
pub struct RateCalculator;

impl RateCalculator {
    /// Compute rates from counting stats.
    ///
    /// OBP is `(H + BB) / (AB + BB)`. HBP and SF are not tracked and are left out
    /// of both sides. Season rankings depend on this exact definition.
    pub fn compute(line: &BattingLine) -> RateStats {
        RateStats {
            avg: Self::ratio(line.h, line.ab),
            obp: Self::ratio(line.h + line.bb, line.ab + line.bb),
            slg: Self::ratio(Self::total_bases(line), line.ab),
        }
    }

    pub fn total_bases(line: &BattingLine) -> i32 {
        let singles = line.h - line.doubles - line.triples - line.hr;
        singles + 2 * line.doubles + 3 * line.triples + 4 * line.hr
    }

    /// Refresh a single game line after its counts changed
    pub fn recalculate(stats: &mut PlayerGameStats) {
        stats.rates = Self::compute(&stats.line);
    }

    pub fn recalculate_all(stats: &mut [PlayerGameStats]) {
        for player in stats.iter_mut() {
            Self::recalculate(player);
        }
    }

    pub fn recalculate_season(stats: &mut SeasonPlayerStats) {
        stats.rates = Self::compute(&stats.line);
    }

    /// `numerator / denominator` rounded to three decimals, or 0 when the
    /// denominator is not positive.
    ///
    /// Rounds the f64 quotient the way `Number.prototype.toFixed(3)` does: the
    /// nearest thousandth to the exact binary value, exact ties going up. So
    /// 7/80 (stored as 0.08749999...) gives 0.087 while 1/16 gives 0.063.
    pub fn ratio(numerator: i32, denominator: i32) -> f64 {
        if denominator <= 0 {
            return 0.0;
        }
        let quotient = f64::from(numerator) / f64::from(denominator);
        let value = Self::nearest_thousandths(quotient.abs()) as f64 / 1000.0;
        if quotient < 0.0 {
            -value
        } else {
            value
        }
    }

    /// Round a finite non-negative f64 to whole thousandths using its exact
    /// `mantissa * 2^exponent` value.
    fn nearest_thousandths(x: f64) -> u64 {
        let bits = x.to_bits();
        let biased = ((bits >> 52) & 0x7ff) as i32;
        let fraction = bits & ((1u64 << 52) - 1);
        let (mantissa, exponent) = if biased == 0 {
            (fraction, -1074)
        } else {
            (fraction | (1u64 << 52), biased - 1075)
        };

        if exponent >= 0 {
            // Already an integer
            return (x * 1000.0) as u64;
        }
        let shift = exponent.unsigned_abs();
        if shift >= 127 {
            return 0;
        }

        let scaled = u128::from(mantissa) * 1000;
        let whole = scaled >> shift;
        let remainder = scaled - (whole << shift);
        let half = 1u128 << (shift - 1);
        (whole + u128::from(remainder >= half)) as u64
    }
}
