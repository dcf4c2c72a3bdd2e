//! Stateful signal tracker.
//!
//! Replays a symbol's bars left to right, carrying a [`TrackerState`] through
//! a fold. Each bar is one [`TrackerState::step`]:
//!
//! 1. BUY when %K and %D are both below 20 and at least one of them was at or
//!    above 20 on the previous bar. Opens (or replaces) the position.
//! 2. Otherwise SELL when both are above 80 and at least one was at or below
//!    80 on the previous bar. Closes any open position.
//! 3. With a position open, record the 3% target and force a SELL on the 5%
//!    target.
//!
//! Transitions are skipped on bars where %K or %D is undefined; targets are
//! still checked.

use crate::domain::indicator::{OscillatorPoint, OscillatorSeries};
use crate::domain::position::{Position, TargetOutcome};
use crate::domain::price::PricePoint;
use crate::domain::signal::{EventKind, EventReason, Signal, SignalEvent, SignalRecord};

pub const OVERSOLD: f64 = 20.0;
pub const OVERBOUGHT: f64 = 80.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerState {
    pub last_signal: Signal,
    pub position: Option<Position>,
    pub events: Vec<SignalEvent>,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            last_signal: Signal::Hold,
            position: None,
            events: Vec::new(),
        }
    }
}

impl TrackerState {
    pub fn is_flat(&self) -> bool {
        self.position.is_none()
    }

    /// Advance the state machine by one bar.
    pub fn step(mut self, prev: &OscillatorPoint, curr: &OscillatorPoint, bar: &PricePoint) -> Self {
        match detect_crossover(prev, curr) {
            Some(EventKind::Buy) => {
                self.position = Some(Position::open(bar.date, bar.close));
                self.last_signal = Signal::Buy;
                self.push_event(EventKind::Buy, EventReason::Crossover, curr, bar);
            }
            Some(EventKind::Sell) => {
                self.last_signal = Signal::Sell;
                if self.position.take().is_some() {
                    self.push_event(EventKind::Sell, EventReason::Crossover, curr, bar);
                }
            }
            None => {}
        }

        let outcome = self.position.as_mut().map(|p| p.apply_close(bar.close));
        if outcome == Some(TargetOutcome::Exit) {
            self.position = None;
            self.last_signal = Signal::Sell;
            self.push_event(EventKind::Sell, EventReason::TargetReached, curr, bar);
        }

        self
    }

    pub fn record(&self, symbol: &str) -> SignalRecord {
        match &self.position {
            Some(position) => SignalRecord::holding(symbol, position),
            None => SignalRecord::bare(symbol, self.last_signal),
        }
    }

    fn push_event(
        &mut self,
        kind: EventKind,
        reason: EventReason,
        point: &OscillatorPoint,
        bar: &PricePoint,
    ) {
        self.events.push(SignalEvent {
            date: bar.date,
            kind,
            reason,
            k: point.k,
            price: bar.close,
        });
    }
}

/// Oscillator crossover between two consecutive bars.
///
/// An undefined previous value fails its own comparison but does not block
/// the other line from satisfying the clause.
pub fn detect_crossover(prev: &OscillatorPoint, curr: &OscillatorPoint) -> Option<EventKind> {
    let (k, d) = curr.lines()?;

    let was_at_or_above = |v: Option<f64>, level: f64| v.is_some_and(|x| x >= level);
    let was_at_or_below = |v: Option<f64>, level: f64| v.is_some_and(|x| x <= level);

    if k < OVERSOLD
        && d < OVERSOLD
        && (was_at_or_above(prev.k, OVERSOLD) || was_at_or_above(prev.d, OVERSOLD))
    {
        Some(EventKind::Buy)
    } else if k > OVERBOUGHT
        && d > OVERBOUGHT
        && (was_at_or_below(prev.k, OVERBOUGHT) || was_at_or_below(prev.d, OVERBOUGHT))
    {
        Some(EventKind::Sell)
    } else {
        None
    }
}

/// True when the oscillator points line up with the price bars one to one.
pub fn is_aligned(prices: &[PricePoint], oscillator: &[OscillatorPoint]) -> bool {
    prices.len() == oscillator.len()
        && prices
            .iter()
            .zip(oscillator)
            .all(|(bar, point)| bar.date == point.date)
}

/// Fold the whole series. `None` when there is nothing to replay.
pub fn replay(prices: &[PricePoint], oscillator: &[OscillatorPoint]) -> Option<TrackerState> {
    if prices.is_empty() || !is_aligned(prices, oscillator) {
        return None;
    }

    let state = oscillator
        .windows(2)
        .zip(&prices[1..])
        .fold(TrackerState::default(), |state, (pair, bar)| {
            state.step(&pair[0], &pair[1], bar)
        });
    Some(state)
}

pub fn evaluate(symbol: &str, prices: &[PricePoint], oscillator: &OscillatorSeries) -> SignalRecord {
    match replay(prices, &oscillator.points) {
        Some(state) => state.record(symbol),
        None => SignalRecord::no_data(symbol),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::OscillatorParams;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn date(i: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64)
    }

    fn point(i: usize, k: Option<f64>, d: Option<f64>) -> OscillatorPoint {
        OscillatorPoint { date: date(i), k, d }
    }

    fn bar(i: usize, close: f64) -> PricePoint {
        PricePoint::new(date(i), close + 1.0, close - 1.0, close)
    }

    /// Build aligned prices/oscillator from (close, k, d) rows.
    fn series(rows: &[(f64, Option<f64>, Option<f64>)]) -> (Vec<PricePoint>, OscillatorSeries) {
        let prices = rows
            .iter()
            .enumerate()
            .map(|(i, &(close, _, _))| bar(i, close))
            .collect();
        let points = rows
            .iter()
            .enumerate()
            .map(|(i, &(_, k, d))| point(i, k, d))
            .collect();
        (
            prices,
            OscillatorSeries {
                params: OscillatorParams::default(),
                points,
            },
        )
    }

    mod crossover {
        use super::*;

        #[test]
        fn buy_when_both_drop_below_oversold() {
            let prev = point(0, Some(25.0), Some(25.0));
            let curr = point(1, Some(15.0), Some(18.0));
            assert_eq!(detect_crossover(&prev, &curr), Some(EventKind::Buy));
        }

        #[test]
        fn buy_when_only_one_line_was_above() {
            let prev = point(0, Some(19.0), Some(20.0));
            let curr = point(1, Some(10.0), Some(15.0));
            assert_eq!(detect_crossover(&prev, &curr), Some(EventKind::Buy));
        }

        #[test]
        fn no_buy_when_already_oversold() {
            let prev = point(0, Some(19.0), Some(19.5));
            let curr = point(1, Some(10.0), Some(15.0));
            assert_eq!(detect_crossover(&prev, &curr), None);
        }

        #[test]
        fn no_buy_when_one_line_still_above() {
            let prev = point(0, Some(30.0), Some(30.0));
            let curr = point(1, Some(10.0), Some(20.0));
            assert_eq!(detect_crossover(&prev, &curr), None);
        }

        #[test]
        fn sell_when_both_rise_above_overbought() {
            let prev = point(0, Some(75.0), Some(80.0));
            let curr = point(1, Some(90.0), Some(85.0));
            assert_eq!(detect_crossover(&prev, &curr), Some(EventKind::Sell));
        }

        #[test]
        fn no_sell_when_already_overbought() {
            let prev = point(0, Some(81.0), Some(82.0));
            let curr = point(1, Some(90.0), Some(85.0));
            assert_eq!(detect_crossover(&prev, &curr), None);
        }

        #[test]
        fn exactly_at_threshold_is_not_beyond() {
            let prev = point(0, Some(50.0), Some(50.0));
            assert_eq!(detect_crossover(&prev, &point(1, Some(20.0), Some(10.0))), None);
            assert_eq!(detect_crossover(&prev, &point(1, Some(80.0), Some(90.0))), None);
        }

        #[test]
        fn undefined_current_skips_detection() {
            let prev = point(0, Some(50.0), Some(50.0));
            assert_eq!(detect_crossover(&prev, &point(1, Some(5.0), None)), None);
            assert_eq!(detect_crossover(&prev, &point(1, None, Some(5.0))), None);
        }

        #[test]
        fn undefined_previous_line_fails_only_its_clause() {
            let curr = point(1, Some(10.0), Some(15.0));
            assert_eq!(
                detect_crossover(&point(0, Some(25.0), None), &curr),
                Some(EventKind::Buy)
            );
            assert_eq!(detect_crossover(&point(0, None, None), &curr), None);
        }
    }

    mod step {
        use super::*;

        #[test]
        fn buy_opens_position_at_close() {
            let state = TrackerState::default().step(
                &point(0, Some(25.0), Some(25.0)),
                &point(1, Some(15.0), Some(18.0)),
                &bar(1, 50.0),
            );

            assert_eq!(state.last_signal, Signal::Buy);
            let pos = state.position.as_ref().unwrap();
            assert_relative_eq!(pos.entry_price, 50.0);
            assert_relative_eq!(pos.target3, 51.5);
            assert_relative_eq!(pos.target5, 52.5);
            assert_eq!(state.events.len(), 1);
            assert_eq!(state.events[0].kind, EventKind::Buy);
            assert_eq!(state.events[0].k, Some(15.0));
        }

        #[test]
        fn buy_while_holding_replaces_position() {
            let mut state = TrackerState::default();
            state.position = Some(Position::open(date(0), 100.0));
            state.last_signal = Signal::Buy;

            let state = state.step(
                &point(0, Some(25.0), Some(25.0)),
                &point(1, Some(15.0), Some(18.0)),
                &bar(1, 90.0),
            );

            let pos = state.position.as_ref().unwrap();
            assert_relative_eq!(pos.entry_price, 90.0);
            assert_eq!(pos.entry_date, date(1));
            assert!(pos.hit3.is_none());
        }

        #[test]
        fn crossover_sell_closes_position() {
            let mut state = TrackerState::default();
            state.position = Some(Position::open(date(0), 100.0));
            state.last_signal = Signal::Buy;

            let state = state.step(
                &point(0, Some(70.0), Some(75.0)),
                &point(1, Some(90.0), Some(85.0)),
                &bar(1, 101.0),
            );

            assert!(state.is_flat());
            assert_eq!(state.last_signal, Signal::Sell);
            assert_eq!(state.events.len(), 1);
            assert_eq!(state.events[0].reason, EventReason::Crossover);
        }

        #[test]
        fn crossover_sell_while_flat_sets_signal_without_event() {
            let state = TrackerState::default().step(
                &point(0, Some(70.0), Some(75.0)),
                &point(1, Some(90.0), Some(85.0)),
                &bar(1, 101.0),
            );

            assert!(state.is_flat());
            assert_eq!(state.last_signal, Signal::Sell);
            assert!(state.events.is_empty());
        }

        #[test]
        fn crossover_sell_takes_precedence_over_targets() {
            let mut state = TrackerState::default();
            state.position = Some(Position::open(date(0), 100.0));

            let state = state.step(
                &point(0, Some(70.0), Some(75.0)),
                &point(1, Some(90.0), Some(85.0)),
                &bar(1, 120.0),
            );

            assert_eq!(state.events.len(), 1);
            assert_eq!(state.events[0].reason, EventReason::Crossover);
        }

        #[test]
        fn target3_recorded_on_undefined_bar() {
            let mut state = TrackerState::default();
            state.position = Some(Position::open(date(0), 100.0));
            state.last_signal = Signal::Buy;

            let state = state.step(&point(0, None, None), &point(1, None, None), &bar(1, 104.0));

            let pos = state.position.as_ref().unwrap();
            assert_eq!(pos.hit3, Some(pos.target3));
            assert_eq!(state.last_signal, Signal::Buy);
        }

        #[test]
        fn target5_forces_sell() {
            let mut state = TrackerState::default();
            state.position = Some(Position::open(date(0), 100.0));
            state.last_signal = Signal::Buy;

            let state = state.step(
                &point(0, Some(50.0), Some(50.0)),
                &point(1, Some(60.0), Some(55.0)),
                &bar(1, 105.5),
            );

            assert!(state.is_flat());
            assert_eq!(state.last_signal, Signal::Sell);
            assert_eq!(state.events.len(), 1);
            assert_eq!(state.events[0].kind, EventKind::Sell);
            assert_eq!(state.events[0].reason, EventReason::TargetReached);
            assert_relative_eq!(state.events[0].price, 105.5);
        }

        #[test]
        fn quiet_bar_changes_nothing() {
            let before = TrackerState::default();
            let after = before.clone().step(
                &point(0, Some(50.0), Some(50.0)),
                &point(1, Some(55.0), Some(52.0)),
                &bar(1, 10.0),
            );
            assert_eq!(before, after);
        }
    }

    mod evaluate {
        use super::*;

        #[test]
        fn empty_series_is_no_data() {
            let (prices, osc) = series(&[]);
            let rec = evaluate("TCS", &prices, &osc);
            assert_eq!(rec, SignalRecord::no_data("TCS"));
        }

        #[test]
        fn misaligned_oscillator_is_no_data() {
            let (prices, mut osc) = series(&[(10.0, None, None), (11.0, None, None)]);
            osc.points.pop();
            assert_eq!(evaluate("TCS", &prices, &osc).signal, Signal::NoData);

            let (prices, mut osc) = series(&[(10.0, None, None), (11.0, None, None)]);
            osc.points[1].date = date(5);
            assert_eq!(evaluate("TCS", &prices, &osc).signal, Signal::NoData);
        }

        #[test]
        fn nothing_fires_is_hold() {
            let (prices, osc) = series(&[
                (10.0, None, None),
                (11.0, Some(50.0), None),
                (12.0, Some(55.0), Some(52.0)),
            ]);
            let rec = evaluate("TCS", &prices, &osc);
            assert_eq!(rec, SignalRecord::bare("TCS", Signal::Hold));
        }

        #[test]
        fn single_bar_is_hold() {
            let (prices, osc) = series(&[(10.0, Some(5.0), Some(5.0))]);
            assert_eq!(evaluate("TCS", &prices, &osc).signal, Signal::Hold);
        }

        #[test]
        fn crossover_on_first_bar_is_not_detected() {
            // Index 0 has no previous bar.
            let (prices, osc) = series(&[(10.0, Some(5.0), Some(5.0)), (10.0, Some(5.0), Some(5.0))]);
            assert_eq!(evaluate("TCS", &prices, &osc).signal, Signal::Hold);
        }

        #[test]
        fn open_position_reported_with_targets() {
            let (prices, osc) = series(&[
                (100.0, Some(25.0), Some(25.0)),
                (100.0, Some(15.0), Some(18.0)),
                (103.5, Some(40.0), Some(30.0)),
            ]);
            let rec = evaluate("INFY", &prices, &osc);

            assert_eq!(rec.signal, Signal::Buy);
            assert_eq!(rec.entry_price, Some(100.0));
            assert_relative_eq!(rec.target3.unwrap(), 103.0);
            assert_relative_eq!(rec.target5.unwrap(), 105.0);
            assert_eq!(rec.hit3, rec.target3);
            assert!(rec.hit5.is_none());
        }

        #[test]
        fn target5_exit_reports_sell_without_fields() {
            let (prices, osc) = series(&[
                (100.0, Some(25.0), Some(25.0)),
                (100.0, Some(15.0), Some(18.0)),
                (106.0, Some(60.0), Some(30.0)),
                (104.0, Some(50.0), Some(40.0)),
            ]);
            let rec = evaluate("INFY", &prices, &osc);
            assert_eq!(rec, SignalRecord::bare("INFY", Signal::Sell));
        }

        #[test]
        fn sell_then_flat_reports_sell() {
            let (prices, osc) = series(&[
                (100.0, Some(25.0), Some(25.0)),
                (100.0, Some(15.0), Some(18.0)),
                (101.0, Some(70.0), Some(60.0)),
                (102.0, Some(90.0), Some(85.0)),
                (101.0, Some(60.0), Some(70.0)),
            ]);
            let rec = evaluate("INFY", &prices, &osc);
            assert_eq!(rec, SignalRecord::bare("INFY", Signal::Sell));
        }

        #[test]
        fn events_follow_replay_order() {
            let (prices, osc) = series(&[
                (100.0, Some(25.0), Some(25.0)),
                (100.0, Some(15.0), Some(18.0)),
                (101.0, Some(70.0), Some(60.0)),
                (102.0, Some(90.0), Some(85.0)),
                (101.0, Some(30.0), Some(40.0)),
                (95.0, Some(10.0), Some(12.0)),
            ]);
            let state = replay(&prices, &osc.points).unwrap();
            let kinds: Vec<_> = state.events.iter().map(|e| (e.kind, e.date)).collect();
            assert_eq!(
                kinds,
                vec![
                    (EventKind::Buy, date(1)),
                    (EventKind::Sell, date(3)),
                    (EventKind::Buy, date(5)),
                ]
            );
            assert_eq!(state.record("X").signal, Signal::Buy);
        }

        #[test]
        fn replay_is_idempotent() {
            let (prices, osc) = series(&[
                (100.0, Some(25.0), Some(25.0)),
                (100.0, Some(15.0), Some(18.0)),
                (103.5, Some(40.0), Some(30.0)),
            ]);
            assert_eq!(evaluate("A", &prices, &osc), evaluate("A", &prices, &osc));
        }
    }
}
