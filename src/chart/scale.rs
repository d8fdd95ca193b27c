//! Scales
//!
//! Linear and time scales mapping a domain onto a pixel range, plus tick
//! generation. Tick steps follow the usual 1/2/5 x 10^k progression.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Linear mapping from `[d0, d1]` to `[r0, r1]`
///
/// A zero-width domain maps every input to the range start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a domain value to the range
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;

        if span == 0.0 || !span.is_finite() {
            return r0;
        }

        r0 + (value - d0) / span * (r1 - r0)
    }

    /// Roughly `count` evenly spaced, human-friendly values within the domain
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let (start, stop) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
        ticks(start, stop, count)
    }

    /// Format a tick value with precision matching the tick step
    pub fn tick_format(&self, count: usize) -> impl Fn(f64) -> String {
        let (d0, d1) = self.domain;
        let step = tick_step(d0.min(d1), d0.max(d1), count).abs();
        let decimals = if step > 0.0 && step < 1.0 {
            (-step.log10().floor()) as usize
        } else {
            0
        };
        move |value| format_grouped(value, decimals)
    }
}

/// Signed tick increment: positive for steps >= 1, negative inverse otherwise
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

/// Absolute tick step for a domain
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    if stop <= start || count == 0 {
        return 0.0;
    }
    let inc = tick_increment(start, stop, count);
    if inc < 0.0 {
        1.0 / -inc
    } else {
        inc
    }
}

/// Nice ticks between `start` and `stop` (inclusive, ascending)
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let inc = tick_increment(start, stop, count);
    if inc < 0.0 {
        let inv = -inc;
        let mut i1 = (start * inv).round();
        let mut i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        let n = (i2 - i1).max(-1.0) as i64 + 1;
        (0..n).map(|i| (i1 + i as f64) / inv).collect()
    } else {
        let mut i1 = (start / inc).round();
        let mut i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
        let n = (i2 - i1).max(-1.0) as i64 + 1;
        (0..n).map(|i| (i1 + i as f64) * inc).collect()
    }
}

/// Format with thousands separators and a fixed number of decimals
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let raw = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (raw.clone(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && raw.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Calendar interval used for time-axis ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInterval {
    Days(u32),
    Week,
    Months(u32),
    Years(i32),
}

impl TimeInterval {
    /// Approximate length in days, used to pick an interval
    fn approx_days(&self) -> f64 {
        match self {
            TimeInterval::Days(n) => *n as f64,
            TimeInterval::Week => 7.0,
            TimeInterval::Months(n) => 30.0 * *n as f64,
            TimeInterval::Years(n) => 365.0 * *n as f64,
        }
    }

    fn matches(&self, date: NaiveDate) -> bool {
        match self {
            TimeInterval::Days(n) => (date.day() - 1) % n == 0,
            TimeInterval::Week => date.weekday() == Weekday::Sun,
            TimeInterval::Months(n) => date.day() == 1 && date.month0() % n == 0,
            TimeInterval::Years(n) => date.ordinal() == 1 && date.year().rem_euclid(*n) == 0,
        }
    }
}

const TICK_INTERVALS: [TimeInterval; 6] = [
    TimeInterval::Days(1),
    TimeInterval::Days(2),
    TimeInterval::Week,
    TimeInterval::Months(1),
    TimeInterval::Months(3),
    TimeInterval::Years(1),
];

/// Linear mapping from a date span to a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: NaiveDate,
    end: NaiveDate,
    linear: LinearScale,
}

impl TimeScale {
    pub fn new(domain: (NaiveDate, NaiveDate), range: (f64, f64)) -> Self {
        let (start, end) = domain;
        let linear = LinearScale::new((day_number(start), day_number(end)), range);
        Self { start, end, linear }
    }

    pub fn domain(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    pub fn apply(&self, date: NaiveDate) -> f64 {
        self.linear.apply(day_number(date))
    }

    /// Pick a calendar interval giving roughly `count` ticks
    pub fn tick_interval(&self, count: usize) -> TimeInterval {
        let span = (day_number(self.end) - day_number(self.start)).abs();
        let target = span / count.max(1) as f64;

        let i = TICK_INTERVALS
            .iter()
            .position(|iv| iv.approx_days() > target)
            .unwrap_or(TICK_INTERVALS.len());

        if i == TICK_INTERVALS.len() {
            let years = tick_step(
                self.start.year() as f64,
                self.end.year() as f64 + self.end.ordinal() as f64 / 366.0,
                count,
            );
            return TimeInterval::Years((years.round() as i32).max(1));
        }
        if i == 0 {
            return TICK_INTERVALS[0];
        }

        let lower = TICK_INTERVALS[i - 1];
        let upper = TICK_INTERVALS[i];
        if target / lower.approx_days() < upper.approx_days() / target {
            lower
        } else {
            upper
        }
    }

    /// Dates within the domain aligned to the chosen interval
    pub fn ticks(&self, count: usize) -> Vec<NaiveDate> {
        let interval = self.tick_interval(count);
        let (lo, hi) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };

        match interval {
            TimeInterval::Years(n) => {
                let first = if lo.ordinal() == 1 { lo.year() } else { lo.year() + 1 };
                (first..=hi.year())
                    .filter(|y| y.rem_euclid(n) == 0)
                    .filter_map(|y| NaiveDate::from_ymd_opt(y, 1, 1))
                    .collect()
            }
            TimeInterval::Months(_) => {
                let mut out = Vec::new();
                let mut cursor = NaiveDate::from_ymd_opt(lo.year(), lo.month(), 1);
                while let Some(date) = cursor {
                    if date > hi {
                        break;
                    }
                    if date >= lo && interval.matches(date) {
                        out.push(date);
                    }
                    cursor = date.checked_add_months(chrono::Months::new(1));
                }
                out
            }
            TimeInterval::Days(_) | TimeInterval::Week => lo
                .iter_days()
                .take_while(|d| *d <= hi)
                .filter(|d| interval.matches(*d))
                .collect(),
        }
    }
}

/// Multi-scale default date label: year on Jan 1, month name on the 1st,
/// abbreviated month and day otherwise
pub fn format_date_tick(date: NaiveDate) -> String {
    if date.ordinal() == 1 {
        date.format("%Y").to_string()
    } else if date.day() == 1 {
        date.format("%B").to_string()
    } else {
        date.format("%b %d").to_string()
    }
}

/// Pad a date span so it always has a non-zero width
pub fn pad_date_domain(start: NaiveDate, end: NaiveDate, pad_days: i64) -> (NaiveDate, NaiveDate) {
    if start != end {
        return (start, end);
    }
    let pad = Duration::days(pad_days);
    (start - pad, end + pad)
}

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_linear_apply() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 200.0));
        assert_eq!(scale.apply(0.0), 0.0);
        assert_eq!(scale.apply(5.0), 100.0);
        assert_eq!(scale.apply(10.0), 200.0);
    }

    #[test]
    fn test_inverted_range() {
        let scale = LinearScale::new((100.0, 200.0), (50.0, 0.0));
        assert_eq!(scale.apply(100.0), 50.0);
        assert_eq!(scale.apply(200.0), 0.0);
    }

    #[test]
    fn test_degenerate_domain_maps_to_range_start() {
        let scale = LinearScale::new((0.0, 0.0), (0.0, 100.0));
        assert_eq!(scale.apply(0.0), 0.0);
        assert_eq!(scale.apply(42.0), 0.0);
        assert_eq!(scale.ticks(10), vec![0.0]);
    }

    #[test]
    fn test_nice_ticks() {
        assert_eq!(ticks(0.0, 10.0, 10), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(
            ticks(243.1, 18064.7, 10),
            vec![2000.0, 4000.0, 6000.0, 8000.0, 10000.0, 12000.0, 14000.0, 16000.0, 18000.0]
        );
    }

    #[test]
    fn test_tick_format() {
        let scale = LinearScale::new((243.1, 18064.7), (100.0, 0.0));
        let fmt = scale.tick_format(10);
        assert_eq!(fmt(2000.0), "2,000");
        assert_eq!(fmt(18000.0), "18,000");

        let scale = LinearScale::new((0.0, 1.0), (0.0, 1.0));
        let fmt = scale.tick_format(5);
        assert_eq!(fmt(0.4), "0.4");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(1234567.0, 0), "1,234,567");
        assert_eq!(format_grouped(999.0, 0), "999");
        assert_eq!(format_grouped(-1500.25, 2), "-1,500.25");
    }

    #[test]
    fn test_time_ticks_multi_decade() {
        let scale = TimeScale::new((ymd(1947, 1, 1), ymd(2015, 7, 1)), (0.0, 900.0));
        assert_eq!(scale.tick_interval(10), TimeInterval::Years(5));

        let ticks = scale.ticks(10);
        assert_eq!(ticks.first(), Some(&ymd(1950, 1, 1)));
        assert_eq!(ticks.last(), Some(&ymd(2015, 1, 1)));
        assert_eq!(format_date_tick(ticks[0]), "1950");
    }

    #[test]
    fn test_year_steps_follow_one_two_five() {
        // A raw step of 25 years rounds to 20
        let scale = TimeScale::new((ymd(1900, 1, 1), ymd(2150, 1, 1)), (0.0, 900.0));
        assert_eq!(scale.tick_interval(10), TimeInterval::Years(20));

        let scale = TimeScale::new((ymd(1000, 1, 1), ymd(2000, 1, 1)), (0.0, 900.0));
        assert_eq!(scale.tick_interval(10), TimeInterval::Years(100));
    }

    #[test]
    fn test_time_ticks_one_quarter() {
        let scale = TimeScale::new((ymd(1947, 1, 1), ymd(1947, 4, 1)), (0.0, 200.0));
        assert_eq!(scale.tick_interval(10), TimeInterval::Week);
        for tick in scale.ticks(10) {
            assert_eq!(tick.weekday(), Weekday::Sun);
            assert!(tick >= ymd(1947, 1, 1) && tick <= ymd(1947, 4, 1));
        }
    }

    #[test]
    fn test_time_scale_endpoints() {
        let scale = TimeScale::new((ymd(1947, 1, 1), ymd(1947, 4, 1)), (0.0, 200.0));
        assert_eq!(scale.apply(ymd(1947, 1, 1)), 0.0);
        assert_eq!(scale.apply(ymd(1947, 4, 1)), 200.0);
    }

    #[test]
    fn test_date_tick_formats() {
        assert_eq!(format_date_tick(ymd(1990, 1, 1)), "1990");
        assert_eq!(format_date_tick(ymd(1990, 4, 1)), "April");
        assert_eq!(format_date_tick(ymd(1990, 4, 8)), "Apr 08");
    }

    #[test]
    fn test_pad_single_instant() {
        let day = ymd(1947, 1, 1);
        let (start, end) = pad_date_domain(day, day, 45);
        assert!(start < day && end > day);

        let (start, end) = pad_date_domain(day, ymd(1948, 1, 1), 45);
        assert_eq!((start, end), (day, ymd(1948, 1, 1)));
    }
}
