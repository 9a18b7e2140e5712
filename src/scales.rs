use chrono::{
    DateTime, Datelike, Duration as ChronoDuration, Months, NaiveDate, NaiveDateTime, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;
use d3rs::scale::{generate_linear_ticks, generate_log_ticks, nice_number};
use d3rs::scale::{LinearScale, LogScale, Scale as D3Scale};

use crate::data_types::ScaleMode;

/// Lower bound applied to a log domain that reaches zero or below.
const LOG_DOMAIN_FLOOR: f64 = 1e-12;

fn expand_degenerate(domain: (f64, f64)) -> (f64, f64) {
    let (mut d_min, mut d_max) = domain;
    if (d_max - d_min).abs() < f64::EPSILON {
        d_min -= 0.5;
        d_max += 0.5;
    }
    (d_min, d_max)
}

/// Inverse mapping that stays on the domain start when the pixel span is
/// empty.
fn invert_or_start<S: D3Scale<f64, f64>>(scale: &S, pixel: f64) -> f64 {
    let (r0, r1) = scale.range();
    if (r1 - r0).abs() < f64::EPSILON {
        return scale.domain().0;
    }
    scale.invert(pixel).unwrap_or(scale.domain().0)
}

/// `1..9 × 10^k` inside `[u, v]`, the full set of log ticks with their
/// unlabeled subdivisions.
fn log_ticks_with_subdivisions(u: f64, v: f64) -> Vec<f64> {
    let first = u.log10().floor() as i32;
    let last = v.log10().ceil() as i32;
    let mut ticks = Vec::new();
    for exp in first..=last {
        for k in 1..10 {
            let t = if exp < 0 {
                k as f64 / 10f64.powi(-exp)
            } else {
                k as f64 * 10f64.powi(exp)
            };
            if t < u {
                continue;
            }
            if t > v {
                break;
            }
            ticks.push(t);
        }
    }
    ticks
}

/// True for exact powers of ten, the "leading digit 1" ticks.
pub fn is_power_of_ten(value: f64) -> bool {
    if value <= 0.0 || !value.is_finite() {
        return false;
    }
    let nearest = 10f64.powf(value.log10().round());
    ((value - nearest) / nearest).abs() < 1e-9
}

/// Value axis scale for either mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChartScale {
    Linear(LinearScale),
    Log(LogScale),
}

impl ChartScale {
    /// A zero-width domain is widened by half a unit on each side, so a
    /// single sample maps to the middle of the range.
    pub fn new_linear(domain: (f64, f64), range: (f32, f32)) -> Self {
        let (d_min, d_max) = expand_degenerate(domain);
        let scale = LinearScale::new()
            .domain(d_min, d_max)
            .range(range.0 as f64, range.1 as f64);
        Self::Linear(scale)
    }

    /// The domain is forced positive and non-empty. Values outside it sit
    /// on the nearest bound, so zero and negatives land on the floor.
    pub fn new_log(domain: (f64, f64), range: (f32, f32)) -> Self {
        let d_min = if domain.0.is_finite() && domain.0 > 0.0 {
            domain.0
        } else {
            LOG_DOMAIN_FLOOR
        };
        let d_max = if domain.1.is_finite() && domain.1 > d_min {
            domain.1
        } else {
            d_min * 10.0
        };
        let scale = LogScale::new()
            .domain(d_min, d_max)
            .range(range.0 as f64, range.1 as f64);
        Self::Log(scale)
    }

    pub fn for_mode(mode: ScaleMode, domain: (f64, f64), range: (f32, f32)) -> Self {
        match mode {
            ScaleMode::Linear => Self::new_linear(domain, range),
            ScaleMode::Logarithmic => Self::new_log(domain, range),
        }
    }

    /// Maps a domain value to pixels. Non-finite results collapse onto the
    /// start of the range.
    pub fn map(&self, value: f64) -> f32 {
        let res = match self {
            Self::Linear(s) => s.scale(value),
            Self::Log(s) => s.scale(value),
        };
        if res.is_nan() || res.is_infinite() {
            self.range().0
        } else {
            res as f32
        }
    }

    pub fn invert(&self, pixel: f32) -> f64 {
        match self {
            Self::Linear(s) => invert_or_start(s, pixel as f64),
            Self::Log(s) => invert_or_start(s, pixel as f64),
        }
    }

    pub fn range(&self) -> (f32, f32) {
        let (r0, r1) = match self {
            Self::Linear(s) => s.range(),
            Self::Log(s) => s.range(),
        };
        (r0 as f32, r1 as f32)
    }

    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.domain(),
            Self::Log(s) => s.domain(),
        }
    }

    /// Linear ticks are d3rs nice steps. Log ticks keep every `1..9 × 10^k`
    /// subdivision while fewer decades than `count` are visible, and fall
    /// back to powers of ten on wider domains.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let count = count.max(1);
        match self {
            Self::Linear(s) => s.ticks(count),
            Self::Log(s) => {
                let (u, v) = s.domain();
                if v.log10() - u.log10() < count as f64 {
                    let ticks = log_ticks_with_subdivisions(u, v);
                    if ticks.len() * 2 >= count {
                        return ticks;
                    }
                    return generate_linear_ticks(u, v, count);
                }
                generate_log_ticks(u, v, 10.0, false)
            }
        }
    }

    /// Whether a tick gets a label and a full-length mark. Every linear
    /// tick is major.
    pub fn is_major_tick(&self, value: f64) -> bool {
        match self {
            Self::Linear(_) => true,
            Self::Log(_) => is_power_of_ten(value),
        }
    }
}

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;
const MONTH_MS: i64 = 30 * DAY_MS;

/// Calendar step between time ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeInterval {
    Millis,
    Seconds(u32),
    Minutes(u32),
    Hours(u32),
    Days(u32),
    Week,
    Months(u32),
    Years,
}

const TICK_INTERVALS: &[(TimeInterval, i64)] = &[
    (TimeInterval::Seconds(1), SECOND_MS),
    (TimeInterval::Seconds(5), 5 * SECOND_MS),
    (TimeInterval::Seconds(15), 15 * SECOND_MS),
    (TimeInterval::Seconds(30), 30 * SECOND_MS),
    (TimeInterval::Minutes(1), MINUTE_MS),
    (TimeInterval::Minutes(5), 5 * MINUTE_MS),
    (TimeInterval::Minutes(15), 15 * MINUTE_MS),
    (TimeInterval::Minutes(30), 30 * MINUTE_MS),
    (TimeInterval::Hours(1), HOUR_MS),
    (TimeInterval::Hours(3), 3 * HOUR_MS),
    (TimeInterval::Hours(6), 6 * HOUR_MS),
    (TimeInterval::Hours(12), 12 * HOUR_MS),
    (TimeInterval::Days(1), DAY_MS),
    (TimeInterval::Days(2), 2 * DAY_MS),
    (TimeInterval::Week, WEEK_MS),
    (TimeInterval::Months(1), MONTH_MS),
    (TimeInterval::Months(3), 3 * MONTH_MS),
];

/// Upper bound on candidate instants walked per tick pass.
const MAX_CALENDAR_STEPS: usize = 10_000;

/// Time axis: linear over epoch milliseconds, ticks on calendar
/// boundaries of `tz`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    linear: LinearScale,
    start_ms: f64,
    end_ms: f64,
    tz: Tz,
}

impl TimeScale {
    /// The domain is ordered before use, so the axis always runs forward in
    /// time.
    pub fn new(domain_ms: (f64, f64), range: (f32, f32), tz: Tz) -> Self {
        let start_ms = domain_ms.0.min(domain_ms.1);
        let end_ms = domain_ms.0.max(domain_ms.1);
        let (d_min, d_max) = expand_degenerate((start_ms, end_ms));
        Self {
            linear: LinearScale::new()
                .domain(d_min, d_max)
                .range(range.0 as f64, range.1 as f64),
            start_ms,
            end_ms,
            tz,
        }
    }

    pub fn map(&self, t: DateTime<Utc>) -> f32 {
        self.map_millis(t.timestamp_millis() as f64)
    }

    pub fn map_millis(&self, ms: f64) -> f32 {
        let res = self.linear.scale(ms);
        if res.is_finite() {
            res as f32
        } else {
            self.range().0
        }
    }

    pub fn invert(&self, pixel: f32) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(invert_or_start(&self.linear, pixel as f64).round() as i64)
    }

    pub fn range(&self) -> (f32, f32) {
        let (r0, r1) = D3Scale::range(&self.linear);
        (r0 as f32, r1 as f32)
    }

    /// Interval whose length is closest to `span / count`.
    pub fn interval_for(&self, count: usize) -> TimeInterval {
        let target = (self.end_ms - self.start_ms) / count.max(1) as f64;
        let idx = TICK_INTERVALS.partition_point(|(_, ms)| (*ms as f64) <= target);
        if idx == TICK_INTERVALS.len() {
            return TimeInterval::Years;
        }
        if idx == 0 {
            return TimeInterval::Millis;
        }
        let (below, below_ms) = TICK_INTERVALS[idx - 1];
        let (above, above_ms) = TICK_INTERVALS[idx];
        if target / below_ms as f64 <= above_ms as f64 / target {
            below
        } else {
            above
        }
    }

    pub fn ticks(&self, count: usize) -> Vec<DateTime<Utc>> {
        if !self.start_ms.is_finite() || !self.end_ms.is_finite() {
            return vec![];
        }
        let (start_ms, end_ms) = (self.start_ms as i64, self.end_ms as i64);
        match self.interval_for(count) {
            TimeInterval::Millis => generate_linear_ticks(self.start_ms, self.end_ms, count.max(1))
                .into_iter()
                .filter_map(|ms| DateTime::from_timestamp_millis(ms.round() as i64))
                .collect(),
            TimeInterval::Seconds(n) => fixed_step_ticks(start_ms, end_ms, n as i64 * SECOND_MS),
            TimeInterval::Minutes(n) => fixed_step_ticks(start_ms, end_ms, n as i64 * MINUTE_MS),
            TimeInterval::Years => self.year_ticks(count),
            interval => self.calendar_ticks(interval),
        }
    }

    fn local(&self, ms: i64) -> Option<NaiveDateTime> {
        let utc = DateTime::from_timestamp_millis(ms)?;
        Some(utc.with_timezone(&self.tz).naive_local())
    }

    fn to_utc(&self, local: &NaiveDateTime) -> Option<DateTime<Utc>> {
        self.tz
            .from_local_datetime(local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn calendar_ticks(&self, interval: TimeInterval) -> Vec<DateTime<Utc>> {
        let (start_ms, end_ms) = (self.start_ms as i64, self.end_ms as i64);
        let Some(start_local) = self.local(start_ms) else {
            return vec![];
        };
        let Some(mut cursor) = floor_local(start_local, interval) else {
            return vec![];
        };

        let mut ticks = Vec::new();
        for _ in 0..MAX_CALENDAR_STEPS {
            if accepts(interval, &cursor) {
                if let Some(t) = self.to_utc(&cursor) {
                    let ms = t.timestamp_millis();
                    if ms > end_ms {
                        break;
                    }
                    if ms >= start_ms {
                        ticks.push(t);
                    }
                }
            }
            match advance_local(cursor, interval) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        ticks
    }

    fn year_ticks(&self, count: usize) -> Vec<DateTime<Utc>> {
        let (Some(start), Some(end)) = (
            self.local(self.start_ms as i64),
            self.local(self.end_ms as i64),
        ) else {
            return vec![];
        };
        let (y0, y1) = (start.year() as f64, end.year() as f64 + 1.0);
        let step = nice_number((y1 - y0) / count.max(1) as f64, false).max(1.0) as i32;
        let first = (start.year() as f64 / step as f64).floor() as i32 * step;

        let mut ticks = Vec::new();
        let mut year = first;
        while year as f64 <= y1 {
            let local = NaiveDate::from_ymd_opt(year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
            if let Some(t) = local.and_then(|l| self.to_utc(&l)) {
                let ms = t.timestamp_millis() as f64;
                if ms >= self.start_ms && ms <= self.end_ms {
                    ticks.push(t);
                }
            }
            year += step;
        }
        ticks
    }
}

fn fixed_step_ticks(start_ms: i64, end_ms: i64, step: i64) -> Vec<DateTime<Utc>> {
    let mut ticks = Vec::new();
    let mut t = start_ms.div_euclid(step) * step;
    if t < start_ms {
        t += step;
    }
    while t <= end_ms {
        if let Some(dt) = DateTime::from_timestamp_millis(t) {
            ticks.push(dt);
        }
        t += step;
    }
    ticks
}

/// Last boundary of `interval` at or before `local`.
fn floor_local(local: NaiveDateTime, interval: TimeInterval) -> Option<NaiveDateTime> {
    let date = local.date();
    match interval {
        TimeInterval::Hours(n) => date.and_hms_opt(local.hour() - local.hour() % n, 0, 0),
        TimeInterval::Days(_) => date.and_hms_opt(0, 0, 0),
        TimeInterval::Week => {
            let back = date.weekday().num_days_from_sunday() as i64;
            (date - ChronoDuration::days(back)).and_hms_opt(0, 0, 0)
        }
        TimeInterval::Months(_) => date.with_day(1)?.and_hms_opt(0, 0, 0),
        _ => Some(local),
    }
}

fn advance_local(local: NaiveDateTime, interval: TimeInterval) -> Option<NaiveDateTime> {
    match interval {
        TimeInterval::Hours(n) => local.checked_add_signed(ChronoDuration::hours(n as i64)),
        TimeInterval::Days(_) => local.checked_add_signed(ChronoDuration::days(1)),
        TimeInterval::Week => local.checked_add_signed(ChronoDuration::days(7)),
        TimeInterval::Months(_) => local.checked_add_months(Months::new(1)),
        _ => None,
    }
}

/// Day and month intervals keep only every n-th day of the month / month
/// of the year, so ticks do not drift between passes.
fn accepts(interval: TimeInterval, local: &NaiveDateTime) -> bool {
    match interval {
        TimeInterval::Days(n) => (local.day() - 1) % n == 0,
        TimeInterval::Months(n) => local.month0() % n == 0,
        _ => true,
    }
}
