// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! TZ strings from the TZif footer.
//!
//! Parses `std offset [dst [offset] [,start[/time],end[/time]]]` as described in
//! RFC 8536, section 3.3, including the version 3 extension that allows rule
//! times from -167 to 167 hours. Only [`Location`](crate::Location) evaluates
//! these rules; encoding and decoding carry the string verbatim.

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Weekday};

// Time constants
const SECONDS_PER_MINUTE: i32 = 60;
const SECONDS_PER_HOUR: i32 = 3600;

/// Weekdays in `Mm.w.d` order, where 0 is Sunday.
const SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Largest hour value accepted in an offset.
const MAX_OFFSET_HOURS: i32 = 24;
/// Largest absolute hour value accepted in a rule time.
const MAX_RULE_HOURS: i32 = 167;

/// A parsed TZ string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosixTz {
    std: PosixZone,
    dst: Option<DstRule>,
}

/// A designation and its UTC offset in seconds, positive east of UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosixZone {
    pub name: String,
    pub offset: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DstRule {
    zone: PosixZone,
    /// When DST starts, in local standard time
    start: TransitionRule,
    /// When DST ends, in local daylight time
    end: TransitionRule,
}

/// Day and time of year a transition occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TransitionRule {
    day: RuleDay,
    /// Seconds from local midnight; may be negative or exceed a day.
    time: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleDay {
    /// `Jn`: 1-365, February 29 is never counted.
    JulianNoLeap(u16),
    /// `n`: 0-365, February 29 is counted in leap years.
    JulianLeap(u16),
    /// `Mm.w.d`: weekday `d` (0 = Sunday) of week `w` (5 = last) of month `m`.
    WeekdayOfMonth { month: u8, week: u8, weekday: u8 },
}

impl PosixTz {
    /// Parse a TZ string, returning `None` if it is malformed.
    pub fn parse(s: &str) -> Option<Self> {
        Parser::new(s).parse()
    }

    pub fn std(&self) -> &PosixZone {
        &self.std
    }

    pub fn dst(&self) -> Option<&PosixZone> {
        self.dst.as_ref().map(|rule| &rule.zone)
    }

    /// Check if DST is active at the given Unix timestamp (in seconds).
    pub fn is_dst_at(&self, timestamp_secs: i64) -> bool {
        let Some(rule) = &self.dst else {
            return false;
        };

        // Year in local standard time
        let Some(year) = local_year(timestamp_secs, self.std.offset) else {
            return false;
        };

        // DST start: transition happens at local standard time
        let dst_start_utc = transition_timestamp_utc(year, &rule.start, self.std.offset);
        // DST end: transition happens at local DST time
        let dst_end_utc = transition_timestamp_utc(year, &rule.end, rule.zone.offset);
        let (Some(dst_start_utc), Some(dst_end_utc)) = (dst_start_utc, dst_end_utc) else {
            return false;
        };

        // Handle northern vs southern hemisphere (start < end vs start > end)
        match dst_start_utc.cmp(&dst_end_utc) {
            Ordering::Less => timestamp_secs >= dst_start_utc && timestamp_secs < dst_end_utc,
            Ordering::Greater => timestamp_secs >= dst_start_utc || timestamp_secs < dst_end_utc,
            // DST starts and ends at the same instant, so it never applies.
            Ordering::Equal => false,
        }
    }
}

struct Parser<'s> {
    tz: &'s [u8],
    pos: usize,
}

impl<'s> Parser<'s> {
    fn new(tz: &'s str) -> Self {
        Self {
            tz: tz.as_bytes(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Option<PosixTz> {
        let std_name = self.name()?;
        // POSIX offsets are positive west of UTC.
        let std_offset = -self.hms(MAX_OFFSET_HOURS)?;
        let std = PosixZone {
            name: std_name,
            offset: std_offset,
        };
        if self.is_done() {
            return Some(PosixTz { std, dst: None });
        }

        let dst_name = self.name()?;
        let dst_offset = match self.peek() {
            Some(b'+' | b'-' | b'0'..=b'9') => -self.hms(MAX_OFFSET_HOURS)?,
            _ => std_offset + SECONDS_PER_HOUR,
        };
        let (start, end) = if self.is_done() {
            // US rules, as assumed by most implementations.
            (
                TransitionRule {
                    day: RuleDay::WeekdayOfMonth {
                        month: 3,
                        week: 2,
                        weekday: 0,
                    },
                    time: 2 * SECONDS_PER_HOUR,
                },
                TransitionRule {
                    day: RuleDay::WeekdayOfMonth {
                        month: 11,
                        week: 1,
                        weekday: 0,
                    },
                    time: 2 * SECONDS_PER_HOUR,
                },
            )
        } else {
            self.expect(b',')?;
            let start = self.rule()?;
            self.expect(b',')?;
            let end = self.rule()?;
            (start, end)
        };
        if !self.is_done() {
            return None;
        }

        Some(PosixTz {
            std,
            dst: Some(DstRule {
                zone: PosixZone {
                    name: dst_name,
                    offset: dst_offset,
                },
                start,
                end,
            }),
        })
    }

    /// `<+03>` or `CET`, at least three characters.
    fn name(&mut self) -> Option<String> {
        let start;
        let end;
        if self.peek() == Some(b'<') {
            self.pos += 1;
            start = self.pos;
            while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'+' || b == b'-')
            {
                self.pos += 1;
            }
            end = self.pos;
            self.expect(b'>')?;
        } else {
            start = self.pos;
            while matches!(self.peek(), Some(b) if b.is_ascii_alphabetic()) {
                self.pos += 1;
            }
            end = self.pos;
        }
        if end - start < 3 {
            return None;
        }
        // Only ASCII was accepted above.
        std::str::from_utf8(&self.tz[start..end])
            .ok()
            .map(str::to_owned)
    }

    /// `[+-]hh[:mm[:ss]]` in seconds.
    fn hms(&mut self, max_hours: i32) -> Option<i32> {
        let sign = match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                -1
            },
            Some(b'+') => {
                self.pos += 1;
                1
            },
            _ => 1,
        };
        let hours = self.number(3)?;
        if hours > max_hours {
            return None;
        }
        let mut secs = hours * SECONDS_PER_HOUR;
        if self.peek() == Some(b':') {
            self.pos += 1;
            secs += self.sexagesimal()? * SECONDS_PER_MINUTE;
            if self.peek() == Some(b':') {
                self.pos += 1;
                secs += self.sexagesimal()?;
            }
        }
        Some(sign * secs)
    }

    fn sexagesimal(&mut self) -> Option<i32> {
        self.number(2).filter(|n| *n < 60)
    }

    /// `Jn`, `n` or `Mm.w.d`, optionally followed by `/time`.
    fn rule(&mut self) -> Option<TransitionRule> {
        let day = match self.peek()? {
            b'J' => {
                self.pos += 1;
                let day = self.number(3).filter(|d| (1..=365).contains(d))?;
                RuleDay::JulianNoLeap(day as u16)
            },
            b'M' => {
                self.pos += 1;
                let month = self.number(2).filter(|m| (1..=12).contains(m))?;
                self.expect(b'.')?;
                let week = self.number(1).filter(|w| (1..=5).contains(w))?;
                self.expect(b'.')?;
                let weekday = self.number(1).filter(|d| (0..=6).contains(d))?;
                RuleDay::WeekdayOfMonth {
                    month: month as u8,
                    week: week as u8,
                    weekday: weekday as u8,
                }
            },
            _ => {
                let day = self.number(3).filter(|d| (0..=365).contains(d))?;
                RuleDay::JulianLeap(day as u16)
            },
        };
        let time = if self.peek() == Some(b'/') {
            self.pos += 1;
            self.hms(MAX_RULE_HOURS)?
        } else {
            2 * SECONDS_PER_HOUR
        };
        Some(TransitionRule { day, time })
    }

    /// Between one and `max_digits` decimal digits.
    fn number(&mut self, max_digits: usize) -> Option<i32> {
        let start = self.pos;
        let mut n = 0i32;
        while let Some(digit @ b'0'..=b'9') = self.peek() {
            if self.pos - start == max_digits {
                return None;
            }
            n = n * 10 + i32::from(digit - b'0');
            self.pos += 1;
        }
        (self.pos > start).then_some(n)
    }

    fn expect(&mut self, byte: u8) -> Option<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    fn peek(&self) -> Option<u8> {
        self.tz.get(self.pos).copied()
    }

    fn is_done(&self) -> bool {
        self.pos == self.tz.len()
    }
}

/// Year of a Unix timestamp shifted by `offset_secs`.
fn local_year(timestamp_secs: i64, offset_secs: i32) -> Option<i32> {
    let local_secs = timestamp_secs.checked_add(i64::from(offset_secs))?;
    DateTime::from_timestamp(local_secs, 0).map(|local| local.year())
}

/// Calculate the UTC Unix timestamp of a DST transition.
/// The rule time is local time, and `offset_secs` is the offset that is active at
/// the moment of transition.
fn transition_timestamp_utc(year: i32, rule: &TransitionRule, offset_secs: i32) -> Option<i64> {
    let date = match rule.day {
        RuleDay::JulianNoLeap(n) => {
            let skip_leap_day = n >= 60 && NaiveDate::from_ymd_opt(year, 2, 29).is_some();
            NaiveDate::from_yo_opt(year, u32::from(n) + u32::from(skip_leap_day))?
        },
        RuleDay::JulianLeap(n) => {
            NaiveDate::from_yo_opt(year, 1)?.checked_add_days(Days::new(u64::from(n)))?
        },
        RuleDay::WeekdayOfMonth {
            month,
            week,
            weekday,
        } => {
            let weekday = SUNDAY_FIRST[usize::from(weekday)];
            let month = u32::from(month);
            // Week 5 means the last occurrence, which is the fourth in some months.
            NaiveDate::from_weekday_of_month_opt(year, month, weekday, week)
                .or_else(|| NaiveDate::from_weekday_of_month_opt(year, month, weekday, week - 1))?
        },
    };

    let local_timestamp =
        date.and_time(NaiveTime::default()).and_utc().timestamp() + i64::from(rule.time);
    Some(local_timestamp - i64::from(offset_secs))
}
