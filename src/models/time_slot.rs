//! Time-slot algebra.
//!
//! A [`TimeSlot`] is a weekly meeting pattern: a set of weekdays sharing one
//! start/end clock time (e.g. `MWF 9:10-10:00`). Overlap detection works on
//! [`AtomicSlot`]s, the single-day fragments of a slot.
//!
//! # Time Model
//! Clock times are stored as `H * 100 + MM` ([`ClockTime`]), which orders
//! correctly for comparison. Intervals are half-open `[start, end)`: a class
//! ending at 9:00 does not conflict with one starting at 9:00.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ScheduleError, ScheduleResult};

/// A clock time encoded as `H * 100 + MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Creates a clock time from hours and minutes.
    pub fn new(hours: u16, minutes: u16) -> ScheduleResult<Self> {
        if hours > 23 {
            return Err(ScheduleError::MalformedTime {
                value: format!("{hours}:{minutes:02}"),
                reason: "hour out of range",
            });
        }
        if minutes > 59 {
            return Err(ScheduleError::MalformedTime {
                value: format!("{hours}:{minutes:02}"),
                reason: "minute out of range",
            });
        }
        Ok(Self(hours * 100 + minutes))
    }

    /// Builds from a known-valid `H * 100 + MM` constant.
    pub(crate) const fn from_encoded(value: u16) -> Self {
        Self(value)
    }

    /// The `H * 100 + MM` encoding.
    #[inline]
    pub fn value(self) -> u16 {
        self.0
    }

    /// Hour component.
    #[inline]
    pub fn hours(self) -> u16 {
        self.0 / 100
    }

    /// Minute component.
    #[inline]
    pub fn minutes(self) -> u16 {
        self.0 % 100
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hours(), self.minutes())
    }
}

impl FromStr for ClockTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_clock(s)
    }
}

/// Parses `"H:MM"` (24-hour) into a [`ClockTime`].
///
/// Malformed input is an error, never a silent zero.
pub fn parse_clock(s: &str) -> ScheduleResult<ClockTime> {
    let malformed = |reason| ScheduleError::MalformedTime {
        value: s.to_string(),
        reason,
    };

    let (h, m) = s.trim().split_once(':').ok_or_else(|| malformed("missing ':'"))?;
    if h.is_empty() || h.len() > 2 || !h.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("hour must be one or two digits"));
    }
    if m.len() != 2 || !m.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("minute must be two digits"));
    }
    let hours: u16 = h.parse().map_err(|_| malformed("hour is not a number"))?;
    let minutes: u16 = m.parse().map_err(|_| malformed("minute is not a number"))?;
    ClockTime::new(hours, minutes).map_err(|_| malformed("time out of range"))
}

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Compact day code used in slot identifiers.
    pub fn code(self) -> &'static str {
        match self {
            Weekday::Monday => "M",
            Weekday::Tuesday => "T",
            Weekday::Wednesday => "W",
            Weekday::Thursday => "Th",
            Weekday::Friday => "F",
            Weekday::Saturday => "S",
            Weekday::Sunday => "U",
        }
    }

    /// Parses a compact day-set code such as `"MWF"` or `"TTh"`.
    ///
    /// `Th` and `R` both mean Thursday. The result is sorted Monday-first.
    /// Empty codes, unknown letters, and repeated days are rejected.
    pub fn parse_days(code: &str) -> ScheduleResult<Vec<Weekday>> {
        let malformed = || ScheduleError::MalformedDays(code.to_string());
        let mut days = Vec::new();
        let mut chars = code.trim().chars().peekable();

        while let Some(c) = chars.next() {
            let day = match c {
                'M' => Weekday::Monday,
                'T' if chars.peek() == Some(&'h') => {
                    chars.next();
                    Weekday::Thursday
                }
                'T' => Weekday::Tuesday,
                'W' => Weekday::Wednesday,
                'R' => Weekday::Thursday,
                'F' => Weekday::Friday,
                'S' => Weekday::Saturday,
                'U' => Weekday::Sunday,
                _ => return Err(malformed()),
            };
            if days.contains(&day) {
                return Err(malformed());
            }
            days.push(day);
        }

        if days.is_empty() {
            return Err(malformed());
        }
        days.sort();
        Ok(days)
    }
}

/// Concatenated codes for a day set (`[Mon, Wed, Fri]` → `"MWF"`).
pub fn day_code(days: &[Weekday]) -> String {
    days.iter().map(|d| d.code()).collect()
}

/// A single-day fragment of a time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtomicSlot {
    /// Meeting day.
    pub day: Weekday,
    /// Start (inclusive).
    pub start: ClockTime,
    /// End (exclusive).
    pub end: ClockTime,
}

impl AtomicSlot {
    /// Creates an atomic slot.
    pub fn new(day: Weekday, start: ClockTime, end: ClockTime) -> Self {
        Self { day, start, end }
    }

    /// Whether two atomic slots overlap. See [`overlaps`].
    #[inline]
    pub fn overlaps(&self, other: &AtomicSlot) -> bool {
        overlaps(self, other)
    }
}

impl fmt::Display for AtomicSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.day.code(), self.start, self.end)
    }
}

/// A weekly meeting pattern from the catalog's slot universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Slot identifier (`<days>_<start>_<end>` unless overridden).
    pub id: String,
    /// Meeting days, sorted and unique.
    pub days: Vec<Weekday>,
    /// Start (inclusive).
    pub start: ClockTime,
    /// End (exclusive).
    pub end: ClockTime,
}

impl TimeSlot {
    /// Creates a slot with the canonical `<days>_<start>_<end>` identifier.
    ///
    /// Fails if `days` is empty or `end <= start`.
    pub fn new(days: Vec<Weekday>, start: ClockTime, end: ClockTime) -> ScheduleResult<Self> {
        let mut days = days;
        days.sort();
        days.dedup();
        let id = format!("{}_{}_{}", day_code(&days), start, end);
        if days.is_empty() || end <= start {
            return Err(ScheduleError::MalformedTimeSlot(id));
        }
        Ok(Self {
            id,
            days,
            start,
            end,
        })
    }

    /// Parses a `<days>_<start>_<end>` identifier, e.g. `"TTh_12:45_14:00"`.
    pub fn parse(id: &str) -> ScheduleResult<Self> {
        let mut parts = id.trim().split('_');
        let (Some(days), Some(start), Some(end), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ScheduleError::MalformedTimeSlot(id.to_string()));
        };
        let slot = Self::new(Weekday::parse_days(days)?, parse_clock(start)?, parse_clock(end)?)?;
        Ok(slot.with_id(id.trim()))
    }

    /// Overrides the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Single-day fragments of this slot. See [`atomize`].
    pub fn atoms(&self) -> Vec<AtomicSlot> {
        atomize(self)
    }

    /// Whether any fragment of `self` overlaps any fragment of `other`.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end
            && other.start < self.end
            && self.days.iter().any(|d| other.days.contains(d))
    }

    /// Whether the slot meets on `day`.
    pub fn meets_on(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }
}

impl From<AtomicSlot> for TimeSlot {
    fn from(atom: AtomicSlot) -> Self {
        Self {
            id: format!("{}_{}_{}", atom.day.code(), atom.start, atom.end),
            days: vec![atom.day],
            start: atom.start,
            end: atom.end,
        }
    }
}

/// Splits a slot into one [`AtomicSlot`] per meeting day.
///
/// A single-day slot atomizes to exactly itself.
pub fn atomize(slot: &TimeSlot) -> Vec<AtomicSlot> {
    slot.days
        .iter()
        .map(|&day| AtomicSlot::new(day, slot.start, slot.end))
        .collect()
}

/// True iff both fragments fall on the same day and their half-open time
/// ranges intersect (`start₁ < end₂ ∧ start₂ < end₁`).
#[inline]
pub fn overlaps(a: &AtomicSlot, b: &AtomicSlot) -> bool {
    a.day == b.day && a.start < b.end && b.start < a.end
}

/// Every slot in `universe` sharing an overlapping day/time with `slot`.
///
/// Reflexive: a slot present in the universe is always among its own
/// equivalents.
pub fn equivalent_slots<'a>(slot: &TimeSlot, universe: &'a [TimeSlot]) -> Vec<&'a TimeSlot> {
    universe
        .iter()
        .filter(|s| s.id == slot.id || slot.overlaps(s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        parse_clock(s).unwrap()
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(t("9:10").value(), 910);
        assert_eq!(t("09:10").value(), 910);
        assert_eq!(t("17:00").value(), 1700);
        assert_eq!(t(" 0:05 ").value(), 5);
        assert_eq!(t("13:45").to_string(), "13:45");
    }

    #[test]
    fn test_parse_clock_malformed() {
        for bad in ["", "910", "9:1", "9:100", "24:00", "9:60", "a:00", "9:ab", "123:00"] {
            assert!(
                matches!(parse_clock(bad), Err(ScheduleError::MalformedTime { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_clock_ordering() {
        assert!(t("9:10") < t("10:00"));
        assert!(t("12:59") < t("13:00"));
    }

    #[test]
    fn test_parse_days() {
        use Weekday::*;
        assert_eq!(Weekday::parse_days("MWF").unwrap(), vec![Monday, Wednesday, Friday]);
        assert_eq!(Weekday::parse_days("TTh").unwrap(), vec![Tuesday, Thursday]);
        assert_eq!(Weekday::parse_days("TR").unwrap(), vec![Tuesday, Thursday]);
        assert_eq!(Weekday::parse_days("FM").unwrap(), vec![Monday, Friday]);
        assert!(Weekday::parse_days("").is_err());
        assert!(Weekday::parse_days("MM").is_err());
        assert!(Weekday::parse_days("ThR").is_err());
        assert!(Weekday::parse_days("X").is_err());
    }

    #[test]
    fn test_time_slot_parse_and_id() {
        let slot = TimeSlot::parse("MWF_9:10_10:00").unwrap();
        assert_eq!(slot.days.len(), 3);
        assert_eq!(slot.start, t("9:10"));
        assert_eq!(slot.end, t("10:00"));
        assert_eq!(slot.id, "MWF_9:10_10:00");

        let built = TimeSlot::new(
            vec![Weekday::Thursday, Weekday::Tuesday],
            t("12:45"),
            t("14:00"),
        )
        .unwrap();
        assert_eq!(built.id, "TTh_12:45_14:00");
    }

    #[test]
    fn test_time_slot_rejects_bad_shapes() {
        assert!(TimeSlot::parse("MWF_9:10").is_err());
        assert!(TimeSlot::parse("MWF_9:10_10:00_x").is_err());
        assert!(TimeSlot::parse("MWF_10:00_9:10").is_err());
        assert!(TimeSlot::parse("MWF_10:00_10:00").is_err());
        assert!(TimeSlot::new(vec![], t("9:00"), t("10:00")).is_err());
    }

    #[test]
    fn test_atomize() {
        let slot = TimeSlot::parse("MWF_9:10_10:00").unwrap();
        let atoms = atomize(&slot);
        assert_eq!(atoms.len(), 3);
        assert!(atoms.iter().all(|a| a.start == slot.start && a.end == slot.end));
        assert_eq!(atoms[0].day, Weekday::Monday);
        assert_eq!(atoms[2].day, Weekday::Friday);
    }

    #[test]
    fn test_atomize_is_idempotent_on_atomic_input() {
        let atom = AtomicSlot::new(Weekday::Tuesday, t("8:00"), t("9:15"));
        let again = atomize(&TimeSlot::from(atom));
        assert_eq!(again, vec![atom]);
        let twice: Vec<AtomicSlot> = again
            .iter()
            .flat_map(|a| atomize(&TimeSlot::from(*a)))
            .collect();
        assert_eq!(twice, vec![atom]);
    }

    #[test]
    fn test_overlap_half_open() {
        let a = AtomicSlot::new(Weekday::Monday, t("8:00"), t("9:00"));
        let b = AtomicSlot::new(Weekday::Monday, t("9:00"), t("10:00"));
        let c = AtomicSlot::new(Weekday::Monday, t("8:30"), t("9:30"));
        let d = AtomicSlot::new(Weekday::Tuesday, t("8:30"), t("9:30"));

        assert!(!overlaps(&a, &b)); // touching at 9:00
        assert!(!overlaps(&b, &a));
        assert!(overlaps(&a, &c));
        assert!(overlaps(&c, &b));
        assert!(!overlaps(&a, &d)); // different day
        assert!(overlaps(&a, &a));
    }

    #[test]
    fn test_slot_overlap_across_patterns() {
        let mwf = TimeSlot::parse("MWF_9:10_10:00").unwrap();
        let mw = TimeSlot::parse("MW_9:30_10:45").unwrap();
        let tth = TimeSlot::parse("TTh_9:30_10:45").unwrap();
        let w_after = TimeSlot::parse("W_10:00_11:00").unwrap();

        assert!(mwf.overlaps(&mw));
        assert!(!mwf.overlaps(&tth));
        assert!(!mwf.overlaps(&w_after));
        assert!(mw.overlaps(&w_after));
    }

    #[test]
    fn test_equivalent_slots() {
        let universe: Vec<TimeSlot> = [
            "MWF_9:10_10:00",
            "MW_9:30_10:45",
            "TTh_9:30_10:45",
            "F_8:00_9:10",
        ]
        .iter()
        .map(|s| TimeSlot::parse(s).unwrap())
        .collect();

        let eq: Vec<&str> = equivalent_slots(&universe[0], &universe)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(eq, vec!["MWF_9:10_10:00", "MW_9:30_10:45"]);

        for slot in &universe {
            assert!(equivalent_slots(slot, &universe).iter().any(|s| s.id == slot.id));
        }
    }
}
