/// The kinds of duration a [`DurationField`](crate::field::DurationField)
/// can measure.
///
/// The declaration order of the variants is the slot order of duration
/// fields in a [`Fields`](crate::chrono::Fields) bag, from largest to
/// smallest.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum DurationFieldType {
    Eras,
    Centuries,
    Years,
    Months,
    Weekyears,
    Weeks,
    Days,
    Halfdays,
    Hours,
    Minutes,
    Seconds,
    Millis,
}

impl DurationFieldType {
    /// The number of duration field types, and thus duration slots.
    pub const COUNT: usize = 12;

    /// Every duration field type, in slot order.
    pub const ALL: [DurationFieldType; DurationFieldType::COUNT] = [
        DurationFieldType::Eras,
        DurationFieldType::Centuries,
        DurationFieldType::Years,
        DurationFieldType::Months,
        DurationFieldType::Weekyears,
        DurationFieldType::Weeks,
        DurationFieldType::Days,
        DurationFieldType::Halfdays,
        DurationFieldType::Hours,
        DurationFieldType::Minutes,
        DurationFieldType::Seconds,
        DurationFieldType::Millis,
    ];

    /// Returns the name of this duration type, e.g. `"hours"`.
    pub fn name(self) -> &'static str {
        use self::DurationFieldType::*;

        match self {
            Eras => "eras",
            Centuries => "centuries",
            Years => "years",
            Months => "months",
            Weekyears => "weekyears",
            Weeks => "weeks",
            Days => "days",
            Halfdays => "halfdays",
            Hours => "hours",
            Minutes => "minutes",
            Seconds => "seconds",
            Millis => "millis",
        }
    }

    /// Looks up a duration type by its name.
    pub fn from_name(name: &str) -> Option<DurationFieldType> {
        DurationFieldType::ALL.into_iter().find(|ty| ty.name() == name)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl core::fmt::Display for DurationFieldType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// The kinds of value a [`DateTimeField`](crate::field::DateTimeField) can
/// extract from an instant.
///
/// The declaration order of the variants is the slot order of date-time
/// fields in a [`Fields`](crate::chrono::Fields) bag.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum DateTimeFieldType {
    Year,
    YearOfEra,
    YearOfCentury,
    CenturyOfEra,
    Era,
    DayOfWeek,
    DayOfMonth,
    DayOfYear,
    MonthOfYear,
    WeekOfWeekyear,
    Weekyear,
    WeekyearOfCentury,
    MillisOfSecond,
    MillisOfDay,
    SecondOfMinute,
    SecondOfDay,
    MinuteOfHour,
    MinuteOfDay,
    HourOfDay,
    HourOfHalfday,
    ClockhourOfDay,
    ClockhourOfHalfday,
    HalfdayOfDay,
}

impl DateTimeFieldType {
    /// The number of date-time field types, and thus date-time slots.
    pub const COUNT: usize = 23;

    /// Every date-time field type, in slot order.
    pub const ALL: [DateTimeFieldType; DateTimeFieldType::COUNT] = [
        DateTimeFieldType::Year,
        DateTimeFieldType::YearOfEra,
        DateTimeFieldType::YearOfCentury,
        DateTimeFieldType::CenturyOfEra,
        DateTimeFieldType::Era,
        DateTimeFieldType::DayOfWeek,
        DateTimeFieldType::DayOfMonth,
        DateTimeFieldType::DayOfYear,
        DateTimeFieldType::MonthOfYear,
        DateTimeFieldType::WeekOfWeekyear,
        DateTimeFieldType::Weekyear,
        DateTimeFieldType::WeekyearOfCentury,
        DateTimeFieldType::MillisOfSecond,
        DateTimeFieldType::MillisOfDay,
        DateTimeFieldType::SecondOfMinute,
        DateTimeFieldType::SecondOfDay,
        DateTimeFieldType::MinuteOfHour,
        DateTimeFieldType::MinuteOfDay,
        DateTimeFieldType::HourOfDay,
        DateTimeFieldType::HourOfHalfday,
        DateTimeFieldType::ClockhourOfDay,
        DateTimeFieldType::ClockhourOfHalfday,
        DateTimeFieldType::HalfdayOfDay,
    ];

    /// Returns the name of this field type, e.g. `"hour-of-day"`.
    pub fn name(self) -> &'static str {
        use self::DateTimeFieldType::*;

        match self {
            Year => "year",
            YearOfEra => "year-of-era",
            YearOfCentury => "year-of-century",
            CenturyOfEra => "century-of-era",
            Era => "era",
            DayOfWeek => "day-of-week",
            DayOfMonth => "day-of-month",
            DayOfYear => "day-of-year",
            MonthOfYear => "month-of-year",
            WeekOfWeekyear => "week-of-weekyear",
            Weekyear => "weekyear",
            WeekyearOfCentury => "weekyear-of-century",
            MillisOfSecond => "millis-of-second",
            MillisOfDay => "millis-of-day",
            SecondOfMinute => "second-of-minute",
            SecondOfDay => "second-of-day",
            MinuteOfHour => "minute-of-hour",
            MinuteOfDay => "minute-of-day",
            HourOfDay => "hour-of-day",
            HourOfHalfday => "hour-of-halfday",
            ClockhourOfDay => "clockhour-of-day",
            ClockhourOfHalfday => "clockhour-of-halfday",
            HalfdayOfDay => "halfday-of-day",
        }
    }

    /// Looks up a field type by its name.
    pub fn from_name(name: &str) -> Option<DateTimeFieldType> {
        DateTimeFieldType::ALL.into_iter().find(|ty| ty.name() == name)
    }

    /// Returns the unit that fields of this type count in.
    pub fn duration_type(self) -> DurationFieldType {
        use self::{DateTimeFieldType::*, DurationFieldType as D};

        match self {
            Year | YearOfEra | YearOfCentury => D::Years,
            CenturyOfEra => D::Centuries,
            Era => D::Eras,
            DayOfWeek | DayOfMonth | DayOfYear => D::Days,
            MonthOfYear => D::Months,
            WeekOfWeekyear => D::Weeks,
            Weekyear | WeekyearOfCentury => D::Weekyears,
            MillisOfSecond | MillisOfDay => D::Millis,
            SecondOfMinute | SecondOfDay => D::Seconds,
            MinuteOfHour | MinuteOfDay => D::Minutes,
            HourOfDay | HourOfHalfday | ClockhourOfDay
            | ClockhourOfHalfday => D::Hours,
            HalfdayOfDay => D::Halfdays,
        }
    }

    /// Returns the unit within which fields of this type cycle, if any.
    ///
    /// Unbounded fields like `year` have no range.
    pub fn range_duration_type(self) -> Option<DurationFieldType> {
        use self::{DateTimeFieldType::*, DurationFieldType as D};

        match self {
            Year | Weekyear => None,
            YearOfEra | CenturyOfEra => Some(D::Eras),
            YearOfCentury | WeekyearOfCentury => Some(D::Centuries),
            Era => None,
            DayOfWeek => Some(D::Weeks),
            DayOfMonth => Some(D::Months),
            DayOfYear | MonthOfYear => Some(D::Years),
            WeekOfWeekyear => Some(D::Weekyears),
            MillisOfSecond => Some(D::Seconds),
            SecondOfMinute => Some(D::Minutes),
            MinuteOfHour => Some(D::Hours),
            MillisOfDay | SecondOfDay | MinuteOfDay | HourOfDay
            | ClockhourOfDay | HalfdayOfDay => Some(D::Days),
            HourOfHalfday | ClockhourOfHalfday => Some(D::Halfdays),
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl core::fmt::Display for DateTimeFieldType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
