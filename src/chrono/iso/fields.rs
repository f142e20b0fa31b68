use crate::{
    chrono::{
        iso::{
            day_number, day_of_week, instant_of, week_date, weeks_in_weekyear,
            weekyear_start, with_weekyear, with_year, Civil, MonthsUnit,
            WeekyearsUnit, YearsUnit, AVERAGE_MILLIS_PER_MONTH,
            AVERAGE_MILLIS_PER_YEAR, MAX_YEAR, MIN_YEAR,
        },
        Fields,
    },
    error::field::Error as E,
    field::{
        verify_bounds, DateTimeField, DateTimeFieldRef, DateTimeFieldType,
        DividedDateTimeField, DurationFieldRef, DurationFieldType,
        ImpreciseDurationField, MillisDurationField, PreciseDateTimeField,
        PreciseDurationField, RemainderDateTimeField, UnsupportedDurationField,
        ZeroIsMaxDateTimeField,
    },
    util::{
        arith,
        common::{
            days_from_civil, days_in_month, days_in_year, is_leap_year,
            MILLIS_PER_DAY, MILLIS_PER_HALFDAY, MILLIS_PER_HOUR,
            MILLIS_PER_MINUTE, MILLIS_PER_SECOND, MILLIS_PER_WEEK,
        },
    },
    Error,
};

/// Fills every slot the ISO calendar supports.
pub(super) fn assemble(fields: &mut Fields) {
    use self::{DateTimeFieldType as T, DurationFieldType as D};

    let precise = |ty, unit| DurationFieldRef::new(PreciseDurationField::new(ty, unit));
    let millis = MillisDurationField::instance();
    let seconds = precise(D::Seconds, MILLIS_PER_SECOND);
    let minutes = precise(D::Minutes, MILLIS_PER_MINUTE);
    let hours = precise(D::Hours, MILLIS_PER_HOUR);
    let halfdays = precise(D::Halfdays, MILLIS_PER_HALFDAY);
    let days = precise(D::Days, MILLIS_PER_DAY);
    let weeks = precise(D::Weeks, MILLIS_PER_WEEK);
    let months = DurationFieldRef::new(ImpreciseDurationField::new(
        D::Months,
        AVERAGE_MILLIS_PER_MONTH,
        MonthsUnit,
    ));
    let years = DurationFieldRef::new(ImpreciseDurationField::new(
        D::Years,
        AVERAGE_MILLIS_PER_YEAR,
        YearsUnit,
    ));
    let weekyears = DurationFieldRef::new(ImpreciseDurationField::new(
        D::Weekyears,
        AVERAGE_MILLIS_PER_YEAR,
        WeekyearsUnit,
    ));
    for field in [
        &millis, &seconds, &minutes, &hours, &halfdays, &days, &weeks,
        &months, &years, &weekyears,
    ] {
        fields.set_duration(field.clone());
    }

    let time = |ty, unit: &DurationFieldRef, range: &DurationFieldRef| {
        DateTimeFieldRef::new(PreciseDateTimeField::new(
            ty,
            unit.clone(),
            range.clone(),
        ))
    };
    let hour_of_day = time(T::HourOfDay, &hours, &days);
    let hour_of_halfday = time(T::HourOfHalfday, &hours, &halfdays);
    for field in [
        time(T::MillisOfSecond, &millis, &seconds),
        time(T::MillisOfDay, &millis, &days),
        time(T::SecondOfMinute, &seconds, &minutes),
        time(T::SecondOfDay, &seconds, &days),
        time(T::MinuteOfHour, &minutes, &hours),
        time(T::MinuteOfDay, &minutes, &days),
        time(T::HalfdayOfDay, &halfdays, &days),
        DateTimeFieldRef::new(ZeroIsMaxDateTimeField::new(
            hour_of_day.clone(),
            T::ClockhourOfDay,
        )),
        DateTimeFieldRef::new(ZeroIsMaxDateTimeField::new(
            hour_of_halfday.clone(),
            T::ClockhourOfHalfday,
        )),
        hour_of_day,
        hour_of_halfday,
    ] {
        fields.set_date_time(field);
    }

    let year = DateTimeFieldRef::new(YearField {
        years: years.clone(),
        days: days.clone(),
    });
    let weekyear = DateTimeFieldRef::new(WeekyearField {
        weekyears: weekyears.clone(),
        weeks: weeks.clone(),
    });
    let day = |kind, unit: &DurationFieldRef, range: &DurationFieldRef| {
        DateTimeFieldRef::new(DayField {
            kind,
            unit: unit.clone(),
            range: range.clone(),
        })
    };
    for field in [
        day(DayKind::OfWeek, &days, &weeks),
        day(DayKind::OfMonth, &days, &months),
        day(DayKind::OfYear, &days, &years),
        day(DayKind::WeekOfWeekyear, &weeks, &weekyears),
        DateTimeFieldRef::new(MonthOfYearField { months, years, days }),
        DateTimeFieldRef::new(YearOfEraField { year: year.clone() }),
        DateTimeFieldRef::new(EraField { year: year.clone() }),
    ] {
        fields.set_date_time(field);
    }

    let century = DividedDateTimeField::new(
        DateTimeFieldRef::new(AbsoluteYearField {
            field: year.clone(),
            ty: T::YearOfEra,
        }),
        T::CenturyOfEra,
        100,
    );
    let year_of_century = RemainderDateTimeField::new(&century, T::YearOfCentury);
    let weekyear_century = DividedDateTimeField::new(
        DateTimeFieldRef::new(AbsoluteYearField {
            field: weekyear.clone(),
            ty: T::Weekyear,
        }),
        T::CenturyOfEra,
        100,
    );
    let weekyear_of_century =
        RemainderDateTimeField::new(&weekyear_century, T::WeekyearOfCentury);
    fields.set_duration(century.duration_field());
    fields.set_date_time(DateTimeFieldRef::new(century));
    fields.set_date_time(DateTimeFieldRef::new(year_of_century));
    fields.set_date_time(DateTimeFieldRef::new(weekyear_of_century));
    fields.set_date_time(year);
    fields.set_date_time(weekyear);
}

fn year_start(year: i64) -> Result<i64, Error> {
    instant_of(days_from_civil(year, 1, 1), 0)
}

#[derive(Debug)]
struct YearField {
    years: DurationFieldRef,
    days: DurationFieldRef,
}

impl DateTimeField for YearField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::Year
    }

    fn get(&self, instant: i64) -> Result<i32, Error> {
        arith::to_i32(Civil::from_instant(instant).year)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64, Error> {
        with_year(instant, i64::from(value))
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.years.clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        None
    }

    fn leap_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.days.clone())
    }

    fn is_leap(&self, instant: i64) -> Result<bool, Error> {
        Ok(is_leap_year(Civil::from_instant(instant).year))
    }

    fn leap_amount(&self, instant: i64) -> Result<i32, Error> {
        Ok(i32::from(self.is_leap(instant)?))
    }

    fn minimum_value(&self) -> i32 {
        MIN_YEAR
    }

    fn maximum_value(&self) -> i32 {
        MAX_YEAR
    }

    fn round_floor(&self, instant: i64) -> Result<i64, Error> {
        year_start(Civil::from_instant(instant).year)
    }
}

#[derive(Debug)]
struct MonthOfYearField {
    months: DurationFieldRef,
    years: DurationFieldRef,
    days: DurationFieldRef,
}

impl DateTimeField for MonthOfYearField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::MonthOfYear
    }

    fn get(&self, instant: i64) -> Result<i32, Error> {
        arith::to_i32(Civil::from_instant(instant).month)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64, Error> {
        let month = i64::from(value);
        verify_bounds(self.name(), month, 1, 12)?;
        Civil { month, ..Civil::from_instant(instant) }.to_instant()
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.months.clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.years.clone())
    }

    fn leap_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.days.clone())
    }

    fn is_leap(&self, instant: i64) -> Result<bool, Error> {
        let civil = Civil::from_instant(instant);
        Ok(civil.month == 2 && is_leap_year(civil.year))
    }

    fn leap_amount(&self, instant: i64) -> Result<i32, Error> {
        Ok(i32::from(self.is_leap(instant)?))
    }

    fn minimum_value(&self) -> i32 {
        1
    }

    fn maximum_value(&self) -> i32 {
        12
    }

    fn round_floor(&self, instant: i64) -> Result<i64, Error> {
        let civil = Civil::from_instant(instant);
        instant_of(days_from_civil(civil.year, civil.month, 1), 0)
    }
}

/// The fields counting days or weeks within a larger unit.
#[derive(Clone, Copy, Debug)]
enum DayKind {
    OfWeek,
    OfMonth,
    OfYear,
    WeekOfWeekyear,
}

#[derive(Debug)]
struct DayField {
    kind: DayKind,
    unit: DurationFieldRef,
    range: DurationFieldRef,
}

impl DayField {
    fn unit_millis(&self) -> i64 {
        match self.kind {
            DayKind::WeekOfWeekyear => MILLIS_PER_WEEK,
            _ => MILLIS_PER_DAY,
        }
    }

    fn value(&self, instant: i64) -> i64 {
        let days = day_number(instant);
        match self.kind {
            DayKind::OfWeek => day_of_week(days),
            DayKind::OfMonth => Civil::from_instant(instant).day,
            DayKind::OfYear => {
                let year = Civil::from_instant(instant).year;
                days - days_from_civil(year, 1, 1) + 1
            }
            DayKind::WeekOfWeekyear => week_date(days).1,
        }
    }

    fn max_at(&self, instant: i64) -> i64 {
        let civil = Civil::from_instant(instant);
        match self.kind {
            DayKind::OfWeek => 7,
            DayKind::OfMonth => days_in_month(civil.year, civil.month),
            DayKind::OfYear => days_in_year(civil.year),
            DayKind::WeekOfWeekyear => {
                weeks_in_weekyear(week_date(day_number(instant)).0)
            }
        }
    }
}

impl DateTimeField for DayField {
    fn field_type(&self) -> DateTimeFieldType {
        match self.kind {
            DayKind::OfWeek => DateTimeFieldType::DayOfWeek,
            DayKind::OfMonth => DateTimeFieldType::DayOfMonth,
            DayKind::OfYear => DateTimeFieldType::DayOfYear,
            DayKind::WeekOfWeekyear => DateTimeFieldType::WeekOfWeekyear,
        }
    }

    fn get(&self, instant: i64) -> Result<i32, Error> {
        arith::to_i32(self.value(instant))
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64, Error> {
        let value = i64::from(value);
        verify_bounds(self.name(), value, 1, self.max_at(instant))?;
        let delta = (value - self.value(instant)) * self.unit_millis();
        arith::add(instant, delta)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.unit.clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.range.clone())
    }

    fn minimum_value(&self) -> i32 {
        1
    }

    fn maximum_value(&self) -> i32 {
        match self.kind {
            DayKind::OfWeek => 7,
            DayKind::OfMonth => 31,
            DayKind::OfYear => 366,
            DayKind::WeekOfWeekyear => 53,
        }
    }

    fn maximum_value_at(&self, instant: i64) -> Result<i32, Error> {
        arith::to_i32(self.max_at(instant))
    }

    fn round_floor(&self, instant: i64) -> Result<i64, Error> {
        match self.kind {
            // Weeks counted from the epoch start on Thursday.
            DayKind::WeekOfWeekyear => {
                let shift = 3 * MILLIS_PER_DAY;
                let floor =
                    arith::floor_to(arith::add(instant, shift)?, MILLIS_PER_WEEK)?;
                arith::sub(floor, shift)
            }
            _ => arith::floor_to(instant, MILLIS_PER_DAY),
        }
    }
}

#[derive(Debug)]
struct WeekyearField {
    weekyears: DurationFieldRef,
    weeks: DurationFieldRef,
}

impl DateTimeField for WeekyearField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::Weekyear
    }

    fn get(&self, instant: i64) -> Result<i32, Error> {
        arith::to_i32(week_date(day_number(instant)).0)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64, Error> {
        with_weekyear(instant, i64::from(value))
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.weekyears.clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        None
    }

    fn leap_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.weeks.clone())
    }

    fn is_leap(&self, instant: i64) -> Result<bool, Error> {
        Ok(self.leap_amount(instant)? > 0)
    }

    fn leap_amount(&self, instant: i64) -> Result<i32, Error> {
        let weekyear = week_date(day_number(instant)).0;
        arith::to_i32(weeks_in_weekyear(weekyear) - 52)
    }

    fn minimum_value(&self) -> i32 {
        MIN_YEAR
    }

    fn maximum_value(&self) -> i32 {
        MAX_YEAR
    }

    fn round_floor(&self, instant: i64) -> Result<i64, Error> {
        let weekyear = week_date(day_number(instant)).0;
        instant_of(weekyear_start(weekyear), 0)
    }
}

/// Year-of-era: `1 - year` before year 1, `year` from year 1 on.
#[derive(Debug)]
struct YearOfEraField {
    year: DateTimeFieldRef,
}

impl DateTimeField for YearOfEraField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::YearOfEra
    }

    fn get(&self, instant: i64) -> Result<i32, Error> {
        let year = self.year.get(instant)?;
        Ok(if year <= 0 { 1 - year } else { year })
    }

    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error> {
        self.year.add(instant, amount)
    }

    fn difference_as_i64(
        &self,
        minuend: i64,
        subtrahend: i64,
    ) -> Result<i64, Error> {
        self.year.difference_as_i64(minuend, subtrahend)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64, Error> {
        verify_bounds(
            self.name(),
            i64::from(value),
            1,
            i64::from(self.maximum_value()),
        )?;
        let year = if self.year.get(instant)? <= 0 { 1 - value } else { value };
        self.year.set(instant, year)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.year.duration_field()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        Some(UnsupportedDurationField::instance(DurationFieldType::Eras))
    }

    fn minimum_value(&self) -> i32 {
        1
    }

    fn maximum_value(&self) -> i32 {
        1 - MIN_YEAR
    }

    fn round_floor(&self, instant: i64) -> Result<i64, Error> {
        self.year.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64, Error> {
        self.year.round_ceiling(instant)
    }

    fn remainder(&self, instant: i64) -> Result<i64, Error> {
        self.year.remainder(instant)
    }
}

/// The era: `0` (BC) for years `0` and below, `1` (AD) from year 1 on.
#[derive(Debug)]
struct EraField {
    year: DateTimeFieldRef,
}

impl EraField {
    const BC: i32 = 0;
    const AD: i32 = 1;
}

impl DateTimeField for EraField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::Era
    }

    fn get(&self, instant: i64) -> Result<i32, Error> {
        Ok(if self.year.get(instant)? <= 0 { EraField::BC } else { EraField::AD })
    }

    fn text_for_value(&self, value: i32) -> String {
        match value {
            EraField::BC => "BC".to_string(),
            EraField::AD => "AD".to_string(),
            other => other.to_string(),
        }
    }

    fn value_for_text(&self, text: &str) -> Result<i32, Error> {
        let era = ["BC", "BCE", "0"]
            .iter()
            .any(|name| text.eq_ignore_ascii_case(name))
            .then_some(EraField::BC)
            .or_else(|| {
                ["AD", "CE", "1"]
                    .iter()
                    .any(|name| text.eq_ignore_ascii_case(name))
                    .then_some(EraField::AD)
            });
        era.ok_or_else(|| {
            E::InvalidText { name: self.name(), text: text.into() }.into()
        })
    }

    fn maximum_text_len(&self) -> usize {
        2
    }

    /// Switching eras negates the year, so 2024 AD becomes the year -2024,
    /// which is 2025 BC. Year zero has no mirror image and becomes 1 AD.
    fn set(&self, instant: i64, value: i32) -> Result<i64, Error> {
        verify_bounds(
            self.name(),
            i64::from(value),
            i64::from(EraField::BC),
            i64::from(EraField::AD),
        )?;
        if self.get(instant)? == value {
            return Ok(instant);
        }
        let year = self.year.get(instant)?;
        self.year.set(instant, if year == 0 { 1 } else { -year })
    }

    fn duration_field(&self) -> DurationFieldRef {
        UnsupportedDurationField::instance(DurationFieldType::Eras)
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        None
    }

    fn minimum_value(&self) -> i32 {
        EraField::BC
    }

    fn maximum_value(&self) -> i32 {
        EraField::AD
    }

    fn round_floor(&self, instant: i64) -> Result<i64, Error> {
        if self.get(instant)? == EraField::AD {
            year_start(1)
        } else {
            Ok(i64::MIN)
        }
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64, Error> {
        if self.get(instant)? == EraField::BC {
            year_start(1)
        } else {
            Ok(i64::MAX)
        }
    }

    fn round_half_floor(&self, instant: i64) -> Result<i64, Error> {
        self.round_floor(instant)
    }

    fn round_half_ceiling(&self, instant: i64) -> Result<i64, Error> {
        self.round_floor(instant)
    }

    fn round_half_even(&self, instant: i64) -> Result<i64, Error> {
        self.round_floor(instant)
    }
}

/// Reads a year-like field without its sign, for dividing into centuries.
/// Setting keeps the sign of the current value.
#[derive(Debug)]
struct AbsoluteYearField {
    field: DateTimeFieldRef,
    ty: DateTimeFieldType,
}

impl DateTimeField for AbsoluteYearField {
    fn field_type(&self) -> DateTimeFieldType {
        self.ty
    }

    fn get(&self, instant: i64) -> Result<i32, Error> {
        Ok(self.field.get(instant)?.abs())
    }

    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error> {
        self.field.add(instant, amount)
    }

    fn difference_as_i64(
        &self,
        minuend: i64,
        subtrahend: i64,
    ) -> Result<i64, Error> {
        self.field.difference_as_i64(minuend, subtrahend)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64, Error> {
        verify_bounds(
            self.name(),
            i64::from(value),
            0,
            i64::from(self.maximum_value()),
        )?;
        let value = if self.field.get(instant)? < 0 { -value } else { value };
        self.field.set(instant, value)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.field.duration_field()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        None
    }

    fn minimum_value(&self) -> i32 {
        0
    }

    fn maximum_value(&self) -> i32 {
        self.field.maximum_value().max(-self.field.minimum_value())
    }

    fn round_floor(&self, instant: i64) -> Result<i64, Error> {
        self.field.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64, Error> {
        self.field.round_ceiling(instant)
    }

    fn remainder(&self, instant: i64) -> Result<i64, Error> {
        self.field.remainder(instant)
    }
}
