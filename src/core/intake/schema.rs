//! Review payload validation.
//!
//! Checks run in schema order and stop at the first failure, which is
//! reported with the dotted path of the offending field.

use chrono::{Days, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::core::error::{Result, ReviewError};
use crate::core::types::{Dispensor, Drink, Rating, Restaurant, ReviewPayload};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    )
    .expect("email pattern is valid")
});

const DATE_EXTENDED: &str = r"(?P<year>(?:[+-]\d{2})?\d{4})(?:-(?:(?P<month>\d{2})(?:-(?P<day>\d{2}))?|W(?P<week>\d{2})(?:-(?P<weekday>[1-7]))?|(?P<ordinal>\d{3})))?";
const DATE_BASIC: &str = r"(?P<year>(?:[+-]\d{2})?\d{4})(?:(?P<month>\d{2})(?P<day>\d{2})|W(?P<week>\d{2})(?P<weekday>[1-7])?|(?P<ordinal>\d{3}))";
const TIME_EXTENDED: &str = r"(?P<hour>\d{2})(?::(?P<minute>\d{2})(?::(?P<second>\d{2}))?)?(?P<fraction>[.,]\d+)?";
const TIME_BASIC: &str = r"(?P<hour>\d{2})(?:(?P<minute>\d{2})(?P<second>\d{2})?)?(?P<fraction>[.,]\d+)?";
const ZONE: &str = r"(?:Z|[+-](?P<zone_hour>\d{2})(?::?(?P<zone_minute>\d{2}))?)";

/// ISO-8601 layouts: extended or basic date, each with an optional
/// extended or basic time and zone
static ISO_DATE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [DATE_EXTENDED, DATE_BASIC]
        .iter()
        .flat_map(|date| {
            [TIME_EXTENDED, TIME_BASIC].into_iter().map(move |time| {
                Regex::new(&format!("^{date}(?:[T ]{time}{ZONE}?)?$"))
                    .expect("ISO-8601 pattern is valid")
            })
        })
        .collect()
});

/// Check email address syntax
pub fn is_valid_email(value: &str) -> bool {
    value.len() <= 254 && EMAIL_RE.is_match(value)
}

/// Check that a string is an ISO-8601 date or timestamp
///
/// Calendar dates, week dates and ordinal dates are accepted in
/// extended or basic form. The date must exist on the calendar.
pub fn is_iso_date(value: &str) -> bool {
    ISO_DATE_RES
        .iter()
        .filter_map(|re| re.captures(value))
        .any(|caps| is_real_date(&caps) && is_real_time(&caps))
}

fn number<T: std::str::FromStr>(caps: &Captures<'_>, name: &str) -> Option<T> {
    caps.name(name).and_then(|m| m.as_str().parse().ok())
}

fn is_real_date(caps: &Captures<'_>) -> bool {
    let Some(year) = number::<i32>(caps, "year") else {
        return false;
    };

    let date = if let Some(month) = number::<u32>(caps, "month") {
        NaiveDate::from_ymd_opt(year, month, number(caps, "day").unwrap_or(1))
    } else if let Some(week) = number::<u32>(caps, "week") {
        let offset = number::<u64>(caps, "weekday").unwrap_or(1) - 1;
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
            .and_then(|monday| monday.checked_add_days(Days::new(offset)))
    } else if let Some(ordinal) = number::<u32>(caps, "ordinal") {
        NaiveDate::from_yo_opt(year, ordinal)
    } else {
        NaiveDate::from_ymd_opt(year, 1, 1)
    };

    date.is_some()
}

fn is_real_time(caps: &Captures<'_>) -> bool {
    let Some(hour) = number::<u32>(caps, "hour") else {
        return true;
    };
    let minute = number::<u32>(caps, "minute").unwrap_or(0);
    let second = number::<u32>(caps, "second").unwrap_or(0);

    let clock_ok = if hour == 24 {
        minute == 0 && second == 0 && caps.name("fraction").is_none()
    } else {
        hour < 24 && minute < 60 && second < 60
    };

    let zone_ok = number::<u32>(caps, "zone_hour").map_or(true, |h| h < 24)
        && number::<u32>(caps, "zone_minute").map_or(true, |m| m < 60);

    clock_ok && zone_ok
}

fn check_rating(field: &str, rating: &Rating) -> Result<()> {
    let value = rating.value();
    if !value.is_finite() {
        return Err(ReviewError::validation(field, "must be a number"));
    }
    if value < Rating::MIN {
        return Err(ReviewError::validation(
            field,
            "must be greater than or equal to 0",
        ));
    }
    if value > Rating::MAX {
        return Err(ReviewError::validation(
            field,
            "must be less than or equal to 10",
        ));
    }
    Ok(())
}

fn check_required(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ReviewError::validation(field, "is not allowed to be empty"));
    }
    Ok(())
}

fn check_restaurant(restaurant: &Restaurant) -> Result<()> {
    check_required("restaurant.name", &restaurant.name)?;
    check_required("restaurant.location", &restaurant.location)?;
    check_rating("restaurant.rating", &restaurant.rating)
}

fn check_drink(index: usize, drink: &Drink) -> Result<()> {
    check_required(&format!("drinks[{index}].name"), &drink.name)?;
    check_rating(&format!("drinks[{index}].rating"), &drink.rating)
}

fn check_dispensor(dispensor: &Dispensor) -> Result<()> {
    for (index, attribute) in dispensor.attributes.iter().enumerate() {
        check_required(&format!("dispensor.attributes[{index}]"), attribute)?;
    }
    check_rating("dispensor.expRating", &dispensor.exp_rating)?;
    check_rating("dispensor.cleanRating", &dispensor.clean_rating)
}

impl ReviewPayload {
    /// Validate field constraints, returning the first violation
    pub fn validate(&self) -> Result<()> {
        if !is_valid_email(&self.user_email) {
            return Err(ReviewError::validation(
                "userEmail",
                "must be a valid email",
            ));
        }

        if !is_iso_date(&self.date_visited) {
            return Err(ReviewError::validation(
                "dateVisited",
                "must be a valid ISO 8601 date",
            ));
        }

        check_rating("overallRating", &self.overall_rating)?;
        check_restaurant(&self.restaurant)?;

        for (index, drink) in self.drinks.iter().enumerate() {
            check_drink(index, drink)?;
        }

        check_dispensor(&self.dispensor)
    }
}
