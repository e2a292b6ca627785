//! Field codecs for the persisted JSON shapes.
//!
//! Earlier builds stored form values verbatim: absent dates and times as
//! `""` and durations as numeric strings. Readers accept those shapes;
//! writers emit dates as `YYYY-MM-DD`, times as `HH:MM` and absent values
//! as `""`.

pub(crate) mod optional_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => s.collect_str(&date.format(FORMAT)),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveDate::parse_from_str(text, FORMAT)
                .map(Some)
                .map_err(de::Error::custom),
        }
    }
}

pub(crate) mod optional_time {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => s.collect_str(&time.format(FORMAT)),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveTime::parse_from_str(text, FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
                .map(Some)
                .map_err(de::Error::custom),
        }
    }
}

pub(crate) mod lenient_minutes {
    use serde::de::{self, Visitor};
    use serde::Deserializer;
    use std::fmt::Formatter;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        d.deserialize_any(MinutesVisitor)
    }

    struct MinutesVisitor;

    impl<'de> Visitor<'de> for MinutesVisitor {
        type Value = u32;

        fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "a non-negative whole number of minutes")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u32, E> {
            u32::try_from(value).map_err(|_| E::custom("minutes out of range"))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u32, E> {
            u32::try_from(value).map_err(|_| E::custom("minutes out of range"))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<u32, E> {
            if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) {
                Ok(value as u32)
            } else {
                Err(E::custom("minutes must be a whole number"))
            }
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<u32, E> {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed
                .parse::<u32>()
                .map_err(|_| E::custom("minutes must be a whole number"))
        }
    }
}


/// Date lists that must hold each day once. Later repeats are dropped,
/// first-seen order is kept.
pub(crate) mod unique_dates {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};
    use std::collections::BTreeSet;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<NaiveDate>, D::Error> {
        let mut dates = Vec::<NaiveDate>::deserialize(d)?;
        let mut seen = BTreeSet::new();
        dates.retain(|date| seen.insert(*date));
        Ok(dates)
    }
}
