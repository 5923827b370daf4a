use chrono::{DateTime, Local, Utc};

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const MS_IN_MIN: i64 = Self::MS_IN_S * 60;
    pub const MS_IN_15_MIN: i64 = Self::MS_IN_S * 60 * 15;
    pub const MS_IN_H: i64 = Self::MS_IN_MIN * 60;
    pub const MS_IN_4_H: i64 = Self::MS_IN_MIN * 60 * 4;
    pub const MS_IN_D: i64 = Self::MS_IN_H * 24;
    pub const CLOCK_TIME_FORMAT: &str = "%H:%M:%S";

    /// Wall-clock rendering of a UTC timestamp in the local zone. Display only.
    pub fn utc_to_local_clock(at: DateTime<Utc>) -> String {
        at.with_timezone(&Local)
            .format(Self::CLOCK_TIME_FORMAT)
            .to_string()
    }

    /// Whole seconds elapsed since `past`, clamped at zero.
    pub fn seconds_since(past: DateTime<Utc>) -> i64 {
        (Utc::now() - past).num_seconds().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime};

    #[test]
    fn local_clock_uses_clock_format() {
        let rendered = TimeUtils::utc_to_local_clock(Utc::now());
        assert_eq!(rendered.len(), 8);
        assert!(NaiveTime::parse_from_str(&rendered, TimeUtils::CLOCK_TIME_FORMAT).is_ok());
    }

    #[test]
    fn seconds_since_never_negative() {
        let future = Utc::now() + Duration::seconds(30);
        assert_eq!(TimeUtils::seconds_since(future), 0);

        let past = Utc::now() - Duration::seconds(90);
        assert!(TimeUtils::seconds_since(past) >= 90);
    }
}
