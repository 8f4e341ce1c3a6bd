use chrono::{DateTime, FixedOffset, Local};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f %z";

/// Builds `<prefix><timestamp>` object names. Timestamps never repeat within
/// one process: a clock that stalls or steps backwards is nudged forward by a
/// nanosecond past the previous name.
#[derive(Debug, Clone)]
pub struct ObjectNamer {
    prefix: String,
    last_timestamp: Option<DateTime<FixedOffset>>,
}

impl ObjectNamer {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            last_timestamp: None,
        }
    }

    pub fn next_name(&mut self) -> String {
        self.name_at(Local::now().fixed_offset())
    }

    pub fn name_at(&mut self, now: DateTime<FixedOffset>) -> String {
        let timestamp = match self.last_timestamp {
            Some(last) if now <= last => last + chrono::Duration::nanoseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(timestamp);

        let rendered = timestamp.format(TIMESTAMP_FORMAT).to_string();
        format!("{}{}", self.prefix, rendered.replace(' ', "_"))
    }
}

pub fn default_object_prefix(root: &str, location_name: &str) -> String {
    format!("{}/{}/", root.trim_end_matches('/'), location_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    #[test]
    fn test_name_at_composes_prefix_and_underscored_timestamp() {
        let mut namer = ObjectNamer::with_prefix("parkingspots/imgs/300ThirdStreet/");

        let name = namer.name_at(at("2014-03-01T09:15:30.000000042-08:00"));

        assert_eq!(
            name,
            "parkingspots/imgs/300ThirdStreet/2014-03-01_09:15:30.000000042_-0800"
        );
        assert!(!name.contains(' '));
    }

    #[test]
    fn test_consecutive_names_differ_when_clock_stalls() {
        let mut namer = ObjectNamer::with_prefix("imgs/");
        let instant = at("2014-03-01T09:15:30-08:00");

        let first = namer.name_at(instant);
        let second = namer.name_at(instant);

        assert_ne!(first, second);
        assert!(second.ends_with("30.000000001_-0800"));
    }

    #[test]
    fn test_names_keep_moving_forward_when_clock_steps_back() {
        let mut namer = ObjectNamer::with_prefix("imgs/");

        let first = namer.name_at(at("2014-03-01T09:15:30-08:00"));
        let second = namer.name_at(at("2014-03-01T09:00:00-08:00"));
        let third = namer.name_at(at("2014-03-01T09:20:00-08:00"));

        assert!(first < second);
        assert!(second < third);
    }

    #[test]
    fn test_long_run_produces_no_collisions() {
        let mut namer = ObjectNamer::with_prefix("imgs/");
        let instant = at("2014-03-01T09:15:30-08:00");

        let names: std::collections::HashSet<String> =
            (0..1000).map(|_| namer.name_at(instant)).collect();

        assert_eq!(names.len(), 1000);
    }

    #[test]
    fn test_default_object_prefix_joins_root_and_location() {
        assert_eq!(
            default_object_prefix("parkingspots/imgs/", "300ThirdStreet"),
            "parkingspots/imgs/300ThirdStreet/"
        );
    }
}
