//! Server-side identifiers for submissions that do not carry their own

use chrono::{DateTime, Utc};

const LEAD_PREFIX: &str = "LEAD";
const DOCTOR_PREFIX: &str = "DOCTOR";
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `LEAD_<epoch-millis>_<suffix>`
pub fn lead_id(now: DateTime<Utc>) -> String {
    generate(LEAD_PREFIX, now, 6)
}

/// `DOCTOR_<epoch-millis>_<suffix>`
pub fn doctor_application_id(now: DateTime<Utc>) -> String {
    generate(DOCTOR_PREFIX, now, 9)
}

fn generate(prefix: &str, now: DateTime<Utc>, suffix_len: usize) -> String {
    format!(
        "{prefix}_{}_{}",
        now.timestamp_millis(),
        random_suffix(suffix_len)
    )
}

fn random_suffix(len: usize) -> String {
    (0..len)
        .map(|_| char::from(BASE36[fastrand::usize(..BASE36.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_lead_id_shape() {
        let now = Utc.timestamp_millis_opt(1_760_000_000_123).unwrap();
        let id = lead_id(now);
        let parts: Vec<&str> = id.split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "LEAD");
        assert_eq!(parts[1], "1760000000123");
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_doctor_id_suffix() {
        let id = doctor_application_id(Utc::now());
        assert!(id.starts_with("DOCTOR_"));
        assert_eq!(id.rsplit('_').next().map(str::len), Some(9));
    }

    #[test]
    fn test_ids_differ_within_same_millisecond() {
        let now = Utc::now();
        assert_ne!(lead_id(now), lead_id(now));
    }
}
