//! Time utilities: the "today" used for date fallback is resolved in the
//! user's configured timezone, not the server's.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

/// Today's calendar date in an IANA timezone like "America/Chicago".
pub fn today_in(tz: &str) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(Utc::now().with_timezone(&tz).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_timezones_resolve() {
        assert!(today_in("UTC").is_ok());
        assert!(today_in("America/Chicago").is_ok());
    }

    #[test]
    fn test_invalid_timezone_errors() {
        assert!(today_in("Mars/Olympus_Mons").is_err());
    }
}
