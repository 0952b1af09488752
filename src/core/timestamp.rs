use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Wire format of every vendor timestamp (`timestamp`, `notify_time`, `send_pay_date`)
pub const VENDOR_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp the way the gateway expects it
pub fn format_vendor_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format(VENDOR_TIMESTAMP_FORMAT).to_string()
}

/// Local wall-clock time at the moment of the call
pub fn vendor_timestamp_now() -> String {
    format_vendor_timestamp(&Local::now())
}

/// Parse a vendor timestamp. The vendor sends no offset, so the result is naive.
pub fn parse_vendor_timestamp(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value.trim(), VENDOR_TIMESTAMP_FORMAT)
        .map_err(|e| format!("invalid vendor timestamp '{}': {}", value, e))
}
