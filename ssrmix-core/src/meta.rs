//! The two synthetic records heading every subscription payload.
//!
//! Line 0 carries quota in its remarks (`剩余流量：50%  10GB`), line 1 the
//! expiry (`过期时间：2030-01-01 00:00:00`). Both are shaped like regular
//! links, so they go through [`NodeDescriptor::parse`] just to reach the
//! remarks.

use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;
use time::macros::format_description;
use time::{PrimitiveDateTime, UtcOffset};
use tracing::warn;

use crate::codec;
use crate::error::{Result, SsrError};
use crate::node::NodeDescriptor;

/// Full-width colon preceding the payload in both metadata remarks.
pub const META_SEPARATOR: char = '：';

pub const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

fn after_separator(remarks: &str) -> &str {
    remarks.rsplit(META_SEPARATOR).next().unwrap_or(remarks).trim()
}

/// Quota figures in gigabytes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Quota {
    pub used_percent: f64,
    pub remaining: f64,
}

impl Quota {
    pub fn parse(remarks: &str) -> Result<Self> {
        let err = |reason: String| SsrError::QuotaParse {
            remarks: remarks.to_string(),
            reason,
        };

        let body = after_separator(remarks);
        let mut fields = body.split_whitespace();
        let (Some(percent_txt), Some(remaining_txt)) = (fields.next(), fields.last()) else {
            return Err(err("expected `<percent>% <remaining><unit>`".into()));
        };

        let used_percent: f64 = percent_txt
            .trim_end_matches('%')
            .parse()
            .map_err(|e| err(format!("percent {percent_txt:?}: {e}")))?;
        if !used_percent.is_finite() || used_percent <= 0.0 {
            return Err(err(format!("percent must be positive, got {used_percent}")));
        }

        let number = remaining_txt.trim_end_matches(|c: char| c.is_ascii_alphabetic());
        let unit = &remaining_txt[number.len()..];
        let scale = unit_to_gb(unit).ok_or_else(|| err(format!("unknown unit {unit:?}")))?;
        let remaining: f64 = number
            .parse()
            .map_err(|e| err(format!("remaining {remaining_txt:?}: {e}")))?;
        if !remaining.is_finite() {
            return Err(err(format!("remaining {remaining_txt:?} is not finite")));
        }

        Ok(Self {
            used_percent,
            remaining: remaining * scale,
        })
    }

    pub fn total(&self) -> f64 {
        self.remaining / (self.used_percent / 100.0)
    }

    /// Consumed quota, not a transfer figure.
    pub fn download(&self) -> f64 {
        self.total() - self.remaining
    }
}

fn unit_to_gb(unit: &str) -> Option<f64> {
    match unit.to_ascii_uppercase().as_str() {
        "" | "G" | "GB" => Some(1.0),
        "K" | "KB" => Some(1.0 / (1024.0 * 1024.0)),
        "M" | "MB" => Some(1.0 / 1024.0),
        "T" | "TB" => Some(1024.0),
        _ => None,
    }
}

/// Zone the expiry wall-clock time is read in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpiryZone {
    /// System zone, using the offset in force on the expiry date itself.
    Local,
    Fixed(UtcOffset),
}

/// Parse `YYYY-MM-DD HH:MM:SS` after the separator into a Unix timestamp.
///
/// With [`ExpiryZone::Local`] a time repeated by a DST fold resolves to the
/// earlier instant; a time skipped by a DST gap is a `DateParse` error.
pub fn parse_expiry(remarks: &str, zone: ExpiryZone) -> Result<i64> {
    let text = after_separator(remarks);
    let err = |reason: String| SsrError::DateParse {
        text: text.to_string(),
        reason,
    };
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let dt = PrimitiveDateTime::parse(text, format).map_err(|e| err(e.to_string()))?;
    match zone {
        ExpiryZone::Fixed(offset) => Ok(dt.assume_offset(offset).unix_timestamp()),
        ExpiryZone::Local => local_timestamp(dt)
            .ok_or_else(|| err("time does not exist in the local zone".into())),
    }
}

fn local_timestamp(dt: PrimitiveDateTime) -> Option<i64> {
    let naive: NaiveDateTime =
        NaiveDate::from_ymd_opt(dt.year(), u8::from(dt.month()).into(), dt.day().into())?
            .and_hms_opt(dt.hour().into(), dt.minute().into(), dt.second().into())?;
    let resolved = Local.from_local_datetime(&naive);
    match (resolved.clone().earliest(), resolved.latest()) {
        (Some(early), Some(late)) if early != late => {
            warn!(%naive, "expiry falls in a DST fold; using the earlier instant");
            Some(early.timestamp())
        }
        (Some(t), _) => Some(t.timestamp()),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SubscriptionMeta {
    pub quota: Quota,
    pub expire: i64,
}

impl SubscriptionMeta {
    pub fn from_lines(quota_line: &str, expiry_line: &str, zone: ExpiryZone) -> Result<Self> {
        let quota = Quota::parse(&NodeDescriptor::parse(quota_line)?.remarks)?;
        let expire = parse_expiry(&NodeDescriptor::parse(expiry_line)?.remarks, zone)?;
        Ok(Self { quota, expire })
    }

    pub fn usage(&self) -> UsageInfo {
        UsageInfo {
            upload: 0.0,
            download: self.quota.download() * GIB,
            total: self.quota.total() * GIB,
            expire: self.expire,
        }
    }
}

/// Byte counts and expiry, rendered as the `Subscription-Userinfo` value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct UsageInfo {
    pub upload: f64,
    pub download: f64,
    pub total: f64,
    pub expire: i64,
}

impl UsageInfo {
    /// Base64-wrapped form handed to the storage sink as a header value.
    pub fn header_value(&self) -> String {
        codec::encode(&self.to_string())
    }
}

impl fmt::Display for UsageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "upload={}; download={}; total={}; expire={}",
            self.upload, self.download, self.total, self.expire
        )
    }
}
