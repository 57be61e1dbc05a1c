//! Response shapes of the VersionEye API v2 endpoints used here.

use serde::{Deserialize, Deserializer};
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// `GET /me/notifications` body.
#[derive(Clone, Debug, Deserialize)]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Notification {
    /// None when the API sent no timestamp or one we cannot read.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<OffsetDateTime>,
    /// Reported by the API but not reliable; filtering uses `created_at` only.
    #[serde(default)]
    pub read: bool,
    pub product: Product,
    pub version: String,
}

/// RFC 3339 first, then `2016-04-02 09:00:00 UTC` and offset-less ISO times read as UTC.
pub fn parse_timestamp(s: &str) -> Option<OffsetDateTime> {
    let s = s.trim();
    if let Ok(t) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(t);
    }
    let utc_suffixed = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    let naive_iso = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    PrimitiveDateTime::parse(s, utc_suffixed)
        .or_else(|_| PrimitiveDateTime::parse(s, naive_iso))
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(parse_timestamp))
}

#[derive(Clone, Debug, Deserialize)]
pub struct Product {
    pub prod_key: String,
    pub language: String,
    pub name: String,
}

/// Opaque project identifier. Accepts `"abc"` and `{"$oid": "abc"}`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "RawProjectId")]
pub struct ProjectId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProjectId {
    Plain(String),
    Oid {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl From<RawProjectId> for ProjectId {
    fn from(raw: RawProjectId) -> Self {
        match raw {
            RawProjectId::Plain(id) | RawProjectId::Oid { oid: id } => ProjectId(id),
        }
    }
}

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        ProjectId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of `GET /projects`.
#[derive(Clone, Debug, Deserialize)]
pub struct ProjectRef {
    #[serde(alias = "_id")]
    pub id: ProjectId,
    pub name: String,
}

/// `GET /projects/{id}` body, reduced to the health counters.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProjectDetail {
    #[serde(default, rename = "out_number_sum")]
    pub outdated: u64,
    #[serde(default, rename = "licenses_red_sum")]
    pub licenses_red: u64,
    #[serde(default, rename = "licenses_unknown_sum")]
    pub licenses_unknown: u64,
    #[serde(default, rename = "sv_count_sum")]
    pub security: u64,
}
