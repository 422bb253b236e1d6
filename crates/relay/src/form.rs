//! Website booking form payload.

use std::fmt;

use serde::{Deserialize, Deserializer};
use sheet_store::{BookingSource, NewBooking};

/// Raw booking payload, accepted as JSON or form-encoded.
///
/// Every field is optional on the wire; [`BookingForm::into_booking`]
/// enforces the required ones.
///
/// Numeric and boolean values are accepted and kept as text, so a phone sent
/// as a JSON number still counts as present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingForm {
    #[serde(default, alias = "name", deserialize_with = "text_field")]
    pub fullname: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub service: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub source: Option<String>,
}

/// A scalar field value as sent by the client.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Int(n) => n.to_string(),
            Self::Uint(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

fn text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_text))
}

/// Required fields absent from a [`BookingForm`], by display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields(pub Vec<&'static str>);

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thiếu thông tin: {}", self.0.join(", "))
    }
}

impl std::error::Error for MissingFields {}

fn filled(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_source(value: Option<&str>) -> BookingSource {
    match value.map(|v| v.trim().to_lowercase()).as_deref() {
        Some("telegram") => BookingSource::Telegram,
        Some("zalo") => BookingSource::Zalo,
        _ => BookingSource::Website,
    }
}

impl BookingForm {
    /// Whether the payload carried no fields at all.
    pub fn is_empty(&self) -> bool {
        [
            &self.fullname,
            &self.phone,
            &self.email,
            &self.service,
            &self.date,
            &self.time,
            &self.note,
        ]
        .iter()
        .all(|v| v.as_deref().map_or(true, |s| s.trim().is_empty()))
    }

    /// Validate required fields and build the booking.
    pub fn into_booking(self) -> Result<NewBooking, MissingFields> {
        let source = parse_source(self.source.as_deref());
        let fullname = filled(self.fullname);
        let phone = filled(self.phone);
        let service = filled(self.service);
        let date = filled(self.date);
        let time = filled(self.time);

        let mut missing = Vec::new();
        for (value, label) in [
            (&fullname, "Họ tên"),
            (&phone, "Số điện thoại"),
            (&service, "Dịch vụ"),
            (&date, "Ngày"),
            (&time, "Giờ"),
        ] {
            if value.is_none() {
                missing.push(label);
            }
        }

        match (fullname, phone, service, date, time) {
            (Some(fullname), Some(phone), Some(service), Some(date), Some(time)) => {
                Ok(NewBooking {
                    fullname,
                    phone,
                    service,
                    date,
                    time,
                    email: filled(self.email),
                    note: filled(self.note),
                    source,
                })
            }
            _ => Err(MissingFields(missing)),
        }
    }
}
