//! Contact types, the unit of the on-disk contact store.
//!
//! A contact is persisted as one pretty-printed JSON document. Field names are
//! part of the on-disk format and must stay stable.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Type tag applied when a provider supplies none.
pub const DEFAULT_TYPE: &str = "other";

// ─── Uid provenance ──────────────────────────────────────────────────────────

/// Whether a uid was assigned by a provider rather than generated locally.
///
/// Locally generated uids are hyphenated UUIDs; provider uids are the trailing
/// segment of the provider's resource name and never contain a hyphen.
pub fn is_provider_uid(uid: &str) -> bool { !uid.contains('-') }

// ─── Repeated-value entries ──────────────────────────────────────────────────

/// A telephone number with its type tag (e.g. "mobile", "home", "work").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
  pub value: String,
  #[serde(rename = "type")]
  pub kind:  String,
}

/// An email address with its type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
  pub value: String,
  #[serde(rename = "type")]
  pub kind:  String,
}

/// A postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub street:      String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub city:        String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub state:       String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub postal_code: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub country:     String,
  #[serde(rename = "type")]
  pub kind:        String,
}

/// Work information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub name:       String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub title:      String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub department: String,
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A person in the local contact store.
///
/// `last_modified` is stamped only by local writes and `last_synced` only by
/// provider-originated writes; neither path touches the other's field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
  pub uid:  String,
  #[serde(default)]
  pub etag: String,
  #[serde(default)]
  pub url:  String,

  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub given_name:  String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub family_name: String,
  #[serde(default)]
  pub full_name:   String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub nickname:    String,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub phone_numbers:   Vec<PhoneNumber>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub email_addresses: Vec<EmailAddress>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub addresses:       Vec<Address>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub organization: Option<Organization>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub birthday:    Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub anniversary: Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub photo_url:   String,

  /// User-defined labels; never supplied by a provider.
  #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
  pub tags:  BTreeSet<String>,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub notes: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_modified: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_synced:   Option<DateTime<Utc>>,
}

impl Contact {
  /// The first mobile/cell number, else the first number, else `""`.
  pub fn primary_phone(&self) -> &str {
    self
      .phone_numbers
      .iter()
      .find(|p| p.kind == "mobile" || p.kind == "cell")
      .or_else(|| self.phone_numbers.first())
      .map(|p| p.value.as_str())
      .unwrap_or_default()
  }

  /// The first email address, else `""`.
  pub fn primary_email(&self) -> &str {
    self
      .email_addresses
      .first()
      .map(|e| e.value.as_str())
      .unwrap_or_default()
  }

  pub fn is_provider_contact(&self) -> bool { is_provider_uid(&self.uid) }

  /// Name used for sorting and display; falls back to given + family.
  pub fn display_name(&self) -> String {
    if !self.full_name.is_empty() {
      return self.full_name.clone();
    }
    [self.given_name.as_str(), self.family_name.as_str()]
      .into_iter()
      .filter(|s| !s.is_empty())
      .collect::<Vec<_>>()
      .join(" ")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn phone(value: &str, kind: &str) -> PhoneNumber {
    PhoneNumber { value: value.into(), kind: kind.into() }
  }

  #[test]
  fn primary_phone_prefers_mobile() {
    let c = Contact {
      phone_numbers: vec![phone("1", "home"), phone("2", "mobile")],
      ..Contact::default()
    };
    assert_eq!(c.primary_phone(), "2");
  }

  #[test]
  fn primary_phone_accepts_cell() {
    let c = Contact {
      phone_numbers: vec![phone("1", "work"), phone("3", "cell")],
      ..Contact::default()
    };
    assert_eq!(c.primary_phone(), "3");
  }

  #[test]
  fn primary_phone_falls_back_to_first() {
    let c = Contact {
      phone_numbers: vec![phone("1", "home")],
      ..Contact::default()
    };
    assert_eq!(c.primary_phone(), "1");
  }

  #[test]
  fn primary_phone_empty() {
    assert_eq!(Contact::default().primary_phone(), "");
  }

  #[test]
  fn primary_email_is_first_entry() {
    let c = Contact {
      email_addresses: vec![
        EmailAddress { value: "a@example.com".into(), kind: "work".into() },
        EmailAddress { value: "b@example.com".into(), kind: "home".into() },
      ],
      ..Contact::default()
    };
    assert_eq!(c.primary_email(), "a@example.com");
    assert_eq!(Contact::default().primary_email(), "");
  }

  #[test]
  fn uid_provenance() {
    assert!(is_provider_uid("c8935729599066447265"));
    assert!(is_provider_uid("1234"));
    assert!(!is_provider_uid("3f1c2a9e-8d4b-4c1e-9a57-0b6d2f4e8c11"));
  }

  #[test]
  fn empty_optional_fields_are_omitted_on_disk() {
    let c = Contact {
      uid: "42".into(),
      full_name: "Ada Lovelace".into(),
      ..Contact::default()
    };
    let json = serde_json::to_value(&c).unwrap();
    let obj = json.as_object().unwrap();
    assert!(obj.contains_key("uid"));
    assert!(obj.contains_key("full_name"));
    assert!(!obj.contains_key("phone_numbers"));
    assert!(!obj.contains_key("last_modified"));
    assert!(!obj.contains_key("tags"));
  }

  #[test]
  fn type_tags_use_type_key() {
    let json = serde_json::to_string(&phone("555", "mobile")).unwrap();
    assert_eq!(json, r#"{"value":"555","type":"mobile"}"#);
  }

  #[test]
  fn display_name_falls_back_to_parts() {
    let c = Contact {
      given_name: "Grace".into(),
      family_name: "Hopper".into(),
      ..Contact::default()
    };
    assert_eq!(c.display_name(), "Grace Hopper");
  }
}
