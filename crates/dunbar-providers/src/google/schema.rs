//! Wire types for the Google People API.
//!
//! The same structs serve both directions: decoding `connections.list`
//! responses and encoding `createContact` / `updateContact` bodies.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub resource_name:   String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub etag:            String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metadata:        Option<PersonMetadata>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub names:           Vec<Name>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub phone_numbers:   Vec<TypedValue>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub email_addresses: Vec<TypedValue>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub addresses:       Vec<PostalAddress>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub organizations:   Vec<Organization>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub birthdays:       Vec<Birthday>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub photos:          Vec<Photo>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub biographies:     Vec<Biography>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonMetadata {
  /// Set on persons returned by an incremental listing that were removed.
  #[serde(default)]
  pub deleted: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub display_name:      String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub given_name:        String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub family_name:       String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub unstructured_name: String,
}

/// Phone numbers and email addresses share this shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypedValue {
  #[serde(default)]
  pub value: String,
  #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
  pub kind:  String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub street_address: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub city:           String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub region:         String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub postal_code:    String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub country:        String,
  #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
  pub kind:           String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Organization {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub name:       String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub title:      String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub department: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Birthday {
  #[serde(default)]
  pub date: Date,
}

/// A possibly partial calendar date; absent parts decode as zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Date {
  #[serde(default)]
  pub year:  i32,
  #[serde(default)]
  pub month: u32,
  #[serde(default)]
  pub day:   u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Photo {
  #[serde(default)]
  pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Biography {
  #[serde(default)]
  pub value: String,
}

/// One page of `people/me/connections`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionsPage {
  #[serde(default)]
  pub connections:     Vec<Person>,
  #[serde(default)]
  pub next_page_token: Option<String>,
  /// Present on the final page when a sync token was requested.
  #[serde(default)]
  pub next_sync_token: Option<String>,
}
