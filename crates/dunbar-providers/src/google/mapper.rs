//! Normalisation between People API persons and dunbar contacts.

use chrono::{Datelike as _, NaiveDate};
use dunbar_core::{
  contact::{self, Address, Contact, EmailAddress, Organization, PhoneNumber},
  source::ContactChanges,
};

use super::schema::{self, Biography, Birthday, Date, Name, Person, PostalAddress, TypedValue};

/// `people/c123` → `c123`.
pub fn uid_from_resource_name(resource_name: &str) -> &str {
  resource_name.rsplit('/').next().unwrap_or(resource_name)
}

pub fn resource_name_for(uid: &str) -> String { format!("people/{uid}") }

/// Lowercased type tag, `"other"` when absent.
fn normalize_type(kind: &str) -> String {
  if kind.is_empty() {
    contact::DEFAULT_TYPE.to_string()
  } else {
    kind.to_lowercase()
  }
}

fn birthday(b: &Birthday) -> Option<NaiveDate> {
  let Date { year, month, day } = b.date;
  if year <= 0 || month == 0 || day == 0 {
    return None;
  }
  NaiveDate::from_ymd_opt(year, month, day)
}

// ─── Inbound ─────────────────────────────────────────────────────────────────

pub fn person_to_contact(person: Person) -> Contact {
  let mut contact = Contact {
    uid: uid_from_resource_name(&person.resource_name).to_string(),
    etag: person.etag,
    url: person.resource_name,
    ..Contact::default()
  };

  if let Some(name) = person.names.into_iter().next() {
    contact.full_name = name.display_name;
    contact.given_name = name.given_name;
    contact.family_name = name.family_name;
  }

  contact.phone_numbers = person
    .phone_numbers
    .into_iter()
    .map(|p| PhoneNumber { kind: normalize_type(&p.kind), value: p.value })
    .collect();

  contact.email_addresses = person
    .email_addresses
    .into_iter()
    .map(|e| EmailAddress { kind: normalize_type(&e.kind), value: e.value })
    .collect();

  contact.addresses = person
    .addresses
    .into_iter()
    .map(|a| Address {
      kind:        normalize_type(&a.kind),
      street:      a.street_address,
      city:        a.city,
      state:       a.region,
      postal_code: a.postal_code,
      country:     a.country,
    })
    .collect();

  contact.organization = person.organizations.into_iter().next().map(|o| Organization {
    name:       o.name,
    title:      o.title,
    department: o.department,
  });

  contact.birthday = person.birthdays.first().and_then(birthday);
  contact.photo_url = person.photos.into_iter().next().map(|p| p.url).unwrap_or_default();
  contact.notes = person.biographies.into_iter().next().map(|b| b.value).unwrap_or_default();

  contact
}

/// Fold one page of a listing into `changes`. Persons flagged as deleted
/// become uid deletions.
pub fn apply_page(changes: &mut ContactChanges, persons: Vec<Person>) {
  for person in persons {
    let deleted = person.metadata.as_ref().is_some_and(|m| m.deleted);
    if deleted {
      changes
        .deleted
        .push(uid_from_resource_name(&person.resource_name).to_string());
    } else {
      changes.updated.push(person_to_contact(person));
    }
  }
}

// ─── Outbound ────────────────────────────────────────────────────────────────

/// Body for `createContact` / `updateContact`.
///
/// Names are sent structured; a contact with only a full name is sent as an
/// unstructured name so the remote can split it.
pub fn contact_to_person(contact: &Contact) -> Person {
  let mut person = Person { etag: contact.etag.clone(), ..Person::default() };

  if !contact.given_name.is_empty() || !contact.family_name.is_empty() {
    person.names.push(Name {
      given_name: contact.given_name.clone(),
      family_name: contact.family_name.clone(),
      ..Name::default()
    });
  } else if !contact.full_name.is_empty() {
    person.names.push(Name {
      unstructured_name: contact.full_name.clone(),
      ..Name::default()
    });
  }

  person.phone_numbers = contact
    .phone_numbers
    .iter()
    .map(|p| TypedValue { value: p.value.clone(), kind: p.kind.clone() })
    .collect();

  person.email_addresses = contact
    .email_addresses
    .iter()
    .map(|e| TypedValue { value: e.value.clone(), kind: e.kind.clone() })
    .collect();

  person.addresses = contact
    .addresses
    .iter()
    .map(|a| PostalAddress {
      street_address: a.street.clone(),
      city:           a.city.clone(),
      region:         a.state.clone(),
      postal_code:    a.postal_code.clone(),
      country:        a.country.clone(),
      kind:           a.kind.clone(),
    })
    .collect();

  if let Some(org) = &contact.organization {
    person.organizations.push(schema::Organization {
      name:       org.name.clone(),
      title:      org.title.clone(),
      department: org.department.clone(),
    });
  }

  if let Some(b) = contact.birthday {
    person.birthdays.push(Birthday {
      date: Date { year: b.year(), month: b.month(), day: b.day() },
    });
  }

  if !contact.notes.is_empty() {
    person.biographies.push(Biography { value: contact.notes.clone() });
  }

  person
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::google::schema::ConnectionsPage;

  const PAGE: &str = r#"{
    "connections": [
      {
        "resourceName": "people/c8935729599066447265",
        "etag": "%EgUBAi43PRoEAQIFByIMR0xVbzZ5dz0=",
        "names": [
          { "displayName": "Ada Lovelace", "givenName": "Ada", "familyName": "Lovelace" },
          { "displayName": "Countess" }
        ],
        "phoneNumbers": [
          { "value": "+44 20 7946 0000", "type": "Home" },
          { "value": "+44 7700 900000", "type": "mobile" },
          { "value": "555" }
        ],
        "emailAddresses": [ { "value": "ada@example.com" } ],
        "addresses": [
          { "streetAddress": "12 St James's Sq", "city": "London", "region": "LDN",
            "postalCode": "SW1Y", "country": "UK", "type": "WORK" }
        ],
        "organizations": [ { "name": "Analytical Engines", "title": "Programmer" } ],
        "birthdays": [ { "date": { "year": 1815, "month": 12, "day": 10 } } ],
        "photos": [ { "url": "https://example.com/ada.jpg" } ],
        "biographies": [ { "value": "First programmer." } ]
      },
      {
        "resourceName": "people/c42",
        "birthdays": [ { "date": { "month": 4, "day": 1 } } ]
      },
      {
        "resourceName": "people/c99",
        "metadata": { "deleted": true }
      }
    ],
    "nextPageToken": "page-2"
  }"#;

  fn page() -> ConnectionsPage { serde_json::from_str(PAGE).unwrap() }

  #[test]
  fn uid_is_trailing_segment() {
    assert_eq!(uid_from_resource_name("people/c8935729599066447265"), "c8935729599066447265");
    assert_eq!(uid_from_resource_name("c1"), "c1");
  }

  #[test]
  fn maps_full_person() {
    let person = page().connections.remove(0);
    let c = person_to_contact(person);

    assert_eq!(c.uid, "c8935729599066447265");
    assert!(c.is_provider_contact());
    assert_eq!(c.url, "people/c8935729599066447265");
    assert_eq!(c.full_name, "Ada Lovelace");
    assert_eq!(c.given_name, "Ada");
    assert_eq!(c.family_name, "Lovelace");

    let kinds: Vec<_> = c.phone_numbers.iter().map(|p| p.kind.as_str()).collect();
    assert_eq!(kinds, ["home", "mobile", "other"]);
    assert_eq!(c.primary_phone(), "+44 7700 900000");
    assert_eq!(c.primary_email(), "ada@example.com");
    assert_eq!(c.email_addresses[0].kind, "other");

    assert_eq!(c.addresses[0].state, "LDN");
    assert_eq!(c.addresses[0].kind, "work");
    assert_eq!(c.organization.as_ref().unwrap().title, "Programmer");
    assert_eq!(c.birthday, NaiveDate::from_ymd_opt(1815, 12, 10));
    assert_eq!(c.photo_url, "https://example.com/ada.jpg");
    assert_eq!(c.notes, "First programmer.");
    assert!(c.tags.is_empty());
    assert!(c.last_modified.is_none());
  }

  #[test]
  fn birthday_without_year_is_dropped() {
    let person = page().connections.remove(1);
    let c = person_to_contact(person);
    assert_eq!(c.uid, "c42");
    assert!(c.birthday.is_none());
    assert!(c.organization.is_none());
  }

  #[test]
  fn deleted_persons_become_deletions() {
    let mut changes = ContactChanges::default();
    apply_page(&mut changes, page().connections);
    assert_eq!(changes.updated.len(), 2);
    assert_eq!(changes.deleted, ["c99"]);
  }

  #[test]
  fn outbound_body_uses_people_field_names() {
    let person = page().connections.remove(0);
    let contact = person_to_contact(person);
    let body = serde_json::to_value(contact_to_person(&contact)).unwrap();

    assert_eq!(body["names"][0]["givenName"], "Ada");
    assert_eq!(body["addresses"][0]["region"], "LDN");
    assert_eq!(body["birthdays"][0]["date"]["year"], 1815);
    assert_eq!(body["biographies"][0]["value"], "First programmer.");
    assert!(body.get("resourceName").is_none());
    assert!(body.get("photos").is_none());
  }

  #[test]
  fn full_name_only_is_sent_unstructured() {
    let contact = Contact { full_name: "Grace Hopper".into(), ..Contact::default() };
    let body = serde_json::to_value(contact_to_person(&contact)).unwrap();
    assert_eq!(body["names"][0]["unstructuredName"], "Grace Hopper");
    assert!(body.get("etag").is_none());
  }
}
