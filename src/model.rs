//! Public projections returned by the API

use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

use crate::{
  entity::{
    ServerType, VersionType,
    build::{self, Changes, Installation},
  },
  prelude::*,
};

/// Public projection of a build row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildView {
  pub id: i32,
  #[serde(rename = "type")]
  pub kind: ServerType,
  pub version_id: Option<String>,
  pub project_version_id: Option<String>,
  pub build_number: i32,
  pub experimental: bool,
  pub jar_url: Option<String>,
  pub jar_size: Option<i64>,
  pub jar_location: Option<String>,
  pub zip_url: Option<String>,
  pub zip_size: Option<i64>,
  pub installation: Installation,
  pub changes: Changes,
  pub created: Option<DateTime>,
}

impl From<build::Model> for BuildView {
  fn from(build: build::Model) -> Self {
    Self {
      id: build.id,
      kind: build.kind,
      version_id: build.version_id,
      project_version_id: build.project_version_id,
      build_number: build.build_number,
      experimental: build.experimental,
      jar_url: build.jar_url,
      jar_size: build.jar_size,
      jar_location: build.jar_location,
      zip_url: build.zip_url,
      zip_size: build.zip_size,
      installation: build.installation,
      changes: build.changes,
      created: build.created,
    }
  }
}

/// Summary of the family a resolved build belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FamilySummary {
  pub id: Option<String>,
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub kind: Option<VersionType>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub java: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub supported: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created: Option<DateTime>,
  pub builds: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
  pub build: BuildView,
  pub latest: BuildView,
  pub version: FamilySummary,
}

impl Resolution {
  pub fn project(&self, fields: &Fields) -> json::Value {
    json::json!({
      "build": fields.pick(&self.build),
      "latest": fields.pick(&self.latest),
      "version": self.version,
    })
  }
}

/// Key allowlist parsed from the `fields` query parameter. Empty means
/// everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fields(Vec<String>);

impl Fields {
  pub fn parse(raw: &str) -> Self {
    let mut fields: Vec<String> = Vec::new();
    for field in raw.split(',').map(str::trim).filter(|f| !f.is_empty()) {
      if !fields.iter().any(|f| f == field) {
        fields.push(field.to_string());
      }
    }
    Self(fields)
  }

  pub fn pick<T: Serialize>(&self, value: &T) -> json::Value {
    self.retain(json::to_value(value).unwrap_or(json::Value::Null))
  }

  pub fn retain(&self, value: json::Value) -> json::Value {
    match value {
      json::Value::Object(mut map) if !self.0.is_empty() => {
        map.retain(|key, _| self.0.iter().any(|f| f == key));
        json::Value::Object(map)
      }
      other => other,
    }
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct FieldsQuery {
  #[serde(default)]
  pub fields: String,
}

impl FieldsQuery {
  pub fn fields(&self) -> Fields {
    Fields::parse(&self.fields)
  }
}

/// Ordered `version -> summary` object. Serializes as a JSON object while
/// keeping insertion order.
#[derive(Debug, Default)]
pub struct Ordered<T>(pub Vec<(String, T)>);

impl<T: Serialize> Serialize for Ordered<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.0.len()))?;
    for (key, value) in &self.0 {
      map.serialize_entry(key, value)?;
    }
    map.end()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn view() -> BuildView {
    BuildView {
      id: 7,
      kind: ServerType::Paper,
      version_id: Some("1.20.1".into()),
      project_version_id: None,
      build_number: 196,
      experimental: false,
      jar_url: Some("https://example.com/paper.jar".into()),
      jar_size: Some(42),
      jar_location: None,
      zip_url: None,
      zip_size: None,
      installation: Installation::default(),
      changes: Changes(vec!["Fix".into()]),
      created: None,
    }
  }

  #[test]
  fn view_is_camel_case() {
    let value = json::to_value(view()).unwrap();
    assert_eq!(value["type"], "PAPER");
    assert_eq!(value["versionId"], "1.20.1");
    assert_eq!(value["buildNumber"], 196);
    assert!(value["projectVersionId"].is_null());
  }

  #[test]
  fn fields_are_deduplicated_and_applied() {
    let fields = Fields::parse("id,,type, id,buildNumber");
    let picked = fields.pick(&view());
    let keys: Vec<_> = picked.as_object().unwrap().keys().cloned().collect();

    assert_eq!(keys.len(), 3);
    assert_eq!(picked["id"], 7);
    assert!(picked.get("jarUrl").is_none());
  }

  #[test]
  fn non_objects_pass_through() {
    let fields = Fields::parse("id");
    assert_eq!(fields.retain(json::Value::Null), json::Value::Null);
  }

  #[test]
  fn empty_fields_keep_everything() {
    let picked = Fields::parse("").pick(&view());
    assert!(picked.get("installation").is_some());
  }

  #[test]
  fn ordered_map_keeps_insertion_order() {
    let ordered = Ordered(vec![("b".to_string(), 1), ("a".to_string(), 2)]);
    assert_eq!(json::to_string(&ordered).unwrap(), r#"{"b":1,"a":2}"#);
  }
}
