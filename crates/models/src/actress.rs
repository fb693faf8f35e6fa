use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ModelError;

pub const NAME_REQUIRED: &str = "name is required";

/// Stored actress record.
///
/// List fields default to empty so records written without them (or with
/// them omitted by an importer) read back as `[]`, never `null`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actress {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ethnicity: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
}

/// Create input. `name` stays optional on the wire so that a missing name
/// surfaces as a validation error instead of a body rejection.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NewActress {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub ethnicity: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

impl NewActress {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        match self.name.as_deref() {
            Some(name) => validate_name(name),
            None => Err(ModelError::Validation(NAME_REQUIRED.into())),
        }
    }

    /// Build the stored record under `id`. Call [`NewActress::validate`] first.
    pub fn into_actress(self, id: u64) -> Actress {
        Actress {
            id,
            name: self.name.unwrap_or_default(),
            real_name: self.real_name,
            birth_date: self.birth_date,
            nationality: self.nationality,
            ethnicity: self.ethnicity.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            images: self.images.unwrap_or_default(),
        }
    }
}

/// Partial update. Absent fields keep their stored value.
///
/// Optional strings are tri-state: absent keeps, `null` clears, a value sets.
/// `name` and the lists treat `null` like absent since they can never be null
/// on a stored record. Any `id` in the body is ignored.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ActressPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub real_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub nationality: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethnicity: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl ActressPatch {
    pub fn validate(&self) -> Result<(), ModelError> {
        match self.name.as_deref() {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Actress {
    /// Merge `patch` into this record. `id` is never touched.
    pub fn apply(&mut self, patch: ActressPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(real_name) = patch.real_name {
            self.real_name = real_name;
        }
        if let Some(birth_date) = patch.birth_date {
            self.birth_date = birth_date;
        }
        if let Some(nationality) = patch.nationality {
            self.nationality = nationality;
        }
        if let Some(ethnicity) = patch.ethnicity {
            self.ethnicity = ethnicity;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
    }
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation(NAME_REQUIRED.into()));
    }
    Ok(())
}

// Distinguishes `"field": null` (Some(None)) from a missing field (None, via `default`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Actress {
        Actress {
            id: 7,
            name: "Ada".into(),
            real_name: Some("Ada L.".into()),
            birth_date: Some("1990-01-01".into()),
            nationality: Some("UK".into()),
            ethnicity: vec!["X".into()],
            tags: vec!["old".into()],
            images: vec!["a.png".into()],
        }
    }

    #[test]
    fn new_actress_defaults_lists_and_optionals() {
        let input: NewActress = serde_json::from_value(json!({"name": "Ada"})).unwrap();
        input.validate().unwrap();
        let rec = input.into_actress(1);
        assert_eq!(
            serde_json::to_value(&rec).unwrap(),
            json!({
                "id": 1, "name": "Ada", "real_name": null, "birth_date": null,
                "nationality": null, "ethnicity": [], "tags": [], "images": []
            })
        );
    }

    #[test]
    fn missing_or_blank_name_is_invalid() {
        assert!(matches!(NewActress::default().validate(), Err(ModelError::Validation(_))));
        assert!(NewActress::named("").validate().is_err());
        assert!(NewActress::named("   ").validate().is_err());
        assert!(NewActress::named("Bea").validate().is_ok());
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let patch: ActressPatch = serde_json::from_value(json!({})).unwrap();
        assert!(patch.is_empty());
        let mut rec = sample();
        rec.apply(patch);
        assert_eq!(rec, sample());
    }

    #[test]
    fn patch_touches_only_given_fields() {
        let patch: ActressPatch = serde_json::from_value(json!({"tags": ["a", "b"]})).unwrap();
        let mut rec = sample();
        rec.apply(patch);
        assert_eq!(rec.tags, vec!["a", "b"]);
        assert_eq!(Actress { tags: sample().tags, ..rec }, sample());
    }

    #[test]
    fn patch_null_clears_optional_but_keeps_lists() {
        let patch: ActressPatch =
            serde_json::from_value(json!({"real_name": null, "tags": null, "name": null})).unwrap();
        assert_eq!(patch.real_name, Some(None));
        assert!(patch.tags.is_none());
        let mut rec = sample();
        rec.apply(patch);
        assert_eq!(rec.real_name, None);
        assert_eq!(rec.tags, sample().tags);
        assert_eq!(rec.name, "Ada");
    }

    #[test]
    fn patch_ignores_id() {
        let patch: ActressPatch = serde_json::from_value(json!({"id": 99, "name": "Bea"})).unwrap();
        let mut rec = sample();
        rec.apply(patch);
        assert_eq!(rec.id, 7);
        assert_eq!(rec.name, "Bea");
    }

    #[test]
    fn patch_with_blank_name_is_invalid() {
        let patch = ActressPatch { name: Some(String::new()), ..Default::default() };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn stored_record_reads_null_lists_as_empty() {
        let rec: Actress =
            serde_json::from_value(json!({"id": 3, "name": "Cy", "tags": null})).unwrap();
        assert!(rec.tags.is_empty());
        assert!(rec.images.is_empty());
        assert_eq!(rec.real_name, None);
    }
}
