//! Cat entity and write models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted cat record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cat {
    /// TypeID with the `cat` prefix
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    pub breed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a cat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCat {
    pub name: String,
    pub age: Option<i32>,
    pub breed: String,
    pub image_url: Option<String>,
}

/// Partial update
///
/// The outer `Option` says whether the field was supplied at all; for the
/// nullable columns the inner `Option` carries the new value or a clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatChanges {
    pub name: Option<String>,
    pub age: Option<Option<i32>>,
    pub breed: Option<String>,
    pub image_url: Option<Option<String>>,
}

impl CatChanges {
    /// Apply the changes to `cat` in place
    pub fn apply_to(self, cat: &mut Cat) {
        if let Some(name) = self.name {
            cat.name = name;
        }
        if let Some(age) = self.age {
            cat.age = age;
        }
        if let Some(breed) = self.breed {
            cat.breed = breed;
        }
        if let Some(image_url) = self.image_url {
            cat.image_url = image_url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn luna() -> Cat {
        let at = DateTime::parse_from_rfc3339("2025-01-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Cat {
            id: "cat_01h455vb4pex5vsknk084sn02q".to_string(),
            name: "Luna".to_string(),
            age: Some(3),
            breed: "Persian".to_string(),
            image_url: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_cat_serializes_camel_case_and_omits_absent_fields() {
        let value = serde_json::to_value(luna()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "cat_01h455vb4pex5vsknk084sn02q",
                "name": "Luna",
                "age": 3,
                "breed": "Persian",
                "createdAt": "2025-01-01T12:00:00Z",
                "updatedAt": "2025-01-01T12:00:00Z",
            })
        );
    }

    #[test]
    fn test_apply_changes_only_touches_supplied_fields() {
        let mut cat = luna();
        CatChanges {
            age: Some(None),
            image_url: Some(Some("https://example.com/luna.jpg".to_string())),
            ..CatChanges::default()
        }
        .apply_to(&mut cat);

        assert_eq!(cat.name, "Luna");
        assert_eq!(cat.breed, "Persian");
        assert_eq!(cat.age, None);
        assert_eq!(cat.image_url.as_deref(), Some("https://example.com/luna.jpg"));
    }

    #[test]
    fn test_empty_changes_leave_cat_untouched() {
        let mut cat = luna();
        CatChanges::default().apply_to(&mut cat);
        assert_eq!(cat, luna());
    }
}
