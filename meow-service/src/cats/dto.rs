//! Request payloads for the cats endpoints

use serde_json::{Map, Value};

use super::model::{CatChanges, NewCat};
use crate::repository::{CatFilter, CatOrder, Pagination, SortField, SortOrder};
use crate::validation::{validate, Coercion, Constraint, FieldSchema, FromPayload, Schema, Violations};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: i64 = 50;
pub const MAX_AGE: i64 = 30;

const NAME_CHECKS: &[(Constraint, &str)] = &[
    (Constraint::IsString, "name must be a string"),
    (Constraint::IsNotEmpty, "name should not be empty"),
];

const BREED_CHECKS: &[(Constraint, &str)] = &[
    (Constraint::IsString, "breed must be a string"),
    (Constraint::IsNotEmpty, "breed should not be empty"),
];

const AGE_CHECKS: &[(Constraint, &str)] = &[
    (Constraint::IsInt, "age must be an integer number"),
    (Constraint::Min(0), "age must not be less than 0"),
    (Constraint::Max(MAX_AGE), "age must not be greater than 30"),
];

const IMAGE_URL_CHECKS: &[(Constraint, &str)] = &[(Constraint::IsUrl, "imageUrl must be a URL address")];

pub const LIST_CATS: &Schema = &[
    FieldSchema::optional(
        "page",
        &[
            (Constraint::IsInt, "page must be an integer number"),
            (Constraint::Min(1), "page must not be less than 1"),
        ],
    )
    .coerce(Coercion::Integer),
    FieldSchema::optional(
        "limit",
        &[
            (Constraint::IsInt, "limit must be an integer number"),
            (Constraint::Min(1), "limit must not be less than 1"),
            (Constraint::Max(MAX_LIMIT), "limit must not be greater than 50"),
        ],
    )
    .coerce(Coercion::Integer),
    FieldSchema::optional("breed", &[(Constraint::IsString, "breed must be a string")]),
    FieldSchema::optional(
        "sortBy",
        &[(
            Constraint::IsIn(SortField::ACCEPTED),
            "sortBy must be one of the following values: name, age, createdAt",
        )],
    ),
    FieldSchema::optional(
        "sortOrder",
        &[(
            Constraint::IsIn(&["asc", "desc"]),
            "sortOrder must be one of the following values: asc, desc",
        )],
    ),
];

pub const CREATE_CAT: &Schema = &[
    FieldSchema::required("name", NAME_CHECKS),
    FieldSchema::nullable("age", AGE_CHECKS),
    FieldSchema::required("breed", BREED_CHECKS),
    FieldSchema::nullable("imageUrl", IMAGE_URL_CHECKS),
];

pub const UPDATE_CAT: &Schema = &[
    FieldSchema::optional("name", NAME_CHECKS),
    FieldSchema::nullable("age", AGE_CHECKS),
    FieldSchema::optional("breed", BREED_CHECKS),
    FieldSchema::nullable("imageUrl", IMAGE_URL_CHECKS),
];

/// `GET /cats` query parameters after validation and defaulting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCatsQuery {
    pub page: u64,
    pub limit: u64,
    pub breed: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for ListCatsQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            breed: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl ListCatsQuery {
    pub fn filter(&self) -> CatFilter {
        CatFilter {
            breed: self.breed.clone(),
        }
    }

    pub fn order(&self) -> CatOrder {
        CatOrder::new(self.sort_by, self.sort_order)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::page(self.page, self.limit)
    }
}

impl FromPayload for ListCatsQuery {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, Violations> {
        let mut fields = validate(LIST_CATS, payload)?;
        let positive = |n: i64| u64::try_from(n).ok();

        Ok(Self {
            page: fields.take_int("page").and_then(positive).unwrap_or(DEFAULT_PAGE),
            limit: fields.take_int("limit").and_then(positive).unwrap_or(DEFAULT_LIMIT),
            // `?breed=` means no filter
            breed: fields.take_text("breed").filter(|breed| !breed.is_empty()),
            sort_by: fields
                .take_text("sortBy")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            sort_order: fields
                .take_text("sortOrder")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        })
    }
}

/// `POST /cats` body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCatRequest {
    pub name: String,
    pub age: Option<i32>,
    pub breed: String,
    pub image_url: Option<String>,
}

impl FromPayload for CreateCatRequest {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, Violations> {
        let mut fields = validate(CREATE_CAT, payload)?;

        Ok(Self {
            name: fields.required_text("name")?,
            age: fields.take_int("age").and_then(|n| i32::try_from(n).ok()),
            breed: fields.required_text("breed")?,
            image_url: fields.take_text("imageUrl"),
        })
    }
}

impl From<CreateCatRequest> for NewCat {
    fn from(request: CreateCatRequest) -> Self {
        Self {
            name: request.name,
            age: request.age,
            breed: request.breed,
            image_url: request.image_url,
        }
    }
}

/// `PATCH /cats/{id}` body
///
/// `age` and `imageUrl` may be sent as `null` to clear them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCatRequest {
    pub name: Option<String>,
    pub age: Option<Option<i32>>,
    pub breed: Option<String>,
    pub image_url: Option<Option<String>>,
}

impl FromPayload for UpdateCatRequest {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, Violations> {
        let mut fields = validate(UPDATE_CAT, payload)?;

        Ok(Self {
            name: fields.take_text("name"),
            age: fields
                .take_nullable_int("age")
                .map(|age| age.and_then(|n| i32::try_from(n).ok())),
            breed: fields.take_text("breed"),
            image_url: fields.take_nullable_text("imageUrl"),
        })
    }
}

impl From<UpdateCatRequest> for CatChanges {
    fn from(request: UpdateCatRequest) -> Self {
        Self {
            name: request.name,
            age: request.age,
            breed: request.breed,
            image_url: request.image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Rule;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn query(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn test_list_defaults() {
        let parsed = ListCatsQuery::from_payload(&Map::new()).unwrap();
        assert_eq!(parsed, ListCatsQuery::default());
        assert_eq!(parsed.order(), CatOrder::new(SortField::CreatedAt, SortOrder::Desc));
        assert_eq!(parsed.pagination(), Pagination::new(0, 10));
    }

    #[test]
    fn test_list_coerces_and_parses() {
        let parsed = ListCatsQuery::from_payload(&query(&[
            ("page", "3"),
            ("limit", "50"),
            ("breed", "Persian"),
            ("sortBy", "age"),
            ("sortOrder", "asc"),
        ]))
        .unwrap();

        assert_eq!(parsed.page, 3);
        assert_eq!(parsed.limit, 50);
        assert_eq!(parsed.filter(), CatFilter::breed("Persian"));
        assert_eq!(parsed.order(), CatOrder::new(SortField::Age, SortOrder::Asc));
        assert_eq!(parsed.pagination(), Pagination::new(100, 50));
    }

    #[test]
    fn test_list_rejects_bad_values() {
        let violations = ListCatsQuery::from_payload(&query(&[
            ("page", "0"),
            ("limit", "notanumber"),
            ("sortBy", "weight"),
            ("sortOrder", "up"),
        ]))
        .unwrap_err();

        assert_eq!(violations.fields(), ["page", "limit", "sortBy", "sortOrder"]);
        let rules: Vec<Rule> = violations.iter().map(|v| v.rule).collect();
        assert_eq!(rules, [Rule::Min, Rule::IsInt, Rule::IsIn, Rule::IsIn]);
    }

    #[test]
    fn test_list_limit_above_cap_is_rejected() {
        let violations = ListCatsQuery::from_payload(&query(&[("limit", "51")])).unwrap_err();
        assert_eq!(violations.iter().next().unwrap().message, "limit must not be greater than 50");
    }

    #[test]
    fn test_list_accepts_integral_float_notation() {
        let parsed = ListCatsQuery::from_payload(&query(&[("page", "2.0"), ("limit", "1e1")])).unwrap();
        assert_eq!(parsed.page, 2);
        assert_eq!(parsed.limit, 10);
        assert_eq!(parsed.pagination(), Pagination::new(10, 10));
    }

    #[test]
    fn test_list_empty_breed_means_no_filter() {
        let parsed = ListCatsQuery::from_payload(&query(&[("breed", "")])).unwrap();
        assert_eq!(parsed.filter(), CatFilter::default());
    }

    #[test]
    fn test_create_valid() {
        let request = CreateCatRequest::from_payload(&payload(json!({
            "name": "Whiskers",
            "age": 2,
            "breed": "Tabby",
            "imageUrl": "http://example.com/cat.jpg",
            "id": "cat_forged",
        })))
        .unwrap();

        assert_eq!(
            NewCat::from(request),
            NewCat {
                name: "Whiskers".to_string(),
                age: Some(2),
                breed: "Tabby".to_string(),
                image_url: Some("http://example.com/cat.jpg".to_string()),
            }
        );
    }

    #[test]
    fn test_create_reports_every_field() {
        let violations = CreateCatRequest::from_payload(&payload(json!({
            "name": "",
            "breed": "",
            "age": -1,
            "imageUrl": "not-a-url",
        })))
        .unwrap_err();

        assert_eq!(violations.fields(), ["name", "age", "breed", "imageUrl"]);
        let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "name should not be empty",
                "age must not be less than 0",
                "breed should not be empty",
                "imageUrl must be a URL address",
            ]
        );
    }

    #[test]
    fn test_create_requires_name_and_breed() {
        let violations = CreateCatRequest::from_payload(&payload(json!({ "age": 31 }))).unwrap_err();
        assert_eq!(violations.fields(), ["name", "age", "breed"]);
    }

    #[test]
    fn test_create_null_optional_fields_are_absent() {
        let request = CreateCatRequest::from_payload(&payload(json!({
            "name": "Bella",
            "breed": "Ragdoll",
            "age": null,
            "imageUrl": null,
        })))
        .unwrap();
        assert_eq!(request.age, None);
        assert_eq!(request.image_url, None);
    }

    #[test]
    fn test_update_partial_and_clearing() {
        let request = UpdateCatRequest::from_payload(&payload(json!({ "age": null, "breed": "Siamese" }))).unwrap();
        let changes = CatChanges::from(request);

        assert_eq!(changes.name, None);
        assert_eq!(changes.age, Some(None));
        assert_eq!(changes.breed.as_deref(), Some("Siamese"));
        assert_eq!(changes.image_url, None);
    }

    #[test]
    fn test_update_empty_is_allowed() {
        let request = UpdateCatRequest::from_payload(&Map::new()).unwrap();
        assert_eq!(CatChanges::from(request), CatChanges::default());
    }

    #[test]
    fn test_update_rejects_null_name_and_bad_values() {
        let violations = UpdateCatRequest::from_payload(&payload(json!({
            "name": null,
            "age": 2.5,
            "imageUrl": "ftp//broken",
        })))
        .unwrap_err();
        assert_eq!(violations.fields(), ["name", "age", "imageUrl"]);
    }
}
