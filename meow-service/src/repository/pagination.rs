//! Pagination, ordering and filtering for cat listings
//!
//! # Example
//!
//! ```rust
//! use meow_service::repository::{CatOrder, Pagination, SortField, SortOrder};
//!
//! let page3 = Pagination::page(3, 20);
//! assert_eq!(page3.offset, 40);
//! assert_eq!(page3.limit, 20);
//!
//! let order = CatOrder::new(SortField::Name, SortOrder::Asc);
//! assert_eq!(order.to_string(), "name asc");
//! ```

use std::fmt;
use std::str::FromStr;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order '{other}'")),
        }
    }
}

/// Sortable cat attribute
///
/// The set is closed so that column names interpolated into SQL can never
/// come from client input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Name,
    Age,
    #[default]
    CreatedAt,
}

impl SortField {
    /// Names accepted in the `sortBy` query parameter
    pub const ACCEPTED: &'static [&'static str] = &["name", "age", "createdAt"];

    /// Backing column
    pub const fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Age => "age",
            Self::CreatedAt => "created_at",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Age => write!(f, "age"),
            Self::CreatedAt => write!(f, "createdAt"),
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "age" => Ok(Self::Age),
            "createdAt" => Ok(Self::CreatedAt),
            other => Err(format!("unknown sort field '{other}'")),
        }
    }
}

/// Single-key ordering
///
/// Rows whose key is null sort last in both directions; ties are broken by
/// `id` ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatOrder {
    pub field: SortField,
    pub direction: SortOrder,
}

impl CatOrder {
    #[must_use]
    pub const fn new(field: SortField, direction: SortOrder) -> Self {
        Self { field, direction }
    }
}

impl fmt::Display for CatOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction)
    }
}

/// Listing predicate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatFilter {
    /// Exact breed match
    pub breed: Option<String>,
}

impl CatFilter {
    /// Filter to a single breed
    pub fn breed(breed: impl Into<String>) -> Self {
        Self {
            breed: Some(breed.into()),
        }
    }

    /// Whether a record with `breed` passes the filter
    pub fn matches(&self, breed: &str) -> bool {
        self.breed.as_deref().is_none_or(|wanted| wanted == breed)
    }
}

/// Pagination parameters for limiting query results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    /// Create new pagination parameters
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Create pagination for a specific page number (1-indexed)
    ///
    /// Page 0 is treated as page 1.
    #[must_use]
    pub const fn page(page: u64, page_size: u64) -> Self {
        Self {
            offset: page.saturating_sub(1).saturating_mul(page_size),
            limit: page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offsets() {
        assert_eq!(Pagination::page(1, 10), Pagination::new(0, 10));
        assert_eq!(Pagination::page(2, 10), Pagination::new(10, 10));
        assert_eq!(Pagination::page(5, 50), Pagination::new(200, 50));
        assert_eq!(Pagination::page(0, 10).offset, 0);
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!("name".parse::<SortField>(), Ok(SortField::Name));
        assert_eq!("createdAt".parse::<SortField>(), Ok(SortField::CreatedAt));
        assert!("created_at".parse::<SortField>().is_err());
        assert_eq!(SortField::CreatedAt.column(), "created_at");

        for accepted in SortField::ACCEPTED {
            let field: SortField = accepted.parse().unwrap();
            assert_eq!(field.to_string(), *accepted);
        }
    }

    #[test]
    fn test_sort_order() {
        assert_eq!(SortOrder::default(), SortOrder::Desc);
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert!("ASC".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::Desc.as_sql(), "DESC");
    }

    #[test]
    fn test_filter_matches() {
        assert!(CatFilter::default().matches("Persian"));
        assert!(CatFilter::breed("Persian").matches("Persian"));
        assert!(!CatFilter::breed("Persian").matches("persian"));
    }
}
