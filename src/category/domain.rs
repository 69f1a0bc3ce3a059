//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{DatabaseId, Error, auth::UserID};

/// The fewest characters a category name may have once trimmed.
const MIN_NAME_LENGTH: usize = 2;

/// A validated category name with at least two characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::CategoryNameTooShort] if the trimmed
    /// name has fewer than two characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.chars().count() < MIN_NAME_LENGTH {
            Err(Error::CategoryNameTooShort)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string has at least two characters.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// A user-defined grouping for transactions (e.g., 'Groceries', 'Salary').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The validated name of the category.
    pub name: CategoryName,
    /// Free text notes about the category.
    pub notes: Option<String>,
    /// An icon name or emoji for the category.
    pub icon: Option<String>,
    /// The user who owns the category.
    pub user_id: UserID,
    /// When the category was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Form data for category creation and editing.
///
/// Missing fields are accepted here and rejected by [CategoryForm::validate]
/// so that a signed-out caller is told they are unauthorized rather than
/// that their input is wrong.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CategoryForm {
    /// The name as entered, checked by [CategoryForm::validate].
    #[serde(default)]
    pub name: String,
    /// Free text notes about the category.
    #[serde(default)]
    pub notes: Option<String>,
    /// An icon name or emoji for the category.
    #[serde(default)]
    pub icon: Option<String>,
}

/// The validated fields of a [CategoryForm].
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The validated name.
    pub name: CategoryName,
    /// Free text notes about the category.
    pub notes: Option<String>,
    /// An icon name or emoji for the category.
    pub icon: Option<String>,
}

impl CategoryForm {
    /// Check the form.
    ///
    /// Notes and icon are optional free text and are kept exactly as given.
    ///
    /// # Errors
    ///
    /// Returns [Error::CategoryNameTooShort] if the name is too short.
    pub fn validate(self) -> Result<NewCategory, Error> {
        Ok(NewCategory {
            name: CategoryName::new(&self.name)?,
            notes: self.notes,
            icon: self.icon,
        })
    }
}

#[cfg(test)]
mod category_name_tests {
    use crate::{Error, category::CategoryName};

    #[test]
    fn new_fails_on_empty_string() {
        let category_name = CategoryName::new("");

        assert_eq!(category_name, Err(Error::CategoryNameTooShort));
    }

    #[test]
    fn new_fails_on_single_character() {
        let category_name = CategoryName::new("a");

        assert_eq!(category_name, Err(Error::CategoryNameTooShort));
    }

    #[test]
    fn new_fails_on_padded_single_character() {
        let category_name = CategoryName::new("\n\t a \r");

        assert_eq!(category_name, Err(Error::CategoryNameTooShort));
    }

    #[test]
    fn new_counts_characters_not_bytes() {
        assert_eq!(CategoryName::new("🔥"), Err(Error::CategoryNameTooShort));
        assert!(CategoryName::new("🔥🔥").is_ok());
    }

    #[test]
    fn new_trims_name() {
        let category_name = CategoryName::new("  Groceries ").unwrap();

        assert_eq!(category_name.as_ref(), "Groceries");
    }
}
