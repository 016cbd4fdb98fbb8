use std::{fmt::Display, str::FromStr};

use super::ids::TableId;

const REFERENCE_PREFIX: &str = "reference:";

/// The kind of data a [`super::Column`] describes.
///
/// The type is descriptive only. Nothing checks that the values written to a
/// column match it, and a reference column does not check that its cells name
/// rows which exist in the target table.
///
/// The type is decoded once, when a column is read from the store. Tags this
/// build does not know about come back as [`ColumnType::Custom`] untouched,
/// so a store written by a newer build still reads. New variants go here,
/// along with their tag in [`ColumnType::tag`] and [`FromStr`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Text,
    Number,
    Boolean,
    Date,
    Reference { target_table_id: TableId },
    Custom(String),
}

impl ColumnType {
    pub fn tag(&self) -> String {
        //! The persisted form of the type.

        match self {
            ColumnType::Text => "text".to_string(),
            ColumnType::Number => "number".to_string(),
            ColumnType::Boolean => "boolean".to_string(),
            ColumnType::Date => "date".to_string(),
            ColumnType::Reference { target_table_id } => {
                format!("{}{}", REFERENCE_PREFIX, target_table_id)
            }
            ColumnType::Custom(tag) => tag.clone(),
        }
    }

    pub fn reference(target_table_id: TableId) -> ColumnType {
        ColumnType::Reference { target_table_id }
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for ColumnType {
    type Err = std::convert::Infallible;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let column_type = match tag {
            "text" => ColumnType::Text,
            "number" => ColumnType::Number,
            "boolean" => ColumnType::Boolean,
            "date" => ColumnType::Date,
            other => match other
                .strip_prefix(REFERENCE_PREFIX)
                .and_then(|id| id.parse::<i64>().ok())
            {
                Some(id) => ColumnType::Reference {
                    target_table_id: TableId(id),
                },
                None => ColumnType::Custom(other.to_string()),
            },
        };

        Ok(column_type)
    }
}

impl From<&str> for ColumnType {
    fn from(tag: &str) -> Self {
        match tag.parse() {
            Ok(column_type) => column_type,
            Err(never) => match never {},
        }
    }
}
