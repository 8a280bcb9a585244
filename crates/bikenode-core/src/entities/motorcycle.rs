//! Motorcycle entity - one catalog entry (year/make/model/package)

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::value_objects::Snowflake;

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Motorcycle {
    pub id: Snowflake,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub package: Option<String>,
    pub category: Option<String>,
    pub engine: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Motorcycle {
    /// "2021 Honda CB500X Base"
    pub fn display_name(&self) -> String {
        let mut name = format!("{} {} {}", self.year, self.make, self.model);
        if let Some(package) = self.package.as_deref().filter(|p| !p.is_empty()) {
            name.push(' ');
            name.push_str(package);
        }
        name
    }
}

/// Row accepted by the bulk catalog import
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewMotorcycle {
    pub year: i32,
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub engine: Option<String>,
}

impl NewMotorcycle {
    /// Case-insensitive identity used to skip duplicates
    pub fn catalog_key(&self) -> (i32, String, String, String) {
        (
            self.year,
            self.make.trim().to_lowercase(),
            self.model.trim().to_lowercase(),
            self.package
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_lowercase(),
        )
    }
}

/// Optional equality filters, all ANDed and compared case-insensitively
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MotorcycleFilter {
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub package: Option<String>,
    pub category: Option<String>,
}

impl MotorcycleFilter {
    /// Drop blank strings so `?make=` behaves like an absent filter
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            year: self.year,
            make: clean(self.make),
            model: clean(self.model),
            package: clean(self.package),
            category: clean(self.category),
        }
    }

    /// In-memory evaluation of the same predicate the SQL query applies
    pub fn matches(&self, bike: &Motorcycle) -> bool {
        fn eq(filter: Option<&String>, value: Option<&str>) -> bool {
            match filter {
                None => true,
                Some(f) => value.is_some_and(|v| v.eq_ignore_ascii_case(f)),
            }
        }

        self.year.map_or(true, |y| y == bike.year)
            && eq(self.make.as_ref(), Some(bike.make.as_str()))
            && eq(self.model.as_ref(), Some(bike.model.as_str()))
            && eq(self.package.as_ref(), bike.package.as_deref())
            && eq(self.category.as_ref(), bike.category.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bike() -> Motorcycle {
        let now = Utc::now();
        Motorcycle {
            id: Snowflake::new(1),
            year: 2021,
            make: "Honda".to_string(),
            model: "CB500X".to_string(),
            package: Some("ABS".to_string()),
            category: Some("Adventure".to_string()),
            engine: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_display_name() {
        let mut b = bike();
        assert_eq!(b.display_name(), "2021 Honda CB500X ABS");
        b.package = None;
        assert_eq!(b.display_name(), "2021 Honda CB500X");
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let filter = MotorcycleFilter {
            year: Some(2021),
            make: Some("honda".to_string()),
            model: Some("cb500x".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&bike()));
    }

    #[test]
    fn test_filter_rejects_mismatch_and_missing_package() {
        let wrong_year = MotorcycleFilter {
            year: Some(2020),
            ..Default::default()
        };
        assert!(!wrong_year.matches(&bike()));

        let mut b = bike();
        b.package = None;
        let wants_package = MotorcycleFilter {
            package: Some("ABS".to_string()),
            ..Default::default()
        };
        assert!(!wants_package.matches(&b));
    }

    #[test]
    fn test_normalized_drops_blank_values() {
        let filter = MotorcycleFilter {
            make: Some("  ".to_string()),
            model: Some(" Z900 ".to_string()),
            ..Default::default()
        }
        .normalized();
        assert!(filter.make.is_none());
        assert_eq!(filter.model.as_deref(), Some("Z900"));
    }

    #[test]
    fn test_catalog_key_ignores_case_and_missing_package() {
        let a = NewMotorcycle {
            year: 2020,
            make: "Yamaha".to_string(),
            model: "MT-07".to_string(),
            package: None,
            category: None,
            engine: None,
        };
        let b = NewMotorcycle {
            make: "YAMAHA ".to_string(),
            package: Some(String::new()),
            ..a.clone()
        };
        assert_eq!(a.catalog_key(), b.catalog_key());
    }
}
