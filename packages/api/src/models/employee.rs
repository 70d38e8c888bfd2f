//! Employee directory records and certificates.

use serde::{Deserialize, Serialize};

use super::{lenient, RecordId};

/// An employee as listed by the directory endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub skills: Vec<EmployeeSkill>,
}

/// A skill badge on a directory card.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSkill {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub proficiency_level: Option<String>,
}

/// A certification attached to an employee profile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub issued_by: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub issue_date: Option<String>,
}

/// Split a stored full name into first name and the rest.
///
/// `"Ada King Lovelace"` → `("Ada", "King Lovelace")`.
pub fn split_name(full: &str) -> (String, String) {
    let mut parts = full.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let rest = parts.collect::<Vec<_>>().join(" ");
    (first, rest)
}

/// Join first and last name, skipping empty parts.
pub fn join_name(first: &str, last: &str) -> String {
    [first.trim(), last.trim()]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_employee_with_loose_fields() {
        let employee: Employee = serde_json::from_value(json!({
            "id": 12,
            "firstName": "Ada",
            "lastName": null,
            "department": 7,
            "skills": [
                { "name": "Rust", "proficiencyLevel": "Expert" },
                "Go",
                { "name": null }
            ]
        }))
        .unwrap();
        assert_eq!(employee.last_name, None);
        assert_eq!(employee.department.as_deref(), Some("7"));
        assert_eq!(employee.skills.len(), 2);
        assert_eq!(employee.skills[0].name, "Rust");
        assert_eq!(employee.skills[1].name, "");
    }

    #[test]
    fn test_split_name() {
        assert_eq!(
            split_name("Ada King Lovelace"),
            ("Ada".to_string(), "King Lovelace".to_string())
        );
        assert_eq!(split_name("Plato"), ("Plato".to_string(), String::new()));
        assert_eq!(split_name(""), (String::new(), String::new()));
    }

    #[test]
    fn test_join_name_skips_empty_parts() {
        assert_eq!(join_name("Ada", "Lovelace"), "Ada Lovelace");
        assert_eq!(join_name("Ada", ""), "Ada");
        assert_eq!(join_name("", " Lovelace "), "Lovelace");
        assert_eq!(join_name("", ""), "");
    }
}
