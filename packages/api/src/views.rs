//! # Derived views
//!
//! Client-side aggregation of fetched entity lists into the view models the
//! screens render: chart series for the dashboard and the skill catalog, the
//! directory and catalog filters, and the headline counts.
//!
//! ## Chart assemblers
//!
//! | Function | Output |
//! |----------|--------|
//! | [`group_and_sum`] | One [`ChartDatum`] per distinct category, counts summed, first-seen order. |
//! | [`by_name`] | One [`ChartDatum`] per record, its own name and count. |
//! | [`skills_by_category`] / [`skills_by_name`] | The same over typed [`Skill`]s. |
//!
//! Records whose grouping key is missing or falsy (`null`, `""`, `false`, `0`)
//! are left out. There is no "unknown" bucket.
//!
//! ## Filters
//!
//! [`EmployeeFilter`] and [`SkillFilter`] hold the search box and drop-down
//! selections of the directory and catalog screens. An empty selection or the
//! literal `"All"` disables a drop-down.

use std::collections::HashMap;

use serde_json::Value;

use crate::models::{ChartDatum, Employee, Skill};

/// Drop-down entry that disables a filter.
pub const ALL: &str = "All";

/// Sum `count_field` per distinct `category_field`, in first-seen order.
pub fn group_and_sum(records: &[Value], category_field: &str, count_field: &str) -> Vec<ChartDatum> {
    group(records.iter().map(|r| {
        (
            r.get(category_field).and_then(grouping_key),
            count_of(r.get(count_field)),
        )
    }))
}

/// One datum per record named by `name_field`, valued by `count_field`.
pub fn by_name(records: &[Value], name_field: &str, count_field: &str) -> Vec<ChartDatum> {
    records
        .iter()
        .filter_map(|r| {
            let name = r.get(name_field).and_then(grouping_key)?;
            Some(ChartDatum::new(name, count_of(r.get(count_field))))
        })
        .collect()
}

/// Employees per skill category.
pub fn skills_by_category(skills: &[Skill]) -> Vec<ChartDatum> {
    group(skills.iter().map(|s| {
        (
            s.category.clone().filter(|c| !c.is_empty()),
            s.employee_count.unwrap_or(0) as f64,
        )
    }))
}

/// Employees per skill.
pub fn skills_by_name(skills: &[Skill]) -> Vec<ChartDatum> {
    skills
        .iter()
        .filter(|s| !s.name.is_empty())
        .map(|s| ChartDatum::new(s.name.clone(), s.employee_count.unwrap_or(0) as f64))
        .collect()
}

fn group(entries: impl Iterator<Item = (Option<String>, f64)>) -> Vec<ChartDatum> {
    let mut out: Vec<ChartDatum> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (key, count) in entries {
        let Some(key) = key else {
            continue;
        };
        match index.get(&key).copied() {
            Some(i) => out[i].value += count,
            None => {
                index.insert(key.clone(), out.len());
                out.push(ChartDatum::new(key, count));
            }
        }
    }
    out
}

fn grouping_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn count_of(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn selection(choice: &Option<String>) -> Option<&str> {
    choice
        .as_deref()
        .filter(|c| !c.is_empty() && *c != ALL)
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .unwrap_or_default()
        .to_lowercase()
        .contains(needle)
}

/// Search and drop-down state of the employee directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeFilter {
    pub search: String,
    pub department: Option<String>,
    pub skill: Option<String>,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = [
            employee.first_name.as_deref(),
            employee.last_name.as_deref(),
            employee.email.as_deref(),
            employee.position.as_deref(),
        ]
        .into_iter()
        .any(|field| contains_ci(field, &needle));

        let matches_department = match selection(&self.department) {
            None => true,
            Some(department) => employee.department.as_deref() == Some(department),
        };

        let matches_skill = match selection(&self.skill) {
            None => true,
            Some(skill) => employee.skills.iter().any(|s| s.name == skill),
        };

        matches_search && matches_department && matches_skill
    }

    pub fn apply<'a>(&self, employees: &'a [Employee]) -> Vec<&'a Employee> {
        employees.iter().filter(|e| self.matches(e)).collect()
    }
}

/// Search and category state of the skill catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillFilter {
    pub search: String,
    pub category: Option<String>,
}

impl SkillFilter {
    pub fn matches(&self, skill: &Skill) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = contains_ci(Some(skill.name.as_str()), &needle)
            || contains_ci(skill.description.as_deref(), &needle);

        let matches_category = match selection(&self.category) {
            None => true,
            Some(category) => skill.category.as_deref() == Some(category),
        };

        matches_search && matches_category
    }

    pub fn apply<'a>(&self, skills: &'a [Skill]) -> Vec<&'a Skill> {
        skills.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Distinct skill names across all employees, first-seen order.
pub fn distinct_skill_names(employees: &[Employee]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for skill in employees.iter().flat_map(|e| e.skills.iter()) {
        if !names.contains(&skill.name) {
            names.push(skill.name.clone());
        }
    }
    names
}

/// Headline numbers of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_employees: usize,
    pub total_skills: usize,
}

impl DashboardSummary {
    pub fn from_lists(employees: Option<&[Employee]>, skills: Option<&[Skill]>) -> Self {
        Self {
            total_employees: employees.map(<[Employee]>::len).unwrap_or(0),
            total_skills: skills.map(<[Skill]>::len).unwrap_or(0),
        }
    }
}
