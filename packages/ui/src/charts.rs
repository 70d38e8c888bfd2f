//! Skill charts derived from a loaded catalog, for screens that render
//! outside of a Dioxus component (exports, native widgets).
//!
//! Each chart is recomputed only when the catalog behind it changes.

use api::models::{ChartDatum, Skill};
use api::views::{skills_by_category, skills_by_name};

use crate::fetch::FetchHandle;
use crate::memo::Memo;

pub struct SkillCharts {
    skills: FetchHandle<Vec<Skill>>,
    by_category: Memo<Vec<Skill>, Vec<ChartDatum>>,
    by_name: Memo<Vec<Skill>, Vec<ChartDatum>>,
}

impl SkillCharts {
    pub fn new(skills: FetchHandle<Vec<Skill>>) -> Self {
        Self {
            skills,
            by_category: Memo::new(),
            by_name: Memo::new(),
        }
    }

    /// Employees per category. Empty until the catalog has loaded.
    pub fn by_category(&mut self) -> &[ChartDatum] {
        let skills = self.skills.state().data.unwrap_or_default();
        self.by_category.get(&skills, |s| skills_by_category(s))
    }

    /// Employees per skill.
    pub fn by_name(&mut self) -> &[ChartDatum] {
        let skills = self.skills.state().data.unwrap_or_default();
        self.by_name.get(&skills, |s| skills_by_name(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_charts_follow_the_catalog() {
        let handle: FetchHandle<Vec<Skill>> = FetchHandle::new();
        let mut charts = SkillCharts::new(handle.clone());
        assert!(charts.by_category().is_empty());

        handle
            .run(|| async {
                Ok(json!([
                    { "name": "Rust", "category": "Backend", "employeeCount": 2 },
                    { "name": "Go", "category": "Backend", "employeeCount": 1 }
                ]))
            })
            .await;

        let first = charts.by_category().as_ptr();
        assert_eq!(charts.by_category(), &[ChartDatum::new("Backend", 3.0)]);
        assert_eq!(charts.by_category().as_ptr(), first);
        assert_eq!(charts.by_name().len(), 2);

        handle
            .run(|| async { Ok(json!([{ "name": "Vue", "category": "Frontend", "employeeCount": 4 }])) })
            .await;
        assert_eq!(charts.by_category(), &[ChartDatum::new("Frontend", 4.0)]);
        assert_eq!(charts.by_name(), &[ChartDatum::new("Vue", 4.0)]);
    }
}
