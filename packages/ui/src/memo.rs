//! Recompute-on-change cache for derived views.

/// Caches `compute(input)` until the input changes by equality.
#[derive(Debug, Clone)]
pub struct Memo<I, O> {
    input: Option<I>,
    output: Option<O>,
}

impl<I, O> Default for Memo<I, O> {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
        }
    }
}

impl<I: PartialEq + Clone, O> Memo<I, O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, input: &I, compute: impl FnOnce(&I) -> O) -> &O {
        if self.input.as_ref() != Some(input) {
            self.input = Some(input.clone());
            self.output = None;
        }
        self.output.get_or_insert_with(|| compute(input))
    }

    /// Forget the cached value.
    pub fn invalidate(&mut self) {
        self.input = None;
        self.output = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::models::{ChartDatum, Skill};
    use api::views::skills_by_category;

    #[test]
    fn test_recomputes_only_on_change() {
        let mut memo: Memo<Vec<Skill>, Vec<ChartDatum>> = Memo::new();
        let mut runs = 0;
        let skills = vec![Skill {
            name: "Rust".to_string(),
            category: Some("Backend".to_string()),
            employee_count: Some(2),
            ..Skill::default()
        }];

        for _ in 0..3 {
            let chart = memo.get(&skills, |s| {
                runs += 1;
                skills_by_category(s)
            });
            assert_eq!(chart, &vec![ChartDatum::new("Backend", 2.0)]);
        }
        assert_eq!(runs, 1);

        let mut more = skills.clone();
        more[0].employee_count = Some(5);
        memo.get(&more, |s| {
            runs += 1;
            skills_by_category(s)
        });
        assert_eq!(runs, 2);

        memo.invalidate();
        memo.get(&more, |s| {
            runs += 1;
            skills_by_category(s)
        });
        assert_eq!(runs, 3);
    }
}
