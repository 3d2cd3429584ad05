//! Form scenario runner
//!
//! Three independent scenarios against the web-tables page, each
//! expressed as a step program and each run against a freshly loaded
//! page. The two negative scenarios *expect* the validation state: they
//! fail if the form commits or never turns invalid.

use flowcheck_common::selectors;
use flowcheck_common::steps::PageStep;
use flowcheck_common::Person;

/// Parameters of the form flow. Literal inline scenario data; the
/// defaults are the demo scenario's values against a page seeded with
/// three rows.
#[derive(Debug, Clone)]
pub struct FormFlow {
    pub person: Person,
    pub malformed_email: String,
    pub edited_department: String,
    /// Rows the page shows before the scenario touches it.
    pub baseline_rows: usize,
}

impl Default for FormFlow {
    fn default() -> Self {
        Self {
            person: Person {
                first_name: "Sam".to_string(),
                last_name: "Iam".to_string(),
                user_email: "sam.iam@fakeemail.com".to_string(),
                age: "33".to_string(),
                salary: "500000".to_string(),
                department: "illuminati".to_string(),
            },
            malformed_email: "sam.iam@".to_string(),
            edited_department: "President".to_string(),
            baseline_rows: 3,
        }
    }
}

impl FormFlow {
    /// The three scenarios, in run order.
    pub fn scenarios(&self) -> Vec<(&'static str, Vec<PageStep>)> {
        vec![
            ("form-valid-submission", self.valid_submission()),
            ("form-empty-submission", self.empty_submission()),
            ("form-malformed-email", self.malformed_email_submission()),
        ]
    }

    /// Happy path: submit a full record, verify the new row, edit its
    /// department, then delete it and verify the baseline is restored.
    pub fn valid_submission(&self) -> Vec<PageStep> {
        // The new row inherits the next record id after the seed rows.
        let new_record = self.baseline_rows + 1;

        let mut steps = vec![PageStep::assert_count(
            selectors::DELETE_CONTROLS,
            self.baseline_rows,
        )];
        steps.push(PageStep::click(selectors::ADD_RECORD));
        steps.extend(self.fill_fields(&self.person.user_email));

        // Form is visible and not yet flagged invalid
        steps.push(PageStep::assert_exists(selectors::USER_FORM, true));
        steps.push(PageStep::assert_class_absent(
            selectors::USER_FORM,
            selectors::VALIDATED_CLASS,
        ));
        steps.push(PageStep::click(selectors::SUBMIT));

        // Commit closes the form and lands one row with all six values
        steps.push(PageStep::assert_exists(selectors::USER_FORM, false));
        let row = selectors::row_containing(&self.person.first_name);
        for value in self.person.cells() {
            steps.push(PageStep::assert_text(row.clone(), value));
        }
        steps.push(PageStep::assert_count(
            selectors::DELETE_CONTROLS,
            self.baseline_rows + 1,
        ));

        // Edit the new row's department
        steps.push(PageStep::click(selectors::edit_control(new_record)));
        steps.push(PageStep::fill_clearing(
            selectors::DEPARTMENT,
            &self.edited_department,
        ));
        steps.push(PageStep::click(selectors::SUBMIT));
        steps.push(PageStep::assert_text(
            selectors::GRID_CELLS,
            &self.edited_department,
        ));

        // Delete it again and verify the baseline count
        steps.push(PageStep::click(selectors::delete_control(new_record)));
        steps.push(PageStep::assert_count(
            selectors::DELETE_CONTROLS,
            self.baseline_rows,
        ));
        steps
    }

    /// Submitting with every field blank must leave the form open in
    /// the invalid state.
    pub fn empty_submission(&self) -> Vec<PageStep> {
        vec![
            PageStep::click(selectors::ADD_RECORD),
            PageStep::assert_exists(selectors::USER_FORM, true),
            PageStep::assert_class_absent(selectors::USER_FORM, selectors::VALIDATED_CLASS),
            PageStep::click(selectors::SUBMIT),
            PageStep::assert_class(selectors::USER_FORM, selectors::VALIDATED_CLASS),
            PageStep::assert_exists(selectors::USER_FORM, true),
            PageStep::click(selectors::CLOSE_MODAL),
        ]
    }

    /// A full record with a syntactically invalid email must be
    /// rejected the same way.
    pub fn malformed_email_submission(&self) -> Vec<PageStep> {
        let mut steps = vec![PageStep::click(selectors::ADD_RECORD)];
        steps.extend(self.fill_fields(&self.malformed_email));
        steps.push(PageStep::assert_class_absent(
            selectors::USER_FORM,
            selectors::VALIDATED_CLASS,
        ));
        steps.push(PageStep::click(selectors::SUBMIT));
        steps.push(PageStep::assert_class(
            selectors::USER_FORM,
            selectors::VALIDATED_CLASS,
        ));
        steps.push(PageStep::assert_exists(selectors::USER_FORM, true));
        steps.push(PageStep::click(selectors::CLOSE_MODAL));
        steps
    }

    fn fill_fields(&self, email: &str) -> Vec<PageStep> {
        vec![
            PageStep::fill(selectors::FIRST_NAME, &self.person.first_name),
            PageStep::fill(selectors::LAST_NAME, &self.person.last_name),
            PageStep::fill(selectors::USER_EMAIL, email),
            PageStep::fill(selectors::AGE, &self.person.age),
            PageStep::fill(selectors::SALARY, &self.person.salary),
            PageStep::fill(selectors::DEPARTMENT, &self.person.department),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_submission_checks_every_cell_of_the_new_row() {
        let flow = FormFlow::default();
        let steps = flow.valid_submission();

        let row = selectors::row_containing("Sam");
        let row_asserts = steps
            .iter()
            .filter(|s| matches!(s, PageStep::Assert { selector, .. } if *selector == row))
            .count();
        assert_eq!(row_asserts, 6);
    }

    #[test]
    fn negative_scenarios_expect_the_validation_class() {
        let flow = FormFlow::default();
        for steps in [flow.empty_submission(), flow.malformed_email_submission()] {
            assert!(steps.iter().any(|s| matches!(
                s,
                PageStep::Assert { selector, expect }
                    if selector == selectors::USER_FORM
                        && expect.class_contains.as_deref() == Some(selectors::VALIDATED_CLASS)
            )));
        }
    }

    #[test]
    fn scenarios_run_in_demo_order() {
        let names: Vec<_> = FormFlow::default()
            .scenarios()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            [
                "form-valid-submission",
                "form-empty-submission",
                "form-malformed-email"
            ]
        );
    }
}
