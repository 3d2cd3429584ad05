//! Web-tables page model
//!
//! An in-process stand-in for the web page the form flow drives: a
//! table of person rows plus a modal registration form. The model
//! interprets the harness's step vocabulary against the same selectors
//! the real page exposes, and honors the form's state machine:
//!
//! `Closed -> Open (add/edit) -> { Committed | Open+Invalid } (submit) -> Closed`
//!
//! The only transition guard is "all required fields present and
//! well-formed"; a rejected submit leaves the form open with the
//! validation class set until it is explicitly dismissed. Page state
//! lives for one `run` call, matching a fresh page load per scenario.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Instant;

use flowcheck_common::selectors;
use flowcheck_common::steps::{Expectation, PageDriver, PageStep, StepResult};
use flowcheck_common::{Person, Result};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// The page driver. Stateless; every [`PageDriver::run`] call loads a
/// fresh page with the seed rows.
#[derive(Debug, Default)]
pub struct WebTablesPage;

impl WebTablesPage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PageDriver for WebTablesPage {
    async fn run(&self, steps: &[PageStep]) -> Result<Vec<StepResult>> {
        let mut page = PageState::load();
        let mut results = Vec::with_capacity(steps.len());

        for step in steps {
            let start = Instant::now();
            match page.apply(step) {
                Ok(()) => results.push(StepResult::ok(step.name(), start.elapsed())),
                Err(reason) => {
                    results.push(StepResult::failed(step.name(), start.elapsed(), reason));
                    break;
                }
            }
        }

        Ok(results)
    }

    fn name(&self) -> &'static str {
        "webtables-fixture"
    }
}

/// One table row, keyed by the record id its edit/delete controls use.
struct Row {
    record_id: usize,
    person: Person,
}

enum FormState {
    Closed,
    Open { invalid: bool },
}

/// The six field buffers of the modal form.
#[derive(Default)]
struct FormFields {
    first_name: String,
    last_name: String,
    user_email: String,
    age: String,
    salary: String,
    department: String,
}

impl FormFields {
    fn buffer_mut(&mut self, selector: &str) -> Option<&mut String> {
        match selector {
            selectors::FIRST_NAME => Some(&mut self.first_name),
            selectors::LAST_NAME => Some(&mut self.last_name),
            selectors::USER_EMAIL => Some(&mut self.user_email),
            selectors::AGE => Some(&mut self.age),
            selectors::SALARY => Some(&mut self.salary),
            selectors::DEPARTMENT => Some(&mut self.department),
            _ => None,
        }
    }

    fn from_person(person: &Person) -> Self {
        Self {
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            user_email: person.user_email.clone(),
            age: person.age.clone(),
            salary: person.salary.clone(),
            department: person.department.clone(),
        }
    }

    fn to_person(&self) -> Person {
        Person {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            user_email: self.user_email.clone(),
            age: self.age.clone(),
            salary: self.salary.clone(),
            department: self.department.clone(),
        }
    }
}

struct PageState {
    rows: Vec<Row>,
    next_record_id: usize,
    form: FormState,
    fields: FormFields,
    /// Record id being edited, if the form was opened via an edit control.
    editing: Option<usize>,
}

impl PageState {
    /// A fresh page load: the page's three stock rows.
    fn load() -> Self {
        let seed = [
            ("Cierra", "Vega", "cierra@example.com", "39", "10000", "Insurance"),
            ("Alden", "Cantrell", "alden@example.com", "45", "12000", "Compliance"),
            ("Kierra", "Gentry", "kierra@example.com", "29", "2000", "Legal"),
        ];

        let rows = seed
            .iter()
            .enumerate()
            .map(|(i, (first, last, email, age, salary, department))| Row {
                record_id: i + 1,
                person: Person {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    user_email: email.to_string(),
                    age: age.to_string(),
                    salary: salary.to_string(),
                    department: department.to_string(),
                },
            })
            .collect();

        Self {
            rows,
            next_record_id: seed.len() + 1,
            form: FormState::Closed,
            fields: FormFields::default(),
            editing: None,
        }
    }

    fn form_open(&self) -> bool {
        matches!(self.form, FormState::Open { .. })
    }

    fn apply(&mut self, step: &PageStep) -> std::result::Result<(), String> {
        match step {
            PageStep::Click { selector } => self.click(selector),
            PageStep::Fill {
                selector,
                value,
                clear_first,
            } => self.fill(selector, value, *clear_first),
            PageStep::Assert { selector, expect } => self.check(selector, expect),
        }
    }

    fn click(&mut self, selector: &str) -> std::result::Result<(), String> {
        if selector == selectors::ADD_RECORD {
            if self.form_open() {
                return Err("the open modal blocks the add control".to_string());
            }
            self.form = FormState::Open { invalid: false };
            self.fields = FormFields::default();
            self.editing = None;
            return Ok(());
        }

        if selector == selectors::SUBMIT {
            if !self.form_open() {
                return Err("no element matches #submit: form is closed".to_string());
            }
            self.submit();
            return Ok(());
        }

        if selector == selectors::CLOSE_MODAL {
            if !self.form_open() {
                return Err("no close control: form is closed".to_string());
            }
            self.form = FormState::Closed;
            self.fields = FormFields::default();
            self.editing = None;
            return Ok(());
        }

        if let Some(id) = control_id(selector, "#edit-record-") {
            if self.form_open() {
                return Err("the open modal blocks the row controls".to_string());
            }
            let row = self
                .rows
                .iter()
                .find(|r| r.record_id == id)
                .ok_or_else(|| format!("no element matches {selector}"))?;
            self.fields = FormFields::from_person(&row.person);
            self.form = FormState::Open { invalid: false };
            self.editing = Some(id);
            return Ok(());
        }

        if let Some(id) = control_id(selector, "#delete-record-") {
            if self.form_open() {
                return Err("the open modal blocks the row controls".to_string());
            }
            let before = self.rows.len();
            self.rows.retain(|r| r.record_id != id);
            if self.rows.len() == before {
                return Err(format!("no element matches {selector}"));
            }
            return Ok(());
        }

        Err(format!("no clickable element matches {selector}"))
    }

    fn fill(
        &mut self,
        selector: &str,
        value: &str,
        clear_first: bool,
    ) -> std::result::Result<(), String> {
        if !self.form_open() {
            return Err(format!("no element matches {selector}: form is closed"));
        }
        let buffer = self
            .fields
            .buffer_mut(selector)
            .ok_or_else(|| format!("no input matches {selector}"))?;
        if clear_first {
            buffer.clear();
        }
        buffer.push_str(value);
        Ok(())
    }

    /// The submit transition. Commits (insert or in-place edit) and
    /// closes when every field validates; otherwise stays open and
    /// gains the validation class.
    fn submit(&mut self) {
        let person = self.fields.to_person();
        if !person_validates(&person) {
            self.form = FormState::Open { invalid: true };
            return;
        }

        match self.editing {
            Some(id) => {
                if let Some(row) = self.rows.iter_mut().find(|r| r.record_id == id) {
                    row.person = person;
                }
            }
            None => {
                self.rows.push(Row {
                    record_id: self.next_record_id,
                    person,
                });
                self.next_record_id += 1;
            }
        }

        self.form = FormState::Closed;
        self.fields = FormFields::default();
        self.editing = None;
    }

    fn check(&self, selector: &str, expect: &Expectation) -> std::result::Result<(), String> {
        if let Some(should_exist) = expect.exists {
            let found = self.match_count(selector)? > 0;
            if found != should_exist {
                return Err(format!(
                    "expected {selector} to {}, but it {}",
                    if should_exist { "exist" } else { "be absent" },
                    if found { "exists" } else { "is absent" },
                ));
            }
        }

        if let Some(expected) = expect.count {
            let found = self.match_count(selector)?;
            if found != expected {
                return Err(format!(
                    "expected {expected} matches for {selector}, found {found}"
                ));
            }
        }

        if let Some(text) = &expect.text_contains {
            let texts = self.texts(selector)?;
            if texts.is_empty() {
                return Err(format!("no element matches {selector}"));
            }
            if !texts.iter().any(|t| t.contains(text)) {
                return Err(format!("no match of {selector} contains {text:?}"));
            }
        }

        if let Some(class) = &expect.class_contains {
            if !self.classes(selector)?.iter().any(|c| c == class) {
                return Err(format!("{selector} does not carry class {class:?}"));
            }
        }

        if let Some(class) = &expect.class_absent {
            if self.classes(selector)?.iter().any(|c| c == class) {
                return Err(format!("{selector} unexpectedly carries class {class:?}"));
            }
        }

        Ok(())
    }

    /// How many elements the selector matches in the current state.
    fn match_count(&self, selector: &str) -> std::result::Result<usize, String> {
        if selector == selectors::USER_FORM {
            return Ok(if self.form_open() { 1 } else { 0 });
        }
        if selector == selectors::DELETE_CONTROLS {
            return Ok(self.rows.len());
        }
        if selector == selectors::GRID_CELLS {
            return Ok(self.rows.len() * 6);
        }
        if let Some(text) = row_filter_text(selector) {
            return Ok(self
                .rows
                .iter()
                .filter(|r| r.person.cells().iter().any(|c| c.contains(text)))
                .count());
        }
        if let Some(id) = control_id(selector, "#edit-record-")
            .or_else(|| control_id(selector, "#delete-record-"))
        {
            return Ok(self.rows.iter().filter(|r| r.record_id == id).count());
        }
        Err(format!("unsupported selector {selector}"))
    }

    /// The text content of each match of the selector.
    fn texts(&self, selector: &str) -> std::result::Result<Vec<String>, String> {
        if selector == selectors::GRID_CELLS {
            return Ok(self
                .rows
                .iter()
                .flat_map(|r| r.person.cells().map(str::to_string))
                .collect());
        }
        if let Some(text) = row_filter_text(selector) {
            return Ok(self
                .rows
                .iter()
                .filter(|r| r.person.cells().iter().any(|c| c.contains(text)))
                .map(|r| r.person.cells().join(" "))
                .collect());
        }
        Err(format!("unsupported selector {selector}"))
    }

    /// The class list of the selector's match; errors when nothing matches.
    fn classes(&self, selector: &str) -> std::result::Result<Vec<String>, String> {
        if selector == selectors::USER_FORM {
            return match self.form {
                FormState::Closed => Err("no element matches #userForm".to_string()),
                FormState::Open { invalid } => Ok(if invalid {
                    vec![selectors::VALIDATED_CLASS.to_string()]
                } else {
                    Vec::new()
                }),
            };
        }
        Err(format!("unsupported selector {selector}"))
    }
}

/// The submit guard: every field present and well-formed.
fn person_validates(person: &Person) -> bool {
    person.cells().iter().all(|c| !c.is_empty())
        && EMAIL_RE.is_match(&person.user_email)
        && person.age.chars().all(|c| c.is_ascii_digit())
        && person.salary.chars().all(|c| c.is_ascii_digit())
}

fn control_id(selector: &str, prefix: &str) -> Option<usize> {
    selector.strip_prefix(prefix)?.parse().ok()
}

/// The `"X"` of a `[role="row"]:has-text("X")` selector.
fn row_filter_text(selector: &str) -> Option<&str> {
    selector
        .strip_prefix(r#"[role="row"]:has-text(""#)?
        .strip_suffix(r#"")"#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowcheck_common::steps::PageStep as S;

    fn sam() -> Person {
        Person {
            first_name: "Sam".to_string(),
            last_name: "Iam".to_string(),
            user_email: "sam.iam@fakeemail.com".to_string(),
            age: "33".to_string(),
            salary: "500000".to_string(),
            department: "illuminati".to_string(),
        }
    }

    #[test]
    fn fresh_page_has_three_rows_and_a_closed_form() {
        let page = PageState::load();
        assert_eq!(page.rows.len(), 3);
        assert!(!page.form_open());
        assert_eq!(page.match_count(selectors::DELETE_CONTROLS).unwrap(), 3);
    }

    #[test]
    fn valid_submit_commits_a_row_and_closes_the_form() {
        let mut page = PageState::load();
        page.click(selectors::ADD_RECORD).unwrap();
        for (selector, value) in field_values(&sam()) {
            page.fill(selector, &value, false).unwrap();
        }
        page.click(selectors::SUBMIT).unwrap();

        assert!(!page.form_open());
        assert_eq!(page.rows.len(), 4);
        assert_eq!(page.rows[3].record_id, 4);
        assert_eq!(page.rows[3].person, sam());
    }

    #[test]
    fn blank_submit_leaves_the_form_open_and_invalid() {
        let mut page = PageState::load();
        page.click(selectors::ADD_RECORD).unwrap();
        page.click(selectors::SUBMIT).unwrap();

        assert!(matches!(page.form, FormState::Open { invalid: true }));
        assert_eq!(page.rows.len(), 3);

        // Only an explicit dismiss leaves the invalid state
        page.click(selectors::CLOSE_MODAL).unwrap();
        assert!(!page.form_open());
    }

    #[test]
    fn malformed_email_fails_the_submit_guard() {
        let mut bad = sam();
        bad.user_email = "sam.iam@".to_string();
        assert!(!person_validates(&bad));
        assert!(person_validates(&sam()));
    }

    #[test]
    fn non_numeric_age_fails_the_submit_guard() {
        let mut bad = sam();
        bad.age = "thirty".to_string();
        assert!(!person_validates(&bad));
    }

    #[test]
    fn editing_updates_the_row_in_place() {
        let mut page = PageState::load();
        page.click("#edit-record-2").unwrap();
        page.fill(selectors::DEPARTMENT, "President", true).unwrap();
        page.click(selectors::SUBMIT).unwrap();

        assert_eq!(page.rows.len(), 3);
        assert_eq!(page.rows[1].person.department, "President");
        assert_eq!(page.rows[1].person.first_name, "Alden");
    }

    #[test]
    fn deleting_a_row_removes_its_controls() {
        let mut page = PageState::load();
        page.click("#delete-record-1").unwrap();
        assert_eq!(page.rows.len(), 2);
        assert!(page.click("#delete-record-1").is_err());
    }

    #[test]
    fn row_lookup_matches_by_contained_text() {
        let page = PageState::load();
        let selector = selectors::row_containing("Cierra");
        assert_eq!(page.match_count(&selector).unwrap(), 1);
        assert!(page
            .check(
                &selector,
                &Expectation {
                    text_contains: Some("Insurance".to_string()),
                    ..Default::default()
                },
            )
            .is_ok());
    }

    #[tokio::test]
    async fn driver_stops_at_the_first_failing_step() {
        let driver = WebTablesPage::new();
        let steps = vec![
            S::click(selectors::ADD_RECORD),
            S::assert_count(selectors::DELETE_CONTROLS, 99),
            S::click(selectors::SUBMIT),
        ];

        let results = driver.run(&steps).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].success);
        assert!(!results[1].success);
    }

    fn field_values(person: &Person) -> Vec<(&'static str, String)> {
        vec![
            (selectors::FIRST_NAME, person.first_name.clone()),
            (selectors::LAST_NAME, person.last_name.clone()),
            (selectors::USER_EMAIL, person.user_email.clone()),
            (selectors::AGE, person.age.clone()),
            (selectors::SALARY, person.salary.clone()),
            (selectors::DEPARTMENT, person.department.clone()),
        ]
    }
}
