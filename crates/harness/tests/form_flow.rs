//! Form flow tests against the in-process page model

use test_case::test_case;

use flowcheck_common::selectors;
use flowcheck_common::steps::{PageDriver, PageStep};
use flowcheck_fixture::WebTablesPage;
use flowcheck_harness::{FlowRunner, FormFlow};

#[tokio::test]
async fn valid_submission_scenario_passes_end_to_end() {
    let driver = WebTablesPage::new();
    let steps = FormFlow::default().valid_submission();

    let results = driver.run(&steps).await.expect("scenario runs");
    assert_eq!(results.len(), steps.len());
    assert!(results.iter().all(|r| r.success), "results: {results:?}");
}

#[tokio::test]
async fn empty_submission_reaches_the_invalid_state() {
    let driver = WebTablesPage::new();
    let steps = FormFlow::default().empty_submission();

    let results = driver.run(&steps).await.expect("scenario runs");
    assert!(results.iter().all(|r| r.success), "results: {results:?}");
}

#[tokio::test]
async fn malformed_email_reaches_the_invalid_state() {
    let driver = WebTablesPage::new();
    let steps = FormFlow::default().malformed_email_submission();

    let results = driver.run(&steps).await.expect("scenario runs");
    assert!(results.iter().all(|r| r.success), "results: {results:?}");
}

#[tokio::test]
async fn the_runner_reports_all_three_scenarios_green() {
    let runner = FlowRunner::new();
    let driver = WebTablesPage::new();

    let results = runner.run_form(&driver, &FormFlow::default()).await;
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.success));
}

// Omitting any single required field must leave the form open and invalid.
#[test_case(selectors::FIRST_NAME; "missing first name")]
#[test_case(selectors::LAST_NAME; "missing last name")]
#[test_case(selectors::USER_EMAIL; "missing email")]
#[test_case(selectors::AGE; "missing age")]
#[test_case(selectors::SALARY; "missing salary")]
#[test_case(selectors::DEPARTMENT; "missing department")]
#[tokio::test]
async fn any_missing_field_fails_validation(omitted: &str) {
    let flow = FormFlow::default();
    let person = &flow.person;
    let fields = [
        (selectors::FIRST_NAME, person.first_name.as_str()),
        (selectors::LAST_NAME, person.last_name.as_str()),
        (selectors::USER_EMAIL, person.user_email.as_str()),
        (selectors::AGE, person.age.as_str()),
        (selectors::SALARY, person.salary.as_str()),
        (selectors::DEPARTMENT, person.department.as_str()),
    ];

    let mut steps = vec![PageStep::click(selectors::ADD_RECORD)];
    for (selector, value) in fields {
        if selector != omitted {
            steps.push(PageStep::fill(selector, value));
        }
    }
    steps.push(PageStep::click(selectors::SUBMIT));
    steps.push(PageStep::assert_class(
        selectors::USER_FORM,
        selectors::VALIDATED_CLASS,
    ));
    steps.push(PageStep::assert_count(selectors::DELETE_CONTROLS, 3));

    let driver = WebTablesPage::new();
    let results = driver.run(&steps).await.expect("scenario runs");
    assert!(results.iter().all(|r| r.success), "results: {results:?}");
}

#[tokio::test]
async fn a_failing_scenario_does_not_affect_its_siblings() {
    // A wrong baseline makes the first scenario fail at its first
    // assertion; the negative scenarios never look at the row count.
    let flow = FormFlow {
        baseline_rows: 5,
        ..Default::default()
    };

    let runner = FlowRunner::new();
    let driver = WebTablesPage::new();
    let results = runner.run_form(&driver, &flow).await;

    assert_eq!(results.len(), 3);
    assert!(!results[0].success);
    assert!(results[1].success);
    assert!(results[2].success);
}
