//! CSS selectors for the web-tables page
//!
//! The one selector dialect shared by the real-browser executor and the
//! in-process page model: plain ids, attribute selectors, and the
//! `:has-text("...")` extension for row lookup.

/// Opens the registration form modal.
pub const ADD_RECORD: &str = "#addNewRecordButton";

/// The modal form container. Carries the validation class after a
/// rejected submit.
pub const USER_FORM: &str = "#userForm";

pub const FIRST_NAME: &str = "#firstName";
pub const LAST_NAME: &str = "#lastName";
pub const USER_EMAIL: &str = "#userEmail";
pub const AGE: &str = "#age";
pub const SALARY: &str = "#salary";
pub const DEPARTMENT: &str = "#department";

/// Submits the form.
pub const SUBMIT: &str = "#submit";

/// The modal's dismiss control (the × in the header).
pub const CLOSE_MODAL: &str = r#".modal-header [aria-hidden="true"]"#;

/// One match per table row; counting these tracks the row count.
pub const DELETE_CONTROLS: &str = r#"[title="Delete"]"#;

/// Any data cell of the table.
pub const GRID_CELLS: &str = r#"[role="gridcell"]"#;

/// The class the form container gains when a submit fails validation.
pub const VALIDATED_CLASS: &str = "was-validated";

/// Row-scoped edit control for the record with the given id.
pub fn edit_control(record_id: usize) -> String {
    format!("#edit-record-{record_id}")
}

/// Row-scoped delete control for the record with the given id.
pub fn delete_control(record_id: usize) -> String {
    format!("#delete-record-{record_id}")
}

/// The table row containing the given text in any cell.
pub fn row_containing(text: &str) -> String {
    format!(r#"[role="row"]:has-text("{text}")"#)
}
