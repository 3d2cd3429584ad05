//! Real-browser executor
//!
//! Compiles a step program into a single Playwright script and runs it
//! headless under node. The whole scenario runs as one script because
//! the form is stateful across steps; the script reports per-step
//! outcomes as one JSON line on stdout.

use serde::Deserialize;
use std::process::{Command, Stdio};
use tokio::process::Command as TokioCommand;
use tracing::debug;

use flowcheck_common::steps::{Expectation, PageDriver, PageStep, StepResult};
use flowcheck_common::{Error, Result};

/// Configuration for the browser executor
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Page the scenario navigates to first
    pub page_url: String,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl BrowserConfig {
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
        }
    }
}

/// Playwright-backed [`PageDriver`]
pub struct BrowserDriver {
    config: BrowserConfig,
}

impl BrowserDriver {
    /// Create a driver; fails early when Playwright is not installed.
    pub fn new(config: BrowserConfig) -> Result<Self> {
        check_playwright_installed()?;
        Ok(Self { config })
    }

    /// Build the Playwright script for a step program.
    pub fn build_script(&self, steps: &[PageStep]) -> String {
        let mut script = format!(
            r#"const {{ chromium }} = require('playwright');

(async () => {{
  const browser = await chromium.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  const page = await context.newPage();
  const report = [];
  const step = async (name, fn) => {{
    const start = Date.now();
    try {{
      await fn();
      report.push({{ step: name, ok: true, duration_ms: Date.now() - start }});
    }} catch (err) {{
      report.push({{ step: name, ok: false, duration_ms: Date.now() - start,
        error: String((err && err.message) || err) }});
      console.log(JSON.stringify(report));
      await browser.close();
      process.exit(1);
    }}
  }};

  await step('goto', async () => {{ await page.goto({url}); }});
"#,
            headless = self.config.headless,
            width = self.config.viewport_width,
            height = self.config.viewport_height,
            url = js_str(&self.config.page_url),
        );

        for step in steps {
            script.push_str(&format!(
                "  await step({name}, async () => {{\n{body}  }});\n",
                name = js_str(&step.name()),
                body = step_to_js(step),
            ));
        }

        script.push_str(
            r#"
  console.log(JSON.stringify(report));
  await browser.close();
})();
"#,
        );
        script
    }

    /// Run the script under node and collect the per-step report.
    async fn run_script(&self, script: &str) -> Result<Vec<StepResult>> {
        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("scenario.js");
        std::fs::write(&script_path, script)?;

        debug!("running browser script: {}", script_path.display());

        let output = TokioCommand::new("node")
            .arg(&script_path)
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let report_line = stdout
            .lines()
            .rev()
            .find(|line| line.trim_start().starts_with('['));

        let Some(line) = report_line else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Browser(format!(
                "script produced no report:\nstdout: {stdout}\nstderr: {stderr}"
            )));
        };

        let report: Vec<JsStepReport> =
            serde_json::from_str(line).map_err(|e| Error::Browser(format!("bad report: {e}")))?;
        Ok(report.into_iter().map(JsStepReport::into_result).collect())
    }
}

#[async_trait::async_trait]
impl PageDriver for BrowserDriver {
    async fn run(&self, steps: &[PageStep]) -> Result<Vec<StepResult>> {
        let script = self.build_script(steps);
        self.run_script(&script).await
    }

    fn name(&self) -> &'static str {
        "playwright"
    }
}

/// One entry of the script's JSON report
#[derive(Deserialize)]
struct JsStepReport {
    step: String,
    ok: bool,
    duration_ms: u64,
    #[serde(default)]
    error: Option<String>,
}

impl JsStepReport {
    fn into_result(self) -> StepResult {
        StepResult {
            success: self.ok,
            step_name: self.step,
            duration_ms: self.duration_ms,
            error: self.error,
        }
    }
}

/// Check that Playwright is reachable through npx.
fn check_playwright_installed() -> Result<()> {
    let status = Command::new("npx")
        .args(["playwright", "--version"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) if status.success() => Ok(()),
        _ => Err(Error::BrowserNotFound),
    }
}

/// A JS string literal, quoted and escaped.
fn js_str(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn step_to_js(step: &PageStep) -> String {
    match step {
        PageStep::Click { selector } => {
            format!("    await page.click({});\n", js_str(selector))
        }
        PageStep::Fill {
            selector,
            value,
            clear_first,
        } => {
            let sel = js_str(selector);
            let val = js_str(value);
            if *clear_first {
                format!("    await page.fill({sel}, {val});\n")
            } else {
                format!("    await page.type({sel}, {val});\n")
            }
        }
        PageStep::Assert { selector, expect } => assert_to_js(selector, expect),
    }
}

fn assert_to_js(selector: &str, expect: &Expectation) -> String {
    let sel = js_str(selector);
    let mut body = String::new();

    if let Some(exists) = expect.exists {
        let state = if exists { "visible" } else { "detached" };
        body.push_str(&format!(
            "    await page.waitForSelector({sel}, {{ state: '{state}', timeout: 5000 }});\n"
        ));
    }

    // Each check in its own block so a combined expectation cannot
    // collide on declarations.
    if let Some(count) = expect.count {
        body.push_str(&format!(
            "    {{\n      const found = await page.locator({sel}).count();\n      if (found !== {count}) throw new Error(`expected {count} matches, found ${{found}}`);\n    }}\n"
        ));
    }

    if let Some(text) = &expect.text_contains {
        let text = js_str(text);
        body.push_str(&format!(
            "    if (await page.locator({sel}, {{ hasText: {text} }}).count() === 0) throw new Error('no match contains ' + {text});\n"
        ));
    }

    if let Some(class) = &expect.class_contains {
        let class = js_str(class);
        body.push_str(&format!(
            "    {{\n      const cls = (await page.getAttribute({sel}, 'class')) || '';\n      if (!cls.split(/\\s+/).includes({class})) throw new Error('missing class ' + {class});\n    }}\n"
        ));
    }

    if let Some(class) = &expect.class_absent {
        let class = js_str(class);
        body.push_str(&format!(
            "    {{\n      const cls = (await page.getAttribute({sel}, 'class')) || '';\n      if (cls.split(/\\s+/).includes({class})) throw new Error('unexpected class ' + {class});\n    }}\n"
        ));
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowcheck_common::selectors;

    fn driver() -> BrowserDriver {
        // Bypass the npx probe; script generation needs no browser.
        BrowserDriver {
            config: BrowserConfig::new("https://example.test/webtables"),
        }
    }

    #[test]
    fn script_navigates_before_the_first_step() {
        let script = driver().build_script(&[PageStep::click(selectors::ADD_RECORD)]);
        let goto = script.find("page.goto").unwrap();
        let click = script.find("page.click").unwrap();
        assert!(goto < click);
    }

    #[test]
    fn selectors_are_escaped_as_js_strings() {
        let script = driver().build_script(&[PageStep::assert_count(selectors::DELETE_CONTROLS, 3)]);
        assert!(script.contains(r#"page.locator("[title=\"Delete\"]")"#));
    }

    #[test]
    fn clearing_fill_compiles_to_fill_and_plain_fill_to_type() {
        let steps = vec![
            PageStep::fill(selectors::AGE, "33"),
            PageStep::fill_clearing(selectors::DEPARTMENT, "President"),
        ];
        let script = driver().build_script(&steps);
        assert!(script.contains(r##"page.type("#age", "33")"##));
        assert!(script.contains(r##"page.fill("#department", "President")"##));
    }

    #[test]
    fn class_assertions_compile_both_polarities() {
        let steps = vec![
            PageStep::assert_class(selectors::USER_FORM, selectors::VALIDATED_CLASS),
            PageStep::assert_class_absent(selectors::USER_FORM, selectors::VALIDATED_CLASS),
        ];
        let script = driver().build_script(&steps);
        assert!(script.contains(r#"!cls.split(/\s+/).includes("was-validated")"#));
        assert!(script.contains(r#"if (cls.split(/\s+/).includes("was-validated"))"#));
    }
}
