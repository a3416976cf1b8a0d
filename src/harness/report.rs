//! Run reports
//!
//! A `RunReport` collects the outcome of every processed file of one suite
//! run. `into_result` is the single place where failures turn into an
//! error; inconclusive cases never do.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::harness::outcome::{FailureRecord, Outcome};
use crate::harness::HarnessError;

/// Outcome of one processed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Aggregated outcomes of one suite run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Suite and backend, such as `Raster::split_pages`
    pub label: String,
    /// Files matching the pattern
    pub discovered: usize,
    /// Files dropped by the exclusion substring
    pub excluded: usize,
    pub cases: Vec<CaseRecord>,
    /// Set when the whole run could not execute on this platform
    pub group_inconclusive: Option<String>,
}

impl RunReport {
    pub fn new(label: impl Into<String>) -> Self {
        RunReport {
            label: label.into(),
            ..Default::default()
        }
    }

    /// A run that never started because the backend is unavailable
    pub fn inconclusive_run(label: impl Into<String>, reason: impl Into<String>) -> Self {
        RunReport {
            label: label.into(),
            group_inconclusive: Some(reason.into()),
            ..Default::default()
        }
    }

    /// Records the outcome of one file
    pub fn record(&mut self, path: &Path, outcome: Outcome) {
        self.cases.push(CaseRecord { path: path.to_path_buf(), outcome });
    }

    /// Files that entered the per-file loop
    pub fn processed(&self) -> usize {
        self.cases.len()
    }

    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.outcome.is_passed()).count()
    }

    pub fn failures(&self) -> Vec<&FailureRecord> {
        self.cases
            .iter()
            .filter_map(|c| match &c.outcome {
                Outcome::Failed(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Inconclusive files with their reasons
    pub fn inconclusive(&self) -> Vec<(&Path, &str)> {
        self.cases
            .iter()
            .filter_map(|c| match &c.outcome {
                Outcome::Inconclusive(reason) => Some((c.path.as_path(), reason.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Whether the run as a whole was inconclusive
    pub fn is_inconclusive(&self) -> bool {
        self.group_inconclusive.is_some()
    }

    /// Fails with the combined report when any file failed
    pub fn into_result(self) -> Result<RunReport, HarnessError> {
        let failures: Vec<FailureRecord> = self.failures().into_iter().cloned().collect();
        if failures.is_empty() {
            return Ok(self);
        }
        Err(HarnessError::CasesFailed {
            label: self.label,
            processed: self.cases.len(),
            failures,
        })
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(reason) = &self.group_inconclusive {
            return write!(f, "{}: inconclusive ({})", self.label, reason);
        }
        write!(
            f,
            "{}: {} discovered, {} excluded, {} processed, {} passed, {} failed, {} inconclusive",
            self.label,
            self.discovered,
            self.excluded,
            self.processed(),
            self.passed(),
            self.failures().len(),
            self.inconclusive().len()
        )
    }
}

/// Renders reports as a JUnit XML document, one test suite per report
pub fn write_junit<W: Write>(reports: &[RunReport], output: W) -> Result<(), HarnessError> {
    let mut writer = Writer::new_with_indent(output, b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("testsuites")))
        .map_err(xml_error)?;

    for report in reports {
        let tests = report.processed().max(usize::from(report.is_inconclusive()));
        let skipped = report.inconclusive().len() + usize::from(report.is_inconclusive());

        let mut suite = BytesStart::new("testsuite");
        suite.push_attribute(("name", report.label.as_str()));
        suite.push_attribute(("tests", tests.to_string().as_str()));
        suite.push_attribute(("failures", report.failures().len().to_string().as_str()));
        suite.push_attribute(("skipped", skipped.to_string().as_str()));
        writer.write_event(Event::Start(suite)).map_err(xml_error)?;

        if let Some(reason) = &report.group_inconclusive {
            write_skipped_case(&mut writer, &report.label, "platform", reason)?;
        }

        for case in &report.cases {
            let name = case.path.display().to_string();
            match &case.outcome {
                Outcome::Passed => {
                    let mut element = BytesStart::new("testcase");
                    element.push_attribute(("classname", report.label.as_str()));
                    element.push_attribute(("name", name.as_str()));
                    writer.write_event(Event::Empty(element)).map_err(xml_error)?;
                }
                Outcome::Inconclusive(reason) => {
                    write_skipped_case(&mut writer, &report.label, &name, reason)?;
                }
                Outcome::Failed(record) => {
                    let mut element = BytesStart::new("testcase");
                    element.push_attribute(("classname", report.label.as_str()));
                    element.push_attribute(("name", name.as_str()));
                    writer.write_event(Event::Start(element)).map_err(xml_error)?;

                    let mut failure = BytesStart::new("failure");
                    failure.push_attribute(("type", record.category.as_str()));
                    failure.push_attribute(("message", record.message.as_str()));
                    writer.write_event(Event::Start(failure)).map_err(xml_error)?;
                    writer
                        .write_event(Event::Text(BytesText::new(&record.to_string())))
                        .map_err(xml_error)?;
                    writer.write_event(Event::End(BytesEnd::new("failure"))).map_err(xml_error)?;
                    writer.write_event(Event::End(BytesEnd::new("testcase"))).map_err(xml_error)?;
                }
            }
        }

        writer.write_event(Event::End(BytesEnd::new("testsuite"))).map_err(xml_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("testsuites")))
        .map_err(xml_error)?;
    Ok(())
}

fn write_skipped_case<W: Write>(
    writer: &mut Writer<W>,
    classname: &str,
    name: &str,
    reason: &str,
) -> Result<(), HarnessError> {
    let mut element = BytesStart::new("testcase");
    element.push_attribute(("classname", classname));
    element.push_attribute(("name", name));
    writer.write_event(Event::Start(element)).map_err(xml_error)?;

    let mut skipped = BytesStart::new("skipped");
    skipped.push_attribute(("message", reason));
    writer.write_event(Event::Empty(skipped)).map_err(xml_error)?;

    writer.write_event(Event::End(BytesEnd::new("testcase"))).map_err(xml_error)
}

fn xml_error<E: fmt::Display>(error: E) -> HarnessError {
    HarnessError::ReportError(error.to_string())
}

/// Renders reports as a JUnit XML string
pub fn junit_string(reports: &[RunReport]) -> Result<String, HarnessError> {
    let mut buffer = Vec::new();
    write_junit(reports, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| HarnessError::ReportError(e.to_string()))
}
