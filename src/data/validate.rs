use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde_json::{Map, Value};

use crate::data::loader::load_raw_dataset;
use crate::error::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

const MOVE_TABLES: &[&str] = &["normal", "vtOne", "vtTwo"];

/// Read a dataset file (JSON or YAML) and check its shape without building typed records,
/// so one bad character does not hide problems in the others.
pub fn validate_dataset_file(path: impl AsRef<Path>) -> Result<ValidationReport, DataError> {
    let payload = load_raw_dataset(path)?;
    Ok(validate_dataset_value(&payload))
}

pub fn validate_dataset_value(payload: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();
    let Some(characters) = payload.as_object() else {
        report.push(
            ValidationSeverity::Error,
            "dataset",
            "expected top-level object of characters",
        );
        return report;
    };

    if characters.is_empty() {
        report.push(
            ValidationSeverity::Error,
            "dataset",
            "dataset contains no characters",
        );
    }

    for (name, character) in characters {
        let context = format!("character '{name}'");
        let Some(object) = character.as_object() else {
            report.push(ValidationSeverity::Error, context, "character is not an object");
            continue;
        };
        validate_moves(&mut report, object, &context);
        validate_stats(&mut report, object, &context);
    }

    report
}

fn validate_moves(report: &mut ValidationReport, character: &Map<String, Value>, context: &str) {
    let moves_context = format!("{context}.moves");
    let Some(moves) = character.get("moves") else {
        report.push(ValidationSeverity::Error, moves_context, "missing 'moves' object");
        return;
    };
    let Some(moves) = moves.as_object() else {
        report.push(ValidationSeverity::Error, moves_context, "expected object");
        return;
    };

    for table_name in MOVE_TABLES {
        let table_context = format!("{moves_context}.{table_name}");
        let Some(table) = moves.get(*table_name) else {
            report.push(
                ValidationSeverity::Warning,
                table_context,
                format!("missing '{table_name}' table"),
            );
            continue;
        };
        let Some(table) = table.as_object() else {
            report.push(ValidationSeverity::Error, table_context, "expected object");
            continue;
        };

        let mut lowered: HashMap<String, &str> = HashMap::new();
        for (move_name, record) in table {
            if let Some(previous) = lowered.insert(move_name.to_lowercase(), move_name) {
                report.push(
                    ValidationSeverity::Warning,
                    format!("{table_context}['{move_name}']"),
                    format!("collides with '{previous}' once lowercased; one of them is dropped"),
                );
            }
            validate_move(report, record, &format!("{table_context}['{move_name}']"));
        }
    }
}

fn validate_move(report: &mut ValidationReport, record: &Value, context: &str) {
    let Some(record) = record.as_object() else {
        report.push(ValidationSeverity::Error, context, "move is not an object");
        return;
    };

    if !record.contains_key("plnCmd") {
        report.push(
            ValidationSeverity::Warning,
            context,
            "missing 'plnCmd'; no command alias unless a trigger variant has one",
        );
    }

    if record.get("onHit").and_then(Value::as_str) == Some("KD") && !record.contains_key("kd") {
        report.push(
            ValidationSeverity::Info,
            context,
            "knockdown move without 'kd' advantage",
        );
    }

    match record.get("extraInfo") {
        None | Some(Value::Array(_)) => {}
        Some(Value::String(raw)) => {
            if serde_json::from_str::<Vec<Value>>(raw).is_err() {
                report.push(
                    ValidationSeverity::Error,
                    format!("{context}.extraInfo"),
                    "string value is not a JSON-encoded array",
                );
            }
        }
        Some(_) => report.push(
            ValidationSeverity::Warning,
            format!("{context}.extraInfo"),
            "expected array of strings",
        ),
    }
}

fn validate_stats(report: &mut ValidationReport, character: &Map<String, Value>, context: &str) {
    match character.get("stats") {
        None => report.push(
            ValidationSeverity::Warning,
            format!("{context}.stats"),
            "missing 'stats' object",
        ),
        Some(Value::Object(_)) => {}
        Some(_) => report.push(
            ValidationSeverity::Error,
            format!("{context}.stats"),
            "expected object",
        ),
    }
}
