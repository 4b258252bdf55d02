use anyhow::{Context, Result};
use jsonschema::Validator;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::schema::{load_schema, schema_ref_of};

/// Per-file check configuration.
pub struct CheckOptions {
    /// Treat a missing schema reference as a failure instead of a skip.
    pub strict: bool,
    /// Schema reference used when a document declares no `$schema`.
    pub fallback_schema: Option<String>,
}

/// Result of checking one file. Failure variants carry the diagnostic
/// detail so the CLI can report more than a bare pass/fail.
#[derive(Debug)]
pub enum Outcome {
    /// Document validated against its schema.
    Pass,
    /// No schema reference and not strict; nothing to check.
    Skipped,
    /// File unreadable or not valid JSON.
    ParseError(String),
    /// No schema reference under strict mode.
    MissingSchema,
    /// Schema reference could not be resolved, fetched, or compiled.
    LoadError(String),
    /// Document does not conform; one message per violation.
    Violations(Vec<String>),
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass | Outcome::Skipped)
    }
}

/// Check one JSON file's `$schema` reference and validate the document
/// against it. Each call is independent; nothing is retried or cached.
pub fn check_file(path: &Path, opts: &CheckOptions) -> Outcome {
    let mut doc = match read_json(path) {
        Ok(v) => v,
        Err(e) => return Outcome::ParseError(format!("{e:#}")),
    };

    let reference = schema_ref_of(&doc)
        .map(str::to_owned)
        .or_else(|| opts.fallback_schema.clone());
    let Some(reference) = reference else {
        return if opts.strict {
            Outcome::MissingSchema
        } else {
            Outcome::Skipped
        };
    };

    let schema_json = match load_schema(&reference) {
        Ok(v) => v,
        Err(e) => return Outcome::LoadError(format!("{e:#}")),
    };
    let compiled = match Validator::new(&schema_json) {
        Ok(c) => c,
        Err(e) => return Outcome::LoadError(format!("schema compile error {reference}: {e}")),
    };

    // The declaration pointing at the schema is not part of the data under
    // test; without this a schema with additionalProperties:false would
    // reject its own reference.
    if let Some(obj) = doc.as_object_mut() {
        obj.remove("$schema");
    }

    if let Err(errors) = compiled.validate(&doc) {
        let msgs: Vec<String> = errors
            .map(|e| {
                let loc = e.instance_path.to_string();
                if loc.is_empty() {
                    e.to_string()
                } else {
                    format!("{loc}: {e}")
                }
            })
            .collect();
        return Outcome::Violations(msgs);
    }

    Outcome::Pass
}

fn read_json(path: &Path) -> Result<Value> {
    let s = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let v: Value = serde_json::from_str(&s).with_context(|| format!("parsing {}", path.display()))?;
    Ok(v)
}
