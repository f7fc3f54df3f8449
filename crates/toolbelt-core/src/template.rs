//! Script template engine.
//!
//! Pure and stateless: given a template and a caller-supplied name→value
//! mapping, validates required variables and replaces every literal
//! `$J{NAME}` placeholder. Placeholder names match mapping keys exactly
//! (case-sensitive); unknown placeholders are left untouched and extra
//! mapping keys are ignored. Declared default values are never consulted
//! here — callers pre-populate the mapping if they want defaults applied.

use std::collections::BTreeMap;

use toolbelt_store::models::ScriptVariable;

use crate::error::TemplateError;

/// Names of all required variables that are absent or blank after trimming.
#[must_use]
pub fn missing_required(
    declared: &[ScriptVariable],
    supplied: &BTreeMap<String, String>,
) -> Vec<String> {
    declared
        .iter()
        .filter(|var| var.required)
        .filter(|var| {
            supplied
                .get(&var.name)
                .is_none_or(|value| value.trim().is_empty())
        })
        .map(|var| var.name.clone())
        .collect()
}

/// Replace every `$J{NAME}` occurrence for each supplied key.
///
/// Iterates the mapping in key order, so substitution is deterministic.
/// Placeholder names are distinct literal tokens, so the order cannot
/// change the result.
#[must_use]
pub fn render(content: &str, supplied: &BTreeMap<String, String>) -> String {
    let mut output = content.to_owned();
    for (name, value) in supplied {
        let token = format!("$J{{{name}}}");
        if output.contains(&token) {
            output = output.replace(&token, value);
        }
    }
    output
}

/// Validate required variables, then substitute.
///
/// Returns [`TemplateError::MissingVariables`] listing every missing name
/// without touching the template.
pub fn process(
    content: &str,
    declared: &[ScriptVariable],
    supplied: &BTreeMap<String, String>,
) -> Result<String, TemplateError> {
    let missing = missing_required(declared, supplied);
    if !missing.is_empty() {
        return Err(TemplateError::MissingVariables { names: missing });
    }

    Ok(render(content, supplied))
}
