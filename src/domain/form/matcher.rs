//! Template matching: pick the largest stored template fully contained in a typed form.

use crate::domain::form::field_type::TypedForm;
use crate::domain::form::template::Template;
use serde_json::Value as JsonValue;

/// Every (field, type) pair of the template is present in the form with the same type.
///
/// Cost is proportional to the template size, not the form size.
pub fn is_candidate(template: &Template, typed_form: &TypedForm) -> bool {
    template
        .fields
        .iter()
        .all(|(field, expected)| typed_form.get(field) == Some(expected))
}

/// Returns the candidate with the most fields.
///
/// Ties on field count go to the lexicographically smallest template name, so the
/// answer does not depend on store scan order.
pub fn find_best_match<'a>(typed_form: &TypedForm, templates: &'a [Template]) -> Option<&'a Template> {
    let mut best: Option<&Template> = None;
    for template in templates.iter().filter(|t| is_candidate(t, typed_form)) {
        best = match best {
            None => Some(template),
            Some(current) => {
                let wider = template.fields.len() > current.fields.len();
                let same_width_earlier_name =
                    template.fields.len() == current.fields.len() && template.name < current.name;
                if wider || same_width_earlier_name {
                    Some(template)
                } else {
                    Some(current)
                }
            }
        };
    }
    best
}

/// Parses raw store records, skipping (and logging) the malformed ones.
pub fn templates_from_records(records: &[JsonValue]) -> Vec<Template> {
    let mut templates = Vec::with_capacity(records.len());
    for record in records {
        match Template::from_record(record) {
            Ok(t) => templates.push(t),
            Err(e) => {
                tracing::warn!(error = %e, record = %record, "skipping malformed template record");
            }
        }
    }
    templates
}
