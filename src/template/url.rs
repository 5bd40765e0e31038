use url::Url;

use super::ast::{TemplateVariables, VARIABLE_MARKER};
use crate::error::{Error, ErrorKind, Result};
use serde_json::Value as JSValue;

/// Rewrites the variable tokens of a URL template against a variable map.
///
/// Path segments and query parameters follow different rules. A path segment
/// that is a variable token must resolve: an absent variable is a hard
/// missing-variable failure, and resolved values are percent-encoded into the
/// path. A query parameter of the form `key=$name` is more permissive, since
/// external API templates use optional query parameters as filters:
///
/// - variable present and non-null: the value is form-encoded, with spaces
///   encoded as `+`
/// - variable present but null: the key is kept with an empty value
/// - variable absent from the map: the whole pair is dropped
///
/// Retained pairs keep their input order, and when none remain the `?`
/// separator is omitted entirely.
pub fn substitute_vars_in_url(url: &str, variables: &TemplateVariables) -> Result<String> {
    let mut parsed =
        Url::parse(url).map_err(|_| Error::new(ErrorKind::InvalidUrl(url.to_string())))?;

    let segments: Option<Vec<String>> = parsed
        .path_segments()
        .map(|segments| segments.map(str::to_owned).collect());
    if let Some(segments) = segments {
        let mut substituted = Vec::with_capacity(segments.len());
        for segment in segments {
            match segment.strip_prefix(VARIABLE_MARKER) {
                Some(name) => {
                    let value = variables.get(name).ok_or_else(|| {
                        Error::new(ErrorKind::MissingVariable {
                            token: segment.clone(),
                        })
                    })?;
                    substituted.push(variable_to_string(value));
                }
                None => substituted.push(segment),
            }
        }

        parsed
            .path_segments_mut()
            .map_err(|_| Error::new(ErrorKind::InvalidUrl(url.to_string())))?
            .clear()
            .extend(substituted);
    }

    let mut retained: Vec<(String, String)> = Vec::new();
    for (key, value) in parsed.query_pairs() {
        match value.strip_prefix(VARIABLE_MARKER) {
            Some(name) => match variables.get(name) {
                // Absent variables drop the whole pair
                None => {}
                Some(JSValue::Null) => retained.push((key.into_owned(), String::new())),
                Some(value) => retained.push((key.into_owned(), variable_to_string(value))),
            },
            None => retained.push((key.into_owned(), value.into_owned())),
        }
    }

    if retained.is_empty() {
        parsed.set_query(None);
    } else {
        parsed
            .query_pairs_mut()
            .clear()
            .extend_pairs(retained.iter().map(|(key, value)| (key, value)));
    }

    Ok(parsed.into())
}

/// Renders a variable value into its URL string form.
///
/// Scalars render without JSON quoting, null renders empty, and structured
/// values fall back to their compact JSON text.
fn variable_to_string(value: &JSValue) -> String {
    match value {
        JSValue::String(string) => string.clone(),
        JSValue::Null => String::new(),
        other => other.to_string(),
    }
}
