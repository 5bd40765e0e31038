use hashbrown::HashSet;
use serde_json::Value as JSValue;

use super::ast::{
    RequiredVariables, TemplateField, TemplateList, TemplateObject, TemplateValue, VariableRef,
    VARIABLE_MARKER,
};
use crate::context::ASTContext;
use crate::error::{Error, ErrorKind, Result};

/// Parses a textual body template into a [TemplateValue] tree, collecting the
/// names of all variables the template references.
///
/// The template language is JSON with unquoted keys and marker-prefixed
/// variable tokens, e.g. `{ author: $id, post: { id: $postID }}`. Since that
/// is not valid JSON as written, the text is first rewritten into valid JSON
/// by quoting bare words and variable tokens, and then decoded. The decoded
/// tree keeps variable tokens as [TemplateValue::Variable] leaves for
/// substitution to replace later.
///
/// A blank template parses to [TemplateValue::Null] and no required variables.
pub fn parse_body_template<'a>(
    ctx: &'a ASTContext,
    body: &str,
) -> Result<(TemplateValue<'a>, RequiredVariables<'a>)> {
    let mut required = HashSet::new_in(&ctx.arena);
    if body.trim().is_empty() {
        return Ok((TemplateValue::Null, required));
    }

    let rewritten = rewrite_template(ctx, body, &mut required)?;
    let decoded: JSValue = serde_json::from_str(&rewritten)
        .map_err(|_| Error::new(ErrorKind::Unmarshal { body: rewritten }))?;

    Ok((convert(ctx, &decoded), required))
}

/// Rewrites a body template into valid JSON text.
///
/// Structural characters are copied, whitespace is dropped, variable tokens
/// and bare words are quoted, and quoted strings pass through verbatim.
/// Boolean, null, and all-digit words stay unquoted so they decode as their
/// literal values. Characters outside the template language fail the scan
/// immediately; unbalanced curly braces fail it after the full pass.
fn rewrite_template<'a>(
    ctx: &'a ASTContext,
    body: &str,
    required: &mut RequiredVariables<'a>,
) -> Result<String> {
    let mut out = String::with_capacity(body.len() + 16);
    let mut depth = 0i32;
    let mut chars = body.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        match c {
            '{' => {
                depth += 1;
                out.push(c);
            }
            '}' => {
                depth -= 1;
                out.push(c);
            }
            '[' | ']' | ',' | ':' => out.push(c),
            '"' => {
                // Copy the quoted string verbatim, including escapes. An
                // unterminated string runs to the end of the template and is
                // left for the JSON decoder to reject.
                out.push(c);
                let mut escaped = false;
                for (_, string_char) in chars.by_ref() {
                    out.push(string_char);
                    if escaped {
                        escaped = false;
                    } else if string_char == '\\' {
                        escaped = true;
                    } else if string_char == '"' {
                        break;
                    }
                }
            }
            VARIABLE_MARKER => {
                let start = index + c.len_utf8();
                let mut end = start;
                while let Some(&(next_index, next_char)) = chars.peek() {
                    if next_char.is_alphanumeric() {
                        end = next_index + next_char.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let name = &body[start..end];
                required.insert(ctx.alloc_str(name));
                out.push('"');
                out.push(VARIABLE_MARKER);
                out.push_str(name);
                out.push('"');
            }
            c if c.is_alphanumeric() => {
                let start = index;
                let mut end = index + c.len_utf8();
                while let Some(&(next_index, next_char)) = chars.peek() {
                    if next_char.is_alphanumeric() {
                        end = next_index + next_char.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let word = &body[start..end];
                let is_literal = matches!(word, "true" | "false" | "null")
                    || word.chars().all(|digit| digit.is_ascii_digit());
                if is_literal {
                    out.push_str(word);
                } else {
                    out.push('"');
                    out.push_str(word);
                    out.push('"');
                }
            }
            c if c.is_whitespace() => {}
            c => return Err(Error::new(ErrorKind::InvalidCharacter(c))),
        }
    }

    if depth != 0 {
        return Err(Error::new(ErrorKind::UnmatchedBraces));
    }

    Ok(out)
}

/// Converts decoded JSON into a template tree, turning every string of the
/// form `$name` into a variable reference.
fn convert<'a>(ctx: &'a ASTContext, value: &JSValue) -> TemplateValue<'a> {
    match value {
        JSValue::String(string) => match string.strip_prefix(VARIABLE_MARKER) {
            Some(name) => TemplateValue::Variable(VariableRef {
                name: ctx.alloc_str(name),
            }),
            None => TemplateValue::String(ctx.alloc_str(string)),
        },
        JSValue::Array(list) => {
            let mut children = bumpalo::collections::Vec::new_in(&ctx.arena);
            for item in list.iter() {
                children.push(convert(ctx, item));
            }
            TemplateValue::List(TemplateList { children })
        }
        JSValue::Object(map) => {
            let mut children = bumpalo::collections::Vec::new_in(&ctx.arena);
            for (key, value) in map.iter() {
                children.push(TemplateField {
                    name: ctx.alloc_str(key),
                    value: convert(ctx, value),
                });
            }
            TemplateValue::Object(TemplateObject { children })
        }
        JSValue::Null => TemplateValue::Null,
        JSValue::Bool(value) => TemplateValue::Boolean(*value),
        JSValue::Number(number) => TemplateValue::Number(number.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_required(required: &RequiredVariables<'_>, expected: &[&str]) {
        assert_eq!(required.len(), expected.len());
        for name in expected {
            assert!(required.contains(name), "missing variable {:?}", name);
        }
    }

    #[test]
    fn parses_body_template() {
        let ctx = ASTContext::new();
        let (template, required) =
            parse_body_template(&ctx, "{ author: $id, post: { id: $postID }}").unwrap();

        assert_eq!(
            template.to_json(),
            json!({"author": "$id", "post": {"id": "$postID"}})
        );
        assert_required(&required, &["id", "postID"]);
    }

    #[test]
    fn parses_body_template_with_array() {
        let ctx = ASTContext::new();
        let (template, required) = parse_body_template(
            &ctx,
            "{ author: $id, admin: $admin, post: { id: $postID, comments: [{ text: $text }] },
               age: $age}",
        )
        .unwrap();

        assert_eq!(
            template.to_json(),
            json!({
                "author": "$id",
                "admin": "$admin",
                "post": {"id": "$postID", "comments": [{"text": "$text"}]},
                "age": "$age"
            })
        );
        assert_required(&required, &["id", "admin", "postID", "text", "age"]);
    }

    #[test]
    fn keeps_literals_unquoted() {
        let ctx = ASTContext::new();
        let (template, required) = parse_body_template(
            &ctx,
            r#"{ flag: true, count: 10, note: "plain text", nothing: null }"#,
        )
        .unwrap();

        assert_eq!(
            template.to_json(),
            json!({"flag": true, "count": 10, "note": "plain text", "nothing": null})
        );
        assert_required(&required, &[]);
    }

    #[test]
    fn unmarshal_error_carries_rewritten_body() {
        let ctx = ASTContext::new();
        let error = parse_body_template(&ctx, "{ author: $id, post: { id $postID }}").unwrap_err();

        assert_eq!(
            error.message(),
            "couldn't unmarshal HTTP body: {\"author\":\"$id\",\"post\":{\"id\"\"$postID\"}} as JSON"
        );
    }

    #[test]
    fn unmatched_braces_error() {
        let ctx = ASTContext::new();
        let error = parse_body_template(&ctx, "{{ author: $id, post: { id: $postID }}").unwrap_err();

        assert_eq!(*error.kind(), ErrorKind::UnmatchedBraces);
        assert_eq!(
            error.message(),
            "found unmatched curly braces while parsing body template"
        );
    }

    #[test]
    fn invalid_character_error() {
        let ctx = ASTContext::new();
        let error = parse_body_template(&ctx, "(author: $id, post: { id: $postID }}").unwrap_err();

        assert_eq!(*error.kind(), ErrorKind::InvalidCharacter('('));
        assert_eq!(
            error.message(),
            "invalid character: ( while parsing body template"
        );
    }

    #[test]
    fn blank_template_parses_to_null() {
        let ctx = ASTContext::new();
        let (template, required) = parse_body_template(&ctx, "  \n ").unwrap();

        assert_eq!(template, TemplateValue::Null);
        assert_required(&required, &[]);
    }
}
