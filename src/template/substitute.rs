use super::ast::{TemplateValue, TemplateVariables, VARIABLE_MARKER};
use crate::context::ASTContext;
use crate::error::{Error, ErrorKind, Result};

/// Replaces every variable reference in a parsed body template with the value
/// stored for it in `variables`, in place.
///
/// Values keep their native type: a string variable stays a string, a boolean
/// stays a boolean, a number stays a number, and a null stays null. A variable
/// without an entry in the map aborts the whole substitution with a
/// missing-variable error, leaving no partially substituted result behind.
/// Replacement values are taken verbatim and never re-scanned for variable
/// markers.
pub fn substitute_vars_in_body<'a>(
    ctx: &'a ASTContext,
    template: &mut TemplateValue<'a>,
    variables: &TemplateVariables,
) -> Result<()> {
    match template {
        TemplateValue::Variable(var) => {
            let name = var.name;
            let value = variables.get(name).ok_or_else(|| {
                Error::new(ErrorKind::MissingVariable {
                    token: format!("{}{}", VARIABLE_MARKER, name),
                })
            })?;
            *template = TemplateValue::from_json(ctx, value);
            Ok(())
        }
        TemplateValue::Object(object) => {
            for field in object.children.iter_mut() {
                substitute_vars_in_body(ctx, &mut field.value, variables)?;
            }
            Ok(())
        }
        TemplateValue::List(list) => {
            for item in list.children.iter_mut() {
                substitute_vars_in_body(ctx, item, variables)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
