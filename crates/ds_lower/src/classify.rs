//! Recognises destructuring patterns and converts SWC patterns into the
//! binding-pattern data model.

use ds_ast::{
    ArrayElement, ArrayPattern, BindingPattern, BindingTarget, ObjectPattern, PatternProperty,
};
use swc_ecma_ast as ast;

use crate::error::{LowerError, Result};

/// True iff `pat` itself is an object or array pattern.
pub fn is_pattern(pat: &ast::Pat) -> bool {
    matches!(pat, ast::Pat::Object(_) | ast::Pat::Array(_))
}

/// Convert `pat` into a [`BindingPattern`], or `None` when it is not a
/// destructuring pattern at all.
pub fn binding_pattern(pat: &ast::Pat) -> Result<Option<BindingPattern>> {
    match pat {
        ast::Pat::Object(obj) => object_pattern(obj).map(Some),
        ast::Pat::Array(arr) => array_pattern(arr).map(Some),
        _ => Ok(None),
    }
}

fn binding_target(pat: &ast::Pat) -> Result<BindingTarget> {
    match pat {
        ast::Pat::Ident(ident) => Ok(BindingTarget::Identifier(ident.id.sym.to_string())),
        ast::Pat::Object(obj) => Ok(BindingTarget::Pattern(object_pattern(obj)?)),
        ast::Pat::Array(arr) => Ok(BindingTarget::Pattern(array_pattern(arr)?)),
        ast::Pat::Assign(_) => Err(LowerError::UnsupportedPattern("default value")),
        ast::Pat::Rest(_) => Err(LowerError::UnsupportedPattern("rest outside an array pattern")),
        ast::Pat::Expr(_) | ast::Pat::Invalid(_) => {
            Err(LowerError::UnsupportedPattern("expression target"))
        }
    }
}

fn object_pattern(obj: &ast::ObjectPat) -> Result<BindingPattern> {
    let mut properties = Vec::with_capacity(obj.props.len());

    for prop in &obj.props {
        let property = match prop {
            ast::ObjectPatProp::KeyValue(kv) => PatternProperty {
                key: property_key(&kv.key)?,
                target: binding_target(&kv.value)?,
            },
            ast::ObjectPatProp::Assign(assign) => {
                if assign.value.is_some() {
                    return Err(LowerError::UnsupportedPattern("default value"));
                }
                // Shorthand `{x}` binds `x` to `.x`.
                let name = assign.key.id.sym.to_string();
                PatternProperty {
                    key: name.clone(),
                    target: BindingTarget::Identifier(name),
                }
            }
            ast::ObjectPatProp::Rest(_) => {
                return Err(LowerError::UnsupportedPattern("object rest"));
            }
        };
        properties.push(property);
    }

    Ok(BindingPattern::Object(ObjectPattern { properties }))
}

fn array_pattern(arr: &ast::ArrayPat) -> Result<BindingPattern> {
    let len = arr.elems.len();
    let mut elements = Vec::with_capacity(len);

    for (index, elem) in arr.elems.iter().enumerate() {
        let element = match elem {
            None => ArrayElement::Skip,
            Some(ast::Pat::Rest(rest)) => {
                if index + 1 != len {
                    return Err(LowerError::MisplacedRest { index, len });
                }
                match &*rest.arg {
                    ast::Pat::Ident(ident) => ArrayElement::Rest(ident.id.sym.to_string()),
                    _ => return Err(LowerError::UnsupportedPattern("rest with a nested pattern")),
                }
            }
            Some(pat) => ArrayElement::Target(binding_target(pat)?),
        };
        elements.push(element);
    }

    Ok(BindingPattern::Array(ArrayPattern { elements }))
}

fn property_key(key: &ast::PropName) -> Result<String> {
    match key {
        ast::PropName::Ident(ident) => Ok(ident.sym.to_string()),
        _ => Err(LowerError::UnsupportedPattern("non-identifier property key")),
    }
}
