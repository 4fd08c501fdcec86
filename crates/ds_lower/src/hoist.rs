//! Hoisting of pattern parameters into a function preamble.
//!
//! `function g(a, {y}, [z]) {...}` →
//! `function g(a, arg$0, arg$1) { var y = arg$0.y, z = arg$1[0]; ... }`

use ds_ast::{AssignmentOp, BindingPattern, BindingTarget, SourceExpr};
use swc_ecma_ast as ast;

use crate::classify::binding_pattern;
use crate::error::{LowerError, Result};
use crate::lower::Lowerer;
use crate::names::NameAllocator;

/// A parameter that may carry a destructuring pattern.
pub trait HoistableParam: Sized {
    /// The pattern this parameter binds, or `None` for a plain parameter.
    fn binding_pattern(&self) -> Result<Option<BindingPattern>>;

    /// Replace the pattern with the identifier `name`, keeping everything
    /// else about the parameter.
    fn into_placeholder(self, name: &str) -> Self;

    /// True when the parameter carries a default value.
    fn has_default(&self) -> bool {
        false
    }
}

/// A pattern parameter and the identifier now standing in for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternBinding {
    pub pattern: BindingPattern,
    pub placeholder: String,
}

#[derive(Debug)]
pub struct HoistedParams<P> {
    pub params: Vec<P>,
    pub bindings: Vec<PatternBinding>,
}

/// The bindings injected at the top of a function body, emitted as one
/// declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Preamble {
    pub bindings: Vec<AssignmentOp>,
}

#[derive(Debug)]
pub struct LoweredSignature<P> {
    pub params: Vec<P>,
    /// `None` when no parameter was a pattern.
    pub preamble: Option<Preamble>,
}

/// Replace every pattern parameter with a fresh `<prefix>$N` placeholder,
/// in declared order.
pub fn hoist_patterns<P: HoistableParam>(
    names: &mut NameAllocator,
    prefix: &str,
    params: Vec<P>,
) -> Result<HoistedParams<P>> {
    let mut hoisted = Vec::with_capacity(params.len());
    let mut bindings = Vec::new();

    for param in params {
        // Defaults are evaluated before the preamble runs, so they would
        // miss the names bound by an earlier pattern.
        if !bindings.is_empty() && param.has_default() {
            return Err(LowerError::UnsupportedPattern("default after a pattern parameter"));
        }
        match param.binding_pattern()? {
            Some(pattern) => {
                let placeholder = names.allocate(prefix);
                hoisted.push(param.into_placeholder(&placeholder));
                bindings.push(PatternBinding {
                    pattern,
                    placeholder,
                });
            }
            None => hoisted.push(param),
        }
    }

    Ok(HoistedParams {
        params: hoisted,
        bindings,
    })
}

impl Lowerer {
    /// Rewrite a parameter list so it binds no patterns, returning the
    /// preamble that restores the original bindings.
    pub fn lower_function_signature<P: HoistableParam>(
        &mut self,
        params: Vec<P>,
    ) -> Result<LoweredSignature<P>> {
        let prefix = self.config.param_prefix.clone();
        let HoistedParams { params, bindings } = hoist_patterns(&mut self.names, &prefix, params)?;

        if bindings.is_empty() {
            return Ok(LoweredSignature {
                params,
                preamble: None,
            });
        }

        let mut preamble = Vec::new();
        for binding in &bindings {
            let source = SourceExpr::Identifier(binding.placeholder.clone());
            preamble.extend(self.lower_declaration(&binding.pattern, source)?);
        }
        tracing::debug!(
            patterns = bindings.len(),
            assignments = preamble.len(),
            "hoisted pattern parameters"
        );

        Ok(LoweredSignature {
            params,
            preamble: Some(Preamble { bindings: preamble }),
        })
    }
}

impl HoistableParam for BindingTarget {
    fn binding_pattern(&self) -> Result<Option<BindingPattern>> {
        Ok(match self {
            BindingTarget::Pattern(pattern) => Some(pattern.clone()),
            BindingTarget::Identifier(_) => None,
        })
    }

    fn into_placeholder(self, name: &str) -> Self {
        BindingTarget::Identifier(name.to_string())
    }
}

impl HoistableParam for ast::Pat {
    fn binding_pattern(&self) -> Result<Option<BindingPattern>> {
        binding_pattern(self)
    }

    fn into_placeholder(self, name: &str) -> Self {
        // A TypeScript annotation on the pattern moves to the placeholder.
        let (span, type_ann) = match self {
            ast::Pat::Object(obj) => (obj.span, obj.type_ann),
            ast::Pat::Array(arr) => (arr.span, arr.type_ann),
            other => return other,
        };
        ast::Pat::Ident(ast::BindingIdent {
            id: ast::Ident::new_no_ctxt(name.into(), span),
            type_ann,
        })
    }

    fn has_default(&self) -> bool {
        matches!(self, ast::Pat::Assign(_))
    }
}

impl HoistableParam for ast::Param {
    fn binding_pattern(&self) -> Result<Option<BindingPattern>> {
        binding_pattern(&self.pat)
    }

    fn into_placeholder(self, name: &str) -> Self {
        ast::Param {
            pat: self.pat.into_placeholder(name),
            ..self
        }
    }

    fn has_default(&self) -> bool {
        self.pat.has_default()
    }
}

/// Constructor parameters. TypeScript parameter properties cannot hold a
/// pattern and pass through.
impl HoistableParam for ast::ParamOrTsParamProp {
    fn binding_pattern(&self) -> Result<Option<BindingPattern>> {
        match self {
            ast::ParamOrTsParamProp::Param(param) => param.binding_pattern(),
            ast::ParamOrTsParamProp::TsParamProp(_) => Ok(None),
        }
    }

    fn into_placeholder(self, name: &str) -> Self {
        match self {
            ast::ParamOrTsParamProp::Param(param) => {
                ast::ParamOrTsParamProp::Param(param.into_placeholder(name))
            }
            other => other,
        }
    }

    fn has_default(&self) -> bool {
        match self {
            ast::ParamOrTsParamProp::Param(param) => param.has_default(),
            ast::ParamOrTsParamProp::TsParamProp(prop) => {
                matches!(prop.param, ast::TsParamPropParam::Assign(_))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::render_preamble;
    use crate::test_util::pattern;

    fn params(list: &[&str]) -> Vec<BindingTarget> {
        list.iter()
            .map(|p| {
                if p.starts_with('{') || p.starts_with('[') {
                    BindingTarget::Pattern(pattern(p))
                } else {
                    BindingTarget::Identifier(p.to_string())
                }
            })
            .collect()
    }

    fn ident(name: &str) -> BindingTarget {
        BindingTarget::Identifier(name.to_string())
    }

    #[test]
    fn plain_parameters_are_left_alone() {
        let mut lowerer = Lowerer::default();
        let sig = lowerer.lower_function_signature(params(&["a", "b"])).unwrap();
        assert_eq!(sig.params, vec![ident("a"), ident("b")]);
        assert!(sig.preamble.is_none());
    }

    #[test]
    fn pattern_parameter_gets_placeholder_and_preamble() {
        let mut lowerer = Lowerer::default();
        let sig = lowerer.lower_function_signature(params(&["{y}"])).unwrap();
        assert_eq!(sig.params, vec![ident("arg$0")]);
        let preamble = sig.preamble.unwrap();
        assert_eq!(render_preamble(&preamble).unwrap(), "var y = arg$0.y;");
    }

    #[test]
    fn placeholders_keep_parameter_positions() {
        let mut lowerer = Lowerer::default();
        let sig = lowerer
            .lower_function_signature(params(&["x", "{y}", "z", "[a, b]"]))
            .unwrap();
        assert_eq!(
            sig.params,
            vec![ident("x"), ident("arg$0"), ident("z"), ident("arg$1")]
        );
        assert_eq!(
            render_preamble(&sig.preamble.unwrap()).unwrap(),
            "var y = arg$0.y, a = arg$1[0], b = arg$1[1];"
        );
    }

    #[test]
    fn hoisting_records_patterns_in_order() {
        let mut names = NameAllocator::new();
        let hoisted = hoist_patterns(&mut names, "arg", params(&["{a}", "b", "[c]"])).unwrap();
        assert_eq!(
            hoisted.bindings,
            vec![
                PatternBinding { pattern: pattern("{a}"), placeholder: "arg$0".into() },
                PatternBinding { pattern: pattern("[c]"), placeholder: "arg$1".into() },
            ]
        );
    }

    #[test]
    fn placeholders_and_temporaries_share_the_counter() {
        let mut lowerer = Lowerer::default();
        let sig = lowerer
            .lower_function_signature(params(&["{a: {b, c}}"]))
            .unwrap();
        assert_eq!(
            render_preamble(&sig.preamble.unwrap()).unwrap(),
            "var var$1 = arg$0.a, b = var$1.b, c = var$1.c;"
        );
    }

    #[test]
    fn type_annotation_moves_to_placeholder() {
        let parsed = ds_parser::parse_source("function f({x}: Opts) {}", "test.ts").unwrap();
        let func = match parsed.module.body.into_iter().next() {
            Some(ast::ModuleItem::Stmt(ast::Stmt::Decl(ast::Decl::Fn(decl)))) => decl.function,
            other => panic!("expected a function declaration, got {other:?}"),
        };

        let mut lowerer = Lowerer::default();
        let sig = lowerer.lower_function_signature(func.params).unwrap();
        match &sig.params[0].pat {
            ast::Pat::Ident(ident) => {
                assert_eq!(&*ident.id.sym, "arg$0");
                assert!(ident.type_ann.is_some());
            }
            other => panic!("expected a placeholder identifier, got {other:?}"),
        }
    }

    fn first_function(source: &str) -> ast::Function {
        let parsed = ds_parser::parse_source(source, "test.js").unwrap();
        match parsed.module.body.into_iter().next() {
            Some(ast::ModuleItem::Stmt(ast::Stmt::Decl(ast::Decl::Fn(decl)))) => *decl.function,
            other => panic!("expected a function declaration, got {other:?}"),
        }
    }

    #[test]
    fn default_after_pattern_is_rejected() {
        let func = first_function("function f({x}, y = x) {}");
        let err = Lowerer::default()
            .lower_function_signature(func.params)
            .unwrap_err();
        assert!(matches!(
            err,
            LowerError::UnsupportedPattern("default after a pattern parameter")
        ));
    }

    #[test]
    fn default_before_pattern_is_kept() {
        let func = first_function("function f(y = 1, {x}) {}");
        let sig = Lowerer::default().lower_function_signature(func.params).unwrap();
        assert!(sig.params[0].has_default());
        assert_eq!(
            render_preamble(&sig.preamble.unwrap()).unwrap(),
            "var x = arg$0.x;"
        );
    }

    #[test]
    fn constructor_parameters_are_hoisted() {
        let parsed =
            ds_parser::parse_source("class C { constructor(a, [b]) {} }", "test.js").unwrap();
        let ctor = match parsed.module.body.into_iter().next() {
            Some(ast::ModuleItem::Stmt(ast::Stmt::Decl(ast::Decl::Class(decl)))) => {
                decl.class.body.into_iter().find_map(|member| match member {
                    ast::ClassMember::Constructor(ctor) => Some(ctor),
                    _ => None,
                })
            }
            _ => None,
        }
        .expect("class with a constructor");

        let sig = Lowerer::default().lower_function_signature(ctor.params).unwrap();
        assert!(matches!(
            &sig.params[1],
            ast::ParamOrTsParamProp::Param(param)
                if matches!(&param.pat, ast::Pat::Ident(ident) if &*ident.id.sym == "arg$0")
        ));
        assert_eq!(
            render_preamble(&sig.preamble.unwrap()).unwrap(),
            "var b = arg$0[0];"
        );
    }
}
