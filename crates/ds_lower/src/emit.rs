//! Turns lowered assignments back into SWC nodes and text.

use ds_ast::{Accessor, AssignmentOp, SourceExpr};
use swc_common::{sync::Lrc, SourceMap, DUMMY_SP};
use swc_ecma_ast as ast;
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};

use crate::error::{LowerError, Result};
use crate::hoist::Preamble;

/// Build the expression a [`SourceExpr`] denotes.
pub fn source_to_expr(source: SourceExpr) -> Result<ast::Expr> {
    match source {
        SourceExpr::Identifier(name) => Ok(ident_expr(&name)),
        SourceExpr::Expr(expr) => Ok(*expr),
        SourceExpr::Fragment(accessor) => Err(LowerError::DetachedAccessor(accessor)),
        SourceExpr::Path(parts) => {
            let mut parts = parts.into_iter();
            let mut expr = match parts.next() {
                Some(SourceExpr::Fragment(accessor)) => {
                    return Err(LowerError::DetachedAccessor(accessor));
                }
                Some(base) => source_to_expr(base)?,
                // An empty path has nothing to read from.
                None => return Err(LowerError::UnsupportedPattern("empty access path")),
            };
            for part in parts {
                expr = match part {
                    SourceExpr::Fragment(accessor) => apply_accessor(expr, accessor),
                    _ => return Err(LowerError::UnsupportedPattern("base expression inside a path")),
                };
            }
            Ok(expr)
        }
    }
}

fn apply_accessor(obj: ast::Expr, accessor: Accessor) -> ast::Expr {
    let obj = Box::new(wrap_loose(obj));
    match accessor {
        Accessor::Property(name) => ast::Expr::Member(ast::MemberExpr {
            span: DUMMY_SP,
            obj,
            prop: ast::MemberProp::Ident(ast::IdentName::new(name.into(), DUMMY_SP)),
        }),
        Accessor::Index(index) => ast::Expr::Member(ast::MemberExpr {
            span: DUMMY_SP,
            obj,
            prop: ast::MemberProp::Computed(ast::ComputedPropName {
                span: DUMMY_SP,
                expr: Box::new(number(index)),
            }),
        }),
        Accessor::SliceFrom(start) => {
            let callee = ast::Expr::Member(ast::MemberExpr {
                span: DUMMY_SP,
                obj,
                prop: ast::MemberProp::Ident(ast::IdentName::new("slice".into(), DUMMY_SP)),
            });
            ast::Expr::Call(ast::CallExpr {
                span: DUMMY_SP,
                callee: ast::Callee::Expr(Box::new(callee)),
                args: vec![ast::ExprOrSpread {
                    spread: None,
                    expr: Box::new(number(start)),
                }],
                type_args: None,
                ..Default::default()
            })
        }
    }
}

/// Parenthesise expressions that bind looser than member access.
fn wrap_loose(expr: ast::Expr) -> ast::Expr {
    let tight = match &expr {
        ast::Expr::Ident(_)
        | ast::Expr::Member(_)
        | ast::Expr::SuperProp(_)
        | ast::Expr::Call(_)
        | ast::Expr::Paren(_)
        | ast::Expr::This(_)
        | ast::Expr::Array(_)
        | ast::Expr::Tpl(_) => true,
        ast::Expr::New(new) => new.args.is_some(),
        ast::Expr::Lit(lit) => !matches!(lit, ast::Lit::Num(_)),
        _ => false,
    };
    if tight {
        expr
    } else {
        ast::Expr::Paren(ast::ParenExpr {
            span: DUMMY_SP,
            expr: Box::new(expr),
        })
    }
}

fn ident_expr(name: &str) -> ast::Expr {
    ast::Expr::Ident(ast::Ident::new_no_ctxt(name.into(), DUMMY_SP))
}

fn number(value: usize) -> ast::Expr {
    ast::Expr::Lit(ast::Lit::Num(ast::Number {
        span: DUMMY_SP,
        value: value as f64,
        raw: None,
    }))
}

/// `target = value` as a declarator.
pub fn declarator(op: AssignmentOp) -> Result<ast::VarDeclarator> {
    Ok(ast::VarDeclarator {
        span: DUMMY_SP,
        name: ast::Pat::Ident(ast::BindingIdent::from(ast::Ident::new_no_ctxt(
            op.target.into(),
            DUMMY_SP,
        ))),
        init: Some(Box::new(source_to_expr(op.value)?)),
        definite: false,
    })
}

pub fn declarators(ops: Vec<AssignmentOp>) -> Result<Vec<ast::VarDeclarator>> {
    ops.into_iter().map(declarator).collect()
}

/// The preamble as a single `var` statement.
pub fn preamble_stmt(preamble: Preamble) -> Result<ast::Stmt> {
    Ok(ast::Stmt::Decl(ast::Decl::Var(Box::new(ast::VarDecl {
        span: DUMMY_SP,
        kind: ast::VarDeclKind::Var,
        declare: false,
        decls: declarators(preamble.bindings)?,
        ..Default::default()
    }))))
}

/// Render assignments as `a = b, c = d`.
pub fn render_assignments(ops: &[AssignmentOp]) -> Result<String> {
    let rendered = ops
        .iter()
        .map(|op| Ok(format!("{} = {}", op.target, render_source(&op.value)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(rendered.join(", "))
}

/// Render a preamble as `var a = b, c = d;`.
pub fn render_preamble(preamble: &Preamble) -> Result<String> {
    Ok(format!("var {};", render_assignments(&preamble.bindings)?))
}

/// Render one source expression as code.
pub fn render_source(source: &SourceExpr) -> Result<String> {
    let expr = source_to_expr(source.clone())?;
    let cm: Lrc<SourceMap> = Default::default();

    let mut buf = Vec::new();
    {
        let writer = JsWriter::new(cm.clone(), "\n", &mut buf, None);
        let mut emitter = Emitter {
            cfg: swc_ecma_codegen::Config::default().with_target(ast::EsVersion::latest()),
            cm,
            comments: None,
            wr: writer,
        };
        expr.emit_with(&mut emitter)?;
    }

    String::from_utf8(buf)
        .map_err(|e| LowerError::Render(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
