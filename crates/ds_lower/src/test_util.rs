use ds_ast::BindingPattern;
use swc_ecma_ast as ast;

use crate::classify::binding_pattern;

/// Parse `var <src> = z;` and return the declarator.
fn declarator(binding: &str, init: &str) -> ast::VarDeclarator {
    let source = format!("var {binding} = {init};");
    let parsed = ds_parser::parse_source(&source, "test.js").unwrap();
    match parsed.module.body.into_iter().next() {
        Some(ast::ModuleItem::Stmt(ast::Stmt::Decl(ast::Decl::Var(var)))) => {
            var.decls.into_iter().next().unwrap()
        }
        other => panic!("expected a var declaration, got {other:?}"),
    }
}

/// Parse a binding pattern such as `{x, y: [z]}`.
pub fn pattern(src: &str) -> BindingPattern {
    binding_pattern(&declarator(src, "z").name)
        .unwrap()
        .expect("not a destructuring pattern")
}

/// Parse an expression such as `f(12)`.
pub fn expr(src: &str) -> ast::Expr {
    *declarator("e", src).init.unwrap()
}

/// Parse an expression and wrap it as a lowering source.
pub fn source(src: &str) -> ds_ast::SourceExpr {
    ds_ast::SourceExpr::from_expr(Box::new(expr(src)))
}
