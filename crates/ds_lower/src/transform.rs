//! Module-level pass applying the lowering to every pattern declaration and
//! pattern-bearing function.

use ds_ast::{AssignmentOp, LowerConfig, SourceExpr};
use swc_common::DUMMY_SP;
use swc_ecma_ast as ast;
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::classify::{binding_pattern, is_pattern};
use crate::emit::{declarators, preamble_stmt};
use crate::error::{LowerError, Result};
use crate::hoist::HoistableParam;
use crate::lower::Lowerer;

/// Lower every destructuring declaration and pattern parameter in `module`
/// with a fresh naming context.
pub fn lower_module(module: ast::Module, config: &LowerConfig) -> Result<ast::Module> {
    let mut lowerer = Lowerer::new(config.clone());
    lower_module_with(&mut lowerer, module)
}

/// Like [`lower_module`], continuing the naming context of `lowerer`.
#[tracing::instrument(level = "debug", skip_all, fields(items = module.body.len()))]
pub fn lower_module_with(lowerer: &mut Lowerer, mut module: ast::Module) -> Result<ast::Module> {
    let mut pass = LowerPass::new(lowerer);
    module.visit_mut_with(&mut pass);
    pass.finish()?;
    Ok(module)
}

/// Visitor rewriting declarations and functions in place.
///
/// Visiting cannot fail, so the first error is kept and the rest of the
/// tree is left as it is.
pub struct LowerPass<'a> {
    lowerer: &'a mut Lowerer,
    error: Option<LowerError>,
}

impl<'a> LowerPass<'a> {
    pub fn new(lowerer: &'a mut Lowerer) -> Self {
        Self {
            lowerer,
            error: None,
        }
    }

    pub fn finish(self) -> Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn record(&mut self, err: LowerError) {
        tracing::debug!(%err, "lowering failed");
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn lower_declarator(&mut self, mut decl: ast::VarDeclarator) -> Result<Vec<ast::VarDeclarator>> {
        let Some(pattern) = binding_pattern(&decl.name)? else {
            decl.visit_mut_with(self);
            return Ok(vec![decl]);
        };

        let mut init = decl
            .init
            .take()
            .ok_or_else(|| LowerError::MissingInitializer(describe(&decl.name)))?;

        // The leading temporary is named before anything inside the
        // initializer, and every nested temporary after it.
        let mut ops = Vec::new();
        let source = if pattern.len() != 1 && !matches!(*init, ast::Expr::Ident(_)) {
            let temp = self.lowerer.allocate_temp();
            init.visit_mut_with(self);
            ops.push(AssignmentOp::new(temp.clone(), SourceExpr::Expr(init)));
            SourceExpr::Identifier(temp)
        } else {
            init.visit_mut_with(self);
            SourceExpr::from_expr(init)
        };
        ops.extend(self.lowerer.lower_declaration(&pattern, source)?);
        tracing::debug!(assignments = ops.len(), "lowered destructuring declaration");

        declarators(ops)
    }

    /// Hoist pattern parameters in place, returning the preamble statement
    /// if any parameter was a pattern.
    fn hoist_params<P: HoistableParam>(&mut self, params: &mut Vec<P>) -> Option<ast::Stmt> {
        if !self.lowerer.config().parameters || self.error.is_some() {
            return None;
        }

        let lowered = self
            .lowerer
            .lower_function_signature(std::mem::take(params))
            .and_then(|sig| {
                *params = sig.params;
                sig.preamble.map(preamble_stmt).transpose()
            });
        match lowered {
            Ok(preamble) => preamble,
            Err(err) => {
                self.record(err);
                None
            }
        }
    }
}

impl VisitMut for LowerPass<'_> {
    fn visit_mut_var_decl(&mut self, node: &mut ast::VarDecl) {
        if !self.lowerer.config().declarations
            || self.error.is_some()
            || !node.decls.iter().any(|decl| is_pattern(&decl.name))
        {
            node.visit_mut_children_with(self);
            return;
        }

        let decls = std::mem::take(&mut node.decls);
        for decl in decls {
            match self.lower_declarator(decl) {
                Ok(lowered) => node.decls.extend(lowered),
                Err(err) => {
                    self.record(err);
                    return;
                }
            }
        }
    }

    fn visit_mut_function(&mut self, node: &mut ast::Function) {
        if let Some(body) = &mut node.body {
            if let Some(preamble) = self.hoist_params(&mut node.params) {
                body.stmts.insert(0, preamble);
            }
        }

        node.visit_mut_children_with(self);
    }

    fn visit_mut_constructor(&mut self, node: &mut ast::Constructor) {
        if let Some(body) = &mut node.body {
            if let Some(preamble) = self.hoist_params(&mut node.params) {
                body.stmts.insert(0, preamble);
            }
        }

        node.visit_mut_children_with(self);
    }

    fn visit_mut_setter_prop(&mut self, node: &mut ast::SetterProp) {
        if let Some(body) = &mut node.body {
            let placeholder = ast::Pat::Invalid(ast::Invalid { span: DUMMY_SP });
            let mut params = vec![std::mem::replace(&mut *node.param, placeholder)];
            let preamble = self.hoist_params(&mut params);
            if let Some(param) = params.pop() {
                *node.param = param;
            }
            if let Some(preamble) = preamble {
                body.stmts.insert(0, preamble);
            }
        }

        node.visit_mut_children_with(self);
    }

    fn visit_mut_arrow_expr(&mut self, node: &mut ast::ArrowExpr) {
        if let Some(preamble) = self.hoist_params(&mut node.params) {
            prepend_to_arrow_body(node, preamble);
        }

        node.visit_mut_children_with(self);
    }

    // Loop heads bind per iteration and have no initializer to lower.
    fn visit_mut_for_in_stmt(&mut self, node: &mut ast::ForInStmt) {
        node.right.visit_mut_with(self);
        node.body.visit_mut_with(self);
    }

    fn visit_mut_for_of_stmt(&mut self, node: &mut ast::ForOfStmt) {
        node.right.visit_mut_with(self);
        node.body.visit_mut_with(self);
    }

    fn visit_mut_for_stmt(&mut self, node: &mut ast::ForStmt) {
        node.visit_mut_children_with(self);
        if matches!(&node.init, Some(ast::VarDeclOrExpr::VarDecl(var)) if var.decls.is_empty()) {
            node.init = None;
        }
    }

    // Reached only for statements outside a list, where an emptied
    // declaration cannot simply be dropped.
    fn visit_mut_stmt(&mut self, stmt: &mut ast::Stmt) {
        stmt.visit_mut_children_with(self);
        if is_emptied_var(stmt) {
            *stmt = ast::Stmt::Empty(ast::EmptyStmt { span: DUMMY_SP });
        }
    }

    fn visit_mut_stmts(&mut self, stmts: &mut Vec<ast::Stmt>) {
        for stmt in stmts.iter_mut() {
            stmt.visit_mut_children_with(self);
        }
        stmts.retain(|stmt| !is_emptied_var(stmt));
    }

    fn visit_mut_module_items(&mut self, items: &mut Vec<ast::ModuleItem>) {
        for item in items.iter_mut() {
            match item {
                ast::ModuleItem::Stmt(stmt) => stmt.visit_mut_children_with(self),
                ast::ModuleItem::ModuleDecl(decl) => decl.visit_mut_with(self),
            }
        }
        items.retain(|item| match item {
            ast::ModuleItem::Stmt(stmt) => !is_emptied_var(stmt),
            ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDecl(export)) => {
                !matches!(&export.decl, ast::Decl::Var(var) if var.decls.is_empty())
            }
            _ => true,
        });
    }
}

fn is_emptied_var(stmt: &ast::Stmt) -> bool {
    matches!(stmt, ast::Stmt::Decl(ast::Decl::Var(var)) if var.decls.is_empty())
}

/// Put `stmt` first in an arrow body, turning an expression body into a
/// block that returns it.
fn prepend_to_arrow_body(node: &mut ast::ArrowExpr, stmt: ast::Stmt) {
    let body = std::mem::replace(
        &mut *node.body,
        ast::BlockStmtOrExpr::BlockStmt(ast::BlockStmt::default()),
    );
    *node.body = match body {
        ast::BlockStmtOrExpr::BlockStmt(mut block) => {
            block.stmts.insert(0, stmt);
            ast::BlockStmtOrExpr::BlockStmt(block)
        }
        ast::BlockStmtOrExpr::Expr(expr) => ast::BlockStmtOrExpr::BlockStmt(ast::BlockStmt {
            span: DUMMY_SP,
            stmts: vec![
                stmt,
                ast::Stmt::Return(ast::ReturnStmt {
                    span: DUMMY_SP,
                    arg: Some(expr),
                }),
            ],
            ..Default::default()
        }),
    };
}

/// Short name for a pattern in error messages.
fn describe(pat: &ast::Pat) -> String {
    match pat {
        ast::Pat::Object(_) => "{...}".to_string(),
        ast::Pat::Array(_) => "[...]".to_string(),
        ast::Pat::Ident(ident) => ident.id.sym.to_string(),
        _ => "<pattern>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};

    fn lower_with(source: &str, config: &LowerConfig) -> Result<String> {
        let parsed = ds_parser::parse_source(source, "test.ts").unwrap();
        let module = lower_module(parsed.module, config)?;

        let mut buf = Vec::new();
        {
            let writer = JsWriter::new(parsed.source_map.clone(), "\n", &mut buf, None);
            let mut emitter = Emitter {
                cfg: swc_ecma_codegen::Config::default().with_target(ast::EsVersion::latest()),
                cm: parsed.source_map,
                comments: None,
                wr: writer,
            };
            module.emit_with(&mut emitter).unwrap();
        }
        Ok(normalize(&String::from_utf8(buf).unwrap()))
    }

    fn lower(source: &str) -> String {
        lower_with(source, &LowerConfig::default()).unwrap()
    }

    fn normalize(code: &str) -> String {
        code.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn declaration_is_replaced_in_place() {
        assert_eq!(
            lower("var a = 0, {x: {y}} = z, b = 1;"),
            normalize("var a = 0, y = z.x.y, b = 1;")
        );
    }

    #[test]
    fn declaration_kind_is_preserved() {
        assert_eq!(
            lower("const [x, y] = f();"),
            normalize("const var$0 = f(), x = var$0[0], y = var$0[1];")
        );
    }

    #[test]
    fn function_parameters_are_hoisted() {
        assert_eq!(
            lower("function g({y}) { return y; }"),
            normalize("function g(arg$0) { var y = arg$0.y; return y; }")
        );
    }

    #[test]
    fn function_without_patterns_is_untouched() {
        assert_eq!(
            lower("function g(a, b) { return a; }"),
            normalize("function g(a, b) { return a; }")
        );
    }

    #[test]
    fn nested_functions_are_lowered_after_the_outer_preamble() {
        assert_eq!(
            lower("function outer({x}) { return function inner({y}) { return x + y; }; }"),
            normalize(
                "function outer(arg$0) { var x = arg$0.x; \
                 return function inner(arg$1) { var y = arg$1.y; return x + y; }; }"
            )
        );
    }

    #[test]
    fn temporaries_are_allocated_before_the_initializer_is_visited() {
        assert_eq!(
            lower("var {a, b} = function({y}) { return y; };"),
            normalize(
                "var var$0 = function(arg$1) { var y = arg$1.y; return y; }, \
                 a = var$0.a, b = var$0.b;"
            )
        );
    }

    #[test]
    fn initializer_names_follow_the_leading_temporary() {
        assert_eq!(
            lower("var {a, b: {c, d}} = function({y}) { return y; };"),
            normalize(
                "var var$0 = function(arg$1) { var y = arg$1.y; return y; }, \
                 a = var$0.a, var$2 = var$0.b, c = var$2.c, d = var$2.d;"
            )
        );
    }

    #[test]
    fn constructor_parameters_are_hoisted() {
        assert_eq!(
            lower("class C { constructor({x}) { this.x = x; } }"),
            normalize("class C { constructor(arg$0) { var x = arg$0.x; this.x = x; } }")
        );
    }

    #[test]
    fn parameter_properties_pass_through() {
        assert_eq!(
            lower("class C { constructor(private a: number, [b]: number[]) {} }"),
            normalize(
                "class C { constructor(private a: number, arg$0: number[]) { var b = arg$0[0]; } }"
            )
        );
    }

    #[test]
    fn setter_parameter_is_hoisted() {
        assert_eq!(
            lower("var o = { set v({a}) { use(a); } };"),
            normalize("var o = { set v(arg$0) { var a = arg$0.a; use(a); } };")
        );
    }

    #[test]
    fn default_reading_a_pattern_binding_is_rejected() {
        let err = lower_with("function f({x}, y = x) {}", &LowerConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            LowerError::UnsupportedPattern("default after a pattern parameter")
        ));
    }

    #[test]
    fn emptied_declaration_outside_a_block_becomes_empty_statement() {
        assert_eq!(lower("if (c) var {} = z;"), normalize("if (c) ;"));
        assert_eq!(lower("while (c) var [] = z;"), normalize("while (c) ;"));
    }

    #[test]
    fn arrow_expression_body_becomes_a_block() {
        assert_eq!(
            lower("const f = ({a, b}) => a + b;"),
            normalize("const f = (arg$0) => { var a = arg$0.a, b = arg$0.b; return a + b; };")
        );
    }

    #[test]
    fn methods_are_hoisted() {
        assert_eq!(
            lower("class C { m([x]) { return x; } }"),
            normalize("class C { m(arg$0) { var x = arg$0[0]; return x; } }")
        );
    }

    #[test]
    fn parameter_type_annotation_is_kept() {
        assert_eq!(
            lower("function f({x}: Opts) { return x; }"),
            normalize("function f(arg$0: Opts) { var x = arg$0.x; return x; }")
        );
    }

    #[test]
    fn empty_pattern_over_identifier_removes_the_statement() {
        assert_eq!(lower("var {} = z; f();"), normalize("f();"));
    }

    #[test]
    fn loop_heads_are_left_alone() {
        assert_eq!(
            lower("for (const [k, v] of entries) { use(k, v); }"),
            normalize("for (const [k, v] of entries) { use(k, v); }")
        );
    }

    #[test]
    fn config_can_disable_each_rewrite() {
        let source = "function g({y}) { var {a, b} = y; }";
        let no_params = LowerConfig {
            parameters: false,
            ..LowerConfig::default()
        };
        assert_eq!(
            lower_with(source, &no_params).unwrap(),
            normalize("function g({y}) { var a = y.a, b = y.b; }")
        );

        let no_decls = LowerConfig {
            declarations: false,
            ..LowerConfig::default()
        };
        assert_eq!(
            lower_with(source, &no_decls).unwrap(),
            normalize("function g(arg$0) { var y = arg$0.y; var {a, b} = y; }")
        );
    }

    #[test]
    fn unsupported_shapes_are_reported() {
        let err = lower_with("var {x = 1} = z;", &LowerConfig::default()).unwrap_err();
        assert!(matches!(err, LowerError::UnsupportedPattern("default value")));

        let err = lower_with("function f({...rest}) {}", &LowerConfig::default()).unwrap_err();
        assert!(matches!(err, LowerError::UnsupportedPattern("object rest")));
    }

    #[test]
    fn separate_modules_restart_numbering() {
        assert_eq!(lower("var [a, b] = f();"), lower("var [a, b] = f();"));
    }
}
