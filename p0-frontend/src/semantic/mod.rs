//! Semantic Analysis for p0
//!
//! Resolves names, checks types and rewrites the AST into the typed syntax
//! tree. Errors never stop the analysis: each one is recorded and a
//! placeholder (`TError`, an empty argument list, a zero literal) stands in
//! so that one mistake yields only a few related diagnostics.
//!
//! Analysis runs in two passes. The first records a binding for every
//! top-level declaration from its shape alone, which lets functions refer to
//! each other in any order. The second analyses every declaration against
//! those bindings.

mod bindings;
mod expressions;
mod literals;
mod statements;


pub use bindings::Binding;

use crate::ast;
use crate::environment::ScopedMap;
use crate::tst;
use log::{debug, trace};
use p0_common::{Diagnostic, Diagnostics, Type};
use std::collections::HashSet;

const ENTRY_POINT: &str = "main";

/// Translate a program into its typed form, or return every diagnostic found
pub fn translate(program: &ast::Program) -> Result<tst::Program, Vec<Diagnostic>> {
    let mut translator = Translator::new();
    let typed = translator.program(program);
    translator.finish(typed)
}

/// Semantic analyzer context
pub struct Translator {
    diagnostics: Diagnostics,
    env: ScopedMap<Binding>,
}

impl Translator {
    pub fn new() -> Self {
        Self {
            diagnostics: Diagnostics::new(),
            env: ScopedMap::new(),
        }
    }

    /// Hand back the program only if nothing was reported
    pub fn finish(self, program: tst::Program) -> Result<tst::Program, Vec<Diagnostic>> {
        debug!("translation finished: {}", self.diagnostics.summary());

        if self.diagnostics.has_errors() {
            Err(self.diagnostics.into_vec())
        } else {
            Ok(program)
        }
    }

    pub fn program(&mut self, program: &ast::Program) -> tst::Program {
        self.collect_globals(&program.declarations);

        let main = program
            .declarations
            .iter()
            .find(|d| d.identifier().name == ENTRY_POINT);

        match main {
            None => {
                debug!("no entry point declared");
                self.env.insert(ENTRY_POINT, Binding::entry_placeholder());
                let declarations = self.declarations(program.declarations.iter());
                tst::Program { declarations, statement: tst::Statement::Empty }
            }

            Some(ast::Declaration::FunctionDeclaration { arguments, statements, suffix: None, .. })
                if arguments.is_empty() =>
            {
                debug!("hoisting entry point body ({} statement(s))", statements.len());
                let statement = self.entry_body(statements);
                let declarations = self.declarations(
                    program.declarations.iter().filter(|d| d.identifier().name != ENTRY_POINT),
                );
                tst::Program { declarations, statement }
            }

            Some(invalid) => {
                self.report(Diagnostic::InvalidDeclarationOfMain { span: invalid.identifier().span });
                let declarations = self.declarations(program.declarations.iter());
                tst::Program { declarations, statement: tst::Statement::Empty }
            }
        }
    }

    /// First pass: a binding per top-level name, the first declaration wins
    fn collect_globals(&mut self, declarations: &[ast::Declaration]) {
        for declaration in declarations {
            let identifier = declaration.identifier();

            if self.env.in_current_scope(&identifier.name) {
                self.report(Diagnostic::AttemptToRedefineDeclaration {
                    name: identifier.name.clone(),
                    span: identifier.span,
                });
            } else {
                self.env.insert(identifier.name.clone(), Binding::of_declaration(declaration));
            }
        }

        debug!("collected {} top-level declaration(s)", declarations.len());
    }

    /// The entry body skips the duplicate-local check that function bodies get
    fn entry_body(&mut self, statements: &[ast::Statement]) -> tst::Statement {
        let mut body = self.scoped(|t| t.statements(statements));
        if body.len() == 1 {
            body.remove(0)
        } else {
            tst::Statement::Block { statements: body }
        }
    }

    fn declarations<'a>(
        &mut self,
        declarations: impl Iterator<Item = &'a ast::Declaration>,
    ) -> Vec<tst::Declaration> {
        declarations.map(|d| self.declaration(d)).collect()
    }

    fn declaration(&mut self, declaration: &ast::Declaration) -> tst::Declaration {
        match declaration {
            ast::Declaration::VariableDeclaration { access, identifier, expression } => {
                let value = self.literal_expression(expression);
                let name = identifier.name.clone();

                match access {
                    ast::VariableAccess::ReadOnly => tst::Declaration::Constant { name, value },
                    ast::VariableAccess::ReadWrite => tst::Declaration::Variable { name, value },
                }
            }

            ast::Declaration::FunctionDeclaration { identifier, arguments, statements, suffix } => {
                self.check_parameter_redefinitions(arguments);
                self.check_local_redefinitions(statements);

                let parameters: Vec<(String, Type)> = arguments
                    .iter()
                    .map(|(name, t)| (name.name.clone(), Type::from(*t)))
                    .collect();

                let (body, result) = self.scoped(|t| {
                    for (name, parameter_type) in &parameters {
                        t.env.insert(name.clone(), Binding::Variable(*parameter_type));
                    }

                    let body = t.statements(statements);
                    let result = suffix.as_ref().map(|(declared, tail)| {
                        let tail = t.expression(tail);
                        let expected = Type::from(*declared);

                        if !Type::compatible(tail.type_of(), expected) {
                            t.report(Diagnostic::FunctionReturnTypeMismatch {
                                name: identifier.name.clone(),
                                expected,
                                found: tail.type_of(),
                                span: identifier.span,
                            });
                        }
                        tail
                    });

                    (body, result)
                });

                tst::Declaration::Function(tst::FunctionDeclaration {
                    name: identifier.name.clone(),
                    parameters,
                    body,
                    result,
                })
            }
        }
    }

    fn check_parameter_redefinitions(&mut self, arguments: &[(ast::Identifier, ast::Type)]) {
        let mut seen = HashSet::new();

        for (name, _) in arguments {
            if !seen.insert(name.name.as_str()) {
                self.report(Diagnostic::AttemptToRedefineDeclaration {
                    name: name.name.clone(),
                    span: name.span,
                });
            }
        }
    }

    /// Flat scan of a body's own declaration statements; nested blocks are not entered
    fn check_local_redefinitions(&mut self, statements: &[ast::Statement]) {
        let mut seen = HashSet::new();

        for statement in statements {
            if let ast::Statement::Declaration { identifier, .. } = statement {
                if !seen.insert(identifier.name.as_str()) {
                    self.report(Diagnostic::AttemptToRedefineDeclaration {
                        name: identifier.name.clone(),
                        span: identifier.span,
                    });
                }
            }
        }
    }

    /// Run `f` in a fresh innermost scope
    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.env.open_scope();
        let result = f(self);
        self.env.close_scope();
        result
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        trace!("diagnostic: {}", diagnostic);
        self.diagnostics.report(diagnostic);
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}
