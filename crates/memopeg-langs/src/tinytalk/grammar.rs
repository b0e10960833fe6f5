//! Tinytalk rule table.
//!
//! ```text
//! File     <- def:Def* _
//! Def      <- Method / Val
//! Method   <- _ kw:KwMethod mod:Module? sig:Sig _ "[" body:Stmts "]"
//! Val      <- _ kw:KwVal mod:Module? _ name:Ident _ ":=" value:Expr _ "."
//! Module   <- _ "#" name:Ident
//! Sig      <- NarySig / BinSig / UnarySig
//! NarySig  <- (_ kw:Kw _ param:Ident)+
//! BinSig   <- _ op:Op _ param:Ident
//! UnarySig <- _ sel:Ident
//! Stmts    <- (s:Stmt (_ "." s:Stmt)* (_ ".")?)? _
//! Stmt     <- s:Return / s:Assign / e:Expr
//! Return   <- _ "^" value:Expr
//! Assign   <- _ target:Ident _ ":=" value:Expr
//! Expr     <- Nary / Binary / Unary / Primary
//! Nary     <- recv:(Binary / Unary / Primary)? (_ kw:Kw arg:(Binary / Unary / Primary))+
//! Binary   <- recv:(Unary / Primary) (_ op:Op arg:(Unary / Primary))+
//! Unary    <- recv:Primary (_ sel:Ident)+
//! Primary  <- _ p:(Ident / Float / Int / Str / Char / Block / Array / Paren)
//! Block    <- "[" (param:Param+ _ "|")? body:Stmts "]"
//! Param    <- _ ":" name:Ident
//! Array    <- "{" (e:Expr (_ ";" e:Expr)* (_ ";")?)? _ "}"
//! Paren    <- "(" e:Expr _ ")"
//! ```
//!
//! Lexical rules are tokens and never skip leading whitespace; the
//! syntactic rules above call `_` where they allow it.

use std::sync::LazyLock;

use memopeg_core::grammar::dsl::*;
use memopeg_core::{Env, Grammar, GrammarBuilder, Production, RuleId, Span};

use super::ast::{Call, DEFAULT_MODULE, Def, Expr, File, Ident, Method, Sig, Stmt, Val};
use super::invariants::{
    char_literal, expect_def, expect_expr, expect_ident, expect_sig, expect_stmt, expect_stmts,
    expect_text, grammar_builds,
};
use super::value::Node;

const WORD_START: &str = "a-zA-Z_";
const WORD_REST: &str = "a-zA-Z0-9_";
const OP_CHARS: &str = "+\\-*/<>=~,@%&?!\\\\";
const BLANK: &str = " \\t\\r\\n";

/// Rules a parse can start from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Start {
    File,
    Stmts,
    Expr,
    Ident,
    Int,
    Float,
    Str,
    Char,
}

/// The built grammar plus the ids of its entry rules.
pub struct Tinytalk {
    grammar: Grammar<Node>,
    file: RuleId,
    stmts: RuleId,
    expr: RuleId,
    ident: RuleId,
    int: RuleId,
    float: RuleId,
    str: RuleId,
    char: RuleId,
}

impl Tinytalk {
    pub fn grammar(&self) -> &Grammar<Node> {
        &self.grammar
    }

    pub fn rule(&self, start: Start) -> RuleId {
        match start {
            Start::File => self.file,
            Start::Stmts => self.stmts,
            Start::Expr => self.expr,
            Start::Ident => self.ident,
            Start::Int => self.int,
            Start::Float => self.float,
            Start::Str => self.str,
            Start::Char => self.char,
        }
    }
}

/// Shared Tinytalk grammar, built on first use.
pub fn tinytalk() -> &'static Tinytalk {
    static TINYTALK: LazyLock<Tinytalk> = LazyLock::new(build);
    &TINYTALK
}

fn word() -> Production<Node> {
    seq([class(WORD_START), star(class(WORD_REST))])
}

/// `:` that does not start `:=`.
fn colon() -> Production<Node> {
    seq([lit(":"), neg(lit("="))])
}

fn reserved(word: &str) -> Production<Node> {
    seq([lit(word), neg(class(WORD_REST))])
}

fn build() -> Tinytalk {
    let mut g = GrammarBuilder::<Node>::new();

    let file = g.declare("File");
    let def = g.declare("Def");
    let method = g.declare("Method");
    let val = g.declare("Val");
    let module = g.declare("Module");
    let sig = g.declare("Sig");
    let nary_sig = g.declare("NarySig");
    let bin_sig = g.declare("BinSig");
    let unary_sig = g.declare("UnarySig");
    let stmts = g.declare("Stmts");
    let stmt = g.declare("Stmt");
    let ret = g.declare("Return");
    let assign = g.declare("Assign");
    let expr = g.declare("Expr");
    let nary = g.declare("Nary");
    let binary = g.declare("Binary");
    let unary = g.declare("Unary");
    let primary = g.declare("Primary");
    let block = g.declare("Block");
    let param = g.declare("Param");
    let array = g.declare("Array");
    let paren = g.declare("Paren");
    let ident = g.declare("Ident");
    let kw = g.declare("Kw");
    let op = g.declare("Op");
    let int = g.declare("Int");
    let float = g.declare("Float");
    let string = g.declare("Str");
    let character = g.declare("Char");
    let kw_method = g.declare("KwMethod");
    let kw_val = g.declare("KwVal");
    let ws = g.declare("_");

    // Definitions.
    g.define(
        file,
        action(seq([star(label("def", rule(def))), rule(ws)]), build_file),
    );
    g.define(def, choice([rule(method), rule(val)]));
    g.define(
        method,
        action(
            seq([
                rule(ws),
                label("kw", rule(kw_method)),
                opt(label("mod", rule(module))),
                label("sig", rule(sig)),
                rule(ws),
                lit("["),
                label("body", rule(stmts)),
                lit("]"),
            ]),
            build_method,
        ),
    );
    g.define(
        val,
        action(
            seq([
                rule(ws),
                label("kw", rule(kw_val)),
                opt(label("mod", rule(module))),
                rule(ws),
                label("name", rule(ident)),
                rule(ws),
                lit(":="),
                label("value", rule(expr)),
                rule(ws),
                lit("."),
            ]),
            build_val,
        ),
    );
    g.define(
        module,
        action(
            seq([rule(ws), lit("#"), label("name", rule(ident))]),
            |env: &mut Env<'_, Node>| Node::Ident(expect_ident("Module", "name", env.take("name"))),
        ),
    );

    // Signatures.
    g.define(sig, choice([rule(nary_sig), rule(bin_sig), rule(unary_sig)]));
    g.define(
        nary_sig,
        action(
            plus(seq([
                rule(ws),
                label("kw", rule(kw)),
                rule(ws),
                label("param", rule(ident)),
            ])),
            build_nary_sig,
        ),
    );
    g.define(
        bin_sig,
        action(
            seq([
                rule(ws),
                label("op", rule(op)),
                rule(ws),
                label("param", rule(ident)),
            ]),
            build_bin_sig,
        ),
    );
    g.define(
        unary_sig,
        action(seq([rule(ws), label("sel", rule(ident))]), |env: &mut Env<'_, Node>| {
            let sel = expect_ident("UnarySig", "sel", env.take("sel"));
            Node::Sig(Sig {
                selector: sel.name,
                params: Vec::new(),
            })
        }),
    );

    // Statements.
    g.define(
        stmts,
        action(
            seq([
                opt(seq([
                    label("s", rule(stmt)),
                    star(seq([rule(ws), lit("."), label("s", rule(stmt))])),
                    opt(seq([rule(ws), lit(".")])),
                ])),
                rule(ws),
            ]),
            |env: &mut Env<'_, Node>| {
                let found = env.take_all("s").into_iter();
                Node::Stmts(found.map(|s| expect_stmt("Stmts", "s", Some(s))).collect())
            },
        ),
    );
    g.define(
        stmt,
        action(
            choice([
                label("s", rule(ret)),
                label("s", rule(assign)),
                label("e", rule(expr)),
            ]),
            |env: &mut Env<'_, Node>| match env.take("s") {
                Some(s) => Node::Stmt(expect_stmt("Stmt", "s", Some(s))),
                None => Node::Stmt(Stmt::Expr(expect_expr("Stmt", "e", env.take("e")))),
            },
        ),
    );
    g.define(
        ret,
        action(
            seq([rule(ws), lit("^"), label("value", rule(expr))]),
            |env: &mut Env<'_, Node>| {
                Node::Stmt(Stmt::Return(expect_expr(
                    "Return",
                    "value",
                    env.take("value"),
                )))
            },
        ),
    );
    g.define(
        assign,
        action(
            seq([
                rule(ws),
                label("target", rule(ident)),
                rule(ws),
                lit(":="),
                label("value", rule(expr)),
            ]),
            |env: &mut Env<'_, Node>| {
                let target = expect_ident("Assign", "target", env.take("target"));
                let value = expect_expr("Assign", "value", env.take("value"));
                Node::Stmt(Stmt::Assign { target, value })
            },
        ),
    );

    // Messages, loosest binding first.
    g.define(
        expr,
        choice([rule(nary), rule(binary), rule(unary), rule(primary)]),
    );
    g.define(
        nary,
        action(
            seq([
                opt(label(
                    "recv",
                    choice([rule(binary), rule(unary), rule(primary)]),
                )),
                plus(seq([
                    rule(ws),
                    label("kw", rule(kw)),
                    label("arg", choice([rule(binary), rule(unary), rule(primary)])),
                ])),
            ]),
            build_nary,
        ),
    );
    g.define(
        binary,
        action(
            seq([
                label("recv", choice([rule(unary), rule(primary)])),
                plus(seq([
                    rule(ws),
                    label("op", rule(op)),
                    label("arg", choice([rule(unary), rule(primary)])),
                ])),
            ]),
            build_binary,
        ),
    );
    g.define(
        unary,
        action(
            seq([
                label("recv", rule(primary)),
                plus(seq([rule(ws), label("sel", rule(ident))])),
            ]),
            build_unary,
        ),
    );
    g.define(
        primary,
        action(
            seq([
                rule(ws),
                label(
                    "p",
                    choice([
                        rule(ident),
                        rule(float),
                        rule(int),
                        rule(string),
                        rule(character),
                        rule(block),
                        rule(array),
                        rule(paren),
                    ]),
                ),
            ]),
            |env: &mut Env<'_, Node>| Node::Expr(expect_expr("Primary", "p", env.take("p"))),
        ),
    );
    g.define(
        block,
        action(
            seq([
                lit("["),
                opt(seq([plus(label("param", rule(param))), rule(ws), lit("|")])),
                label("body", rule(stmts)),
                lit("]"),
            ]),
            |env: &mut Env<'_, Node>| {
                let params = env.take_all("param").into_iter();
                let params = params
                    .map(|p| expect_ident("Block", "param", Some(p)))
                    .collect();
                let body = expect_stmts("Block", "body", env.take("body"));
                Node::Expr(Expr::Block {
                    params,
                    body,
                    span: env.span(),
                })
            },
        ),
    );
    g.define(
        param,
        action(
            seq([rule(ws), lit(":"), label("name", rule(ident))]),
            |env: &mut Env<'_, Node>| Node::Ident(expect_ident("Param", "name", env.take("name"))),
        ),
    );
    g.define(
        array,
        action(
            seq([
                lit("{"),
                opt(seq([
                    label("e", rule(expr)),
                    star(seq([rule(ws), lit(";"), label("e", rule(expr))])),
                    opt(seq([rule(ws), lit(";")])),
                ])),
                rule(ws),
                lit("}"),
            ]),
            |env: &mut Env<'_, Node>| {
                let items = env.take_all("e").into_iter();
                let items = items.map(|e| expect_expr("Array", "e", Some(e))).collect();
                Node::Expr(Expr::Array {
                    items,
                    span: env.span(),
                })
            },
        ),
    );
    g.define(
        paren,
        action(
            seq([lit("("), label("e", rule(expr)), rule(ws), lit(")")]),
            |env: &mut Env<'_, Node>| {
                let expr = expect_expr("Paren", "e", env.take("e"));
                Node::Expr(Expr::Paren {
                    expr: Box::new(expr),
                    span: env.span(),
                })
            },
        ),
    );

    // Tokens.
    g.define(
        ident,
        action(seq([word(), neg(colon())]), |env: &mut Env<'_, Node>| {
            Node::Ident(Ident::new(env.text(), env.span()))
        }),
    )
    .token()
    .expected("identifier");
    g.define(kw, seq([word(), colon()]))
        .token()
        .expected("keyword");
    g.define(op, action(plus(class(OP_CHARS)), token_text))
        .token()
        .expected("operator");
    g.define(
        int,
        action(plus(class("0-9")), |env: &mut Env<'_, Node>| {
            Node::Expr(Expr::Int {
                digits: env.text().to_string(),
                span: env.span(),
            })
        }),
    )
    .token()
    .expected("integer");
    g.define(
        float,
        action(
            seq([plus(class("0-9")), lit("."), plus(class("0-9"))]),
            |env: &mut Env<'_, Node>| {
                Node::Expr(Expr::Float {
                    text: env.text().to_string(),
                    span: env.span(),
                })
            },
        ),
    )
    .token()
    .expected("float");
    g.define(
        string,
        action(
            seq([lit("'"), star(choice([lit("''"), not_class("'")])), lit("'")]),
            |env: &mut Env<'_, Node>| {
                let text = env.text();
                let inner = &text[1..text.len() - 1];
                Node::Expr(Expr::Str {
                    value: inner.replace("''", "'"),
                    span: env.span(),
                })
            },
        ),
    )
    .token()
    .expected("string");
    g.define(
        character,
        action(seq([lit("$"), any()]), |env: &mut Env<'_, Node>| {
            Node::Expr(Expr::Char {
                value: char_literal(env.text()),
                span: env.span(),
            })
        }),
    )
    .token()
    .expected("character");
    g.define(kw_method, reserved("method")).token();
    g.define(kw_val, reserved("val")).token();
    g.define(
        ws,
        star(choice([
            class(BLANK),
            seq([lit("//"), star(not_class("\\n"))]),
        ])),
    )
    .token();

    Tinytalk {
        grammar: grammar_builds(g.build()),
        file,
        stmts,
        expr,
        ident,
        int,
        float,
        str: string,
        char: character,
    }
}

fn token_text(env: &mut Env<'_, Node>) -> Node {
    Node::Text(env.text().to_string(), env.span())
}

fn module_name(env: &mut Env<'_, Node>, rule: &str) -> String {
    match env.take("mod") {
        Some(node) => expect_ident(rule, "mod", Some(node)).name,
        None => default_module(env),
    }
}

fn default_module(env: &Env<'_, Node>) -> String {
    env.default_module().unwrap_or(DEFAULT_MODULE).to_string()
}

/// Span from the introducing keyword through the end of the definition.
fn def_span(env: &mut Env<'_, Node>, rule: &str) -> Span {
    let (_, kw) = expect_text(rule, "kw", env.take("kw"));
    Span::new(kw.start, env.span().end)
}

fn build_file(env: &mut Env<'_, Node>) -> Node {
    let defs = env.take_all("def").into_iter();
    Node::File(File {
        module: default_module(env),
        defs: defs.map(|d| expect_def("File", "def", Some(d))).collect(),
    })
}

fn build_method(env: &mut Env<'_, Node>) -> Node {
    let span = def_span(env, "Method");
    let module = module_name(env, "Method");
    let sig = expect_sig("Method", "sig", env.take("sig"));
    let body = expect_stmts("Method", "body", env.take("body"));
    Node::Def(Def::Method(Method {
        module,
        selector: sig.selector,
        params: sig.params,
        body,
        span,
    }))
}

fn build_val(env: &mut Env<'_, Node>) -> Node {
    let span = def_span(env, "Val");
    let module = module_name(env, "Val");
    let name = expect_ident("Val", "name", env.take("name"));
    let value = expect_expr("Val", "value", env.take("value"));
    Node::Def(Def::Val(Val {
        module,
        name,
        value,
        span,
    }))
}

fn build_nary_sig(env: &mut Env<'_, Node>) -> Node {
    let selector = env
        .take_all("kw")
        .into_iter()
        .map(|kw| expect_text("NarySig", "kw", Some(kw)).0)
        .collect();
    let params = env.take_all("param").into_iter();
    let params = params
        .map(|p| expect_ident("NarySig", "param", Some(p)))
        .collect();
    Node::Sig(Sig { selector, params })
}

fn build_bin_sig(env: &mut Env<'_, Node>) -> Node {
    let (op, _) = expect_text("BinSig", "op", env.take("op"));
    let param = expect_ident("BinSig", "param", env.take("param"));
    Node::Sig(Sig {
        selector: op,
        params: vec![param],
    })
}

/// `recv selector args...`, spanning from the receiver through `end`.
fn send(recv: Expr, selector: String, args: Vec<Expr>, end: Span) -> Expr {
    let span = recv.span().cover(end);
    Expr::Call(Call {
        recv: Some(Box::new(recv)),
        selector,
        args,
        span,
    })
}

fn build_unary(env: &mut Env<'_, Node>) -> Node {
    let recv = expect_expr("Unary", "recv", env.take("recv"));
    let folded = env.take_all("sel").into_iter().fold(recv, |recv, sel| {
        let sel = expect_ident("Unary", "sel", Some(sel));
        send(recv, sel.name, Vec::new(), sel.span)
    });
    Node::Expr(folded)
}

fn build_binary(env: &mut Env<'_, Node>) -> Node {
    let recv = expect_expr("Binary", "recv", env.take("recv"));
    let ops = env.take_all("op");
    let args = env.take_all("arg");
    let folded = ops.into_iter().zip(args).fold(recv, |recv, (op, arg)| {
        let (op, _) = expect_text("Binary", "op", Some(op));
        let arg = expect_expr("Binary", "arg", Some(arg));
        let end = arg.span();
        send(recv, op, vec![arg], end)
    });
    Node::Expr(folded)
}

fn build_nary(env: &mut Env<'_, Node>) -> Node {
    let recv = env
        .take("recv")
        .map(|r| expect_expr("Nary", "recv", Some(r)));
    let kws: Vec<(String, Span)> = env
        .take_all("kw")
        .into_iter()
        .map(|kw| expect_text("Nary", "kw", Some(kw)))
        .collect();
    let args: Vec<Expr> = env
        .take_all("arg")
        .into_iter()
        .map(|arg| expect_expr("Nary", "arg", Some(arg)))
        .collect();

    let first = match &recv {
        Some(recv) => recv.span(),
        None => kws.first().map_or(env.span(), |(_, span)| *span),
    };
    let span = args.last().map_or(first, |arg| first.cover(arg.span()));
    let selector = kws.into_iter().map(|(kw, _)| kw).collect();

    Node::Expr(Expr::Call(Call {
        recv: recv.map(Box::new),
        selector,
        args,
        span,
    }))
}
