use jstree::parse;
use jstree::pos::{Position, SourceLocator};

fn assert_parse(js: &str, expected: &str) {
    let (module, err) = parse(js.as_bytes());
    assert_eq!(err, None, "unexpected error for {:?}", js);
    assert_eq!(module.to_string(), expected, "tree mismatch for {:?}", js);
}

fn assert_error(js: &str, expected: &str) {
    let (_, err) = parse(js.as_bytes());
    let err = err.unwrap_or_else(|| panic!("expected a diagnostic for {:?}", js));
    assert_eq!(err.to_string(), expected, "diagnostic mismatch for {:?}", js);
}

#[test]
fn grammar() {
    let tests = [
        ("{}", "Stmt({ })"),
        ("var a = b;", "Stmt(var Binding(a) = Expr(b))"),
        ("const a = b;", "Stmt(const Binding(a) = Expr(b))"),
        ("let a = b;", "Stmt(let Binding(a) = Expr(b))"),
        (
            "let [a,b] = [1, 2];",
            "Stmt(let Binding([ Binding(a) , Binding(b) ]) = Expr([ Expr(1) , Expr(2) ]))",
        ),
        (
            "let [a,[b,c]] = [1, [2, 3]];",
            "Stmt(let Binding([ Binding(a) , Binding([ Binding(b) , Binding(c) ]) ]) = Expr([ Expr(1) , Expr([ Expr(2) , Expr(3) ]) ]))",
        ),
        (
            "let [,,c] = [1, 2, 3];",
            "Stmt(let Binding([ , , Binding(c) ]) = Expr([ Expr(1) , Expr(2) , Expr(3) ]))",
        ),
        (
            "let [a, ...b] = [1, 2, 3];",
            "Stmt(let Binding([ Binding(a) , ... Binding(b) ]) = Expr([ Expr(1) , Expr(2) , Expr(3) ]))",
        ),
        (
            "let {a, b} = {a: 3, b: 4};",
            "Stmt(let Binding({ a , b }) = Expr({ a : Expr(3) , b : Expr(4) }))",
        ),
        (
            "let {a: [b, {c}]} = {a: [5, {c: 3}]};",
            "Stmt(let Binding({ a : Binding([ Binding(b) , Binding({ c }) ]) }) = Expr({ a : Expr([ Expr(5) , Expr({ c : Expr(3) }) ]) }))",
        ),
        (
            "let [a = 2] = [];",
            "Stmt(let Binding([ Binding(a) = Expr(2) ]) = Expr([ ]))",
        ),
        (
            "let {a: b = 2} = {};",
            "Stmt(let Binding({ a : Binding(b) = Expr(2) }) = Expr({ }))",
        ),
        (
            "var a = 5 * 4 / 3 ** 2 + ( 5 - 3 );",
            "Stmt(var Binding(a) = Expr(5 * 4 / 3 ** 2 + ( Expr(5 - 3) )))",
        ),
        (";", "Stmt()"),
        (
            "{; var a = 3;}",
            "Stmt({ Stmt() Stmt(var Binding(a) = Expr(3)) })",
        ),
        ("return", "Stmt(return)"),
        ("return 5*3", "Stmt(return Expr(5 * 3))"),
        ("break", "Stmt(break)"),
        ("break LABEL", "Stmt(break LABEL)"),
        ("continue", "Stmt(continue)"),
        ("continue LABEL", "Stmt(continue LABEL)"),
        (
            "if (a == 5) return true",
            "Stmt(if Expr(a == 5) Stmt(return Expr(true)))",
        ),
        (
            "with (a = 5) return true",
            "Stmt(with Expr(a = Expr(5)) Stmt(return Expr(true)))",
        ),
        (
            "do a++ while (a < 4)",
            "Stmt(do Stmt(Expr(a ++)) while Expr(a < 4))",
        ),
        (
            "do {a++} while (a < 4)",
            "Stmt(do Stmt({ Stmt(Expr(a ++)) }) while Expr(a < 4))",
        ),
        (
            "while (a < 4) a++",
            "Stmt(while Expr(a < 4) Stmt(Expr(a ++)))",
        ),
        (
            "for (var a = 0; a < 4; a++) b = a",
            "Stmt(for Stmt(var Binding(a) = Expr(0)) Expr(a < 4) Expr(a ++) Stmt(Expr(b = Expr(a))))",
        ),
        (
            "for (5; a < 4; a++) {}",
            "Stmt(for Expr(5) Expr(a < 4) Expr(a ++) Stmt({ }))",
        ),
        (
            "for (var a in b) {}",
            "Stmt(for Stmt(var Binding(a)) in Expr(b) Stmt({ }))",
        ),
        (
            "for (var a of b) {}",
            "Stmt(for Stmt(var Binding(a)) of Expr(b) Stmt({ }))",
        ),
        (
            "for await (var a of b) {}",
            "Stmt(for await Stmt(var Binding(a)) of Expr(b) Stmt({ }))",
        ),
        ("throw 5", "Stmt(throw Expr(5))"),
        ("try {} catch {}", "Stmt(try Stmt({ }) catch Stmt({ }))"),
        ("try {} finally {}", "Stmt(try Stmt({ }) finally Stmt({ }))"),
        (
            "try {} catch {} finally {}",
            "Stmt(try Stmt({ }) catch Stmt({ }) finally Stmt({ }))",
        ),
        ("debugger", "Stmt(debugger)"),
        ("label: var a", "Stmt(label Stmt(var Binding(a)))"),
        ("switch (5) {}", "Stmt(switch Expr(5))"),
        (
            "switch (5) { case 3: {} default: {}}",
            "Stmt(switch Expr(5) Clause(case Expr(3) Stmt({ })) Clause(default Stmt({ })))",
        ),
        (
            "function (b) {}",
            "Stmt(function Param(Binding(b)) Stmt({ }))",
        ),
        (
            "function a(b) {}",
            "Stmt(function a Param(Binding(b)) Stmt({ }))",
        ),
        ("class { }", "Stmt(class)"),
        ("class A { }", "Stmt(class A)"),
        ("class A extends B { }", "Stmt(class A extends Expr(B))"),
        (
            "class { a(b) {} }",
            "Stmt(class Method(a Param(Binding(b)) Stmt({ })))",
        ),
        ("class { get a() {} }", "Stmt(class Method(get a Stmt({ })))"),
        (
            "class { set a(b) {} }",
            "Stmt(class Method(set a Param(Binding(b)) Stmt({ })))",
        ),
        (
            "class { * a(b) {} }",
            "Stmt(class Method(* a Param(Binding(b)) Stmt({ })))",
        ),
        (
            "class { async a(b) {} }",
            "Stmt(class Method(async a Param(Binding(b)) Stmt({ })))",
        ),
        (
            "class { async * a(b) {} }",
            "Stmt(class Method(async * a Param(Binding(b)) Stmt({ })))",
        ),
        (
            "class { static a(b) {} }",
            "Stmt(class Method(static a Param(Binding(b)) Stmt({ })))",
        ),
        ("class { ; }", "Stmt(class)"),
    ];
    for (js, expected) in tests {
        assert_parse(js, expected);
    }
}

#[test]
fn edge_cases() {
    let tests = [
        ("let\nawait 0", "Stmt(let Binding(await)) Stmt(Expr(0))"),
        ("yield a = 5", "Stmt(Expr(yield Expr(a = Expr(5))))"),
        ("yield * a = 5", "Stmt(Expr(yield * Expr(a = Expr(5))))"),
        ("yield\na = 5", "Stmt(Expr(yield)) Stmt(Expr(a = Expr(5)))"),
        ("yield yield a", "Stmt(Expr(yield Expr(yield Expr(a))))"),
        (
            "yield * yield * a",
            "Stmt(Expr(yield * Expr(yield * Expr(a))))",
        ),
    ];
    for (js, expected) in tests {
        assert_parse(js, expected);
    }
}

#[test]
fn expressions() {
    let tests = [
        (
            "x = {a, if: b, do(){}, ...d}",
            "Stmt(Expr(x = Expr({ a , if : Expr(b) , Method(do Stmt({ })) , ... Expr(d) })))",
        ),
        ("x = {a}", "Stmt(Expr(x = Expr({ a })))"),
        (
            "async function a() {}",
            "Stmt(async function a Stmt({ }))",
        ),
        (
            "x = async function() {}",
            "Stmt(Expr(x = Expr(async function Stmt({ }))))",
        ),
    ];
    for (js, expected) in tests {
        assert_parse(js, expected);
    }
}

#[test]
fn arrow_functions() {
    let tests = [
        ("x => x + 1", "Stmt(Expr(x => Expr(x + 1)))"),
        (
            "(a, b) => {}",
            "Stmt(Expr(( Expr(a) , Expr(b) ) => Stmt({ })))",
        ),
        (
            "x = (a) => a * 2",
            "Stmt(Expr(x = Expr(( Expr(a) ) => Expr(a * 2))))",
        ),
        (
            "x = async => 5",
            "Stmt(Expr(x = Expr(async => Expr(5))))",
        ),
    ];
    for (js, expected) in tests {
        assert_parse(js, expected);
    }
}

#[test]
fn catch_binding() {
    assert_parse(
        "try {} catch (e) {}",
        "Stmt(try Stmt({ }) catch ( Binding(e) ) Stmt({ }))",
    );
    assert_parse(
        "try {} catch ({message}) {}",
        "Stmt(try Stmt({ }) catch ( Binding({ message }) ) Stmt({ }))",
    );
}

#[test]
fn computed_binding_names() {
    assert_parse(
        "let {[a]: b} = c",
        "Stmt(let Binding({ [ Expr(a) ] : Binding(b) }) = Expr(c))",
    );
}

#[test]
fn regexp_disambiguation() {
    let tests = [
        ("/abc/", "Stmt(Expr(/abc/))"),
        ("return /abc/;", "Stmt(return Expr(/abc/))"),
        ("a/b/g", "Stmt(Expr(a / b / g))"),
        ("{}/1/g", "Stmt({ }) Stmt(Expr(/1/g))"),
        ("i(0)/1/g", "Stmt(Expr(i ( Expr(0) ) / 1 / g))"),
        ("if(0)/1/g", "Stmt(if Expr(0) Stmt(Expr(/1/g)))"),
        ("a.if(0)/1/g", "Stmt(Expr(a . if ( Expr(0) ) / 1 / g))"),
        ("this/1/g", "Stmt(Expr(this / 1 / g))"),
        (
            "switch(a){case /1/g:}",
            "Stmt(switch Expr(a) Clause(case Expr(/1/g)))",
        ),
        ("(a+b)/1/g", "Stmt(Expr(( Expr(a + b) ) / 1 / g))"),
        (
            "f(); function foo() {} /42/i",
            "Stmt(Expr(f ( ))) Stmt(function foo Stmt({ })) Stmt(Expr(/42/i))",
        ),
        (
            "x = function() {} /42/i",
            "Stmt(Expr(x = Expr(function Stmt({ }) / 42 / i)))",
        ),
        (
            "x = function foo() {} /42/i",
            "Stmt(Expr(x = Expr(function foo Stmt({ }) / 42 / i)))",
        ),
        ("x = /foo/", "Stmt(Expr(x = Expr(/foo/)))"),
        ("x = x / foo /", "Stmt(Expr(x = Expr(x / foo /)))"),
        ("x = (/foo/)", "Stmt(Expr(x = Expr(( Expr(/foo/) ))))"),
        ("x = {a: /foo/}", "Stmt(Expr(x = Expr({ a : Expr(/foo/) })))"),
        (
            "do { /foo/ } while (a)",
            "Stmt(do Stmt({ Stmt(Expr(/foo/)) }) while Expr(a))",
        ),
        ("if (true) /foo/", "Stmt(if Expr(true) Stmt(Expr(/foo/)))"),
        ("x = (a) / foo", "Stmt(Expr(x = Expr(( Expr(a) ) / foo)))"),
        ("bar (true) /foo/", "Stmt(Expr(bar ( Expr(true) ) / foo /))"),
        (
            "/abc/ ? /def/ : /geh/",
            "Stmt(Expr(/abc/ ? Expr(/def/) : Expr(/geh/)))",
        ),
        ("yield /abc/", "Stmt(Expr(yield Expr(/abc/)))"),
        ("yield * /abc/", "Stmt(Expr(yield * Expr(/abc/)))"),
        ("x = `foo` / 2", "Stmt(Expr(x = Expr(`foo` / 2)))"),
    ];
    for (js, expected) in tests {
        assert_parse(js, expected);
    }
}

#[test]
fn semicolon_insertion() {
    let tests = [
        ("return\n5*3", "Stmt(return) Stmt(Expr(5 * 3))"),
        ("continue\nLABEL", "Stmt(continue) Stmt(Expr(LABEL))"),
        ("break\nLABEL", "Stmt(break) Stmt(Expr(LABEL))"),
        (
            "function a() { return }",
            "Stmt(function a Stmt({ Stmt(return) }))",
        ),
        (
            "return /* a\nb */ 5",
            "Stmt(return) Stmt(Expr(5))",
        ),
    ];
    for (js, expected) in tests {
        assert_parse(js, expected);
    }
}

#[test]
fn comments_and_whitespace() {
    let tests = [
        ("a; // trailing\nb", "Stmt(Expr(a)) Stmt(Expr(b))"),
        ("a /* inline */ + b", "Stmt(Expr(a + b))"),
        ("var \u{2028} a", "Stmt(var Binding(a))"),
        ("var \u{00a0}a", "Stmt(var Binding(a))"),
    ];
    for (js, expected) in tests {
        assert_parse(js, expected);
    }
}

#[test]
fn unicode_identifiers() {
    assert_parse("var ñ = 1", "Stmt(var Binding(ñ) = Expr(1))");
    assert_parse("日本語 = 1", "Stmt(Expr(日本語 = Expr(1)))");
}

#[test]
fn literals() {
    let tests = [
        ("x = 0x2A", "Stmt(Expr(x = Expr(0x2A)))"),
        ("x = 0b101", "Stmt(Expr(x = Expr(0b101)))"),
        ("x = 0o52", "Stmt(Expr(x = Expr(0o52)))"),
        ("x = .5e-3", "Stmt(Expr(x = Expr(.5e-3)))"),
        ("x = 5.", "Stmt(Expr(x = Expr(5.)))"),
        ("x = 'a\\'b'", "Stmt(Expr(x = Expr('a\\'b')))"),
        ("x = \"a\\\nb\"", "Stmt(Expr(x = Expr(\"a\\\nb\")))"),
        ("x = `a ${b + `c`} d`", "Stmt(Expr(x = Expr(`a ${b + `c`} d`)))"),
    ];
    for (js, expected) in tests {
        assert_parse(js, expected);
    }
}

#[test]
fn parse_errors() {
    let tests = [
        ("{a, if: b, do(){}, ...d}", "unexpected ':' in statement"),
        (
            "for (a !) {}",
            "expected 'in', 'of', or ';' instead of '!' in for statement",
        ),
        (
            "do a; until (x)",
            "expected 'while' instead of 'until' in do statement",
        ),
        (
            "async x",
            "expected 'function' instead of 'x' in async function statement",
        ),
        ("throw\n5", "unexpected '5' in throw statement"),
        (
            "a ? b",
            "expected ':' instead of '' in conditional expression",
        ),
        ("var 5", "unexpected '5' in binding"),
        ("import x from 'a'", "unexpected 'import' in module"),
        (
            "if (a",
            "expected ')' instead of '' in if statement",
        ),
    ];
    for (js, expected) in tests {
        assert_error(js, expected);
    }
}

#[test]
fn lex_errors() {
    let tests = [
        ("var @", "unexpected character '@'"),
        ("x = 'abc", "unterminated string literal"),
        ("x = `abc", "unterminated template literal"),
        ("x = /abc", "unterminated regular expression literal"),
        ("x = 5e", "invalid number literal"),
        ("x = 0x", "invalid number literal"),
        ("/* abc", "unterminated multi-line comment"),
    ];
    for (js, expected) in tests {
        assert_error(js, expected);
    }
}

#[test]
fn error_trees_keep_the_recognized_prefix() {
    let (module, err) = parse(b"var a = 1; {a, if: b}");
    assert!(err.is_some());
    let rendered = module.to_string();
    assert!(
        rendered.starts_with("Stmt(var Binding(a) = Expr(1))"),
        "prefix missing in {:?}",
        rendered
    );
    assert!(rendered.contains("Error()"), "no error node in {:?}", rendered);
}

#[test]
fn determinism() {
    let source = b"x = function() {} /42/i; let [a, ...b] = c;".as_slice();
    let (tree1, err1) = parse(source);
    let (tree2, err2) = parse(source);
    assert_eq!(tree1, tree2);
    assert_eq!(err1, err2);
}

#[test]
fn token_lexemes_are_ordered_subslices_of_the_input() {
    let source = b"let {a: [b, {c}]} = {a: [5, {c: 3}]}; do a++ while (a < 4)".as_slice();
    let (tree, err) = parse(source);
    assert_eq!(err, None);
    let base = source.as_ptr() as usize;
    let mut last_end = 0;
    tree.walk(&mut |node| {
        if let Some((_, text)) = node.token() {
            let start = text.as_ptr() as usize - base;
            let end = start + text.len();
            assert!(end <= source.len(), "lexeme outside the input");
            assert!(last_end <= start, "lexemes out of order");
            last_end = end;
        }
    });
}

#[test]
fn diagnostic_offsets_locate_the_failure() {
    let source = b"var a;\nvar 5;".as_slice();
    let (_, err) = parse(source);
    let err = err.unwrap();
    assert_eq!(err.to_string(), "unexpected '5' in binding");
    assert_eq!(err.offset(), 11);
    let locator = SourceLocator::new(source);
    assert_eq!(
        locator.position_utf8(source, err.offset()),
        Position {
            line: 1,
            character: 4
        }
    );
}

#[test]
fn trees_serialize() {
    let (tree, err) = parse(b"a");
    assert_eq!(err, None);
    let value = serde_json::to_value(&tree).unwrap();
    assert_eq!(value["type"], "Tree");
    assert_eq!(value["kind"], "Module");
}
