use goreflect_syntax::ast::*;
use goreflect_syntax::{ParsedFile, parse_source};

fn assert_parses(src: &str) -> ParsedFile {
    match parse_source(src) {
        Ok(p) => p,
        Err(f) => panic!("expected parse ok, got diagnostics: {:#?}", f.diags),
    }
}

fn funcs(p: &ParsedFile) -> Vec<FuncDecl> {
    p.arena
        .top_decls(p.file.decls)
        .iter()
        .filter_map(|d| match *d {
            TopLevelDecl::Func(id) => Some(p.arena.funcs[id]),
            TopLevelDecl::Gen(_) => None,
        })
        .collect()
}

#[test]
fn parses_imports_and_decls() {
    assert_parses(
        r#"
package main

import (
    "fmt"
    . "math"
    _ "net/http"
    str "strings"
)

const (
    A = 1
    B int = 2
)

var (
    x = 1
    y, z int
)

type (
    T = int
    U[T any] struct { F T }
    V interface {
        M(x int) int
        ~int | ~string
    }
)

func main() {
    fmt.Println(Sqrt(4), str.ToUpper("a"))
}
"#,
    );
}

#[test]
fn skips_statement_bodies() {
    assert_parses(
        r#"
package p

func f(x int) int {
    if x < 0 { return -x }
    for i := 0; i < 10; i++ {
        if i == 5 { break }
        continue
    }
    switch x {
    case 0, 1:
        x++
    default:
        x = 3
    }
    select {
    case ch <- x:
        return x
    default:
        return 0
    }
}
"#,
    );
}

#[test]
fn parses_signatures() {
    let p = assert_parses(
        r#"
package p

func A(a, b int, rest ...string) (n int, err error) { return }
func B(int, []string) error { return nil }
func (s *Store[K, V]) Get(key K) (V, bool) { var v V; return v, false }
func (Store[K, V]) Len() int { return 0 }
func C(f func(int) (string, error), ch <-chan struct{}, out chan<- int) {}
func D[T comparable, S ~[]T](s S, v T) int { return 0 }
"#,
    );
    let fs = funcs(&p);
    assert_eq!(fs.len(), 6);

    let a = p.arena.signatures[fs[0].signature];
    let params = p.arena.fields_list(a.params.fields);
    assert_eq!(params.len(), 2);
    assert_eq!(p.arena.ident_names(p.arena.fields[params[0]].names).len(), 2);
    assert!(p.arena.fields[params[1]].ellipsis_pos.is_some());

    let b = p.arena.signatures[fs[1].signature];
    let params = p.arena.fields_list(b.params.fields);
    assert_eq!(params.len(), 2);
    assert!(params.iter().all(|&f| p.arena.fields[f].names.is_empty()));

    let recv = fs[2].recv.expect("receiver");
    assert_eq!(p.ident(recv.name.expect("receiver name")), "s");
    assert!(matches!(p.arena.types[recv.typ], Type::Pointer { .. }));
    assert!(fs[3].recv.expect("receiver").name.is_none());
    assert!(fs[5].type_params.is_some());
}

#[test]
fn attaches_docs_and_trailing_comments() {
    let p = assert_parses(
        r#"
package p

// Config holds settings.
// +gen:struct=true
type Config struct {
    // Name of the thing.
    Name string // trailing
    Port int
}

/*
Run starts it.
*/
func Run() {}
"#,
    );
    let TopLevelDecl::Gen(decl) = p.arena.top_decls(p.file.decls)[0] else {
        panic!("expected type decl");
    };
    let doc = p.arena.decls[decl].doc.expect("type doc");
    let lines: Vec<_> = p.comment_texts(doc).collect();
    assert_eq!(lines, ["// Config holds settings.", "// +gen:struct=true"]);

    let Spec::Type(spec) = p.arena.specs_list(p.arena.decls[decl].specs)[0] else {
        panic!("expected type spec");
    };
    let Type::Struct { fields } = p.arena.types[spec.typ] else {
        panic!("expected struct");
    };
    let fields = p.arena.fields_list(fields.fields);
    let name = p.arena.fields[fields[0]];
    assert!(name.doc.is_some());
    assert!(name.comment.is_some());
    let port = p.arena.fields[fields[1]];
    assert!(port.doc.is_none());

    let run = funcs(&p)[0];
    let doc = run.doc.expect("func doc");
    assert!(p.comment_texts(doc).next().unwrap().starts_with("/*"));
}

#[test]
fn rejects_missing_package_clause() {
    let err = parse_source("type T int\n").unwrap_err();
    assert!(err.diags[0].message.contains("package"));
}
