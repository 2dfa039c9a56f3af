// fuzz_targets/parse_source.rs
#![no_main]

use goreflect_syntax::ast::{AstArena, ExprId, TypeId};
use goreflect_syntax::{Span, Visitor, Walk, parse_source};
use libfuzzer_sys::fuzz_target;

/// Every span reached by the walk must lie inside the source.
struct SpanCheck {
    len: usize,
}

impl SpanCheck {
    fn check(&self, span: Span) {
        assert!(span.start <= span.end);
        assert!(span.end as usize <= self.len);
    }
}

impl<'ast> Visitor<'ast> for SpanCheck {
    fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
        self.check(a.exprs.span(id));
    }

    fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) {
        self.check(a.types.span(id));
        a.types[id].walk(a, self);
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(src) = std::str::from_utf8(data) else {
        return;
    };
    match parse_source(src) {
        Ok(parsed) => {
            let mut v = SpanCheck { len: src.len() };
            v.check(parsed.file.package_pos);
            v.check(parsed.file.name.pos);
            v.visit_source_file(&parsed.arena, &parsed.file);
        }
        Err(failure) => assert!(!failure.diags.is_empty()),
    }
});
