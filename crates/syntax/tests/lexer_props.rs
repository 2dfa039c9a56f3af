use goreflect_syntax::lexer::{Lexer, Tok};
use goreflect_syntax::parse_source;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]
    #[test]
    fn never_panics_and_progresses(s in ".*") {
        let lx = Lexer::new(&s);

        let mut max_end = 0usize;
        let mut last_real_end = 0usize;
        let max_steps = s.len().saturating_mul(4) + 64;

        for (steps, (start, tok, end)) in lx.enumerate() {
            prop_assert!(start <= end, "start>end: ({start},{end}) tok={tok:?} input={s:?}");
            prop_assert!(end <= s.len(), "end out of bounds: ({start},{end}) tok={tok:?} input={s:?}");

            let injected_semi = matches!(tok, Tok::Semi) && start == end;
            if !injected_semi {
                prop_assert!(
                    start >= last_real_end,
                    "real token moved backwards: start={start} < {last_real_end} input={s:?}"
                );
                last_real_end = end;
            } else {
                prop_assert!(start >= max_end, "injected semi before progress: {start} < {max_end} input={s:?}");
            }
            max_end = max_end.max(end);

            prop_assert!(steps <= max_steps, "too many steps: {steps} input={s:?}");
        }
    }

    #[test]
    fn parser_never_panics(body in "[a-z{}()\\[\\]*.,=\\n \\t\"`:;0-9]{0,120}") {
        let src = format!("package p\n{body}");
        if let Err(f) = parse_source(&src) {
            prop_assert!(!f.diags.is_empty());
            for d in &f.diags {
                prop_assert!(d.span.end as usize <= src.len());
            }
        }
    }
}
