// fuzz_targets/lexer.rs
#![no_main]

use goreflect_syntax::lexer::{Lexer, Tok};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let mut lx = Lexer::new(&s);

    let mut last_real_end = 0usize;
    let mut max_end = 0usize;
    let mut steps = 0usize;
    let max_steps = s.len().saturating_mul(4) + 64;

    for (start, tok, end) in lx.by_ref() {
        assert!(start <= end && end <= s.len());

        // Inserted semicolons are zero-width and sit after the last real token.
        if matches!(tok, Tok::Semi) && start == end {
            assert!(start >= max_end);
        } else {
            assert!(start >= last_real_end);
            last_real_end = end;
        }
        max_end = max_end.max(end);

        steps += 1;
        assert!(steps <= max_steps);
    }

    for c in lx.take_comments() {
        assert!(c.span.end as usize <= s.len());
    }
});
