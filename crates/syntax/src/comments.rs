//! Comment grouping and doc attachment.
//!
//! Groups follow Go's rules: adjacent comments with no token and no blank
//! line between them form one group, and a group that starts on the line of
//! a preceding token is a trailing group limited to that line.
//!
//! A node's doc comment is the nearest group that ends before the node with
//! no token in between and that ends on the node's line or the line above.

use crate::ast::{AstArena, Comment, CommentGroup, CommentGroupId, Span};
use crate::lexer::{RawComment, Tok};

/// Byte offset to line mapping.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(src: &str) -> Self {
        let mut starts = Vec::with_capacity(src.len() / 32 + 1);
        starts.push(0);
        starts.extend(memchr::memchr_iter(b'\n', src.as_bytes()).map(|i| (i + 1) as u32));
        Self { starts }
    }

    /// Zero-based line containing `offset`.
    #[inline]
    pub fn line(&self, offset: u32) -> u32 {
        (self.starts.partition_point(|&s| s <= offset) - 1) as u32
    }

    /// One-based line number, for humans.
    #[inline]
    pub fn line_number(&self, offset: u32) -> u32 {
        self.line(offset) + 1
    }
}

#[derive(Debug, Clone, Copy)]
struct GroupInfo {
    id: CommentGroupId,
    span: Span,
    start_line: u32,
    end_line: u32,
    trailing: bool,
}

/// Position index over a file's comment groups and significant tokens.
#[derive(Debug)]
pub struct CommentIndex {
    groups: Vec<GroupInfo>,
    /// Starts of real tokens, excluding `,`, `;` and injected semicolons.
    token_starts: Vec<u32>,
    lines: LineIndex,
}

impl CommentIndex {
    /// Groups `comments` and allocates the groups into `arena`.
    pub fn build(
        src: &str,
        toks: &[(usize, Tok<'_>, usize)],
        comments: &[RawComment],
        arena: &mut AstArena,
    ) -> Self {
        let lines = LineIndex::new(src);
        let token_starts: Vec<u32> = toks
            .iter()
            .filter(|(s, t, e)| s != e && !matches!(t, Tok::Comma | Tok::Semi))
            .map(|&(s, _, _)| s as u32)
            .collect();
        let all_token_ends: Vec<(u32, u32)> = toks
            .iter()
            .filter(|(s, _, e)| s != e)
            .map(|&(s, _, e)| (s as u32, e as u32))
            .collect();

        let mut index = Self {
            groups: Vec::new(),
            token_starts,
            lines,
        };

        let mut current: Vec<RawComment> = Vec::new();
        let mut current_trailing = false;

        for &c in comments {
            let start_line = index.lines.line(c.span.start);
            if let Some(last) = current.last() {
                let last_line = index.lines.line(last.span.end.saturating_sub(1));
                let token_between = has_any_in(&all_token_ends, last.span.end, c.span.start);
                let breaks = token_between
                    || start_line > last_line + 1
                    || (current_trailing && start_line > last_line);
                if breaks {
                    index.flush(&mut current, current_trailing, arena);
                }
            }
            if current.is_empty() {
                current_trailing = all_token_ends
                    .iter()
                    .rev()
                    .find(|&&(_, e)| e <= c.span.start)
                    .is_some_and(|&(_, e)| index.lines.line(e.saturating_sub(1)) == start_line);
            }
            current.push(c);
        }
        index.flush(&mut current, current_trailing, arena);

        index
    }

    fn flush(&mut self, current: &mut Vec<RawComment>, trailing: bool, arena: &mut AstArena) {
        let (Some(first), Some(last)) = (current.first(), current.last()) else {
            return;
        };
        let span = first.span.to(last.span);

        let ids: Vec<_> = current
            .iter()
            .map(|c| arena.comments.alloc(Comment { kind: c.kind }, c.span))
            .collect();
        let comments = arena.list_comment_ids(ids);
        let id = arena.comment_groups.alloc(CommentGroup { comments }, span);

        self.groups.push(GroupInfo {
            id,
            span,
            start_line: self.lines.line(span.start),
            end_line: self.lines.line(span.end.saturating_sub(1)),
            trailing,
        });
        current.clear();
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    pub fn group_ids(&self) -> impl Iterator<Item = CommentGroupId> + '_ {
        self.groups.iter().map(|g| g.id)
    }

    /// Doc comment for a node starting at byte `pos`.
    pub fn doc_before(&self, pos: u32) -> Option<CommentGroupId> {
        let idx = self.groups.partition_point(|g| g.span.end <= pos);
        let g = self.groups.get(idx.checked_sub(1)?)?;

        if g.trailing || has_token_in(&self.token_starts, g.span.end, pos) {
            return None;
        }
        let node_line = self.lines.line(pos);
        (node_line <= g.end_line + 1).then_some(g.id)
    }

    /// Trailing comment on the line where a node ends (`end` exclusive).
    pub fn comment_after(&self, end: u32) -> Option<CommentGroupId> {
        let idx = self.groups.partition_point(|g| g.span.start < end);
        let g = self.groups.get(idx)?;

        let end_line = self.lines.line(end.saturating_sub(1));
        let same_line = g.trailing && g.start_line == end_line;
        (same_line && !has_token_in(&self.token_starts, end, g.span.start)).then_some(g.id)
    }
}

fn has_token_in(starts: &[u32], from: u32, to: u32) -> bool {
    let i = starts.partition_point(|&s| s < from);
    starts.get(i).is_some_and(|&s| s < to)
}

fn has_any_in(spans: &[(u32, u32)], from: u32, to: u32) -> bool {
    let i = spans.partition_point(|&(s, _)| s < from);
    spans.get(i).is_some_and(|&(s, _)| s < to)
}
