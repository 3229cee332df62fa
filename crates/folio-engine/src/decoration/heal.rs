//! Healing of unclosed decorations: `*text` with no closing marker on the
//! same line becomes `*text*`. Runs before any other processing so every
//! later stage sees balanced markers.

use crate::{
    kinds::{FenceTracker, HorizontalRule},
    text::lines_with_spans,
};

/// Delimiter characters that are healed, with the run lengths that count as
/// a delimiter. Underscores are never healed; intra-word underscores are too
/// common.
const HEALABLE: &[(char, &[usize])] = &[('*', &[1, 2, 3]), ('~', &[2]), ('=', &[2])];

/// Appends missing closing markers line by line. Lines inside fenced code and
/// horizontal rules are left untouched.
pub fn heal_unclosed(text: &str) -> String {
    let mut fences = FenceTracker::default();
    let mut out = String::with_capacity(text.len() + 8);
    let mut healed = 0usize;

    for line in lines_with_spans(text) {
        let newline = &text[line.span.start + line.text.len()..line.span.end];
        if fences.step(line.text) || HorizontalRule::is_rule(line.text) {
            out.push_str(line.text);
        } else {
            let missing = missing_closers(line.text);
            if missing.is_empty() {
                out.push_str(line.text);
            } else {
                healed += 1;
                let body = line.text.trim_end();
                out.push_str(body);
                out.push_str(&missing);
                out.push_str(&line.text[body.len()..]);
            }
        }
        out.push_str(newline);
    }

    if healed > 0 {
        log::debug!("healed unclosed decorations on {healed} lines");
    }
    out
}

/// Closing markers a line needs, innermost first.
fn missing_closers(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut i = bullet_len(&chars);

    while i < chars.len() {
        let c = chars[i];
        let Some((_, lengths)) = HEALABLE.iter().find(|(h, _)| *h == c) else {
            i += 1;
            continue;
        };
        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        let prev = i.checked_sub(1).and_then(|p| chars.get(p));
        let next = chars.get(i + run);
        i += run;
        if !lengths.contains(&run) {
            continue;
        }

        let can_close = prev.is_some_and(|p| !p.is_whitespace());
        let can_open = next.is_some_and(|n| !n.is_whitespace());
        if can_close && stack.last() == Some(&(c, run)) {
            stack.pop();
        } else if can_open {
            stack.push((c, run));
        }
    }

    stack
        .iter()
        .rev()
        .map(|&(c, run)| c.to_string().repeat(run))
        .collect()
}

/// Length of a leading `* ` list bullet, which is not a delimiter.
fn bullet_len(chars: &[char]) -> usize {
    let indent = chars.iter().take_while(|c| **c == ' ').count();
    match (chars.get(indent), chars.get(indent + 1)) {
        (Some('*'), Some(' ')) => indent + 2,
        _ => 0,
    }
}
