//! Trigger detection and command parsing.
//!
//! Commands follow a small explicit grammar instead of a substring scan:
//! a comment triggers only when a whole whitespace-delimited token equals
//! the trigger token (`/onboard` by default), outside fenced code blocks.
//! The argument is the next token on the same line.

/// The default trigger token.
pub const DEFAULT_TRIGGER: &str = "/onboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Onboard,
}

/// A parsed command. An absent argument is a valid parse result — it is
/// rejected later by the resolver, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: Verb,
    pub argument: Option<String>,
}

/// Whether the comment body should start the pipeline at all.
pub fn matches(body: &str, token: &str) -> bool {
    parse(body, token).is_some()
}

/// Extract the command from a comment body, or None when the trigger token
/// does not appear as a standalone token.
///
/// Fenced code blocks are skipped so a trigger quoted inside ``` … ``` does
/// not fire. `/onboarding` or `see/onboard` do not match — token equality,
/// not substring containment.
pub fn parse(body: &str, token: &str) -> Option<Command> {
    let mut in_fence = false;
    for line in body.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        let mut words = line.split_whitespace();
        while let Some(word) = words.next() {
            if word == token {
                return Some(Command {
                    verb: Verb::Onboard,
                    argument: words.next().map(|a| a.to_string()),
                });
            }
        }
    }
    None
}
