//! Admission predicates: which groups a slot applies to at all.
//!
//! A predicate is compiled from an ordered list of statements.  Each
//! statement is one line of the form
//!
//! ```text
//! [&|] [!] ( n@<glob> | t@<glob> | <glob> )
//! ```
//!
//! | Part      | Meaning                                                  |
//! |-----------|----------------------------------------------------------|
//! | `&` / `|` | combine with the running result by AND / OR (default AND) |
//! | `!`       | negate this statement                                    |
//! | `n@glob`  | group name matches `glob`                                |
//! | `t@glob`  | any group tag matches `glob`                             |
//! | `glob`    | shorthand for `t@glob`                                   |
//!
//! Globs support `*` and compare ASCII case-insensitively.  The first
//! statement's combinator is ignored.  An empty predicate admits everyone.
//! A statement that cannot be understood never matches and is logged.

use std::fmt;

use tracing::warn;

use mz_agent::GroupLookup;
use mz_core::GroupId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Join {
    And,
    Or,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Matcher {
    Name(String),
    Tag(String),
    Never,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Clause {
    join: Join,
    negate: bool,
    matcher: Matcher,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdmissionPredicate {
    clauses: Vec<Clause>,
    source: Vec<String>,
}

impl AdmissionPredicate {
    /// Predicate that admits every group.
    pub fn always() -> Self {
        Self::default()
    }

    /// Compile statements in order.  Each input may hold several statements
    /// separated by newlines or `;`; blank ones are skipped.
    pub fn parse<I, S>(statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self::default();
        for text in statements {
            for line in text.as_ref().split(['\n', ';']) {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                out.clauses.push(parse_clause(line));
                out.source.push(line.to_string());
            }
        }
        out
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Statement lines in evaluation order.
    pub fn statements(&self) -> &[String] {
        &self.source
    }

    pub fn admits(&self, group: GroupId, groups: &dyn GroupLookup) -> bool {
        let mut result: Option<bool> = None;
        for clause in &self.clauses {
            let hit = clause.matches(group, groups);
            result = Some(match (result, clause.join) {
                (None, _) => hit,
                (Some(acc), Join::And) => acc && hit,
                (Some(acc), Join::Or) => acc || hit,
            });
        }
        result.unwrap_or(true)
    }
}

impl fmt::Display for AdmissionPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source.join("; "))
    }
}

impl Clause {
    fn matches(&self, group: GroupId, groups: &dyn GroupLookup) -> bool {
        let hit = match &self.matcher {
            Matcher::Name(glob) => groups.name(group).is_some_and(|n| glob_match(glob, n)),
            Matcher::Tag(glob) => groups.tags(group).iter().any(|t| glob_match(glob, t)),
            Matcher::Never => return false,
        };
        hit != self.negate
    }
}

fn parse_clause(line: &str) -> Clause {
    let (join, rest) = match line.as_bytes().first() {
        Some(b'&') => (Join::And, &line[1..]),
        Some(b'|') => (Join::Or, &line[1..]),
        _ => (Join::And, line),
    };
    let rest = rest.trim_start();
    let (negate, rest) = match rest.strip_prefix('!') {
        Some(r) => (true, r.trim_start()),
        None => (false, rest),
    };

    let matcher = if let Some(glob) = strip_prefix_ci(rest, "n@") {
        Matcher::Name(glob.to_string())
    } else if let Some(glob) = strip_prefix_ci(rest, "t@") {
        Matcher::Tag(glob.to_string())
    } else if rest.contains('@') {
        Matcher::Never
    } else {
        Matcher::Tag(rest.to_string())
    };

    let matcher = match matcher {
        Matcher::Name(g) | Matcher::Tag(g) if g.trim().is_empty() => Matcher::Never,
        m => m,
    };
    if matcher == Matcher::Never {
        warn!(statement = line, "unrecognised admission statement; it will never match");
    }
    Clause { join, negate, matcher }
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len() && s.is_char_boundary(prefix.len()) && s[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// `*`-only glob, ASCII case-insensitive.
pub(crate) fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().map(|c| c.to_ascii_lowercase()).collect();
    let t: Vec<char> = text.chars().map(|c| c.to_ascii_lowercase()).collect();

    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while ti < t.len() {
        if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ti));
            pi += 1;
        } else if pi < p.len() && p[pi] == t[ti] {
            pi += 1;
            ti += 1;
        } else if let Some((sp, st)) = star {
            pi = sp + 1;
            ti = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|&c| c == '*')
}
