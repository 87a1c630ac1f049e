//! Strings matching a JSON Schema `pattern`.
//!
//! Patterns are parsed into a small token tree and sampled. Only the subset
//! of regex syntax that content schemas actually use is understood:
//!
//! - literals and escaped literals (`\.`, `\/`, `\-`, ...)
//! - classes `[a-z0-9_-]`, negated classes `[^/]`, shorthand `\d \w \s`, `.`
//! - groups `( )`, `(?: )`, alternation `|`
//! - quantifiers `* + ? {n} {n,} {n,m}` (lazy suffix ignored)
//! - anchors `^ $`
//!
//! Lookaround, backreferences and unicode property classes are rejected.
//! Every sample is checked with the `regex` crate before it is returned, so
//! a pattern that is only partly understood yields `None` rather than a
//! wrong string.

use rand::Rng;

/// Longest run generated for an open-ended quantifier.
const OPEN_REPEAT: usize = 4;

/// Upper bound applied to explicit `{n,m}` ranges.
const MAX_REPEAT_SPAN: usize = 8;

/// Largest repetition count accepted in `{n}`, `{n,}` or `{n,m}`.
const MAX_REPEAT_COUNT: usize = 1024;

/// Samples drawn before giving up on a pattern.
const SAMPLE_ATTEMPTS: usize = 16;

/// Printable ASCII, used to complement negated classes.
const PRINTABLE: (char, char) = ('!', '~');

/// Token grammar for pattern-driven string generation.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// A single literal character.
    Literal(char),
    /// One character from the union of inclusive ranges.
    Chars(Vec<(char, char)>),
    /// One of several alternatives.
    Pick(Vec<Token>),
    /// Tokens in sequence.
    List(Vec<Token>),
    /// `min..=max` repetitions of a token.
    Repeat {
        /// Minimum repetitions.
        min: usize,
        /// Maximum repetitions.
        max: usize,
        /// Repeated token.
        pattern: Box<Token>,
    },
}

/// Why a pattern could not be turned into a token tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedPattern {
    /// Character offset where parsing stopped.
    pub position: usize,
    /// What was not understood.
    pub reason: &'static str,
}

/// Parse `pattern` into a token tree.
pub fn parse(pattern: &str) -> Result<Token, UnsupportedPattern> {
    let mut parser = Parser {
        chars: pattern.chars().collect(),
        pos: 0,
    };
    let token = parser.alternation()?;
    if parser.pos < parser.chars.len() {
        return Err(parser.unsupported("unbalanced ')'"));
    }
    Ok(token)
}

/// Render one random string from a token tree.
pub fn render<R: Rng>(token: &Token, rng: &mut R) -> String {
    let mut out = String::new();
    render_into(token, rng, &mut out);
    out
}

fn render_into<R: Rng>(token: &Token, rng: &mut R, out: &mut String) {
    match token {
        Token::Literal(c) => out.push(*c),
        Token::Chars(ranges) => {
            if ranges.is_empty() {
                return;
            }
            let (lo, hi) = ranges[rng.gen_range(0..ranges.len())];
            let code = rng.gen_range(lo as u32..=hi as u32);
            if let Some(c) = char::from_u32(code) {
                out.push(c);
            }
        }
        Token::Pick(from) => {
            if !from.is_empty() {
                render_into(&from[rng.gen_range(0..from.len())], rng, out);
            }
        }
        Token::List(every) => {
            for t in every {
                render_into(t, rng, out);
            }
        }
        Token::Repeat { min, max, pattern } => {
            let count = rng.gen_range(*min..=(*max).max(*min));
            for _ in 0..count {
                render_into(pattern, rng, out);
            }
        }
    }
}

/// A string matching `pattern`, or `None` if the pattern uses syntax the
/// sampler does not understand or no sample matched.
pub fn sample<R: Rng>(pattern: &str, rng: &mut R) -> Option<String> {
    let token = parse(pattern).ok()?;
    let Ok(re) = regex::Regex::new(pattern) else {
        // ECMA-only syntax the regex crate rejects; trust the token tree.
        return Some(render(&token, rng));
    };
    (0..SAMPLE_ATTEMPTS)
        .map(|_| render(&token, rng))
        .find(|candidate| re.is_match(candidate))
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn unsupported(&self, reason: &'static str) -> UnsupportedPattern {
        UnsupportedPattern {
            position: self.pos,
            reason,
        }
    }

    fn alternation(&mut self) -> Result<Token, UnsupportedPattern> {
        let mut branches = vec![self.sequence()?];
        while self.peek() == Some('|') {
            self.pos += 1;
            branches.push(self.sequence()?);
        }
        Ok(if branches.len() == 1 {
            branches.remove(0)
        } else {
            Token::Pick(branches)
        })
    }

    fn sequence(&mut self) -> Result<Token, UnsupportedPattern> {
        let mut items = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            let atom = self.atom()?;
            items.push(self.quantified(atom)?);
        }
        Ok(Token::List(items))
    }

    fn quantified(&mut self, atom: Token) -> Result<Token, UnsupportedPattern> {
        let (min, max) = match self.peek() {
            Some('*') => {
                self.pos += 1;
                (0, OPEN_REPEAT)
            }
            Some('+') => {
                self.pos += 1;
                (1, OPEN_REPEAT)
            }
            Some('?') => {
                self.pos += 1;
                (0, 1)
            }
            Some('{') => self.braces()?,
            _ => return Ok(atom),
        };
        // Lazy and possessive suffixes do not change the language.
        if matches!(self.peek(), Some('?') | Some('+')) {
            self.pos += 1;
        }
        Ok(Token::Repeat {
            min,
            max,
            pattern: Box::new(atom),
        })
    }

    fn braces(&mut self) -> Result<(usize, usize), UnsupportedPattern> {
        self.pos += 1; // '{'
        let min = self
            .number()
            .ok_or_else(|| self.unsupported("expected repetition count"))?;
        if min > MAX_REPEAT_COUNT {
            return Err(self.unsupported("repetition count too large"));
        }
        let max = match self.next() {
            Some('}') => return Ok((min, min)),
            Some(',') => match self.peek() {
                Some('}') => min.saturating_add(OPEN_REPEAT),
                _ => self
                    .number()
                    .ok_or_else(|| self.unsupported("expected repetition bound"))?,
            },
            _ => return Err(self.unsupported("malformed repetition")),
        };
        if self.next() != Some('}') || max < min {
            return Err(self.unsupported("malformed repetition"));
        }
        Ok((min, max.min(min.saturating_add(MAX_REPEAT_SPAN))))
    }

    fn number(&mut self) -> Option<usize> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return None;
        }
        self.chars[start..self.pos]
            .iter()
            .collect::<String>()
            .parse()
            .ok()
    }

    fn atom(&mut self) -> Result<Token, UnsupportedPattern> {
        let Some(c) = self.next() else {
            return Err(self.unsupported("unexpected end of pattern"));
        };
        match c {
            '^' | '$' => Ok(Token::List(Vec::new())),
            '.' => Ok(Token::Chars(vec![('a', 'z'), ('0', '9')])),
            '(' => {
                if self.peek() == Some('?') {
                    self.pos += 1;
                    if self.next() != Some(':') {
                        return Err(self.unsupported("lookaround and named groups"));
                    }
                }
                let inner = self.alternation()?;
                if self.next() != Some(')') {
                    return Err(self.unsupported("unclosed group"));
                }
                Ok(inner)
            }
            '[' => self.class(),
            '\\' => self.escape(),
            '*' | '+' | '?' | '{' => Err(self.unsupported("quantifier without operand")),
            literal => Ok(Token::Literal(literal)),
        }
    }

    fn escape(&mut self) -> Result<Token, UnsupportedPattern> {
        let Some(c) = self.next() else {
            return Err(self.unsupported("dangling escape"));
        };
        Ok(match shorthand(c) {
            Some(ranges) => Token::Chars(ranges),
            None => Token::Literal(self.escaped_literal(c)?),
        })
    }

    fn escaped_literal(&mut self, c: char) -> Result<char, UnsupportedPattern> {
        match c {
            'n' => Ok('\n'),
            't' => Ok('\t'),
            'r' => Ok('\r'),
            'u' => {
                let hex: String = (0..4).filter_map(|_| self.next()).collect();
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.unsupported("malformed \\u escape"))
            }
            c if c.is_ascii_alphanumeric() => Err(self.unsupported("unknown escape")),
            c => Ok(c),
        }
    }

    fn class(&mut self) -> Result<Token, UnsupportedPattern> {
        let negated = self.peek() == Some('^');
        if negated {
            self.pos += 1;
        }
        let mut ranges = Vec::new();
        loop {
            let Some(c) = self.next() else {
                return Err(self.unsupported("unclosed class"));
            };
            let lo = match c {
                ']' => break,
                '\\' => {
                    let e = self
                        .next()
                        .ok_or_else(|| self.unsupported("dangling escape"))?;
                    if let Some(short) = shorthand(e) {
                        ranges.extend(short);
                        continue;
                    }
                    self.escaped_literal(e)?
                }
                c => c,
            };
            let is_range = self.peek() == Some('-')
                && self.chars.get(self.pos + 1).is_some_and(|&n| n != ']');
            if is_range {
                self.pos += 1;
                let hi = match self.next() {
                    Some('\\') => {
                        let e = self
                            .next()
                            .ok_or_else(|| self.unsupported("dangling escape"))?;
                        self.escaped_literal(e)?
                    }
                    Some(hi) => hi,
                    None => return Err(self.unsupported("unclosed class")),
                };
                if hi < lo {
                    return Err(self.unsupported("reversed class range"));
                }
                ranges.push((lo, hi));
            } else {
                ranges.push((lo, lo));
            }
        }

        if negated {
            ranges = complement(&ranges);
        }
        if ranges.is_empty() {
            return Err(self.unsupported("empty class"));
        }
        Ok(Token::Chars(ranges))
    }
}

fn shorthand(c: char) -> Option<Vec<(char, char)>> {
    match c {
        'd' => Some(vec![('0', '9')]),
        'w' => Some(vec![('a', 'z'), ('A', 'Z'), ('0', '9'), ('_', '_')]),
        's' => Some(vec![(' ', ' ')]),
        _ => None,
    }
}

/// Printable ASCII characters not covered by `ranges`, as singleton ranges.
fn complement(ranges: &[(char, char)]) -> Vec<(char, char)> {
    (PRINTABLE.0..=PRINTABLE.1)
        .filter(|c| !ranges.iter().any(|&(lo, hi)| (lo..=hi).contains(c)))
        .map(|c| (c, c))
        .collect()
}
