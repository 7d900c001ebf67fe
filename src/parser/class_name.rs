use crate::grammar::{Grammar, PrefixEntry, ValueGroup, pseudo};
use memchr::memchr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `>`
    Child,
    /// `_`
    Descendant,
}

impl Separator {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'>' => Some(Self::Child),
            b'_' => Some(Self::Descendant),
            _ => None,
        }
    }

    /// Combinator emitted between the parent and the class selector.
    pub fn combinator(self) -> &'static str {
        match self {
            Self::Child => ">",
            Self::Descendant => " ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentContext<'a> {
    pub parent: &'a str,
    pub pseudo: Option<&'static str>,
    pub separator: Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind<'a> {
    Fraction {
        numerator: &'a str,
        denominator: &'a str,
    },
    Hex {
        digits: &'a str,
        alpha: Option<&'a str>,
    },
    Number {
        negative: bool,
        number: &'a str,
        unit: Option<&'a str>,
    },
    Named(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body<'a> {
    Value(ValueKind<'a>),
    Params(Vec<&'a str>),
}

/// One class name accepted by the grammar, borrowed from the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMatch<'a> {
    /// Verbatim matched text.
    pub text: &'a str,
    pub parent: Option<ParentContext<'a>>,
    pub rule: usize,
    pub prefix: &'a str,
    pub body: Body<'a>,
    pub important: bool,
    /// Expanded pseudo-class, `:h` is stored as `:hover`.
    pub pseudo: Option<&'static str>,
    pub breakpoint: Option<&'a str>,
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn at(src: &'a str, pos: usize) -> Self {
        Self { src, pos }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + offset).copied()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    fn count_while(&self, max: usize, pred: impl Fn(u8) -> bool) -> usize {
        self.src.as_bytes()[self.pos..]
            .iter()
            .take(max)
            .take_while(|&&b| pred(b))
            .count()
    }
}

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_unit(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'%'
}

fn is_parent_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

pub fn match_class<'a>(grammar: &Grammar, src: &'a str) -> Option<ClassMatch<'a>> {
    match_with_parent(grammar, src).or_else(|| match_body(grammar, src, 0))
}

// Parent names are at least two characters and are tried shortest first:
// `ab_cd_D-n` reads as parent `ab` when `cd_D-n` matches, else as `ab_cd`.
fn match_with_parent<'a>(grammar: &Grammar, src: &'a str) -> Option<ClassMatch<'a>> {
    let bytes = src.as_bytes();
    if !bytes.first()?.is_ascii_alphabetic() {
        return None;
    }
    for end in 2..=bytes.len() {
        if !is_parent_char(bytes[end - 1]) {
            return None;
        }
        let mut cur = Cursor::at(src, end);
        let parent_pseudo = parse_pseudo(&mut cur);
        let Some(separator) = cur.peek().and_then(Separator::from_byte) else {
            continue;
        };
        cur.pos += 1;
        if let Some(mut found) = match_body(grammar, src, cur.pos) {
            found.parent = Some(ParentContext {
                parent: &src[..end],
                pseudo: parent_pseudo,
                separator,
            });
            return Some(found);
        }
    }
    None
}

fn match_body<'a>(grammar: &Grammar, src: &'a str, start: usize) -> Option<ClassMatch<'a>> {
    for entry in grammar.patterns() {
        let mut cur = Cursor::at(src, start);
        if !cur.eat_str(&entry.prefix) || !cur.eat(b'-') {
            continue;
        }
        let value = match entry.group {
            ValueGroup::SuffixValue => parse_value(&mut cur),
            _ => parse_named_value(&mut cur),
        };
        if let Some(value) = value {
            return Some(finish(src, start, cur, entry, Body::Value(value)));
        }
    }
    for entry in grammar.helpers() {
        let mut cur = Cursor::at(src, start);
        if !cur.eat_str(&entry.prefix) || !cur.eat(b'(') {
            continue;
        }
        if let Some(params) = parse_params(&mut cur) {
            return Some(finish(src, start, cur, entry, Body::Params(params)));
        }
    }
    None
}

fn finish<'a>(
    src: &'a str,
    start: usize,
    mut cur: Cursor<'a>,
    entry: &PrefixEntry,
    body: Body<'a>,
) -> ClassMatch<'a> {
    let important = cur.eat(b'!');
    let pseudo = parse_pseudo(&mut cur);
    let breakpoint = parse_breakpoint(&mut cur);
    ClassMatch {
        text: &src[..cur.pos],
        parent: None,
        rule: entry.rule,
        prefix: &src[start..start + entry.prefix.len()],
        body,
        important,
        pseudo,
        breakpoint,
    }
}

fn parse_value<'a>(cur: &mut Cursor<'a>) -> Option<ValueKind<'a>> {
    let start = cur.pos;
    let parsers: [fn(&mut Cursor<'a>) -> Option<ValueKind<'a>>; 4] = [
        |c| parse_fraction(c),
        |c| parse_hex(c),
        |c| parse_number(c),
        |c| parse_named_value(c),
    ];
    for parse in parsers {
        cur.pos = start;
        if let Some(value) = parse(cur) {
            return Some(value);
        }
    }
    cur.pos = start;
    None
}

fn parse_fraction<'a>(cur: &mut Cursor<'a>) -> Option<ValueKind<'a>> {
    let numerator = cur.eat_while(|b| b.is_ascii_digit());
    if numerator.is_empty() || !cur.eat(b'/') {
        return None;
    }
    if !matches!(cur.peek(), Some(b'1'..=b'9')) {
        return None;
    }
    let denominator = cur.eat_while(|b| b.is_ascii_digit());
    Some(ValueKind::Fraction {
        numerator,
        denominator,
    })
}

// Tries 6 digits before 3, and a two digit alpha before a one digit alpha
// before none. A candidate followed by a unit character is rejected.
fn parse_hex<'a>(cur: &mut Cursor<'a>) -> Option<ValueKind<'a>> {
    if !cur.eat(b'#') {
        return None;
    }
    let start = cur.pos;
    let available = cur.count_while(6, |b| b.is_ascii_hexdigit());
    for len in [6, 3] {
        if available < len {
            continue;
        }
        let digits = &cur.src[start..start + len];
        let after_digits = start + len;
        cur.pos = after_digits;
        let alpha_digits = if cur.eat(b'.') {
            cur.count_while(2, |b| b.is_ascii_digit())
        } else {
            0
        };
        for alpha_len in (0..=alpha_digits).rev() {
            let end = if alpha_len == 0 {
                after_digits
            } else {
                after_digits + 1 + alpha_len
            };
            cur.pos = end;
            if cur.peek().is_some_and(is_unit) {
                continue;
            }
            let alpha = (alpha_len > 0).then(|| &cur.src[after_digits..end]);
            return Some(ValueKind::Hex { digits, alpha });
        }
    }
    None
}

fn parse_number<'a>(cur: &mut Cursor<'a>) -> Option<ValueKind<'a>> {
    let negative = cur.eat_str("neg");
    let start = cur.pos;
    if cur.eat_while(|b| b.is_ascii_digit()).is_empty() {
        return None;
    }
    if cur.peek() == Some(b'.') && cur.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
        cur.pos += 1;
        cur.eat_while(|b| b.is_ascii_digit());
    }
    let number = &cur.src[start..cur.pos];
    let unit = cur.eat_while(is_unit);
    Some(ValueKind::Number {
        negative,
        number,
        unit: (!unit.is_empty()).then_some(unit),
    })
}

fn parse_named_value<'a>(cur: &mut Cursor<'a>) -> Option<ValueKind<'a>> {
    parse_named(cur).map(ValueKind::Named)
}

// Word characters with single internal hyphens; `--` starts a breakpoint.
fn parse_named<'a>(cur: &mut Cursor<'a>) -> Option<&'a str> {
    let start = cur.pos;
    if cur.eat_while(is_word).is_empty() {
        return None;
    }
    while cur.peek() == Some(b'-') && cur.peek_at(1).is_some_and(is_word) {
        cur.pos += 1;
        cur.eat_while(is_word);
    }
    Some(&cur.src[start..cur.pos])
}

// Params end at the first `)` on the same line.
fn parse_params<'a>(cur: &mut Cursor<'a>) -> Option<Vec<&'a str>> {
    let rest = cur.rest();
    let close = memchr(b')', rest.as_bytes())?;
    let inner = &rest[..close];
    if inner.contains('\n') {
        return None;
    }
    cur.pos += close + 1;
    if inner.is_empty() {
        return Some(Vec::new());
    }
    Some(inner.split(',').collect())
}

fn parse_pseudo(cur: &mut Cursor<'_>) -> Option<&'static str> {
    if cur.peek() != Some(b':') {
        return None;
    }
    let bytes = cur.src.as_bytes();
    let mut ends = Vec::new();
    let mut i = cur.pos + 1;
    loop {
        let seg = bytes[i..].iter().take_while(|b| b.is_ascii_lowercase()).count();
        if seg == 0 {
            break;
        }
        i += seg;
        ends.push(i);
        if bytes.get(i) != Some(&b'-') {
            break;
        }
        i += 1;
    }
    for &end in ends.iter().rev() {
        if let Some(full) = pseudo::expand(&cur.src[cur.pos..end]) {
            cur.pos = end;
            return Some(full);
        }
    }
    None
}

fn parse_breakpoint<'a>(cur: &mut Cursor<'a>) -> Option<&'a str> {
    if !cur.rest().starts_with("--") {
        return None;
    }
    let key_len = cur.src.as_bytes()[cur.pos + 2..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if key_len == 0 {
        return None;
    }
    cur.pos += 2;
    let start = cur.pos;
    cur.pos += key_len;
    Some(&cur.src[start..cur.pos])
}
