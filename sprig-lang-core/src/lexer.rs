use thiserror::Error;

/// 1-based source position of a token's first character.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    Number,
    Identifier,
    Equals,
    OpenParen,
    CloseParen,
    Comma,
    Colon,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    BinaryOperator,
    Let,
    Const,
    Fn,
    SemiColon,
    Dot,
    EndOfInput,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum LexError {
    #[error("unrecognized character {character:?} at {line}:{column}")]
    UnrecognizedCharacter {
        character: char,
        line: u32,
        column: u32,
    },
}

static KEYWORDS: phf::Map<&str, TokenKind> = phf::phf_map! {
    "let" => TokenKind::Let,
    "const" => TokenKind::Const,
    "fn" => TokenKind::Fn,
};

/// A character counts as alphabetic when its uppercase and lowercase forms
/// differ. Digits and `_` are not identifier characters, while cased
/// non-ASCII letters are.
fn is_alpha(ch: char) -> bool {
    !ch.to_uppercase().eq(ch.to_lowercase())
}

fn is_skippable(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

/// Converts source text into tokens. The result is never empty: it always
/// ends with exactly one `EndOfInput` token (empty text).
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    tokens.push(Token {
        text: String::new(),
        kind: TokenKind::EndOfInput,
        span: lexer.position(),
    });

    Ok(tokens)
}

struct Lexer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            iter: input.char_indices().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn position(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
        }
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let (idx, ch) = self.iter.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some((idx, ch))
    }

    fn bump_if(&mut self, pred: impl Fn(char) -> bool) -> Option<(usize, char)> {
        let &(_, ch) = self.iter.peek()?;
        if pred(ch) {
            self.bump()
        } else {
            None
        }
    }

    /// Byte offset of the next unconsumed character.
    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }

    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        while self.bump_if(is_skippable).is_some() {}

        let span = self.position();
        let Some(&(idx, ch)) = self.iter.peek() else {
            return Ok(None);
        };

        let kind = match ch {
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            '+' | '-' | '*' | '/' | '%' => TokenKind::BinaryOperator,
            '=' => TokenKind::Equals,
            ';' => TokenKind::SemiColon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            c if c.is_ascii_digit() => return Ok(Some(self.read_number(span))),
            c if is_alpha(c) => return Ok(Some(self.read_identifier(span))),
            c => {
                return Err(LexError::UnrecognizedCharacter {
                    character: c,
                    line: span.line,
                    column: span.column,
                })
            }
        };

        self.bump();
        Ok(Some(Token {
            text: self.input[idx..self.next_idx()].to_owned(),
            kind,
            span,
        }))
    }

    /// Longest prefix of ASCII digits with at most one decimal point. The
    /// text stays uninterpreted here; the parser converts it to f64.
    fn read_number(&mut self, span: Span) -> Token {
        let (start, _) = self.bump().expect("read_number called at a digit");
        let mut seen_dot = false;
        while let Some((_, ch)) =
            self.bump_if(|ch| ch.is_ascii_digit() || (ch == '.' && !seen_dot))
        {
            if ch == '.' {
                seen_dot = true;
            }
        }

        let end = self.next_idx();
        Token {
            text: self.input[start..end].to_owned(),
            kind: TokenKind::Number,
            span,
        }
    }

    fn read_identifier(&mut self, span: Span) -> Token {
        let (start, _) = self.bump().expect("read_identifier called at a letter");
        while self.bump_if(is_alpha).is_some() {}

        let end = self.next_idx();
        let text = &self.input[start..end];
        Token {
            text: text.to_owned(),
            kind: KEYWORDS
                .get(text)
                .copied()
                .unwrap_or(TokenKind::Identifier),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_single_characters() {
        use TokenKind::*;
        let input = "()[]{},:;.=";
        assert_eq!(
            kinds(input),
            vec![
                OpenParen,
                CloseParen,
                OpenBracket,
                CloseBracket,
                OpenBrace,
                CloseBrace,
                Comma,
                Colon,
                SemiColon,
                Dot,
                Equals,
                EndOfInput,
            ]
        );
    }

    #[test]
    fn test_operators_keep_their_text() {
        let tokens = tokenize("+ - * / %").unwrap();
        let texts: Vec<&str> = tokens.iter().map(|token| token.text.as_str()).collect();
        assert_eq!(texts, vec!["+", "-", "*", "/", "%", ""]);
        assert!(tokens[..5]
            .iter()
            .all(|token| token.kind == TokenKind::BinaryOperator));
    }

    #[test]
    fn test_declaration() {
        use TokenKind::*;
        let tokens = tokenize("let x = 45;").unwrap();
        let expected = vec![
            ("let", Let),
            ("x", Identifier),
            ("=", Equals),
            ("45", Number),
            (";", SemiColon),
            ("", EndOfInput),
        ];
        let actual: Vec<(&str, TokenKind)> = tokens
            .iter()
            .map(|token| (token.text.as_str(), token.kind))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_keywords() {
        use TokenKind::*;
        assert_eq!(
            kinds("let const fn lets fnx"),
            vec![Let, Const, Fn, Identifier, Identifier, EndOfInput]
        );
    }

    #[test]
    fn test_number_with_single_decimal_point() {
        let tokens = tokenize("3.14").unwrap();
        assert_eq!(tokens[0].text, "3.14");
        assert_eq!(tokens[0].kind, TokenKind::Number);

        // A second dot ends the number; the rest lexes separately.
        use TokenKind::*;
        assert_eq!(kinds("1.2.3"), vec![Number, Dot, Number, EndOfInput]);

        // A leading dot is a Dot token, not part of a number.
        assert_eq!(kinds(".5"), vec![Dot, Number, EndOfInput]);
    }

    #[test]
    fn test_identifiers_are_purely_alphabetic() {
        use TokenKind::*;
        // Digits and underscores terminate an identifier.
        assert_eq!(kinds("x1"), vec![Identifier, Number, EndOfInput]);
        // Cased non-ASCII letters are identifier characters.
        let tokens = tokenize("école").unwrap();
        assert_eq!(tokens[0].kind, Identifier);
        assert_eq!(tokens[0].text, "école");
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("let x =\n  5;").unwrap();
        let spans: Vec<(u32, u32)> = tokens
            .iter()
            .map(|token| (token.span.line, token.span.column))
            .collect();
        assert_eq!(
            spans,
            vec![(1, 1), (1, 5), (1, 7), (2, 3), (2, 4), (2, 5)]
        );
    }

    #[test]
    fn test_unrecognized_character() {
        assert_eq!(
            tokenize("let x = @"),
            Err(LexError::UnrecognizedCharacter {
                character: '@',
                line: 1,
                column: 9,
            })
        );
    }

    #[test]
    fn test_relex_is_idempotent_up_to_whitespace() {
        let input = "let total = base + rate * 1.5; fn f(a, b) { a.b[c] % 2 }";
        let tokens = tokenize(input).unwrap();
        let joined = tokens
            .iter()
            .map(|token| token.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let relexed = tokenize(&joined).unwrap();

        let first: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
        let second: Vec<TokenKind> = relexed.iter().map(|token| token.kind).collect();
        assert_eq!(first, second);
    }
}
