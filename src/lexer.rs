//! PQL lexer

use crate::token::{Span, Token, TokenKind};

pub struct Lexer<'a> {
    input: &'a str,
    /// Current position in the input (byte offset)
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, position: 0 }
    }

    /// Returns the character at the current position without advancing
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Returns the character after the current one without advancing
    fn peek_next(&self) -> Option<char> {
        self.input[self.position..].chars().nth(1)
    }

    /// Advances one character and returns it
    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn token(&self, kind: TokenKind<'a>, start: usize) -> Token<'a> {
        Token { kind, span: Span::new(start, self.position) }
    }

    /// Length in bytes of an exponent suffix (`e7`, `E+21`, `e-7`) at the current position,
    /// or 0 when there is none.
    fn exponent_len(&self) -> usize {
        let rest = self.input[self.position..].as_bytes();
        if !matches!(rest.first(), Some(b'e' | b'E')) {
            return 0;
        }
        let sign = usize::from(matches!(rest.get(1), Some(b'+' | b'-')));
        let digits = rest[1 + sign..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            0
        } else {
            1 + sign + digits
        }
    }

    /// Reads an integer or decimal literal. A leading dash, if any, was consumed by the caller.
    fn read_number(&mut self, start: usize) -> Token<'a> {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }

        let mut is_decimal = false;
        if self.peek() == Some('.') && matches!(self.peek_next(), Some(c) if c.is_ascii_digit()) {
            is_decimal = true;
            self.bump();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }

        let exponent = self.exponent_len();
        if exponent > 0 {
            is_decimal = true;
            self.position += exponent;
        }

        let literal = &self.input[start..self.position];
        let kind = if is_decimal {
            literal.parse::<f64>().map(TokenKind::Decimal).unwrap_or(TokenKind::Illegal)
        } else {
            // Integers beyond i64 still read back, as the nearest f64
            literal
                .parse::<i64>()
                .map(TokenKind::Integer)
                .or_else(|_| literal.parse::<f64>().map(TokenKind::Decimal))
                .unwrap_or(TokenKind::Illegal)
        };
        self.token(kind, start)
    }

    /// Reads a quoted string. The opening quote has already been consumed.
    fn read_string(&mut self, start: usize, quote: char) -> Token<'a> {
        let mut content = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some(escaped) => content.push(escaped),
                    None => return self.token(TokenKind::Illegal, start),
                },
                Some(c) if c == quote => return self.token(TokenKind::String(content), start),
                Some(c) => content.push(c),
                None => return self.token(TokenKind::Illegal, start),
            }
        }
    }

    /// Reads an identifier. Identifiers may contain letters, digits, underscores and dots.
    fn read_identifier(&mut self, start: usize) -> Token<'a> {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                self.bump();
            } else {
                break;
            }
        }
        let literal = &self.input[start..self.position];
        self.token(TokenKind::Identifier(literal), start)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        let start = self.position;

        let c = self.bump()?;

        let token = match c {
            '(' => self.token(TokenKind::LParen, start),
            ')' => self.token(TokenKind::RParen, start),
            ',' => self.token(TokenKind::Comma, start),
            '*' => self.token(TokenKind::Star, start),
            '+' => self.token(TokenKind::Plus, start),
            '-' => {
                if matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.read_number(start)
                } else {
                    self.token(TokenKind::Dash, start)
                }
            }
            '"' | '\'' => self.read_string(start, c),
            c if c.is_ascii_digit() => self.read_number(start),
            c if c.is_alphabetic() || c == '_' => self.read_identifier(start),
            _ => self.token(TokenKind::Illegal, start),
        };
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind<'_>> {
        Lexer::new(input).map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_predicate() {
        let input = r#"eq(donor.gender,"male")"#;
        let mut lexer = Lexer::new(input);

        assert_eq!(lexer.next().unwrap().kind, TokenKind::Identifier("eq"));
        assert_eq!(lexer.next().unwrap().kind, TokenKind::LParen);
        assert_eq!(lexer.next().unwrap().kind, TokenKind::Identifier("donor.gender"));
        assert_eq!(lexer.next().unwrap().kind, TokenKind::Comma);
        assert_eq!(lexer.next().unwrap().kind, TokenKind::String("male".to_string()));
        assert_eq!(lexer.next().unwrap().kind, TokenKind::RParen);
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("( ) , * + -"),
            vec![
                TokenKind::LParen, TokenKind::RParen, TokenKind::Comma,
                TokenKind::Star, TokenKind::Plus, TokenKind::Dash,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("123 -45 2.51 -0.5"),
            vec![
                TokenKind::Integer(123),
                TokenKind::Integer(-45),
                TokenKind::Decimal(2.51),
                TokenKind::Decimal(-0.5),
            ]
        );
    }

    #[test]
    fn test_exponents_and_wide_integers() {
        assert_eq!(
            kinds("1e21 1e+21 -1E-7 2.5e3 10000000000000000000"),
            vec![
                TokenKind::Decimal(1e21),
                TokenKind::Decimal(1e21),
                TokenKind::Decimal(-1e-7),
                TokenKind::Decimal(2500.0),
                TokenKind::Decimal(1e19),
            ]
        );
    }

    #[test]
    fn test_dangling_exponent_is_not_part_of_the_number() {
        assert_eq!(
            kinds("1e 2e+"),
            vec![
                TokenKind::Integer(1),
                TokenKind::Identifier("e"),
                TokenKind::Integer(2),
                TokenKind::Identifier("e"),
                TokenKind::Plus,
            ]
        );
    }

    #[test]
    fn test_strings_with_both_quotes_and_escapes() {
        assert_eq!(
            kinds(r#""hello world" 'G1' "say \"hi\"""#),
            vec![
                TokenKind::String("hello world".to_string()),
                TokenKind::String("G1".to_string()),
                TokenKind::String("say \"hi\"".to_string()),
            ]
        );
    }

    #[test]
    fn test_unterminated_string_is_illegal() {
        assert_eq!(kinds(r#""open"#), vec![TokenKind::Illegal]);
    }

    #[test]
    fn test_sort_directions() {
        assert_eq!(
            kinds("sort(+donor.age,-gene.id,type)"),
            vec![
                TokenKind::Identifier("sort"),
                TokenKind::LParen,
                TokenKind::Plus,
                TokenKind::Identifier("donor.age"),
                TokenKind::Comma,
                TokenKind::Dash,
                TokenKind::Identifier("gene.id"),
                TokenKind::Comma,
                TokenKind::Identifier("type"),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_spans() {
        let tokens: Vec<_> = Lexer::new("eq( a.b").collect();
        assert_eq!(tokens[0].span, Span::new(0, 2));
        assert_eq!(tokens[2].span, Span::new(4, 7));
    }

    #[test]
    fn test_illegal_character() {
        assert_eq!(kinds("eq;"), vec![TokenKind::Identifier("eq"), TokenKind::Illegal]);
    }
}
