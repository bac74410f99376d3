use thiserror::Error;

use crate::ast::Formula;

/// Failures of the formula tokenizer and parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid character '{0}' in formula")]
    InvalidCharacter(char),
    #[error("unexpected end of formula")]
    UnexpectedEnd,
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("expected closing parenthesis")]
    MissingClosingParen,
    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Not,
    And,
    Or,
    Implies,
    Biconditional,
    LeftParen,
    RightParen,
    Ident(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Not => write!(f, "¬"),
            Token::And => write!(f, "∧"),
            Token::Or => write!(f, "∨"),
            Token::Implies => write!(f, "→"),
            Token::Biconditional => write!(f, "↔"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Ident(name) => write!(f, "{}", name),
        }
    }
}

/// Splits a formula string into tokens. Accepts the Unicode operators
/// `¬∧∨→↔` as well as the ASCII aliases `not`, `and`, `or`, `->` and
/// `<->`. Identifiers start with a letter and continue alphanumerically.
fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            _ if c.is_whitespace() => i += 1,
            '¬' => {
                tokens.push(Token::Not);
                i += 1;
            }
            '∧' => {
                tokens.push(Token::And);
                i += 1;
            }
            '∨' => {
                tokens.push(Token::Or);
                i += 1;
            }
            '→' => {
                tokens.push(Token::Implies);
                i += 1;
            }
            '↔' => {
                tokens.push(Token::Biconditional);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LeftParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RightParen);
                i += 1;
            }
            '-' if chars.get(i + 1) == Some(&'>') => {
                tokens.push(Token::Implies);
                i += 2;
            }
            '<' if chars.get(i + 1) == Some(&'-') && chars.get(i + 2) == Some(&'>') => {
                tokens.push(Token::Biconditional);
                i += 3;
            }
            _ if c.is_alphabetic() => {
                let mut name = String::new();
                while i < chars.len() && chars[i].is_alphanumeric() {
                    name.push(chars[i]);
                    i += 1;
                }
                tokens.push(match name.as_str() {
                    "not" => Token::Not,
                    "and" => Token::And,
                    "or" => Token::Or,
                    _ => Token::Ident(name),
                });
            }
            _ => return Err(ParseError::InvalidCharacter(c)),
        }
    }

    Ok(tokens)
}

/// Recursive descent over the token stream, one method per precedence
/// tier. From tightest to loosest: ¬, ∧, ∨, →, ↔. Implication is
/// right-associative, biconditional left-associative.
struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Parser {
        Parser {
            tokens,
            position: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn consume(&mut self) -> Result<Token, ParseError> {
        let token = self
            .tokens
            .get(self.position)
            .cloned()
            .ok_or(ParseError::UnexpectedEnd)?;
        self.position += 1;
        Ok(token)
    }

    fn parse_biconditional(&mut self) -> Result<Formula, ParseError> {
        let mut left = self.parse_implication()?;

        while self.peek() == Some(&Token::Biconditional) {
            self.consume()?;
            let right = self.parse_implication()?;
            left = Formula::biconditional(left, right);
        }

        Ok(left)
    }

    fn parse_implication(&mut self) -> Result<Formula, ParseError> {
        let left = self.parse_or()?;

        if self.peek() == Some(&Token::Implies) {
            self.consume()?;
            let right = self.parse_implication()?;
            return Ok(Formula::implies(left, right));
        }

        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Formula, ParseError> {
        let mut left = self.parse_and()?;

        while self.peek() == Some(&Token::Or) {
            self.consume()?;
            let right = self.parse_and()?;
            left = Formula::or(left, right);
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Formula, ParseError> {
        let mut left = self.parse_not()?;

        while self.peek() == Some(&Token::And) {
            self.consume()?;
            let right = self.parse_not()?;
            left = Formula::and(left, right);
        }

        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Formula, ParseError> {
        if self.peek() == Some(&Token::Not) {
            self.consume()?;
            let operand = self.parse_not()?;
            return Ok(Formula::not(operand));
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Formula, ParseError> {
        match self.consume()? {
            Token::LeftParen => {
                let formula = self.parse_biconditional()?;
                match self.consume() {
                    Ok(Token::RightParen) => Ok(formula),
                    _ => Err(ParseError::MissingClosingParen),
                }
            }
            Token::Ident(name) => Ok(Formula::Var(name)),
            token => Err(ParseError::UnexpectedToken(token.to_string())),
        }
    }
}

/// Parses a formula string into its AST.
pub fn parse_formula(input: &str) -> Result<Formula, ParseError> {
    let mut parser = Parser::new(tokenize(input)?);
    let formula = parser.parse_biconditional()?;
    if let Some(token) = parser.peek() {
        return Err(ParseError::TrailingInput(token.to_string()));
    }
    Ok(formula)
}
