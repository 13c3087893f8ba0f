//! Restricted conductivity formulas `k(T)`.
//!
//! A formula is parsed once into a small expression tree and evaluated for
//! every trial temperature of a solve. The grammar knows numeric literals,
//! the variable `T` (°C), the operators `+ - * / **`, parentheses and the
//! functions `exp`, `log`, `sqrt` and `pow`. Catalog formulas written as
//! `math.exp(...)` are accepted; no other qualifier or identifier is.
//! Nesting (parentheses, signs, call arguments, operator chains) is capped at
//! [`MAX_NESTING`] so the tree can always be parsed and evaluated recursively.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('**' unary)?
//! primary := NUMBER | 'T' | call | '(' expr ')'
//! call    := ['math' '.'] IDENT '(' expr (',' expr)* ')'
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FormulaError, FormulaResult};

/// Deepest expression tree the parser accepts.
pub const MAX_NESTING: usize = 256;

/// Binary operators of the formula grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Whitelisted math functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Exp,
    /// Natural log, or log with an explicit base as second argument.
    Log,
    Sqrt,
    Pow,
}

impl Function {
    fn lookup(name: &str) -> Option<Self> {
        match name {
            "exp" => Some(Self::Exp),
            "log" => Some(Self::Log),
            "sqrt" => Some(Self::Sqrt),
            "pow" => Some(Self::Pow),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Sqrt => "sqrt",
            Self::Pow => "pow",
        }
    }

    fn check_arity(self, found: usize) -> FormulaResult<()> {
        let (ok, expected) = match self {
            Self::Exp | Self::Sqrt => (found == 1, "1"),
            Self::Log => (found == 1 || found == 2, "1 or 2"),
            Self::Pow => (found == 2, "2"),
        };
        if ok {
            Ok(())
        } else {
            Err(FormulaError::Arity {
                func: self.name(),
                expected,
                found,
            })
        }
    }

    fn apply(self, args: &[f64]) -> FormulaResult<f64> {
        match (self, args) {
            (Self::Exp, [x]) => Ok(x.exp()),
            (Self::Sqrt, [x]) => {
                if *x < 0.0 {
                    return Err(FormulaError::Domain {
                        what: "sqrt",
                        value: *x,
                    });
                }
                Ok(x.sqrt())
            }
            (Self::Log, [x, rest @ ..]) => {
                if *x <= 0.0 {
                    return Err(FormulaError::Domain {
                        what: "log",
                        value: *x,
                    });
                }
                match rest {
                    [] => Ok(x.ln()),
                    [base] if *base > 0.0 && *base != 1.0 => Ok(x.ln() / base.ln()),
                    [base] => Err(FormulaError::Domain {
                        what: "log base",
                        value: *base,
                    }),
                    _ => Err(FormulaError::Arity {
                        func: self.name(),
                        expected: "1 or 2",
                        found: args.len(),
                    }),
                }
            }
            (Self::Pow, [base, exponent]) => power(*base, *exponent),
            _ => Err(FormulaError::Arity {
                func: self.name(),
                expected: match self {
                    Self::Log => "1 or 2",
                    Self::Pow => "2",
                    _ => "1",
                },
                found: args.len(),
            }),
        }
    }
}

fn power(base: f64, exponent: f64) -> FormulaResult<f64> {
    if base == 0.0 && exponent < 0.0 {
        return Err(FormulaError::Domain {
            what: "power",
            value: base,
        });
    }
    // Fractional powers of negative numbers have no real value.
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(FormulaError::Domain {
            what: "power",
            value: base,
        });
    }
    Ok(base.powf(exponent))
}

/// Parsed formula tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    /// The free variable `T`.
    Temperature,
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: Function,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Evaluate the tree at temperature `t` (°C).
    pub fn eval(&self, t: f64) -> FormulaResult<f64> {
        match self {
            Self::Number(v) => Ok(*v),
            Self::Temperature => Ok(t),
            Self::Neg(inner) => Ok(-inner.eval(t)?),
            Self::Binary { op, lhs, rhs } => {
                let a = lhs.eval(t)?;
                let b = rhs.eval(t)?;
                match op {
                    BinaryOp::Add => Ok(a + b),
                    BinaryOp::Sub => Ok(a - b),
                    BinaryOp::Mul => Ok(a * b),
                    BinaryOp::Div => {
                        if b == 0.0 {
                            return Err(FormulaError::Domain {
                                what: "division",
                                value: a,
                            });
                        }
                        Ok(a / b)
                    }
                    BinaryOp::Pow => power(a, b),
                }
            }
            Self::Call { func, args } => {
                let values = args
                    .iter()
                    .map(|arg| arg.eval(t))
                    .collect::<FormulaResult<Vec<_>>>()?;
                func.apply(&values)
            }
        }
    }

    /// True if the tree never reads `T`.
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Number(_) => true,
            Self::Temperature => false,
            Self::Neg(inner) => inner.is_constant(),
            Self::Binary { lhs, rhs, .. } => lhs.is_constant() && rhs.is_constant(),
            Self::Call { args, .. } => args.iter().all(Expr::is_constant),
        }
    }
}

/// Rewrite decimal commas (`0,05`) to points.
///
/// Only a comma sitting directly between two digits is treated as a decimal
/// separator; every other comma stays an argument separator, so
/// `pow(T, 2)` keeps its meaning while `pow(2,3)` reads as `pow(2.3)`.
pub fn normalize_decimal_commas(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let between_digits = c == ','
                && i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            if between_digits { '.' } else { c }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    LParen,
    RParen,
    Comma,
    Dot,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            Self::Number(v) => format!("number {v}"),
            Self::Ident(name) => format!("identifier '{name}'"),
            Self::Plus => "'+'".into(),
            Self::Minus => "'-'".into(),
            Self::Star => "'*'".into(),
            Self::DoubleStar => "'**'".into(),
            Self::Slash => "'/'".into(),
            Self::LParen => "'('".into(),
            Self::RParen => "')'".into(),
            Self::Comma => "','".into(),
            Self::Dot => "'.'".into(),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    pos: usize,
}

fn tokenize(source: &str) -> FormulaResult<Vec<Token>> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let starts_number =
            c.is_ascii_digit() || (c == '.' && next.is_some_and(|n| n.is_ascii_digit()));
        if starts_number {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let after = chars.get(i + 1).copied();
                let after_sign = chars.get(i + 2).copied();
                let has_exponent = after.is_some_and(|a| a.is_ascii_digit())
                    || (matches!(after, Some('+') | Some('-'))
                        && after_sign.is_some_and(|a| a.is_ascii_digit()));
                if has_exponent {
                    i += 2;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let text: String = chars[start..i].iter().collect();
            let value = text
                .parse::<f64>()
                .map_err(|_| FormulaError::InvalidNumber {
                    text: text.clone(),
                    pos: start,
                })?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                pos: start,
            });
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident(chars[start..i].iter().collect()),
                pos: start,
            });
            continue;
        }

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' if next == Some('*') => {
                i += 1;
                TokenKind::DoubleStar
            }
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            other => return Err(FormulaError::UnexpectedChar { ch: other, pos: i }),
        };
        let pos = if kind == TokenKind::DoubleStar { i - 1 } else { i };
        tokens.push(Token { kind, pos });
        i += 1;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    depth: usize,
}

impl Parser {
    fn descend(&mut self) -> FormulaResult<()> {
        if self.depth >= MAX_NESTING {
            return Err(FormulaError::TooDeep { limit: MAX_NESTING });
        }
        self.depth += 1;
        Ok(())
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self) -> FormulaResult<Expr>) -> FormulaResult<Expr> {
        self.descend()?;
        let expr = f(self)?;
        self.depth -= 1;
        Ok(expr)
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.cursor).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn expect(&mut self, expected: TokenKind) -> FormulaResult<()> {
        match self.advance() {
            Some(token) if token.kind == expected => Ok(()),
            Some(token) => Err(FormulaError::UnexpectedToken {
                found: token.kind.describe(),
                pos: token.pos,
            }),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }

    fn parse_expr(&mut self) -> FormulaResult<Expr> {
        let entered = self.depth;
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => {
                    self.depth = entered;
                    return Ok(lhs);
                }
            };
            self.cursor += 1;
            // Each link of a chain deepens the left-leaning tree by one.
            self.descend()?;
            let rhs = self.parse_term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_term(&mut self) -> FormulaResult<Expr> {
        let entered = self.depth;
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                _ => {
                    self.depth = entered;
                    return Ok(lhs);
                }
            };
            self.cursor += 1;
            self.descend()?;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_unary(&mut self) -> FormulaResult<Expr> {
        match self.peek() {
            Some(TokenKind::Minus) => {
                self.cursor += 1;
                let inner = self.nested(Self::parse_unary)?;
                Ok(Expr::Neg(Box::new(inner)))
            }
            Some(TokenKind::Plus) => {
                self.cursor += 1;
                self.nested(Self::parse_unary)
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> FormulaResult<Expr> {
        let base = self.parse_primary()?;
        if self.peek() == Some(&TokenKind::DoubleStar) {
            self.cursor += 1;
            // Right operand is a unary so `2**-1` and `2**3**2` parse as expected.
            let exponent = self.nested(Self::parse_unary)?;
            return Ok(Expr::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> FormulaResult<Expr> {
        let token = self.advance().ok_or(FormulaError::UnexpectedEnd)?;
        match token.kind {
            TokenKind::Number(v) => Ok(Expr::Number(v)),
            TokenKind::LParen => {
                let inner = self.nested(Self::parse_expr)?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(name) => self.parse_identifier(name, token.pos),
            other => Err(FormulaError::UnexpectedToken {
                found: other.describe(),
                pos: token.pos,
            }),
        }
    }

    fn parse_identifier(&mut self, name: String, pos: usize) -> FormulaResult<Expr> {
        if name == "T" {
            return Ok(Expr::Temperature);
        }

        let (func_name, func_pos) = if name == "math" && self.peek() == Some(&TokenKind::Dot) {
            self.cursor += 1;
            match self.advance() {
                Some(Token {
                    kind: TokenKind::Ident(inner),
                    pos,
                }) => (inner, pos),
                Some(token) => {
                    return Err(FormulaError::UnexpectedToken {
                        found: token.kind.describe(),
                        pos: token.pos,
                    });
                }
                None => return Err(FormulaError::UnexpectedEnd),
            }
        } else {
            (name, pos)
        };

        if self.peek() != Some(&TokenKind::LParen) {
            return Err(FormulaError::UnknownIdentifier {
                name: func_name,
                pos: func_pos,
            });
        }

        let func = Function::lookup(&func_name).ok_or_else(|| FormulaError::UnknownFunction {
            name: func_name.clone(),
            pos: func_pos,
        })?;

        self.cursor += 1;
        let mut args = Vec::new();
        if self.peek() != Some(&TokenKind::RParen) {
            loop {
                args.push(self.nested(Self::parse_expr)?);
                if self.peek() == Some(&TokenKind::Comma) {
                    self.cursor += 1;
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        func.check_arity(args.len())?;

        Ok(Expr::Call { func, args })
    }
}

/// Parse a formula into its expression tree.
pub fn parse(source: &str) -> FormulaResult<Expr> {
    let normalized = normalize_decimal_commas(source);
    if normalized.trim().is_empty() {
        return Err(FormulaError::Empty);
    }

    let mut parser = Parser {
        tokens: tokenize(&normalized)?,
        cursor: 0,
        depth: 0,
    };
    let expr = parser.parse_expr()?;

    if let Some(token) = parser.advance() {
        return Err(FormulaError::UnexpectedToken {
            found: token.kind.describe(),
            pos: token.pos,
        });
    }

    Ok(expr)
}

/// Thermal conductivity `k(T)` in W/(m·K) as a function of temperature in °C.
///
/// Keeps the source text for display and serialization; serializes as that
/// string and re-parses on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConductivityFunction {
    source: String,
    expr: Expr,
}

impl ConductivityFunction {
    pub fn parse(source: &str) -> FormulaResult<Self> {
        Ok(Self {
            expr: parse(source)?,
            source: source.trim().to_string(),
        })
    }

    /// Temperature-independent conductivity.
    pub fn constant(k: f64) -> Self {
        Self {
            source: format!("{k}"),
            expr: Expr::Number(k),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Evaluate `k` at `temperature_c`. Non-positive results are returned as-is.
    pub fn evaluate(&self, temperature_c: f64) -> FormulaResult<f64> {
        let k = self.expr.eval(temperature_c)?;
        if !k.is_finite() {
            return Err(FormulaError::NonFinite {
                temperature: temperature_c,
            });
        }
        Ok(k)
    }
}

impl FromStr for ConductivityFunction {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ConductivityFunction {
    type Error = FormulaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ConductivityFunction> for String {
    fn from(value: ConductivityFunction) -> Self {
        value.source
    }
}

impl fmt::Display for ConductivityFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(source: &str, t: f64) -> f64 {
        ConductivityFunction::parse(source)
            .unwrap()
            .evaluate(t)
            .unwrap()
    }

    fn assert_close(got: f64, expected: f64) {
        assert!(
            (got - expected).abs() <= 1e-12 * (1.0 + expected.abs()),
            "got {got}, expected {expected}"
        );
    }

    #[test]
    fn constant_and_scientific_literals() {
        assert_eq!(k("0.05", 300.0), 0.05);
        assert_eq!(k("4.2e-2", 0.0), 0.042);
        assert_eq!(k("2E+1", 0.0), 20.0);
        assert_eq!(k(".5", 0.0), 0.5);
    }

    #[test]
    fn polynomial_catalog_formula() {
        let t = 200.0;
        let expected = 0.00000014 * t * t + 0.00015 * t + 0.048;
        let got = k("0.00000014 * T**2 + 0.00015 * T + 0.048", t);
        assert!((got - expected).abs() < 1e-15);
    }

    #[test]
    fn math_qualified_exponential() {
        let got = k("0.0286 * math.exp(0.0029 * T)", 100.0);
        assert!((got - 0.0286 * (0.29_f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn power_binds_tighter_than_sign_and_is_right_associative() {
        assert_close(k("-2**2", 0.0), -4.0);
        assert_close(k("2**3**2", 0.0), 512.0);
        assert_close(k("2**-1", 0.0), 0.5);
        assert_eq!(k("(1 + 1) * 3 - 4 / 2", 0.0), 4.0);
    }

    #[test]
    fn decimal_comma_is_normalized() {
        assert_eq!(normalize_decimal_commas("0,05 + 1,5e-3*T"), "0.05 + 1.5e-3*T");
        assert_eq!(normalize_decimal_commas("pow(T, 2)"), "pow(T, 2)");
        assert_eq!(k("0,05", 10.0), 0.05);
        assert_close(k("pow(T, 2)", 3.0), 9.0);
    }

    #[test]
    fn error_positions_survive_comma_rewriting() {
        assert_eq!(
            ConductivityFunction::parse("1,5 + $").unwrap_err(),
            FormulaError::UnexpectedChar { ch: '$', pos: 6 }
        );
    }

    #[test]
    fn digit_comma_digit_inside_call_is_a_decimal() {
        let err = ConductivityFunction::parse("pow(2,3)").unwrap_err();
        assert!(matches!(err, FormulaError::Arity { func: "pow", .. }));
    }

    #[test]
    fn whitelisted_functions() {
        assert_close(k("sqrt(T)", 16.0), 4.0);
        assert_close(k("log(exp(2))", 0.0), 2.0);
        assert_close(k("log(100, 10)", 0.0), 2.0);
        assert_close(k("pow(T, 0.5)", 25.0), 5.0);
    }

    #[test]
    fn disallowed_function_is_rejected() {
        let err = ConductivityFunction::parse("system(T)").unwrap_err();
        assert!(matches!(err, FormulaError::UnknownFunction { ref name, .. } if name == "system"));

        let err = ConductivityFunction::parse("math.sin(T)").unwrap_err();
        assert!(matches!(err, FormulaError::UnknownFunction { ref name, .. } if name == "sin"));
    }

    #[test]
    fn disallowed_identifiers_are_rejected() {
        for source in ["x * 2", "t + 1", "math.pi * T", "os"] {
            let err = ConductivityFunction::parse(source).unwrap_err();
            assert!(
                matches!(err, FormulaError::UnknownIdentifier { .. }),
                "{source}: {err:?}"
            );
        }
    }

    #[test]
    fn attribute_access_and_strings_do_not_parse() {
        assert!(ConductivityFunction::parse("T.__class__").is_err());
        assert!(matches!(
            ConductivityFunction::parse("__import__('os')").unwrap_err(),
            FormulaError::UnexpectedChar { ch: '\'', .. }
        ));
        assert!(matches!(
            ConductivityFunction::parse("T ^ 2").unwrap_err(),
            FormulaError::UnexpectedChar { ch: '^', .. }
        ));
    }

    #[test]
    fn syntax_errors() {
        assert_eq!(ConductivityFunction::parse("   ").unwrap_err(), FormulaError::Empty);
        assert_eq!(
            ConductivityFunction::parse("2 +").unwrap_err(),
            FormulaError::UnexpectedEnd
        );
        assert_eq!(
            ConductivityFunction::parse("(2").unwrap_err(),
            FormulaError::UnexpectedEnd
        );
        assert!(matches!(
            ConductivityFunction::parse("2 3").unwrap_err(),
            FormulaError::UnexpectedToken { pos: 2, .. }
        ));
        assert!(matches!(
            ConductivityFunction::parse("exp()").unwrap_err(),
            FormulaError::Arity { func: "exp", found: 0, .. }
        ));
    }

    #[test]
    fn nesting_is_capped() {
        let deep_parens = format!("{}T{}", "(".repeat(20_000), ")".repeat(20_000));
        assert_eq!(
            ConductivityFunction::parse(&deep_parens).unwrap_err(),
            FormulaError::TooDeep { limit: MAX_NESTING }
        );

        let deep_signs = format!("{}T", "-".repeat(20_000));
        assert!(matches!(
            ConductivityFunction::parse(&deep_signs).unwrap_err(),
            FormulaError::TooDeep { .. }
        ));

        let deep_calls = format!("{}T{}", "sqrt(".repeat(20_000), ")".repeat(20_000));
        assert!(matches!(
            ConductivityFunction::parse(&deep_calls).unwrap_err(),
            FormulaError::TooDeep { .. }
        ));

        let long_sum = format!("T{}", " + 1".repeat(20_000));
        assert!(matches!(
            ConductivityFunction::parse(&long_sum).unwrap_err(),
            FormulaError::TooDeep { .. }
        ));

        let long_product = format!("T{}", " * 1".repeat(20_000));
        assert!(matches!(
            ConductivityFunction::parse(&long_product).unwrap_err(),
            FormulaError::TooDeep { .. }
        ));
    }

    #[test]
    fn moderate_nesting_still_parses() {
        let parens = format!("{}T{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(k(&parens, 42.0), 42.0);

        let sum = format!("0{}", " + 0.001".repeat(100));
        assert_close(k(&sum, 0.0), 0.1);

        assert_close(k("--T", 3.0), 3.0);
    }

    #[test]
    fn runtime_domain_errors() {
        let f = ConductivityFunction::parse("log(T)").unwrap();
        assert!(matches!(
            f.evaluate(0.0).unwrap_err(),
            FormulaError::Domain { what: "log", .. }
        ));

        let f = ConductivityFunction::parse("sqrt(T)").unwrap();
        assert!(f.evaluate(-1.0).is_err());

        let f = ConductivityFunction::parse("1 / (T - 100)").unwrap();
        assert!(matches!(
            f.evaluate(100.0).unwrap_err(),
            FormulaError::Domain { what: "division", .. }
        ));

        let f = ConductivityFunction::parse("T ** 0.5").unwrap();
        assert!(f.evaluate(-8.0).is_err());

        let f = ConductivityFunction::parse("exp(T)").unwrap();
        assert!(matches!(
            f.evaluate(1000.0).unwrap_err(),
            FormulaError::NonFinite { .. }
        ));
    }

    #[test]
    fn non_positive_conductivity_is_not_an_error() {
        assert!(k("0.05 - 0.001 * T", 100.0) < 0.0);
    }

    #[test]
    fn constant_tree_detection() {
        assert!(ConductivityFunction::parse("0.05 * exp(1)").unwrap().expr().is_constant());
        assert!(!ConductivityFunction::parse("0.05 + 0 * T").unwrap().expr().is_constant());
        assert!(ConductivityFunction::constant(0.05).expr().is_constant());
    }

    #[test]
    fn serializes_as_source_text() {
        let f = ConductivityFunction::parse(" 0.021 + 0.0001 * T ").unwrap();
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(json, "\"0.021 + 0.0001 * T\"");

        let back: ConductivityFunction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);

        assert!(serde_json::from_str::<ConductivityFunction>("\"evil(T)\"").is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn linear_formula_matches_direct_evaluation(
            a in -1.0_f64..1.0,
            b in -0.01_f64..0.01,
            t in -200.0_f64..1200.0,
        ) {
            let source = format!("{a} + {b} * T");
            let f = ConductivityFunction::parse(&source).unwrap();
            let got = f.evaluate(t).unwrap();
            prop_assert!((got - (a + b * t)).abs() <= 1e-12 * (1.0 + (a + b * t).abs()));
        }

        #[test]
        fn evaluation_is_deterministic(t in -200.0_f64..1200.0) {
            let f = ConductivityFunction::parse("0.0317 * math.exp(0.0024 * T)").unwrap();
            prop_assert_eq!(f.evaluate(t).unwrap(), f.evaluate(t).unwrap());
        }

        #[test]
        fn arbitrary_text_never_panics(source in "[ -~]{0,40}") {
            let _ = ConductivityFunction::parse(&source);
        }
    }
}
