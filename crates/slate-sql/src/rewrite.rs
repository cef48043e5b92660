//! Placeholder rewriting.
//!
//! SQLite binds `:name` natively, but the driver only binds by position. The
//! statement is re-tokenized and every `:name` becomes `?N`, where `N` is the
//! 1-based index of the name's first occurrence. Tokens inside string
//! literals and quoted identifiers are never touched.

use crate::error::QueryRejection;
use sqlparser::dialect::Dialect;
use sqlparser::tokenizer::{Token, Tokenizer, Whitespace};

/// A statement with positional placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenSql {
    /// Statement text: comments stripped, no trailing terminator.
    pub sql: String,
    /// Parameter names in placeholder order; `parameters[0]` binds `?1`.
    pub parameters: Vec<String>,
}

/// Rewrite `:name` placeholders to `?N` and reject every other placeholder style.
pub fn rewrite_named_parameters(
    dialect: &dyn Dialect,
    sql: &str,
) -> Result<RewrittenSql, QueryRejection> {
    let tokens = Tokenizer::new(dialect, sql)
        .with_unescape(false)
        .tokenize()
        .map_err(|e| QueryRejection::ParseError(e.to_string()))?;

    let mut parameters: Vec<String> = Vec::new();
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        match token {
            Token::Whitespace(Whitespace::SingleLineComment { .. })
            | Token::Whitespace(Whitespace::MultiLineComment(_)) => {
                out.push(Token::Whitespace(Whitespace::Space));
            }
            Token::Colon => match iter.next() {
                Some(Token::Word(word)) if word.quote_style.is_none() => {
                    let index = match parameters.iter().position(|p| *p == word.value) {
                        Some(i) => i + 1,
                        None => {
                            parameters.push(word.value);
                            parameters.len()
                        }
                    };
                    out.push(Token::Placeholder(format!("?{}", index)));
                }
                next => {
                    return Err(QueryRejection::UnsupportedPlaceholder {
                        placeholder: format!(
                            ":{}",
                            next.map(|t| t.to_string()).unwrap_or_default()
                        ),
                    });
                }
            },
            Token::AtSign => {
                return Err(QueryRejection::UnsupportedPlaceholder {
                    placeholder: format!(
                        "@{}",
                        iter.peek().map(|t| t.to_string()).unwrap_or_default()
                    ),
                });
            }
            Token::Placeholder(placeholder) => {
                return Err(QueryRejection::UnsupportedPlaceholder { placeholder });
            }
            // Dialects that allow `@` or `$` to start an identifier hand these back as words.
            Token::Word(word)
                if word.quote_style.is_none()
                    && (word.value.starts_with('@') || word.value.starts_with('$')) =>
            {
                return Err(QueryRejection::UnsupportedPlaceholder {
                    placeholder: word.value,
                });
            }
            Token::EOF => {}
            other => out.push(other),
        }
    }

    while matches!(out.last(), Some(Token::Whitespace(_) | Token::SemiColon)) {
        out.pop();
    }
    let start = out
        .iter()
        .position(|t| !matches!(t, Token::Whitespace(_)))
        .unwrap_or(out.len());

    let sql = out[start..].iter().map(Token::to_string).collect::<String>();
    Ok(RewrittenSql { sql, parameters })
}
