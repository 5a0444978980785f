/// Rendering of decoded return values for humans and for JSON consumers
use ethers::abi::Token;
use ethers::types::I256;
use ethers::utils::to_checksum;
use ledgerline_common::{Error, Result};
use serde::Serialize;
use serde_json::{json, Value};

use crate::args::ArgKind;
use crate::units::format_amount;

/// Named field of a tuple return value
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: ArgKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: ArgKind) -> Self {
        Self { name, kind }
    }
}

/// How an entry point's return value is presented
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "fields")]
pub enum OutputKind {
    /// Values printed as decoded
    Plain,

    /// Single integer scaled down by the product's decimals
    Amount,

    /// Tuple return with one formatting rule per field
    Record(&'static [FieldSpec]),
}

/// A formatted read result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    /// Human-readable text
    pub display: String,

    /// Structured value
    pub value: Value,
}

/// Format a single token. `scale` is the decimals to apply to integer amounts.
pub fn format_token(token: &Token, scale: Option<u32>) -> Result<String> {
    let text = match token {
        Token::Address(address) => to_checksum(address, None),
        Token::FixedBytes(bytes) | Token::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        Token::Uint(value) => match scale {
            Some(decimals) => format_amount(*value, decimals)?,
            None => value.to_string(),
        },
        Token::Int(value) => I256::from_raw(*value).to_string(),
        Token::Bool(b) => b.to_string(),
        Token::String(s) => s.clone(),
        Token::Array(items) | Token::FixedArray(items) => {
            let parts = items
                .iter()
                .map(|t| format_token(t, scale))
                .collect::<Result<Vec<_>>>()?;
            format!("[{}]", parts.join(", "))
        }
        Token::Tuple(items) => {
            let parts = items
                .iter()
                .map(|t| format_token(t, scale))
                .collect::<Result<Vec<_>>>()?;
            format!("({})", parts.join(", "))
        }
    };
    Ok(text)
}

/// Convert a token to JSON. Integers become decimal strings so nothing overflows.
pub fn token_to_json(token: &Token, scale: Option<u32>) -> Result<Value> {
    let value = match token {
        Token::Bool(b) => json!(b),
        Token::Array(items) | Token::FixedArray(items) => Value::Array(
            items
                .iter()
                .map(|t| token_to_json(t, scale))
                .collect::<Result<Vec<_>>>()?,
        ),
        Token::Tuple(items) => {
            let mut result = serde_json::Map::new();
            for (i, item) in items.iter().enumerate() {
                result.insert(format!("{}", i), token_to_json(item, scale)?);
            }
            Value::Object(result)
        }
        other => json!(format_token(other, scale)?),
    };
    Ok(value)
}

/// Render the decoded outputs of a read call
pub fn render(tokens: &[Token], output: OutputKind, decimals: u32) -> Result<Rendered> {
    match output {
        OutputKind::Plain => render_values(tokens, None),
        OutputKind::Amount => render_values(tokens, Some(decimals)),
        OutputKind::Record(fields) => {
            // A struct return may arrive as one tuple token or as flat outputs
            let values: &[Token] = match tokens {
                [Token::Tuple(inner)] => inner.as_slice(),
                flat => flat,
            };
            if values.len() != fields.len() {
                return Err(Error::abi(format!(
                    "expected {} return values, got {}",
                    fields.len(),
                    values.len()
                )));
            }

            let mut lines = Vec::with_capacity(fields.len());
            let mut object = serde_json::Map::new();
            for (field, token) in fields.iter().zip(values) {
                let scale = (field.kind == ArgKind::Amount).then_some(decimals);
                lines.push(format!("{}: {}", field.name, format_token(token, scale)?));
                object.insert(field.name.to_string(), token_to_json(token, scale)?);
            }
            Ok(Rendered {
                display: lines.join("\n"),
                value: Value::Object(object),
            })
        }
    }
}

fn render_values(tokens: &[Token], scale: Option<u32>) -> Result<Rendered> {
    match tokens {
        [] => Ok(Rendered {
            display: String::new(),
            value: Value::Null,
        }),
        [single] => Ok(Rendered {
            display: format_token(single, scale)?,
            value: token_to_json(single, scale)?,
        }),
        many => {
            let display = many
                .iter()
                .map(|t| format_token(t, scale))
                .collect::<Result<Vec<_>>>()?
                .join("\n");
            let value = Value::Array(
                many.iter()
                    .map(|t| token_to_json(t, scale))
                    .collect::<Result<Vec<_>>>()?,
            );
            Ok(Rendered { display, value })
        }
    }
}
