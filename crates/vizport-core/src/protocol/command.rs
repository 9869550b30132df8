//! Command and argument value types

use super::codec::{decode_fields, encode_fields};
use super::{ARG_SEPARATOR, ESCAPE_CHAR, FIELD_DELIMITER};
use crate::error::{ScriptError, ScriptResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single argument value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Boolean, rendered as `true` / `false`
    Bool(bool),
    /// Integer, rendered in decimal
    Int(i64),
    /// Floating point, rendered in shortest round-trip form
    Float(f64),
    /// Arbitrary text
    Text(String),
}

impl ArgValue {
    /// Render the value as wire text
    ///
    /// Fails for non-finite floats, which the application cannot parse.
    pub fn render(&self) -> ScriptResult<String> {
        match self {
            Self::Bool(b) => Ok(b.to_string()),
            Self::Int(n) => Ok(n.to_string()),
            Self::Float(f) if f.is_finite() => Ok(f.to_string()),
            Self::Float(f) => Err(ScriptError::encoding(format!(
                "non-finite float {} cannot be sent",
                f
            ))),
            Self::Text(s) => Ok(s.clone()),
        }
    }

    /// Borrow the value as text if it is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Parse a literal typed on a command line
    ///
    /// `true`/`false` become booleans, decimal integers become ints, anything
    /// else stays text. Floats are left as text; they render identically.
    pub fn from_literal(literal: &str) -> Self {
        match literal {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => literal
                .parse::<i64>()
                .map(Self::Int)
                .unwrap_or_else(|_| Self::Text(literal.to_string())),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u16> for ArgValue {
    fn from(value: u16) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&String> for ArgValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

/// A command name plus named arguments
///
/// Argument names are unique; setting the same name twice keeps the last
/// value. Arguments are kept sorted by name so the encoded form is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Command {
    name: String,
    args: BTreeMap<String, ArgValue>,
}

impl Command {
    /// Create a command with no arguments
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: BTreeMap::new(),
        }
    }

    /// Add a named argument
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Add a named argument in place
    pub fn set_arg(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) {
        self.args.insert(name.into(), value.into());
    }

    /// Command name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Named arguments, ordered by name
    pub fn args(&self) -> &BTreeMap<String, ArgValue> {
        &self.args
    }

    /// Look up one argument
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.args.get(name)
    }

    /// Encode into a request payload
    pub fn encode(&self) -> ScriptResult<String> {
        validate_command_name(&self.name)?;

        let mut fields = Vec::with_capacity(self.args.len() + 1);
        fields.push(self.name.clone());
        for (name, value) in &self.args {
            validate_arg_name(name)?;
            let rendered = value.render().map_err(|e| match e {
                ScriptError::Encoding { message, .. } => {
                    ScriptError::encoding_for_argument(message, name.clone())
                }
                other => other,
            })?;
            fields.push(format!("{}{}{}", name, ARG_SEPARATOR, rendered));
        }

        Ok(encode_fields(fields))
    }

    /// Decode a request payload
    ///
    /// Every argument value comes back as [`ArgValue::Text`]; the wire carries
    /// no type information.
    pub fn decode(payload: &str) -> ScriptResult<Self> {
        let mut fields = decode_fields(payload)?.into_iter();
        let name = fields
            .next()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ScriptError::protocol("request has no command name"))?;

        let mut command = Self::new(name);
        for field in fields {
            let (arg, value) = field.split_once(ARG_SEPARATOR).ok_or_else(|| {
                ScriptError::protocol(format!("argument field '{}' has no '='", field))
            })?;
            if command.args.contains_key(arg) {
                return Err(ScriptError::protocol(format!(
                    "duplicate argument '{}' in request",
                    arg
                )));
            }
            command.args.insert(arg.to_string(), ArgValue::Text(value.to_string()));
        }
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (name, value) in &self.args {
            write!(f, " {}={}", name, value)?;
        }
        Ok(())
    }
}

fn validate_command_name(name: &str) -> ScriptResult<()> {
    if name.is_empty() {
        return Err(ScriptError::encoding("command name is empty"));
    }
    if let Some(bad) = name.chars().find(|c| {
        *c == FIELD_DELIMITER || *c == ESCAPE_CHAR || *c == ARG_SEPARATOR || c.is_control()
    }) {
        return Err(ScriptError::encoding(format!(
            "command name '{}' contains reserved character {:?}",
            name.escape_debug(),
            bad
        )));
    }
    Ok(())
}

/// Argument names are identifiers: `[A-Za-z_][A-Za-z0-9_]*`
fn validate_arg_name(name: &str) -> ScriptResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ScriptError::encoding_for_argument(
            format!("argument name '{}' is not an identifier", name.escape_debug()),
            name,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_argument_round_trip() {
        for name in ["getColormaps", "setAnalysisLayout", "unknownCommand"] {
            let payload = Command::new(name).encode().unwrap();
            assert_eq!(payload, name);
            let decoded = Command::decode(&payload).unwrap();
            assert_eq!(decoded.name(), name);
            assert!(decoded.args().is_empty());
        }
    }

    #[test]
    fn test_arguments_are_sorted_by_name() {
        let payload = Command::new("setCustomLayout")
            .arg("nrows", 2)
            .arg("ncols", 3)
            .encode()
            .unwrap();
        assert_eq!(payload, "setCustomLayout|ncols=3|nrows=2");
    }

    #[test]
    fn test_value_types_render() {
        let payload = Command::new("saveSnapshot")
            .arg("saveLayout", true)
            .arg("index", -4i64)
            .arg("zoom", 1.5)
            .encode()
            .unwrap();
        assert_eq!(payload, "saveSnapshot|index=-4|saveLayout=true|zoom=1.5");
    }

    #[test]
    fn test_delimiter_in_value_is_lossless() {
        let nasty = "a|b\\c=d|\\|";
        let command = Command::new("setDescription").arg("text", nasty);
        let decoded = Command::decode(&command.encode().unwrap()).unwrap();
        assert_eq!(decoded.get("text").and_then(ArgValue::as_text), Some(nasty));
    }

    #[test]
    fn test_equals_sign_in_value_is_kept() {
        let decoded = Command::decode(
            &Command::new("cmd").arg("expr", "x=1").encode().unwrap(),
        )
        .unwrap();
        assert_eq!(decoded.get("expr"), Some(&ArgValue::Text("x=1".into())));
    }

    #[test]
    fn test_invalid_argument_name_is_encoding_error() {
        for bad in ["", "1abc", "a=b", "a|b", "with space"] {
            let err = Command::new("cmd").arg(bad, "v").encode().unwrap_err();
            assert!(
                matches!(err, ScriptError::Encoding { .. }),
                "expected encoding error for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_invalid_command_name_is_encoding_error() {
        assert!(Command::new("").encode().is_err());
        assert!(Command::new("get|Views").encode().is_err());
        assert!(Command::new("line\nbreak").encode().is_err());
    }

    #[test]
    fn test_non_finite_float_is_encoding_error() {
        let err = Command::new("cmd").arg("scale", f64::NAN).encode().unwrap_err();
        match err {
            ScriptError::Encoding { argument, .. } => assert_eq!(argument.as_deref(), Some("scale")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_rejects_missing_separator() {
        assert!(Command::decode("cmd|novalue").is_err());
        assert!(Command::decode("").is_err());
        assert!(Command::decode("cmd|a=1|a=2").is_err());
    }

    #[test]
    fn test_literal_parsing() {
        assert_eq!(ArgValue::from_literal("true"), ArgValue::Bool(true));
        assert_eq!(ArgValue::from_literal("42"), ArgValue::Int(42));
        assert_eq!(ArgValue::from_literal("4.5"), ArgValue::Text("4.5".into()));
        assert_eq!(ArgValue::from_literal("image.fits"), ArgValue::Text("image.fits".into()));
    }

    #[test]
    fn test_display() {
        let command = Command::new("addLink").arg("sourceView", "a").arg("destView", "b");
        assert_eq!(command.to_string(), "addLink destView=b sourceView=a");
    }
}
