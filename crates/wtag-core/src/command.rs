// ── Node commands ──
//
// Commands arrive from the hub as a name plus a payload mapping. Parsing is
// strict: a malformed `SET_USE_TAGS` is rejected before it touches state.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

use crate::error::CoreError;
use crate::model::UseTags;

/// Command names accepted by the tag manager node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum CommandName {
    #[strum(serialize = "SET_USE_TAGS")]
    SetUseTags,
    #[strum(serialize = "DON")]
    On,
    #[strum(serialize = "DOF")]
    Off,
}

/// Payload sent with a command. The hub sends `value` as a string; JSON
/// numbers are accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandPayload {
    #[serde(default)]
    pub value: Option<Value>,
}

impl CommandPayload {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    /// The payload's `value` as an integer.
    pub fn int_value(&self) -> Result<i64, CoreError> {
        let value = self.value.as_ref().ok_or_else(|| CoreError::ValidationFailed {
            message: "missing 'value' in command payload".into(),
        })?;

        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        parsed.ok_or_else(|| CoreError::ValidationFailed {
            message: format!("'value' must be an integer, got {value}"),
        })
    }
}

/// A parsed, validated command for a tag manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCommand {
    SetUseTags(UseTags),
    On,
    Off,
}

impl NodeCommand {
    /// Parse a command name and payload as received from the hub.
    pub fn parse(name: &str, payload: &CommandPayload) -> Result<Self, CoreError> {
        let name: CommandName = name.parse().map_err(|_| CoreError::UnknownCommand {
            name: name.to_owned(),
        })?;

        match name {
            CommandName::SetUseTags => {
                let value = UseTags::try_from(payload.int_value()?)?;
                Ok(Self::SetUseTags(value))
            }
            CommandName::On => Ok(Self::On),
            CommandName::Off => Ok(Self::Off),
        }
    }

    pub fn name(self) -> CommandName {
        match self {
            Self::SetUseTags(_) => CommandName::SetUseTags,
            Self::On => CommandName::On,
            Self::Off => CommandName::Off,
        }
    }
}
