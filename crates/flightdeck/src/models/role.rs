use serde::{Deserialize, Serialize};

/// The speakers in a conversation. Tool results travel on user
/// messages internally; the "tool" wire role only exists at the
/// provider boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}
