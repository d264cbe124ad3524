//! Types that travel on the wire between workers and the server.
//!
//! A request is a single JSON object:
//!
//! ```json
//! { "acao": "entrar", "id": "Ana_1234", "timestamp": "2024-05-01T10:00:00-03:00" }
//! ```
//!
//! and the server answers with exactly one [`Response`] object.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Reply texts
// ---------------------------------------------------------------------------

/// Reply to a granted `entrar`.
pub const MSG_ENTRY_GRANTED: &str = "entry granted";
/// Reply to a rejected `entrar`.
pub const MSG_ENTRY_DENIED: &str = "room full or already present";
/// Reply to a successful `sair`.
pub const MSG_EXIT_RECORDED: &str = "exit recorded";
/// Reply to a `sair` from someone who was not inside.
pub const MSG_EXIT_DENIED: &str = "was not in the room";
/// Reply to a well-formed request with an unrecognized `acao`.
pub const MSG_INVALID_COMMAND: &str = "invalid command";
/// Reply to a payload that could not be decoded at all.
pub const MSG_INVALID_FORMAT: &str = "invalid format";

/// Current local time as an RFC 3339 string with whole seconds, e.g.
/// `2024-05-01T10:00:00+02:00`.
///
/// Status replies carry ten of these and must fit in one read, so the
/// fractional part is dropped.
pub fn now_timestamp() -> String {
    chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false)
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// What a [`Command`] asks the server to do.
///
/// Serialized as the bare strings `"entrar"`, `"sair"` and `"status"`.
/// Any other string decodes to [`Action::Unknown`] so that the server can
/// answer "invalid command" instead of rejecting the whole payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    /// Request a slot in the room.
    Enter,
    /// Release a held slot.
    Leave,
    /// Read a snapshot of the room.
    Status,
    /// Anything else, kept verbatim for logging.
    Unknown(String),
}

impl Action {
    /// The wire name of this action.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Enter => "entrar",
            Self::Leave => "sair",
            Self::Status => "status",
            Self::Unknown(raw) => raw,
        }
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<String> for Action {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "entrar" => Self::Enter,
            "sair" => Self::Leave,
            "status" => Self::Status,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Unknown(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// One request from a worker.
///
/// Missing fields decode to their defaults: a missing `acao` becomes an
/// unknown action, missing `id` / `timestamp` become empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Requested action.
    #[serde(rename = "acao", default)]
    pub action: Action,
    /// Occupant identifier the action applies to.
    #[serde(default)]
    pub id: String,
    /// Client-side send time, ISO-8601.
    #[serde(default)]
    pub timestamp: String,
}

impl Command {
    /// Creates a command with an explicit timestamp.
    pub fn new(action: Action, id: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            action,
            id: id.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Creates a command stamped with the current local time.
    pub fn now(action: Action, id: impl Into<String>) -> Self {
        Self::new(action, id, now_timestamp())
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Outcome marker of a [`Response`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    /// The request was carried out.
    #[serde(rename = "sucesso")]
    Success,
    /// The request was refused or could not be delivered.
    #[serde(rename = "erro")]
    Error,
}

/// One history line as exposed in a [`RoomSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the event happened, ISO-8601.
    pub timestamp: String,
    /// Human-readable event text.
    #[serde(rename = "evento")]
    pub event: String,
}

/// Point-in-time view of the room returned by a `status` request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomSnapshot {
    /// Number of occupied slots.
    #[serde(rename = "ocupacao")]
    pub occupancy: usize,
    /// Total number of slots.
    #[serde(rename = "capacidade")]
    pub capacity: usize,
    /// Identifiers currently inside, sorted.
    #[serde(rename = "ocupantes")]
    pub occupants: Vec<String>,
    /// Most recent history entries, oldest first.
    #[serde(rename = "historico")]
    pub history: Vec<HistoryEntry>,
}

/// The server's answer to one [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Whether the request succeeded.
    pub status: ResponseStatus,
    /// Optional human-readable detail.
    #[serde(rename = "mensagem", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Room snapshot, present only on `status` replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RoomSnapshot>,
}

impl Response {
    /// A success response carrying a message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: Some(message.into()),
            data: None,
        }
    }

    /// An error response carrying a message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.into()),
            data: None,
        }
    }

    /// A success response carrying a room snapshot and no message.
    pub fn snapshot(data: RoomSnapshot) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: None,
            data: Some(data),
        }
    }

    /// Returns `true` for `sucesso` responses.
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    /// The message text, or `""` when absent.
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_format() {
        let cmd = Command::new(Action::Enter, "Ana_1234", "2024-05-01T10:00:00");
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["acao"], "entrar");
        assert_eq!(json["id"], "Ana_1234");
        assert_eq!(json["timestamp"], "2024-05-01T10:00:00");
    }

    #[test]
    fn test_action_names() {
        for (action, name) in [
            (Action::Enter, "entrar"),
            (Action::Leave, "sair"),
            (Action::Status, "status"),
        ] {
            assert_eq!(serde_json::to_string(&action).unwrap(), format!("\"{name}\""));
            let parsed: Action = serde_json::from_str(&format!("\"{name}\"")).unwrap();
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn test_unknown_action_still_decodes() {
        let cmd: Command =
            serde_json::from_str(r#"{"acao": "dancar", "id": "x", "timestamp": ""}"#).unwrap();
        assert_eq!(cmd.action, Action::Unknown("dancar".into()));
        assert_eq!(cmd.action.to_string(), "dancar");
    }

    #[test]
    fn test_missing_fields_default() {
        let cmd: Command = serde_json::from_str("{}").unwrap();
        assert_eq!(cmd.action, Action::Unknown(String::new()));
        assert!(cmd.id.is_empty());
        assert!(cmd.timestamp.is_empty());
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        assert!(serde_json::from_str::<Command>("[1, 2, 3]").is_err());
        assert!(serde_json::from_str::<Command>(r#""entrar""#).is_err());
    }

    #[test]
    fn test_success_response_omits_data() {
        let json = serde_json::to_value(Response::success(MSG_ENTRY_GRANTED)).unwrap();
        assert_eq!(json["status"], "sucesso");
        assert_eq!(json["mensagem"], "entry granted");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_error_response_format() {
        let json = serde_json::to_value(Response::error(MSG_INVALID_FORMAT)).unwrap();
        assert_eq!(json["status"], "erro");
        assert_eq!(json["mensagem"], "invalid format");
    }

    #[test]
    fn test_snapshot_response_format() {
        let resp = Response::snapshot(RoomSnapshot {
            occupancy: 1,
            capacity: 5,
            occupants: vec!["Ana_1234".into()],
            history: vec![HistoryEntry {
                timestamp: "t0".into(),
                event: "ENTRY Ana_1234 1/5".into(),
            }],
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "sucesso");
        assert!(json.get("mensagem").is_none());
        assert_eq!(json["data"]["ocupacao"], 1);
        assert_eq!(json["data"]["capacidade"], 5);
        assert_eq!(json["data"]["ocupantes"][0], "Ana_1234");
        assert_eq!(json["data"]["historico"][0]["evento"], "ENTRY Ana_1234 1/5");
    }

    #[test]
    fn test_response_without_message_decodes() {
        let resp: Response = serde_json::from_str(r#"{"status": "erro"}"#).unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.message(), "");
    }

    #[test]
    fn test_now_timestamp_is_rfc3339() {
        let ts = now_timestamp();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_now_timestamp_has_whole_seconds() {
        let ts = now_timestamp();
        assert!(!ts.contains('.'), "{ts}");
        assert_eq!(ts.len(), "2024-05-01T10:00:00+02:00".len());
    }
}
