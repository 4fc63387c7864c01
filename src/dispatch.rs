//! Routes requests from the command line or a host message to the library.

use mdbridge_config::Settings;
use mdbridge_library::request::{convert_request, discover_files};
use mdbridge_library::{ConvertRequest, ConvertResponse, DialogPicker, DiscoverResponse, FixedFolder, FolderPicker};
use mdbridge_toolchain::ShellToolchain;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

pub const SELECT_FOLDER: &str = "mdbSelectFolder";
pub const CONVERT: &str = "mdbConvert";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Discover(DiscoverResponse),
    Convert(ConvertResponse),
    Rejected { success: bool, error: String },
}
impl Response {
    fn rejected(error: impl Into<String>) -> Self {
        Self::Rejected { success: false, error: error.into() }
    }

    pub fn success(&self) -> bool {
        match self {
            Self::Discover(response) => response.success,
            Self::Convert(response) => response.success,
            Self::Rejected { success, .. } => *success,
        }
    }
}

/// Discover files in `folder`, or in whatever folder the user picks from a
/// dialog when none is given.
pub async fn discover(folder: Option<PathBuf>, settings: &Settings) -> DiscoverResponse {
    let picker: Box<dyn FolderPicker> = match folder {
        Some(folder) => Box::new(FixedFolder(Some(folder))),
        None => match DialogPicker::discover() {
            Ok(dialog) => Box::new(dialog),
            Err(err) => {
                tracing::warn!(error = ?err, "Cannot ask for a folder");
                Box::new(FixedFolder(None))
            },
        },
    };
    discover_files(picker.as_ref(), &settings.discovery()).await
}

/// Convert a validated request with the configured toolchain.
pub async fn convert(request: &ConvertRequest, settings: &Settings) -> ConvertResponse {
    match ShellToolchain::discover(&settings.tool_names()) {
        Ok(toolchain) => convert_request(&toolchain, request).await,
        Err(err) => {
            tracing::error!(error = ?err, "Conversion toolchain unavailable");
            ConvertResponse::failure((*err).to_string())
        },
    }
}

/// Handle a host message of type `message_type` with a raw JSON payload.
///
/// An empty payload is treated as `null`.
pub async fn handle(message_type: &str, raw: &str, settings: &Settings) -> Response {
    match message_type {
        SELECT_FOLDER => Response::Discover(discover(None, settings).await),
        CONVERT => {
            let payload = match parse_payload(raw) {
                Ok(payload) => payload,
                Err(err) => return Response::rejected(format!("Invalid payload: {err}")),
            };
            match ConvertRequest::from_payload(&payload) {
                Ok(request) => Response::Convert(convert(&request, settings).await),
                Err(err) => {
                    tracing::warn!(error = ?err, "Rejected conversion request");
                    Response::Convert(ConvertResponse::failure((*err).to_string()))
                },
            }
        },
        other => {
            tracing::warn!(message_type = other, "Unknown message type");
            Response::rejected(format!("Unknown message type: {other}"))
        },
    }
}

fn parse_payload(raw: &str) -> serde_json::Result<Value> {
    if raw.trim().is_empty() { Ok(Value::Null) } else { serde_json::from_str(raw) }
}
