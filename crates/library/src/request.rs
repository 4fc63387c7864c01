//! Request/response surface for discovery and conversion.
//!
//! Responses serialize to the JSON shapes the host expects:
//!
//! - discovery: `{ success, folder?, files?, error? }`
//! - conversion: `{ success, items?, error? }`
//!
//! Any request-level failure is `{ success: false, error }`. A conversion
//! batch where only some files failed is `success: false` *with* `items`.

use crate::convert::{ConversionBatchResult, ConversionItem, convert};
use crate::error::{ErrorKind, Result};
use crate::picker::FolderPicker;
use crate::scan::{EnrichedFileEntry, ExtensionFilter, scan};
use mdbridge_catalog::{LocateOptions, locate};
use mdbridge_toolchain::Toolchain;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::instrument;

pub const NO_FOLDER_SELECTED: &str = "No folder selected";
pub const SCAN_FAILED: &str = "Failed to scan folder";
pub const MISSING_FILES: &str = "Missing files array";
/// Title shown on the folder dialog.
pub const DEFAULT_PICKER_TITLE: &str = "Select folder containing MDB files";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<EnrichedFileEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
impl DiscoverResponse {
    pub fn found(folder: PathBuf, files: Vec<EnrichedFileEntry>) -> Self {
        Self { success: true, folder: Some(folder), files: Some(files), error: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, folder: None, files: None, error: Some(error.into()) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ConversionItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
impl ConvertResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, items: None, error: Some(error.into()) }
    }
}
impl From<ConversionBatchResult> for ConvertResponse {
    fn from(result: ConversionBatchResult) -> Self {
        Self { success: result.overall_success, items: Some(result.items), error: None }
    }
}

/// Everything a discovery request needs besides the picker.
#[derive(Debug, Clone, Default)]
pub struct DiscoverySettings {
    pub title: String,
    pub locate: LocateOptions,
    pub extensions: ExtensionFilter,
}

/// A validated conversion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertRequest {
    pub files: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
}
impl ConvertRequest {
    /// Parse a `{ files: string[], outputDir?: string }` payload.
    ///
    /// `files` must be present and an array, otherwise this fails with
    /// [`ErrorKind::InvalidRequest`]. Entries that aren't strings are
    /// skipped. An `outputDir` that is missing, not a string, or empty
    /// means "next to each source file".
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let Some(files) = payload.get("files").and_then(Value::as_array) else {
            exn::bail!(ErrorKind::InvalidRequest(MISSING_FILES.to_string()));
        };
        let files = files.iter().filter_map(Value::as_str).map(PathBuf::from).collect();
        let output_dir =
            payload.get("outputDir").and_then(Value::as_str).filter(|dir| !dir.is_empty()).map(PathBuf::from);
        Ok(Self { files, output_dir })
    }
}

/// Handle a discovery request: pick a folder, find its catalog, scan it.
#[instrument(skip_all)]
pub async fn discover_files(picker: &dyn FolderPicker, settings: &DiscoverySettings) -> DiscoverResponse {
    let selected = picker.select_folder(&settings.title).await.filter(|folder| !folder.as_os_str().is_empty());
    let Some(folder) = selected else {
        tracing::info!("No folder selected");
        return DiscoverResponse::failure(NO_FOLDER_SELECTED);
    };
    // The catalog search ascends through parents, which a relative path
    // like `.` doesn't have.
    let folder = absolute_folder(folder);
    let located = locate(&folder, &settings.locate).await;
    match scan(&folder, &located.catalog, &settings.extensions).await {
        Ok(files) => DiscoverResponse::found(folder, files),
        Err(err) => {
            tracing::warn!(error = ?err, "Discovery failed");
            DiscoverResponse::failure(SCAN_FAILED)
        },
    }
}

fn absolute_folder(folder: PathBuf) -> PathBuf {
    match std::path::absolute(&folder) {
        Ok(absolute) => absolute,
        Err(err) => {
            tracing::debug!(folder = %folder.display(), error = %err, "Unable to resolve folder");
            folder
        },
    }
}

/// Handle an already-validated conversion request.
pub async fn convert_request(toolchain: &dyn Toolchain, request: &ConvertRequest) -> ConvertResponse {
    convert(toolchain, &request.files, request.output_dir.as_deref()).await.into()
}

/// Handle a raw conversion payload. Validation happens before any
/// conversion is attempted.
#[instrument(skip_all)]
pub async fn convert_files(toolchain: &dyn Toolchain, payload: &Value) -> ConvertResponse {
    match ConvertRequest::from_payload(payload) {
        Ok(request) => convert_request(toolchain, &request).await,
        Err(err) => {
            tracing::warn!(error = ?err, "Rejected conversion request");
            ConvertResponse::failure((*err).to_string())
        },
    }
}
