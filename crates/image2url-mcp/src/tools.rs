//! MCP tool request types with JSON Schema for AI parameter generation

use std::fmt;
use std::str::FromStr;

use image2url_core::ToolError;
use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UploadImageRequest {
    #[schemars(description = "URL of the image to upload (alternative to image_data)")]
    pub image_url: Option<String>,
    #[schemars(
        description = "Base64 encoded image data or data URL (alternative to image_url)"
    )]
    pub image_data: Option<String>,
    #[schemars(
        description = "Custom filename for the uploaded image (required when using image_data)"
    )]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UploadFileRequest {
    #[schemars(description = "Base64 encoded image data or data URL")]
    pub image_data: String,
    #[schemars(description = "Original filename with extension")]
    pub filename: String,
    #[schemars(description = "MIME type of the file (optional, derived from filename)")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetImageInfoRequest {
    #[schemars(description = "Public URL of an image previously uploaded")]
    pub image_url: String,
}

/// The tools this server exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    UploadImage,
    UploadFile,
    GetImageInfo,
    HealthCheck,
}

impl ToolName {
    pub const ALL: [ToolName; 4] = [
        ToolName::UploadImage,
        ToolName::UploadFile,
        ToolName::GetImageInfo,
        ToolName::HealthCheck,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::UploadImage => "upload_image",
            ToolName::UploadFile => "upload_file",
            ToolName::GetImageInfo => "get_image_info",
            ToolName::HealthCheck => "health_check",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| ToolError::MethodNotFound(s.to_string()))
    }
}
