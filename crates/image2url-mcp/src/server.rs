//! MCP server using rmcp SDK
//!
//! Exposes the image handlers as MCP tools. The same service backs the stdio and
//! the streamable HTTP transports.

use std::borrow::Cow;
use std::future::Future;
use std::str::FromStr;

use image2url_core::constants::{SERVER_NAME, SERVER_VERSION};
use image2url_core::{ErrorMetadata, ToolError};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::tool::{Parameters, ToolCallContext};
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{tool, tool_router, RoleServer, ServerHandler};
use serde::Serialize;

use crate::handlers::ImageTools;
use crate::tools::*;

fn text_content(s: impl Into<String>) -> Content {
    Content {
        raw: RawContent::Text(RawTextContent { text: s.into() }),
        annotations: None,
    }
}

/// Map a handler failure onto a JSON-RPC error. The `data` member lets callers
/// tell validation failures from backend faults without parsing the message.
pub fn tool_error_data(err: &ToolError) -> ErrorData {
    let message = match err {
        ToolError::InvalidArguments(msg) => msg.clone(),
        ToolError::MethodNotFound(_) => err.to_string(),
        other => format!("Tool execution failed: {}", other),
    };

    ErrorData {
        code: ErrorCode(err.jsonrpc_code()),
        message: Cow::from(message),
        data: Some(serde_json::json!({
            "code": err.error_code(),
            "validation": err.is_validation(),
        })),
    }
}

fn json_result<T: Serialize>(operation: &str, value: &T) -> Result<CallToolResult, ErrorData> {
    let text = serde_json::to_string_pretty(value).map_err(|e| ErrorData {
        code: ErrorCode(-32603),
        message: Cow::from(format!("Tool execution failed: {}", e)),
        data: None,
    })?;
    tracing::debug!(operation, "Tool call succeeded");
    Ok(CallToolResult::success(vec![text_content(text)]))
}

fn tool_failure(operation: &str, err: ToolError) -> ErrorData {
    err.log(operation);
    tool_error_data(&err)
}

#[derive(Clone)]
pub struct ImageService {
    tools: ImageTools,
    tool_router: ToolRouter<ImageService>,
}

#[tool_router]
impl ImageService {
    pub fn new(tools: ImageTools) -> Self {
        Self {
            tools,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Upload an image to cloud storage and get a public URL. Supports both URL and base64 data input."
    )]
    async fn upload_image(
        &self,
        Parameters(req): Parameters<UploadImageRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let operation = ToolName::UploadImage.as_str();
        match self.tools.upload_image(req).await {
            Ok(response) => json_result(operation, &response),
            Err(e) => Err(tool_failure(operation, e)),
        }
    }

    #[tool(
        description = "Upload a file directly (base64 or data URL) and get a public URL. Use this when you have file content to share."
    )]
    async fn upload_file(
        &self,
        Parameters(req): Parameters<UploadFileRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let operation = ToolName::UploadFile.as_str();
        match self.tools.upload_file(req).await {
            Ok(response) => json_result(operation, &response),
            Err(e) => Err(tool_failure(operation, e)),
        }
    }

    #[tool(description = "Get information about an uploaded image")]
    async fn get_image_info(
        &self,
        Parameters(req): Parameters<GetImageInfoRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let operation = ToolName::GetImageInfo.as_str();
        match self.tools.get_image_info(req).await {
            Ok(info) => json_result(operation, &info),
            Err(e) => Err(tool_failure(operation, e)),
        }
    }

    #[tool(description = "Check the health status of the MCP server and R2 storage connection")]
    async fn health_check(&self) -> Result<CallToolResult, ErrorData> {
        let report = self.tools.health_check().await;
        json_result(ToolName::HealthCheck.as_str(), &report)
    }
}

impl ServerHandler for ImageService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: SERVER_VERSION.into(),
            },
            instructions: Some(
                "Image2URL: upload images from a URL or base64 data to R2 storage and get a \
                 public URL back; inspect uploaded images; check storage health."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tool_router.list_all()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        if let Err(e) = ToolName::from_str(&request.name) {
            return Err(tool_failure(&request.name, e));
        }

        let tcc = ToolCallContext::new(self, request, context);
        self.tool_router.call(tcc).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_are_prefixed() {
        let data = tool_error_data(&ToolError::EmptyPayload);
        assert_eq!(data.code, ErrorCode(-32603));
        assert_eq!(data.message, "Tool execution failed: Image data is empty");
        let extra = data.data.unwrap();
        assert_eq!(extra["code"], "EMPTY_PAYLOAD");
        assert_eq!(extra["validation"], true);
    }

    #[test]
    fn storage_faults_are_not_validation() {
        let data = tool_error_data(&ToolError::StorageWrite("denied".to_string()));
        assert_eq!(data.message, "Tool execution failed: R2 upload failed: denied");
        assert_eq!(data.data.unwrap()["validation"], false);
    }

    #[test]
    fn invalid_arguments_keep_their_message() {
        let data = tool_error_data(&ToolError::InvalidArguments(
            "Either image_url or (image_data and filename) must be provided".to_string(),
        ));
        assert_eq!(data.code, ErrorCode(-32602));
        assert_eq!(
            data.message,
            "Either image_url or (image_data and filename) must be provided"
        );
    }

    #[test]
    fn unknown_tool_maps_to_method_not_found() {
        let data = tool_error_data(&ToolError::MethodNotFound("resize".to_string()));
        assert_eq!(data.code, ErrorCode(-32601));
        assert_eq!(data.message, "Unknown tool: resize");
    }
}
