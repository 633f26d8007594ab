use chrono::Utc;
use image2url_core::{
    extension_for, generate_base_name, iso_timestamp, ToolResult, UploadRequest, UploadResponse,
};
use image2url_storage::keys::image_key;

use super::ImageTools;
use crate::tools::{UploadFileRequest, UploadImageRequest};

impl ImageTools {
    /// Upload from a URL or from inline data.
    pub async fn upload_image(&self, args: UploadImageRequest) -> ToolResult<UploadResponse> {
        let request = UploadRequest::from_upload_args(args.image_url, args.image_data, args.filename)?;
        self.store_upload(request).await
    }

    /// Upload inline data with a mandatory filename.
    pub async fn upload_file(&self, args: UploadFileRequest) -> ToolResult<UploadResponse> {
        let request = UploadRequest::FromNamedFile {
            data: args.image_data,
            filename: args.filename,
            mime_type: args.mime_type.filter(|m| !m.trim().is_empty()),
        };
        self.store_upload(request).await
    }

    async fn store_upload(&self, request: UploadRequest) -> ToolResult<UploadResponse> {
        let start = std::time::Instant::now();
        let payload = request.resolve(self.remote.as_ref()).await?;

        let base_name = generate_base_name(request.name_hint());
        let key = image_key(&base_name, extension_for(payload.content_type()));
        let metadata = request.metadata(&base_name);
        let size = payload.size() as u64;
        let content_type = payload.content_type().to_string();

        let outcome = self
            .storage
            .put(&key, payload.into_bytes(), &content_type, &metadata)
            .await?;

        tracing::info!(
            key = %outcome.key,
            source = %request.source(),
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image uploaded"
        );

        Ok(UploadResponse {
            success: true,
            url: outcome.url,
            filename: outcome.key,
            size,
            content_type,
            uploaded_at: iso_timestamp(Utc::now()),
        })
    }
}
