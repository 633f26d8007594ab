use image2url_core::{http_date, ImageInfoResponse, RemoteResponse, ToolError, ToolResult};
use image2url_storage::keys::key_from_public_url;

use super::ImageTools;
use crate::tools::GetImageInfoRequest;

impl ImageTools {
    /// Describe a stored image.
    ///
    /// The object must exist in storage. Headers from a live HEAD against the
    /// public URL take precedence; storage attributes fill whatever it lacks.
    pub async fn get_image_info(&self, args: GetImageInfoRequest) -> ToolResult<ImageInfoResponse> {
        let key = key_from_public_url(&args.image_url)
            .map_err(|e| ToolError::InvalidArguments(format!("image_url is not a valid URL: {}", e)))?;
        let stored = self.storage.head(&key).await?;

        let live = match self.remote.head(&args.image_url).await {
            Ok(response) if response.is_success() => Some(response),
            Ok(response) => {
                tracing::warn!(
                    url = %args.image_url,
                    status = response.status,
                    "Public URL HEAD unsuccessful, using storage attributes"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    url = %args.image_url,
                    "Public URL HEAD failed, using storage attributes"
                );
                None
            }
        };
        let live_header =
            |name: &str| live.as_ref().and_then(|r: &RemoteResponse| r.header(name)).map(str::to_string);

        Ok(ImageInfoResponse {
            size: live_header("content-length").or_else(|| stored.size.map(|s| s.to_string())),
            content_type: live_header("content-type").or(stored.content_type),
            cache_control: live_header("cache-control").or(stored.cache_control),
            last_modified: live_header("last-modified")
                .or_else(|| stored.last_modified.map(http_date)),
            url: args.image_url,
        })
    }
}
