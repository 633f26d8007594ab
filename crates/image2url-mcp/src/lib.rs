//! Image2URL MCP Server
//!
//! Model Context Protocol server that uploads images to Cloudflare R2 and hands
//! back public URLs, for AI assistants (Claude Desktop, Cursor, etc.)

pub mod handlers;
pub mod http;
pub mod server;
pub mod telemetry;
pub mod tools;

pub use handlers::ImageTools;
pub use server::ImageService;
pub use tools::ToolName;
