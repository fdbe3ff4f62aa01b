// Route path constants - single source of truth for all API paths

/// Record addressed by the first path segment; any further segments are ignored
pub const RECORD: &str = "/{key}";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
