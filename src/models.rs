use serde::{Deserialize, Serialize};

/// Body of the 403 returned when POST targets an existing key
pub const RECORD_EXISTS_MESSAGE: &str = "Record already exists. Use PATCH method to update";

/// Endpoint addresses stored under a record key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ServerInfo {
    pub api: String,
    pub ws: String,
    pub grpc: String,
}

/// Query parameters accepted by POST and PATCH
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServerInfoQuery {
    /// HTTP API endpoint
    pub api: Option<String>,
    /// WebSocket endpoint
    pub ws: Option<String>,
    /// gRPC endpoint
    pub grpc: Option<String>,
}

impl From<ServerInfoQuery> for ServerInfo {
    fn from(query: ServerInfoQuery) -> Self {
        ServerInfo {
            api: query.api.unwrap_or_default(),
            ws: query.ws.unwrap_or_default(),
            grpc: query.grpc.unwrap_or_default(),
        }
    }
}

/// Response type carrying a human-readable message
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
