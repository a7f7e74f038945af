//! WebSocket message types for live dashboard updates
//!
//! These types define the protocol for WebSocket communication between
//! the server and the dashboard frontend.

use serde::{Deserialize, Serialize};

use crate::{DashboardView, TimeFrame};

// ============================================================================
// Client -> Server Messages
// ============================================================================

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ping to keep connection alive
    Ping {
        /// Client timestamp
        timestamp: i64,
    },
    /// User pressed the refresh button
    Refresh,
    /// Select the chart window used by the next full refresh
    SetTimeframe { timeframe: TimeFrame },
}

// ============================================================================
// Server -> Client Messages
// ============================================================================

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full dashboard state at a new version
    Dashboard { view: Box<DashboardView> },
    /// Response to ping
    Pong {
        /// Echo of client timestamp
        timestamp: i64,
        /// Server timestamp
        server_time: i64,
    },
    /// Error message
    Error { code: ErrorCode, message: String },
}

/// Error codes for WebSocket errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Invalid message format
    InvalidMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_parsing() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"set_timeframe","timeframe":"7D"}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::SetTimeframe {
                timeframe: TimeFrame::Week
            }
        ));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"refresh"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Refresh));
    }

    #[test]
    fn test_server_message_tagging() {
        let msg = ServerMessage::Pong {
            timestamp: 1,
            server_time: 2,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "pong");
        assert_eq!(json["server_time"], 2);
    }
}
