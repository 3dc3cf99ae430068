use thiserror::Error;
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("duplicate chart id `{0}`")]
    DuplicateChart(String),
    #[error("invalid colour `{0}`, expected #rrggbb")]
    InvalidColor(String),
    #[error("stream closed by peer")]
    StreamClosed,
    #[error("stream i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("websocket handshake with {url} failed: {reason}")]
    Handshake { url: String, reason: String },
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    /// PNG export failed; `stage` names the step (drawing, encoding).
    #[error("png export failed while {stage}: {reason}")]
    Export { stage: &'static str, reason: String },
}
