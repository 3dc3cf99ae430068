// src/types.rs
use serde::Deserialize;

// Where stream values come from
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionMode {
    Simulation,
    Tcp,
    #[default]
    WebSocket,
}

// Commands sent from the GUI to the stream engine
#[derive(Clone, Debug, PartialEq)]
pub enum StreamCommand {
    Connect(ConnectionMode),
    Disconnect,
}

// Events sent from the stream engine to the GUI
#[derive(Clone, Debug, PartialEq)]
pub enum StreamEvent {
    Connected,
    Disconnected,
    Value(f64),
    Log(String),
}
