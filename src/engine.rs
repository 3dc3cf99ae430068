// src/engine.rs
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use crate::chart::{ChartError, SimulatedSource, TcpLineSource, ValueSource, WebSocketSource};
use crate::config::StreamConfig;
use crate::types::*;

const IDLE_SLEEP: Duration = Duration::from_millis(50);
const POLL_SLEEP: Duration = Duration::from_millis(5);

/// Stream state machine driven by the engine thread: owns the active source
/// and turns commands and source output into GUI events.
pub struct Engine {
    tx: Sender<StreamEvent>,
    config: StreamConfig,
    source: Option<Box<dyn ValueSource>>,
}

impl Engine {
    pub fn new(tx: Sender<StreamEvent>, config: StreamConfig) -> Self {
        Self { tx, config, source: None }
    }

    pub fn is_connected(&self) -> bool {
        self.source.is_some()
    }

    fn send(&self, event: StreamEvent) {
        // The GUI going away is handled by the command channel disconnecting.
        self.tx.send(event).ok();
    }

    fn open(&self, mode: ConnectionMode) -> Result<Box<dyn ValueSource>, ChartError> {
        match mode {
            ConnectionMode::Simulation => {
                let source = SimulatedSource::new(self.config.simulation_interval())
                    .with_jitter(self.config.simulation_jitter, 0x5eed);
                Ok(Box::new(source))
            }
            ConnectionMode::Tcp => Ok(Box::new(TcpLineSource::connect(
                &self.config.address,
                self.config.connect_timeout(),
                self.config.field.clone(),
            )?)),
            ConnectionMode::WebSocket => Ok(Box::new(WebSocketSource::connect(
                &self.config.url,
                self.config.connect_timeout(),
                self.config.field.clone(),
            )?)),
        }
    }

    /// Replaces the current source with an already opened one.
    pub fn attach(&mut self, source: Box<dyn ValueSource>) {
        self.source = Some(source);
        self.send(StreamEvent::Connected);
    }

    pub fn handle(&mut self, cmd: StreamCommand) {
        match cmd {
            StreamCommand::Connect(mode) => {
                if self.is_connected() {
                    return;
                }
                match self.open(mode) {
                    Ok(source) => {
                        log::info!("stream connected ({mode:?})");
                        self.send(StreamEvent::Log(format!("Connected ({mode:?})")));
                        self.attach(source);
                    }
                    Err(e) => {
                        log::warn!("stream connect failed: {e}");
                        self.send(StreamEvent::Log(format!("Connect failed: {e}")));
                        self.send(StreamEvent::Disconnected);
                    }
                }
            }
            StreamCommand::Disconnect => {
                if self.source.take().is_some() {
                    log::info!("stream disconnected by user");
                }
                self.send(StreamEvent::Disconnected);
            }
        }
    }

    /// Polls the active source once. Returns `true` when a value was forwarded.
    pub fn pump(&mut self) -> bool {
        let Some(source) = self.source.as_mut() else {
            return false;
        };
        match source.next_value() {
            Ok(Some(value)) => {
                self.send(StreamEvent::Value(value));
                true
            }
            Ok(None) => false,
            Err(e) => {
                log::warn!("stream lost: {e}");
                self.source = None;
                self.send(StreamEvent::Log(format!("Stream lost: {e}")));
                self.send(StreamEvent::Disconnected);
                false
            }
        }
    }
}

pub fn spawn_thread(
    tx: Sender<StreamEvent>,
    rx_cmd: Receiver<StreamCommand>,
    config: StreamConfig,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut engine = Engine::new(tx, config);
        loop {
            // 1. commands from the GUI
            loop {
                match rx_cmd.try_recv() {
                    Ok(cmd) => engine.handle(cmd),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        log::debug!("command channel closed, stopping stream engine");
                        return;
                    }
                }
            }
            // 2. stream values
            if engine.is_connected() {
                if !engine.pump() {
                    thread::sleep(POLL_SLEEP);
                }
            } else {
                thread::sleep(IDLE_SLEEP);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::source::ManualSource;
    use std::sync::mpsc::channel;

    fn drain(rx: &Receiver<StreamEvent>) -> Vec<StreamEvent> {
        rx.try_iter().collect()
    }

    #[test]
    fn forwards_values_then_reports_disconnect() {
        let (tx, rx) = channel();
        let mut engine = Engine::new(tx, StreamConfig::default());
        engine.attach(Box::new(ManualSource::new([1.5, 2.5])));
        while engine.is_connected() {
            engine.pump();
        }
        let events = drain(&rx);
        assert_eq!(events[0], StreamEvent::Connected);
        assert_eq!(events[1], StreamEvent::Value(1.5));
        assert_eq!(events[2], StreamEvent::Value(2.5));
        assert_eq!(events.last(), Some(&StreamEvent::Disconnected));
    }

    #[test]
    fn simulation_connects_and_disconnects() {
        let (tx, rx) = channel();
        let config = StreamConfig {
            simulation_interval_ms: 0,
            ..StreamConfig::default()
        };
        let mut engine = Engine::new(tx, config);
        engine.handle(StreamCommand::Connect(ConnectionMode::Simulation));
        assert!(engine.is_connected());
        assert!(engine.pump());
        engine.handle(StreamCommand::Disconnect);
        assert!(!engine.is_connected());
        assert!(!engine.pump());
        let events = drain(&rx);
        assert!(events.contains(&StreamEvent::Connected));
        assert!(events.contains(&StreamEvent::Value(15.0)));
        assert_eq!(events.last(), Some(&StreamEvent::Disconnected));
    }

    #[test]
    fn failed_connect_reports_disconnected() {
        let (tx, rx) = channel();
        let config = StreamConfig {
            address: "not a socket address".to_owned(),
            ..StreamConfig::default()
        };
        let mut engine = Engine::new(tx, config);
        engine.handle(StreamCommand::Connect(ConnectionMode::Tcp));
        assert!(!engine.is_connected());
        let events = drain(&rx);
        assert!(matches!(&events[0], StreamEvent::Log(msg) if msg.starts_with("Connect failed")));
        assert_eq!(events[1], StreamEvent::Disconnected);
    }

    #[test]
    fn websocket_mode_reports_open_and_close() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let config = StreamConfig {
            url: format!("ws://{}", listener.local_addr().unwrap()),
            ..StreamConfig::default()
        };
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut ws = tungstenite::accept(stream).unwrap();
            ws.send(tungstenite::Message::Text("18".into())).unwrap();
            ws.close(None).unwrap();
            while ws.read().is_ok() {}
        });
        let (tx, rx) = channel();
        let mut engine = Engine::new(tx, config);
        engine.handle(StreamCommand::Connect(ConnectionMode::WebSocket));
        for _ in 0..200 {
            if !engine.is_connected() {
                break;
            }
            engine.pump();
        }
        server.join().unwrap();
        let events = drain(&rx);
        assert!(events.contains(&StreamEvent::Connected));
        assert!(events.contains(&StreamEvent::Value(18.0)));
        assert_eq!(events.last(), Some(&StreamEvent::Disconnected));
    }
    #[test]
    fn thread_stops_when_gui_drops_commands() {
        let (tx, _rx) = channel();
        let (tx_cmd, rx_cmd) = channel();
        let handle = spawn_thread(tx, rx_cmd, StreamConfig::default());
        drop(tx_cmd);
        handle.join().unwrap();
    }
}
