use std::io::{self, BufRead, BufReader, ErrorKind, Read};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tungstenite::client::IntoClientRequest;
use tungstenite::{Message, WebSocket};
use crate::chart::ChartError;
/// How long a socket read may block before the engine gets control back.
const READ_POLL: Duration = Duration::from_millis(50);
/// Longest accepted line; anything longer becomes a single NaN sample.
pub const MAX_LINE_BYTES: usize = 4096;
/// Widest simulated jitter amplitude.
pub const MAX_JITTER: f64 = 1.0e6;
/// Something that yields scalar samples on demand.
pub trait ValueSource: Send {
    /// `Ok(None)` when nothing is available yet. An error means the source
    /// is gone and will not produce more values.
    fn next_value(&mut self) -> Result<Option<f64>, ChartError>;
}
fn is_poll_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}
fn resolve(address: impl ToSocketAddrs, label: &str) -> Result<SocketAddr, ChartError> {
    let addr = address.to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(ErrorKind::NotFound, format!("{label} did not resolve"))
    })?;
    Ok(addr)
}
/// In-memory source for deterministic playback; closes once drained.
#[cfg(test)]
pub struct ManualSource {
    queue: std::collections::VecDeque<f64>,
}
#[cfg(test)]
impl ManualSource {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            queue: values.into_iter().collect(),
        }
    }
}
#[cfg(test)]
impl ValueSource for ManualSource {
    fn next_value(&mut self) -> Result<Option<f64>, ChartError> {
        self.queue
            .pop_front()
            .map(Some)
            .ok_or(ChartError::StreamClosed)
    }
}
/// Synthetic temperature feed: a ramp of half-degree steps starting at 15.0,
/// one step per interval, with optional uniform jitter.
pub struct SimulatedSource {
    step: u64,
    interval: Duration,
    last_emit: Option<Instant>,
    jitter: f64,
    rng: StdRng,
}
impl SimulatedSource {
    pub fn new(interval: Duration) -> Self {
        Self {
            step: 30,
            interval,
            last_emit: None,
            jitter: 0.0,
            rng: StdRng::from_entropy(),
        }
    }
    /// Amplitudes above [`MAX_JITTER`] are clamped; NaN disables jitter.
    pub fn with_jitter(mut self, jitter: f64, seed: u64) -> Self {
        let amplitude = jitter.abs();
        self.jitter = if amplitude.is_nan() {
            0.0
        } else {
            amplitude.min(MAX_JITTER)
        };
        if self.jitter != amplitude {
            log::warn!("simulation jitter {jitter} clamped to {}", self.jitter);
        }
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}
impl ValueSource for SimulatedSource {
    fn next_value(&mut self) -> Result<Option<f64>, ChartError> {
        if let Some(last) = self.last_emit {
            if last.elapsed() < self.interval {
                return Ok(None);
            }
        }
        self.last_emit = Some(Instant::now());
        let mut value = self.step as f64 / 2.0;
        self.step += 1;
        if self.jitter > 0.0 {
            value += self.rng.gen_range(-self.jitter..self.jitter);
        }
        Ok(Some(value))
    }
}
/// Newline-framed text stream over TCP, one sample per line. Bytes are kept
/// raw until a whole line is in, then decoded lossily.
pub struct TcpLineSource {
    reader: BufReader<TcpStream>,
    pending: Vec<u8>,
    // inside an over-long line that was already reported
    skipping: bool,
    field: Option<String>,
}
impl TcpLineSource {
    pub fn connect(
        address: &str,
        timeout: Duration,
        field: Option<String>,
    ) -> Result<Self, ChartError> {
        let addr = resolve(address, address)?;
        let stream = TcpStream::connect_timeout(&addr, timeout)?;
        stream.set_read_timeout(Some(READ_POLL))?;
        log::info!("connected to {addr}");
        Ok(Self {
            reader: BufReader::new(stream),
            pending: Vec::new(),
            skipping: false,
            field,
        })
    }
    fn take_line(&mut self) -> Option<f64> {
        if self.pending.last() != Some(&b'\n') {
            if self.pending.len() <= MAX_LINE_BYTES {
                // Partial line; the rest arrives on a later poll.
                return None;
            }
            self.pending.clear();
            if std::mem::replace(&mut self.skipping, true) {
                return None;
            }
            log::warn!("line longer than {MAX_LINE_BYTES} bytes dropped");
            return Some(f64::NAN);
        }
        let line = std::mem::take(&mut self.pending);
        if std::mem::take(&mut self.skipping) {
            return None;
        }
        let text = String::from_utf8_lossy(&line);
        if text.trim().is_empty() {
            return None;
        }
        Some(parse_sample(&text, self.field.as_deref()))
    }
}
impl ValueSource for TcpLineSource {
    fn next_value(&mut self) -> Result<Option<f64>, ChartError> {
        // One byte past the cap is enough to tell an over-long line apart.
        let room = (MAX_LINE_BYTES + 1).saturating_sub(self.pending.len()) as u64;
        // read_until keeps what it consumed when the poll times out mid-line.
        match (&mut self.reader).take(room).read_until(b'\n', &mut self.pending) {
            Ok(0) => Err(ChartError::StreamClosed),
            Ok(_) => Ok(self.take_line()),
            Err(e) if is_poll_timeout(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
/// WebSocket client, one sample per text or binary message.
pub struct WebSocketSource {
    socket: WebSocket<TcpStream>,
    field: Option<String>,
}
impl WebSocketSource {
    /// `timeout` bounds both the TCP connect and the opening handshake.
    pub fn connect(url: &str, timeout: Duration, field: Option<String>) -> Result<Self, ChartError> {
        let handshake_failed = |reason: String| ChartError::Handshake {
            url: url.to_owned(),
            reason,
        };
        let request = url.into_client_request()?;
        let uri = request.uri();
        if uri.scheme_str() != Some("ws") {
            return Err(handshake_failed("only ws:// urls are supported".to_owned()));
        }
        let host = uri
            .host()
            .ok_or_else(|| handshake_failed("url has no host".to_owned()))?
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_owned();
        let port = uri.port_u16().unwrap_or(80);
        let addr = resolve((host.as_str(), port), url)?;
        let stream = TcpStream::connect_timeout(&addr, timeout)?;
        stream.set_read_timeout(Some(timeout))?;
        let (socket, _) =
            tungstenite::client(request, stream).map_err(|e| handshake_failed(e.to_string()))?;
        socket.get_ref().set_read_timeout(Some(READ_POLL))?;
        log::info!("websocket open to {url}");
        Ok(Self { socket, field })
    }
}
impl ValueSource for WebSocketSource {
    fn next_value(&mut self) -> Result<Option<f64>, ChartError> {
        let payload = match self.socket.read() {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
            Ok(Message::Close(frame)) => {
                log::info!("websocket closed by peer: {frame:?}");
                return Err(ChartError::StreamClosed);
            }
            // pings are answered by tungstenite on the next read
            Ok(_) => return Ok(None),
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                return Err(ChartError::StreamClosed)
            }
            Err(tungstenite::Error::Io(e)) if is_poll_timeout(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if payload.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(parse_sample(&payload, self.field.as_deref())))
    }
}
impl Drop for WebSocketSource {
    fn drop(&mut self) {
        // Best effort; the peer may already be gone.
        self.socket.close(None).ok();
    }
}
/// Decodes one stream payload: a bare number, or a JSON object holding the
/// number under `field`. Anything else becomes NaN.
pub fn parse_sample(payload: &str, field: Option<&str>) -> f64 {
    let payload = payload.trim();
    if let Ok(value) = payload.parse::<f64>() {
        return value;
    }
    if let Some(field) = field {
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(payload) {
            let value = map.get(field).and_then(|v| match v {
                serde_json::Value::Number(n) => n.as_f64(),
                serde_json::Value::String(s) => s.trim().parse().ok(),
                _ => None,
            });
            if let Some(value) = value {
                return value;
            }
        }
    }
    log::warn!("unparsable sample {payload:?}");
    f64::NAN
}
