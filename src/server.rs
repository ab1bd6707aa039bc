//! Single-client request/response loop.
//!
//! Strictly sequential: one connection is accepted, read once, answered and
//! closed before the next accept. The fan state lives here and is only ever
//! touched between accept and close, so no synchronization is involved.

use std::io::{Read, Write};
use std::net::TcpListener;

use anyhow::Result;

use crate::motor::Fan;
use crate::page;
use crate::request::{self, ParsedRequest, Switch};

/// Speed applied when the fan is switched on via the ON button. The stored
/// speed is left alone so the page keeps showing the slider's last value.
pub const DEFAULT_ON_SPEED: u8 = 30;

/// A request is read once into this buffer; anything beyond it is dropped,
/// not reassembled.
const REQUEST_BUF_LEN: usize = 1024;

const RESPONSE_HEADER: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Power {
    #[default]
    Off,
    On,
}

/// Process-wide fan state. Resets to off on every boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FanState {
    pub power: Power,
    pub speed: u8,
}

/// Apply parsed intents to the state and the motor.
///
/// The switch branch runs first, then the speed branch independently: a
/// positive speed forces the fan on even when no switch marker was present,
/// but a speed of zero never switches it off.
pub fn apply(parsed: &ParsedRequest, state: &mut FanState, motor: &mut dyn Fan) -> Result<()> {
    match parsed.switch {
        Some(Switch::On) => {
            motor.forward()?;
            motor.set_speed(DEFAULT_ON_SPEED)?;
            state.power = Power::On;
        }
        Some(Switch::Off) => {
            motor.off()?;
            state.speed = 0;
            state.power = Power::Off;
        }
        None => {}
    }

    if let Some(speed) = parsed.speed {
        state.speed = speed;
        if speed > 0 {
            motor.forward()?;
            state.power = Power::On;
        }
        motor.set_speed(speed)?;
    }

    Ok(())
}

/// Handle one already-accepted connection: read, dispatch, respond.
///
/// The page response is skipped for the slider's AJAX calls; the client
/// learns the body ended when the connection closes, so no Content-Length
/// is sent.
pub fn handle_client<S: Read + Write>(
    stream: &mut S,
    state: &mut FanState,
    motor: &mut dyn Fan,
) -> Result<()> {
    let mut buf = [0u8; REQUEST_BUF_LEN];
    let n = stream.read(&mut buf)?;
    let raw = String::from_utf8_lossy(&buf[..n]);
    log::info!("request:\n{}", raw);

    let parsed = request::parse(&raw);
    apply(&parsed, state, motor)?;

    if !parsed.suppress_page {
        stream.write_all(RESPONSE_HEADER)?;
        stream.write_all(page::render(state).as_bytes())?;
    }

    Ok(())
}

/// Accept and serve connections forever, one at a time. Any I/O or
/// peripheral failure aborts the loop and bubbles up to `main`.
pub fn serve(listener: &TcpListener, state: &mut FanState, motor: &mut dyn Fan) -> Result<()> {
    loop {
        let (mut stream, peer) = listener.accept()?;
        log::debug!("client connected: {}", peer);
        handle_client(&mut stream, state, motor)?;
        // stream dropped here => connection closed before the next accept
    }
}
