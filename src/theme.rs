//! Terminal background detection.
//!
//! Styles pick darker colors on light backgrounds. The background comes from,
//! in order: an explicit override (`--theme light|dark`), the OSC 11 reply
//! captured at startup, then `COLORFGBG`.

use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Light,
    Dark,
}

static BACKGROUND_OVERRIDE: OnceLock<Mutex<Option<Background>>> = OnceLock::new();

/// Force the background, or `None` to fall back to `COLORFGBG`.
pub fn set_background(mode: Option<Background>) {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    *lock.lock().unwrap_or_else(PoisonError::into_inner) = mode;
}

pub fn background() -> Background {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Some(mode) = *lock.lock().unwrap_or_else(PoisonError::into_inner) {
        return mode;
    }
    background_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

pub fn is_light_background() -> bool {
    background() == Background::Light
}

fn background_from_colorfgbg(colorfgbg: Option<&str>) -> Background {
    let Some(value) = colorfgbg else {
        return Background::Dark;
    };
    let bg = value.rsplit(';').next().unwrap_or(value);
    match bg.parse::<u8>() {
        Ok(index) if index >= 7 => Background::Light,
        _ => Background::Dark,
    }
}

/// Classify an RGB background by relative luminance.
pub fn background_from_rgb(r: u8, g: u8, b: u8) -> Background {
    let luma = 0.0722f32.mul_add(
        f32::from(b),
        0.2126f32.mul_add(f32::from(r), 0.7152 * f32::from(g)),
    );
    if luma >= 140.0 {
        Background::Light
    } else {
        Background::Dark
    }
}

/// Parse `ESC ] 11 ; rgb:RRRR/GGGG/BBBB` terminated by BEL or ST.
pub fn parse_osc11_reply(reply: &str) -> Option<(u8, u8, u8)> {
    let start = reply.find("rgb:")?;
    let mut parts = reply[start + 4..].split(['/', '\x07', '\x1b']);
    let r = parse_osc_component(parts.next()?)?;
    let g = parse_osc_component(parts.next()?)?;
    let b = parse_osc_component(parts.next()?)?;
    Some((r, g, b))
}

fn parse_osc_component(s: &str) -> Option<u8> {
    let hex = s.trim();
    match hex.len() {
        2 => u8::from_str_radix(hex, 16).ok(),
        n if n >= 4 => {
            let value = u16::from_str_radix(&hex[..4], 16).ok()?;
            u8::try_from(value >> 8).ok()
        }
        _ => None,
    }
}

/// Ask the terminal for its background color.
///
/// Talks to `/dev/tty` so it works with stdout piped. Returns `None` when the
/// terminal does not answer within a short timeout.
#[cfg(unix)]
pub fn detect_background() -> Option<Background> {
    use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

    let _raw = enable_raw_mode();
    let reply = query_osc11(Duration::from_millis(75));
    let _ = disable_raw_mode();

    let (r, g, b) = parse_osc11_reply(&reply.ok()??)?;
    Some(background_from_rgb(r, g, b))
}

#[cfg(not(unix))]
pub fn detect_background() -> Option<Background> {
    // Reading the console on a helper thread blocks crossterm's input.
    None
}

#[cfg(unix)]
fn query_osc11(timeout: Duration) -> std::io::Result<Option<String>> {
    use std::io::{Read, Write};
    use std::sync::mpsc;

    let mut tty = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open("/dev/tty")?;
    let mut reader = tty.try_clone()?;

    tty.write_all(b"\x1b]11;?\x07")?;
    tty.flush()?;

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut buf = [0u8; 256];
        let mut collected = Vec::new();
        while let Ok(n) = reader.read(&mut buf) {
            if n == 0 {
                continue;
            }
            collected.extend_from_slice(&buf[..n]);
            if collected.contains(&b'\x07') || collected.windows(2).any(|w| w == b"\x1b\\") {
                let _ = tx.send(collected);
                break;
            }
        }
    });

    Ok(rx
        .recv_timeout(timeout)
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
}
