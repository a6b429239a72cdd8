//! Simple TOML parser for dial configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! FanDial configuration. It does NOT support full TOML syntax.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - [section] headers
//! - Comments (# ...)
//!
//! Keys that are not recognised are skipped so newer files still load on
//! older firmware. Unknown sections are an error.

use heapless::String as HString;

use fandial_protocol::Channel;

use super::types::{BandRefresh, DialConfig, OfflinePolicy, ReconnectMode};

/// Parse error
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// String longer than its field allows
    TooLong,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Mqtt,
    Topics,
    Timing,
    Ui,
    Behavior,
}

/// Parse TOML configuration into DialConfig
///
/// Missing keys keep their defaults. The result is not validated; call
/// [`DialConfig::validate`] before use.
pub fn parse_config(input: &str) -> Result<DialConfig, ParseError> {
    let mut config = DialConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "mqtt" => Ok(Section::Mqtt),
        "topics" => Ok(Section::Topics),
        "timing" => Ok(Section::Timing),
        "ui" => Ok(Section::Ui),
        "behavior" | "behaviour" => Ok(Section::Behavior),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut DialConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => {}
        Section::Mqtt => {
            let mqtt = &mut config.mqtt;
            match key {
                "host" | "broker_host" => set_string(&mut mqtt.broker_host, value)?,
                "port" | "broker_port" => mqtt.broker_port = parse_int(value)?,
                "client_id" => set_string(&mut mqtt.client_id, value)?,
                "username" => set_string(&mut mqtt.username, value)?,
                "password" => set_string(&mut mqtt.password, value)?,
                _ => {}
            }
        }
        Section::Topics => {
            let channel = match key {
                "setpoint" | "fan" => Some(Channel::Setpoint),
                "inside" | "inside_temp" => Some(Channel::InsideTemp),
                "outside" | "outside_temp" => Some(Channel::OutsideTemp),
                _ => None,
            };
            if let Some(channel) = channel {
                config
                    .channels
                    .set(channel, parse_string(value)?)
                    .map_err(|_| ParseError::InvalidValue)?;
            }
        }
        Section::Timing => {
            let timing = &mut config.timing;
            match key {
                "reconnect_backoff_ms" => timing.reconnect_backoff_ms = parse_int(value)?,
                "render_interval_ms" => timing.render_interval_ms = parse_int(value)?,
                "long_press_ms" => timing.long_press_ms = parse_int(value)?,
                "shutdown_delay_ms" => timing.shutdown_delay_ms = parse_int(value)?,
                "connected_splash_ms" => timing.connected_splash_ms = parse_int(value)?,
                _ => {}
            }
        }
        Section::Ui => {
            let ui = &mut config.ui;
            match key {
                "fan_label" | "label" => set_string(&mut ui.fan_label, value)?,
                "reset_position" => ui.reset_position = parse_int(value)?,
                "tone_hz" => ui.tone_hz = parse_int(value)?,
                "tone_ms" => ui.tone_ms = parse_int(value)?,
                _ => {}
            }
        }
        Section::Behavior => {
            let behavior = &mut config.behavior;
            match key {
                "reconnect" => behavior.reconnect = parse_reconnect(value)?,
                "offline" => behavior.offline = parse_offline(value)?,
                "band_refresh" => behavior.band_refresh = parse_band_refresh(value)?,
                // Shorthand for band_refresh
                "partial_redraw" => {
                    behavior.band_refresh = if parse_bool(value)? {
                        BandRefresh::OnChange
                    } else {
                        BandRefresh::Always
                    }
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = if let Some(hash_pos) = value.find('#') {
        // Make sure # is not inside a string
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else {
        // Allow unquoted strings for simple values
        Ok(value)
    }
}

fn set_string<const N: usize>(field: &mut HString<N>, value: &str) -> Result<(), ParseError> {
    *field = HString::try_from(parse_string(value)?).map_err(|_| ParseError::TooLong)?;
    Ok(())
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_reconnect(value: &str) -> Result<ReconnectMode, ParseError> {
    match parse_string(value)? {
        "blocking" | "Blocking" => Ok(ReconnectMode::Blocking),
        "non_blocking" | "nonblocking" | "NonBlocking" => Ok(ReconnectMode::NonBlocking),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_offline(value: &str) -> Result<OfflinePolicy, ParseError> {
    match parse_string(value)? {
        "hold" | "Hold" => Ok(OfflinePolicy::Hold),
        "local_only" | "LocalOnly" => Ok(OfflinePolicy::LocalOnly),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_band_refresh(value: &str) -> Result<BandRefresh, ParseError> {
    match parse_string(value)? {
        "always" | "Always" => Ok(BandRefresh::Always),
        "on_change" | "OnChange" => Ok(BandRefresh::OnChange),
        _ => Err(ParseError::InvalidValue),
    }
}
