#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use bloon_defence_core::SavedGame;

const SAVE_DOMAIN: &str = "bloons";
const SAVE_FORMAT: &str = "v1";

/// Identifier prefix emitted before the encoded save payload.
pub(crate) const SAVE_HEADER: &str = "bloons:v1";
/// Delimiter used to separate the prefix, round marker and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a saved game into a single-line string suitable for clipboard transfer.
///
/// The round index is repeated in clear text so a string can be identified
/// without decoding it.
pub(crate) fn encode(save: &SavedGame) -> Result<String, SaveTransferError> {
    let json = serde_json::to_vec(save).map_err(SaveTransferError::InvalidPayload)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!("{SAVE_HEADER}:r{}:{encoded}", save.round))
}

/// Decodes a saved game from the provided string representation.
pub(crate) fn decode(value: &str) -> Result<SavedGame, SaveTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SaveTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(SaveTransferError::MissingPrefix)?;
    let format = parts.next().ok_or(SaveTransferError::MissingVersion)?;
    let marker = parts.next().ok_or(SaveTransferError::MissingRound)?;
    let payload = parts.next().ok_or(SaveTransferError::MissingPayload)?;

    if domain != SAVE_DOMAIN {
        return Err(SaveTransferError::InvalidPrefix(domain.to_owned()));
    }
    if format != SAVE_FORMAT {
        return Err(SaveTransferError::UnsupportedVersion(format.to_owned()));
    }

    let round = parse_round(marker)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(SaveTransferError::InvalidEncoding)?;
    let save: SavedGame =
        serde_json::from_slice(&bytes).map_err(SaveTransferError::InvalidPayload)?;

    if save.round != round {
        return Err(SaveTransferError::RoundMismatch {
            marker: round,
            payload: save.round,
        });
    }
    Ok(save)
}

/// Errors that can occur while decoding save transfer strings.
#[derive(Debug)]
pub(crate) enum SaveTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded save.
    MissingPrefix,
    /// The encoded save did not contain a version segment.
    MissingVersion,
    /// The encoded save did not include the round marker.
    MissingRound,
    /// The encoded save did not include the payload segment.
    MissingPayload,
    /// The encoded save used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded save used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The round marker could not be parsed.
    InvalidRound(String),
    /// The round marker disagrees with the decoded payload.
    RoundMismatch {
        /// Round named by the marker.
        marker: u32,
        /// Round stored in the payload.
        payload: u32,
    },
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for SaveTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "save string was empty"),
            Self::MissingPrefix => write!(f, "save string is missing the prefix"),
            Self::MissingVersion => write!(f, "save string is missing the version"),
            Self::MissingRound => write!(f, "save string is missing the round marker"),
            Self::MissingPayload => write!(f, "save string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "save prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "save version '{version}' is not supported")
            }
            Self::InvalidRound(marker) => write!(f, "could not parse round marker '{marker}'"),
            Self::RoundMismatch { marker, payload } => write!(
                f,
                "round marker {marker} does not match saved round {payload}"
            ),
            Self::InvalidEncoding(error) => write!(f, "could not decode save payload: {error}"),
            Self::InvalidPayload(error) => write!(f, "could not parse save payload: {error}"),
        }
    }
}

impl Error for SaveTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_round(marker: &str) -> Result<u32, SaveTransferError> {
    marker
        .strip_prefix(['r', 'R'])
        .and_then(|digits| digits.trim().parse::<u32>().ok())
        .ok_or_else(|| SaveTransferError::InvalidRound(marker.to_owned()))
}
