#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_scout_core::{Command, Event, WallOrientation};
use maze_scout_world::{self as world, query, World};
use serde::{Deserialize, Serialize};

const SNAPSHOT_DOMAIN: &str = "maze-scout";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "maze-scout:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of a carved wall layout and the grid configuration.
///
/// A fresh grid starts fully walled, so the snapshot only records the
/// segments that were removed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct WallLayoutSnapshot {
    /// Number of cell columns contained in the grid.
    pub columns: u32,
    /// Number of cell rows contained in the grid.
    pub rows: u32,
    /// Length of a single cell edge expressed in pixels.
    pub cell_size: f32,
    /// Wall segments absent from the fully-walled baseline.
    pub open_walls: Vec<OpenWall>,
}

impl WallLayoutSnapshot {
    /// Captures the current wall layout of the provided world.
    pub(crate) fn capture(world: &World) -> Self {
        let view = query::wall_grid_view(world);
        let (columns, rows) = query::grid_size(world);
        let mut open_walls = Vec::new();

        for row in 0..=rows as i32 {
            for column in 0..columns as i32 {
                if !view.wall(WallOrientation::Horizontal, row, column) {
                    open_walls.push(OpenWall {
                        orientation: WallOrientation::Horizontal,
                        row,
                        column,
                    });
                }
            }
        }
        for row in 0..rows as i32 {
            for column in 0..=columns as i32 {
                if !view.wall(WallOrientation::Vertical, row, column) {
                    open_walls.push(OpenWall {
                        orientation: WallOrientation::Vertical,
                        row,
                        column,
                    });
                }
            }
        }

        Self {
            columns,
            rows,
            cell_size: query::cell_size(world),
            open_walls,
        }
    }

    /// Reconfigures the world to match the snapshot.
    pub(crate) fn apply_to(&self, world: &mut World, out_events: &mut Vec<Event>) {
        world::apply(
            world,
            Command::ConfigureGrid {
                columns: self.columns,
                rows: self.rows,
                cell_size: self.cell_size,
            },
            out_events,
        );
        for open in &self.open_walls {
            world::apply(
                world,
                Command::SetWall {
                    orientation: open.orientation,
                    row: open.row,
                    column: open.column,
                    present: false,
                },
                out_events,
            );
        }
    }

    /// Encodes the snapshot into a single-line string suitable for clipboard
    /// transfer.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableSnapshot {
            cell_size: self.cell_size,
            open_walls: self.open_walls.clone(),
        };
        let json = serde_json::to_vec(&payload).expect("layout snapshot serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{SNAPSHOT_HEADER}:{}x{}:{encoded}", self.columns, self.rows)
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: SerializableSnapshot =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            columns,
            rows,
            cell_size: decoded.cell_size,
            open_walls: decoded.open_walls,
        })
    }
}

/// Single absent wall segment captured within a layout snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct OpenWall {
    /// Orientation of the absent segment.
    pub orientation: WallOrientation,
    /// Row index of the segment within its wall array.
    pub row: i32,
    /// Column index of the segment within its wall array.
    pub column: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableSnapshot {
    cell_size: f32,
    open_walls: Vec<OpenWall>,
}

/// Errors that can occur while decoding layout transfer strings.
#[derive(Debug)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    MissingVersion,
    /// The encoded snapshot did not include grid dimensions.
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded snapshot.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for LayoutTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "layout payload was empty"),
            Self::MissingPrefix => write!(f, "layout string is missing the prefix"),
            Self::MissingVersion => write!(f, "layout string is missing the version"),
            Self::MissingDimensions => write!(f, "layout string is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "layout string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "layout prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "layout version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode layout payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse layout payload: {error}")
            }
        }
    }
}

impl Error for LayoutTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(LayoutTransferError::InvalidDimensions(
            dimensions.to_owned(),
        ));
    }

    Ok((columns, rows))
}
