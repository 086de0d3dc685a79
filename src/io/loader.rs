// src/io/loader.rs
//! Parsing of whitespace-delimited gait capture files
//!
//! The capture format has no header row: one line per sample, numeric
//! columns in fixed positional order (Time, Heel, Toe, Hip, Knee, Ankle,
//! then any declared EMG channels). Column identity comes entirely from
//! the configured [`ChannelLayout`], so a count mismatch on any line is a
//! schema error, not something to silently truncate.

use tracing::debug;

use crate::error::{GaitError, GaitResult};
use crate::recording::{ChannelLayout, Recording};

/// Parse a whole capture file into a [`Recording`].
pub fn parse_recording(text: &str, layout: &ChannelLayout) -> GaitResult<Recording> {
    let expected = layout.column_count();
    let names = layout.channel_names();

    let mut time = Vec::new();
    let mut columns: Vec<Vec<f32>> = vec![Vec::new(); names.len()];

    for (line_idx, line) in text.lines().enumerate() {
        let line_no = line_idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != expected {
            return Err(GaitError::Schema {
                line: line_no,
                reason: format!("expected {} columns, found {}", expected, fields.len()),
            });
        }

        for (col, field) in fields.iter().enumerate() {
            let value: f32 = field.parse().map_err(|_| GaitError::Schema {
                line: line_no,
                reason: format!("column {} is not numeric: '{}'", col + 1, field),
            })?;
            if col == 0 {
                time.push(value);
            } else {
                columns[col - 1].push(value);
            }
        }
    }

    if time.is_empty() {
        return Err(GaitError::Schema {
            line: 1,
            reason: "input contains no data rows".to_string(),
        });
    }

    debug!(samples = time.len(), channels = names.len(), "parsed recording");

    let channels = names.into_iter().zip(columns).collect();
    Recording::new(time, channels, layout.emg_names().to_vec())
}
