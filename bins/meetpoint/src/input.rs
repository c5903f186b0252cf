//! Participant input

use anyhow::{Context, Result};
use meetpoint_geo::ParticipantLocation;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Read participants from a JSON file, or stdin when `path` is `-`.
pub fn read_participants(path: &Path) -> Result<Vec<ParticipantLocation>> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read participants from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    let participants = parse_participants(&text)
        .with_context(|| format!("Invalid participant list in {}", path.display()))?;
    debug!(count = participants.len(), path = %path.display(), "Read participants");
    Ok(participants)
}

/// Parse `[{latitude, longitude, address?}]`.
///
/// Only a document that is not a JSON array is an error. Coordinates may be
/// numbers or numeric strings. An entry without two usable coordinates is
/// kept with NaN coordinates, so discovery drops it and counts it as
/// excluded. Range checks are likewise left to discovery.
pub fn parse_participants(text: &str) -> Result<Vec<ParticipantLocation>> {
    let entries: Vec<Value> = serde_json::from_str(text)?;
    let participants: Vec<ParticipantLocation> = entries.iter().map(participant_from).collect();

    let unusable = participants
        .iter()
        .filter(|p| p.coordinate.latitude.is_nan() || p.coordinate.longitude.is_nan())
        .count();
    if unusable > 0 {
        warn!(unusable, total = participants.len(), "Participant entries without usable coordinates");
    }
    Ok(participants)
}

fn participant_from(entry: &Value) -> ParticipantLocation {
    let latitude = entry.get("latitude").and_then(coordinate_value);
    let longitude = entry.get("longitude").and_then(coordinate_value);

    let participant = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => ParticipantLocation::new(latitude, longitude),
        _ => ParticipantLocation::new(f64::NAN, f64::NAN),
    };
    match entry.get("address").and_then(Value::as_str) {
        Some(address) => participant.with_address(address),
        None => participant,
    }
}

fn coordinate_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetpoint_geo::sanitize;
    use std::io::Write;

    #[test]
    fn test_parse_with_and_without_address() {
        let participants = parse_participants(
            r#"[{"latitude": -6.2088, "longitude": 106.8456, "address": "Jl. Sudirman"},
                {"latitude": -6.2, "longitude": 106.84}]"#,
        )
        .unwrap();
        assert_eq!(participants.len(), 2);
        assert_eq!(participants[0].address.as_deref(), Some("Jl. Sudirman"));
        assert!(participants[1].address.is_none());
    }

    #[test]
    fn test_out_of_range_is_accepted_for_later_sanitizing() {
        let participants = parse_participants(r#"[{"latitude": 120.0, "longitude": 0.0}]"#).unwrap();
        assert!(!participants[0].coordinate.is_valid());
    }

    #[test]
    fn test_only_non_array_documents_are_errors() {
        assert!(parse_participants(r#"{"latitude": 1.0}"#).is_err());
        assert!(parse_participants("not json").is_err());

        let participants = parse_participants(r#"[{"lat": 1.0, "lon": 2.0}, 7, null]"#).unwrap();
        assert_eq!(participants.len(), 3);
        assert!(participants.iter().all(|p| !p.coordinate.is_valid()));
    }

    #[test]
    fn test_bad_entry_is_excluded_not_fatal() {
        let participants = parse_participants(
            r#"[{"latitude": -6.2088, "longitude": 106.8456},
                {"latitude": null, "longitude": 106.8400, "address": "Unknown"},
                {"latitude": -6.2000, "longitude": 106.8400}]"#,
        )
        .unwrap();
        assert_eq!(participants.len(), 3);
        assert_eq!(participants[1].address.as_deref(), Some("Unknown"));

        let sanitized = sanitize(participants);
        assert_eq!(sanitized.valid.len(), 2);
        assert_eq!(sanitized.excluded, 1);
        assert_eq!(sanitized.valid[1].coordinate.latitude, -6.2);
    }

    #[test]
    fn test_numeric_strings_are_coordinates() {
        let participants = parse_participants(
            r#"[{"latitude": " -6.2088", "longitude": "106.8456"},
                {"latitude": "south", "longitude": "106.84"},
                {"longitude": 106.84}]"#,
        )
        .unwrap();
        let sanitized = sanitize(participants);
        assert_eq!(sanitized.excluded, 2);
        assert_eq!(sanitized.valid.len(), 1);
        assert_eq!(sanitized.valid[0].coordinate.latitude, -6.2088);
        assert_eq!(sanitized.valid[0].coordinate.longitude, 106.8456);
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"latitude": 1.5, "longitude": 2.5}}]"#).unwrap();
        let participants = read_participants(file.path()).unwrap();
        assert_eq!(participants[0].coordinate.latitude, 1.5);

        let err = read_participants(Path::new("/nonexistent/people.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
