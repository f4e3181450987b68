//! Leaflet map documents for map and location queries.
//!
//! When the user asks to *see* positions instead of a table, the query result
//! is rendered as a complete standalone HTML page with one marker per
//! distinct float position. The frontend injects the document verbatim.

use std::collections::HashSet;

use serde_json::{json, Map, Value};

/// Cap on plotted positions to keep the document light.
const MAX_POSITIONS: usize = 1000;

/// Initial zoom when there are markers to frame.
const DEFAULT_ZOOM: u8 = 4;

/// True when the query asks for a map rather than a table.
pub fn wants_map(query: &str) -> bool {
    let lowered = query.to_lowercase();
    lowered.contains("map") || lowered.contains("location")
}

/// Render the distinct positions in `rows` as a standalone Leaflet page.
/// Rows without usable latitude and longitude columns are ignored.
pub fn map_html(rows: &[Map<String, Value>]) -> String {
    let markers = marker_data(rows);
    let (center_lat, center_lon) = center(&markers);
    let zoom = if markers.is_empty() { 2 } else { DEFAULT_ZOOM };
    let markers_json = serde_json::to_string(&markers).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>Float positions</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
const markers = {markers_json};
const map = L.map('map').setView([{center_lat}, {center_lon}], {zoom});
L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
  attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);
for (const m of markers) {{
  L.marker([m.lat, m.lon]).addTo(map).bindPopup(m.label);
}}
</script>
</body>
</html>
"#
    )
}

/// Distinct (lat, lon) markers with a short popup label.
fn marker_data(rows: &[Map<String, Value>]) -> Vec<Value> {
    let mut seen: HashSet<(u64, u64)> = HashSet::new();
    let mut markers = Vec::new();

    for row in rows {
        let Some(lat) = row.get("latitude").and_then(Value::as_f64) else {
            continue;
        };
        let Some(lon) = row.get("longitude").and_then(Value::as_f64) else {
            continue;
        };
        if !seen.insert((lat.to_bits(), lon.to_bits())) {
            continue;
        }

        markers.push(json!({
            "lat": lat,
            "lon": lon,
            "label": marker_label(row, lat, lon),
        }));
        if markers.len() >= MAX_POSITIONS {
            break;
        }
    }
    markers
}

fn marker_label(row: &Map<String, Value>, lat: f64, lon: f64) -> String {
    let mut label = format!("({lat:.3}, {lon:.3})");
    if let Some(time) = row.get("time").and_then(Value::as_str) {
        label.push_str(&format!("<br>{time}"));
    }
    if let Some(temperature) = row.get("temperature").and_then(Value::as_f64) {
        label.push_str(&format!("<br>temp {temperature:.2}"));
    }
    if let Some(salinity) = row.get("salinity").and_then(Value::as_f64) {
        label.push_str(&format!("<br>sal {salinity:.2}"));
    }
    label
}

/// Mean position of the markers; (0, 0) for an empty set.
fn center(markers: &[Value]) -> (f64, f64) {
    if markers.is_empty() {
        return (0.0, 0.0);
    }
    let count = markers.len() as f64;
    let (lat_sum, lon_sum) = markers.iter().fold((0.0, 0.0), |(lat, lon), marker| {
        (
            lat + marker["lat"].as_f64().unwrap_or(0.0),
            lon + marker["lon"].as_f64().unwrap_or(0.0),
        )
    });
    (lat_sum / count, lon_sum / count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(lat: f64, lon: f64) -> Map<String, Value> {
        let mut row = Map::new();
        row.insert("latitude".to_string(), json!(lat));
        row.insert("longitude".to_string(), json!(lon));
        row.insert("time".to_string(), json!("2023-01-15 10:30:00"));
        row.insert("temperature".to_string(), json!(21.37));
        row.insert("salinity".to_string(), json!(35.12));
        row
    }

    #[test]
    fn labels_carry_time_temperature_and_salinity() {
        let label = marker_label(&row(-12.5, 45.0), -12.5, 45.0);
        assert!(label.contains("2023-01-15 10:30:00"));
        assert!(label.contains("temp 21.37"));
        assert!(label.contains("sal 35.12"));
    }

    #[test]
    fn map_requests_are_detected_case_insensitively() {
        assert!(wants_map("Show me a MAP of the floats"));
        assert!(wants_map("where is the float location?"));
        assert!(!wants_map("average temperature by depth"));
    }

    #[test]
    fn document_embeds_markers_and_leaflet() {
        let html = map_html(&[row(-12.5, 45.0)]);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("leaflet@1.9.4"));
        assert!(html.contains("\"lat\":-12.5"));
        assert!(html.contains("2023-01-15 10:30:00"));
        // Template braces must survive formatting for the tile URL.
        assert!(html.contains("{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"));
    }

    #[test]
    fn repeated_positions_collapse_to_one_marker() {
        let rows = vec![row(-12.5, 45.0), row(-12.5, 45.0), row(-13.0, 46.0)];
        assert_eq!(marker_data(&rows).len(), 2);
    }

    #[test]
    fn rows_without_coordinates_are_ignored() {
        let mut no_coords = Map::new();
        no_coords.insert("temperature".to_string(), json!(20.0));
        assert!(marker_data(&[no_coords]).is_empty());
    }

    #[test]
    fn empty_result_still_renders_a_world_map() {
        let html = map_html(&[]);
        assert!(html.contains("const markers = [];"));
        assert!(html.contains("setView([0, 0], 2)"));
    }

    #[test]
    fn center_is_the_mean_position() {
        let markers = marker_data(&[row(-10.0, 40.0), row(-20.0, 50.0)]);
        assert_eq!(center(&markers), (-15.0, 45.0));
    }
}
