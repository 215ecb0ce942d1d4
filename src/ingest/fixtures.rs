/// Test fixtures: trimmed SWPC payloads.
///
/// OVATION response shape:
///   "Observation Time" / "Forecast Time" - ISO 8601 UTC
///   "Data Format"  - "[Longitude, Latitude, Aurora]"
///   coordinates[]  - [lon 0..359, lat -90..90, aurora 0..100], whole numbers
///
/// The real grid has 65,160 points; these keep only what the tests need.
///
/// K-index response shape: array of one-minute readings, oldest first,
///   { time_tag, kp_index (int), estimated_kp (float), kp ("6P" style label) }

/// Grid containing the default observer point (lon 18, lat 60) at 55.
pub(crate) fn fixture_ovation_json() -> &'static str {
    r#"{
      "Observation Time": "2024-05-10T21:53:00Z",
      "Forecast Time": "2024-05-10T22:38:00Z",
      "Data Format": "[Longitude, Latitude, Aurora]",
      "coordinates": [
        [0, -90, 0],
        [17, 60, 48],
        [18, 59, 41],
        [18, 60, 55],
        [18, 61, 62],
        [19, 60, 57],
        [200, 67, 97]
      ],
      "type": "MultiPoint"
    }"#
}

/// Strong activity next to the observer but no entry for (18, 60) itself.
pub(crate) fn fixture_ovation_missing_point_json() -> &'static str {
    r#"{
      "Observation Time": "2024-05-10T21:53:00Z",
      "Forecast Time": "2024-05-10T22:38:00Z",
      "coordinates": [
        [17, 60, 90],
        [18, 61, 90],
        [19, 60, 90]
      ],
      "type": "MultiPoint"
    }"#
}

/// Successful response with no grid points.
pub(crate) fn fixture_ovation_empty_json() -> &'static str {
    r#"{
      "Observation Time": "2024-05-10T21:53:00Z",
      "Forecast Time": "2024-05-10T22:38:00Z",
      "coordinates": [],
      "type": "MultiPoint"
    }"#
}

/// Three readings; the last one (Kp 6) is current.
pub(crate) fn fixture_kp_json() -> &'static str {
    r#"[
      { "time_tag": "2024-05-10T22:00:00", "kp_index": 4, "estimated_kp": 4.67, "kp": "5M" },
      { "time_tag": "2024-05-10T22:01:00", "kp_index": 5, "estimated_kp": 5.33, "kp": "5P" },
      { "time_tag": "2024-05-10T22:02:00", "kp_index": 6, "estimated_kp": 6.33, "kp": "6P" }
    ]"#
}
