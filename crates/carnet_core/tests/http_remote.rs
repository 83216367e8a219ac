use carnet_core::geocode::nominatim::NominatimGeocoder;
use carnet_core::{
    Geocoder, GeocodeError, HttpSnapshotFetcher, SnapshotError, SnapshotFetcher,
    SNAPSHOT_FILE_NAME,
};
use httpmock::prelude::*;

#[test]
fn snapshot_fetch_parses_the_published_document() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(format!("/{SNAPSHOT_FILE_NAME}"))
            .query_param_exists("t");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"lists":[{"name":"Perso","collapsed":false,"items":[]}]}"#);
    });

    let fetcher = HttpSnapshotFetcher::new(&server.base_url()).unwrap();
    let data = fetcher
        .fetch()
        .expect("fetch should succeed")
        .expect("snapshot should be present");

    mock.assert();
    assert_eq!(data.lists().len(), 1);
    assert_eq!(data.lists()[0].name, "Perso");
}

#[test]
fn snapshot_fetch_reports_non_success_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("/{SNAPSHOT_FILE_NAME}"));
        then.status(404);
    });

    let fetcher = HttpSnapshotFetcher::new(&server.base_url()).unwrap();
    assert!(matches!(
        fetcher.fetch().unwrap_err(),
        SnapshotError::Status(404)
    ));
}

#[test]
fn snapshot_fetch_rejects_unparseable_payloads() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("/{SNAPSHOT_FILE_NAME}"));
        then.status(200).body("[1, 2, 3]");
    });

    let fetcher = HttpSnapshotFetcher::new(&server.base_url()).unwrap();
    assert!(matches!(
        fetcher.fetch().unwrap_err(),
        SnapshotError::Parse(_)
    ));
}

#[test]
fn nominatim_lookup_uses_first_candidate_shape() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/search")
            .query_param("format", "json")
            .query_param("q", "Louvre, Paris")
            .query_param("limit", "1");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"lat":"48.8606","lon":"2.3376","display_name":"Louvre"}]"#);
    });

    let geocoder = NominatimGeocoder::with_endpoint(format!("{}/search", server.base_url())).unwrap();
    let candidates = geocoder.lookup("Louvre, Paris").unwrap();

    mock.assert();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].lat, 48.8606);
    assert_eq!(candidates[0].lon, 2.3376);
}

#[test]
fn nominatim_lookup_with_no_match_returns_empty() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200).body("[]");
    });

    let geocoder = NominatimGeocoder::with_endpoint(format!("{}/search", server.base_url())).unwrap();
    assert!(geocoder.lookup("nowhere at all").unwrap().is_empty());
}

#[test]
fn nominatim_lookup_surfaces_status_and_decode_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search").query_param("q", "down");
        then.status(503);
    });
    server.mock(|when, then| {
        when.method(GET).path("/search").query_param("q", "garbled");
        then.status(200).body("{\"unexpected\":true}");
    });
    server.mock(|when, then| {
        when.method(GET).path("/search").query_param("q", "textual");
        then.status(200).body(r#"[{"lat":"north","lon":"2.0"}]"#);
    });

    let geocoder = NominatimGeocoder::with_endpoint(format!("{}/search", server.base_url())).unwrap();
    assert!(matches!(
        geocoder.lookup("down").unwrap_err(),
        GeocodeError::Status(503)
    ));
    assert!(matches!(
        geocoder.lookup("garbled").unwrap_err(),
        GeocodeError::Malformed(_)
    ));
    assert!(matches!(
        geocoder.lookup("textual").unwrap_err(),
        GeocodeError::Malformed(_)
    ));
}
