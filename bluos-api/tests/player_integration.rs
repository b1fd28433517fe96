//! HTTP-level integration tests against a mock player.
//!
//! These tests stand up a local mock server and point a client at it, so
//! every request/response pair is exercised without a real player on the
//! network.

use bluos_api::{ApiError, Endpoint, Player};
use mockito::{Server, ServerGuard};
use rstest::rstest;

fn connect(server: &ServerGuard) -> Player {
    let endpoint: Endpoint = server
        .host_with_port()
        .parse()
        .expect("mock server address should parse");
    Player::new(endpoint)
}

const STATUS_BODY: &str = "<status etag=\"a1\">\
    <state>play</state>\
    <volume>24</volume>\
    <service>LocalMusic</service>\
    <title1>Moon Safari</title1>\
    <title2>Air</title2>\
    <title3>La Femme D'Argent</title3>\
    </status>";

/// Test a full status round trip
#[test]
fn test_status_snapshot_fields() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/Status")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(STATUS_BODY)
        .create();

    let player = connect(&server);
    let status = player.status().expect("status should fetch");

    assert_eq!(status.state(), Some("play"));
    assert_eq!(status.volume().unwrap(), 24);
    assert_eq!(status.get("service"), Some("LocalMusic"));
    assert_eq!(
        status.now_playing(),
        "Air  /  La Femme D'Argent  /  Moon Safari"
    );

    mock.assert();
}

/// Test the paused now-playing line end to end
#[test]
fn test_now_playing_includes_pause_marker() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/Status")
        .with_status(200)
        .with_body(
            "<status><state>pause</state><title1>Radio</title1><title2>Show</title2></status>",
        )
        .create();

    let player = connect(&server);
    assert_eq!(player.now_playing().unwrap(), "Show  /  Radio (paused)");
}

/// Test identity extraction from SyncStatus attributes
#[test]
fn test_player_name_from_sync_status() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/SyncStatus")
        .with_status(200)
        .with_body("<SyncStatus name=\"Living Room\" brand=\"Bluesound\" model=\"N130\"/>")
        .create();

    let player = connect(&server);
    assert_eq!(player.player_name().unwrap(), "Living Room");
    assert_eq!(player.sync_status().unwrap().brand(), Some("Bluesound"));
}

/// Test that a nameless SyncStatus is a parse error
#[test]
fn test_player_name_missing_is_parse_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/SyncStatus")
        .with_status(200)
        .with_body("<SyncStatus volume=\"10\"/>")
        .create();

    let player = connect(&server);
    assert!(matches!(player.player_name(), Err(ApiError::Parse(_))));
}

/// Test that an unparsable body degrades to an empty snapshot
#[test]
fn test_malformed_body_yields_empty_status() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/Status")
        .with_status(200)
        .with_body("Internal hiccup, try again")
        .create();

    let player = connect(&server);
    let status = player.status().expect("malformed bodies are not errors");

    assert!(status.is_empty());
    assert_eq!(status.now_playing(), "");
    assert!(matches!(status.volume(), Err(ApiError::Parse(_))));
}

/// Test HTTP error mapping
#[test]
fn test_http_error_maps_to_network() {
    let mut server = Server::new();
    let _mock = server.mock("GET", "/Status").with_status(500).create();

    let player = connect(&server);
    assert!(matches!(player.status(), Err(ApiError::Network(_))));
}

/// Test connection failure mapping against a closed port
#[test]
fn test_connection_refused_maps_to_network() {
    // Bind then drop a listener so the port is known to be closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);

    let player = Player::new(Endpoint::new("127.0.0.1", port));
    match player.status() {
        Err(ApiError::Network(_)) | Err(ApiError::Timeout(_)) => {}
        other => panic!("expected a transport error, got {:?}", other),
    }
}

/// Test that the control surface hits the documented paths
#[test]
fn test_control_requests_hit_expected_paths() {
    let mut server = Server::new();
    let paths = ["/Play", "/Pause", "/Skip", "/Back", "/Volume?level=30"];
    let mocks: Vec<_> = paths
        .iter()
        .map(|path| {
            server
                .mock("GET", *path)
                .with_status(200)
                .with_body("<state>play</state>")
                .expect(1)
                .create()
        })
        .collect();

    let player = connect(&server);
    player.play().unwrap();
    player.pause().unwrap();
    player.skip().unwrap();
    player.back().unwrap();
    player.set_volume(30).unwrap();

    for mock in &mocks {
        mock.assert();
    }
}

/// Test that stream URLs are percent-encoded into the request
#[test]
fn test_play_url_is_percent_encoded() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/Play?url=http%3A%2F%2Fexample.com%2Fradio.pls")
        .with_status(200)
        .with_body("<state>stream</state>")
        .expect(1)
        .create();

    let player = connect(&server);
    player.play_url("http://example.com/radio.pls").unwrap();

    mock.assert();
}

const PRESETS_BODY: &str = "<presets prid=\"2\">\
    <preset id=\"1\" name=\"Capital Radio\" url=\"Capital.m3u\"/>\
    <preset id=\"4\" name=\"Jazz24\" url=\"Jazz24.m3u\"/>\
    </presets>";

/// Test preset listing
#[test]
fn test_presets_listing() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/Presets")
        .with_status(200)
        .with_body(PRESETS_BODY)
        .create();

    let player = connect(&server);
    let presets = player.presets().unwrap();

    assert_eq!(presets.len(), 2);
    assert_eq!(presets[0].name, "Capital Radio");
    assert_eq!(presets[1].id, "4");
}

/// Test preset resolution by id and by case-insensitive name
#[rstest]
#[case("4", "Jazz24")]
#[case("capital radio", "Capital Radio")]
#[case("Jazz24", "Jazz24")]
fn test_find_preset(#[case] needle: &str, #[case] expected_name: &str) {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/Presets")
        .with_status(200)
        .with_body(PRESETS_BODY)
        .create();

    let player = connect(&server);
    let preset = player.find_preset(needle).unwrap();
    assert_eq!(preset.name, expected_name);
}

/// Test that an unknown preset reports what is available
#[test]
fn test_find_preset_not_found_lists_available() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/Presets")
        .with_status(200)
        .with_body(PRESETS_BODY)
        .create();

    let player = connect(&server);
    match player.find_preset("Radio Nowhere") {
        Err(ApiError::NotFound(message)) => {
            assert!(message.contains("Capital Radio"));
            assert!(message.contains("Jazz24"));
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

/// Test triggering a preset slot
#[test]
fn test_load_preset_requests_slot() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/Preset?id=4")
        .with_status(200)
        .with_body("<state>stream</state>")
        .expect(1)
        .create();

    let player = connect(&server);
    player.load_preset("4").unwrap();

    mock.assert();
}
