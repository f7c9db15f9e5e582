fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fmt::Debug;
    use std::fs;
    use std::path::PathBuf;

    use serde::Serialize;
    use serde::de::DeserializeOwned;

    use tonconnect_protocol::{DisconnectRequest, Event, Message, MessageId};
    use tonconnect_session::{ConnectError, DisconnectError, ItemError, split_items};

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture file as a string.
    fn load_fixture(name: &str) -> String {
        let path = fixtures_dir().join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    fn load_message(name: &str) -> Message {
        Message::from_json(&load_fixture(name))
            .unwrap_or_else(|e| panic!("failed to parse fixture {name}: {e}"))
    }

    /// Parses a fixture, re-serializes it and parses it again; both parses
    /// must agree.
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: DeserializeOwned + Serialize + PartialEq + Debug,
    {
        let json = load_fixture(name);
        let parsed: T = serde_json::from_str(&json)
            .unwrap_or_else(|e| panic!("failed to parse fixture {name}: {e}"));
        let reserialized = serde_json::to_string(&parsed)
            .unwrap_or_else(|e| panic!("failed to serialize fixture {name}: {e}"));
        let reparsed: T = serde_json::from_str(&reserialized)
            .unwrap_or_else(|e| panic!("failed to reparse fixture {name}: {e}"));
        assert_eq!(parsed, reparsed, "roundtrip mismatch for {name}");
        parsed
    }

    #[test]
    fn roundtrip_fixtures() {
        let request: DisconnectRequest = roundtrip_test("disconnect_request.json");
        assert_eq!(request, DisconnectRequest::new(6));

        let connect: Message = roundtrip_test("connect_event.json");
        assert_eq!(connect.payload.unwrap().items.len(), 2);

        for name in [
            "connect_event_string_id.json",
            "connect_error_event.json",
            "disconnect_reply_ok.json",
            "disconnect_reply_error.json",
            "bad_id_event.json",
        ] {
            roundtrip_test::<Message>(name);
        }
    }

    #[test]
    fn fixture_connect_event() {
        let msg = load_message("connect_event.json");
        assert_eq!(msg.event, Event::Connect);
        assert_eq!(msg.id, MessageId::Present(1));

        let payload = msg.payload.expect("connect carries a payload");
        let device = payload.device.expect("connect carries device info");
        assert_eq!(device.app_name, "Tonkeeper");
        assert_eq!(device.max_protocol_version, 2);
        assert_eq!(device.features.len(), 2);

        let (ok, errors) = split_items(payload.items);
        assert_eq!(ok.len(), 1);
        assert_eq!(ok[0].name, "ton_addr");
        assert_eq!(ok[0].data["network"], "-239");
        let errors = errors.expect("ton_proof failed");
        assert_eq!(
            errors.for_item("ton_proof"),
            Some(&ItemError::NotSupported {
                item: "ton_proof".into()
            })
        );
    }

    #[test]
    fn fixture_connect_event_string_id() {
        let msg = load_message("connect_event_string_id.json");
        assert_eq!(msg.id.get(), Some(17));
        assert!(msg.payload.unwrap().device.is_none());
    }

    #[test]
    fn fixture_connect_error_event() {
        let msg = load_message("connect_error_event.json");
        assert_eq!(msg.event, Event::ConnectError);
        let err = ConnectError::from_payload(&msg.payload_or_default());
        assert_eq!(err, ConnectError::UserDeclined);
    }

    #[test]
    fn fixture_disconnect_request() {
        let fixture: serde_json::Value =
            serde_json::from_str(&load_fixture("disconnect_request.json")).unwrap();
        let ours = serde_json::to_value(DisconnectRequest::new(6)).unwrap();
        assert_eq!(fixture, ours);

        let parsed: DisconnectRequest = serde_json::from_value(fixture).unwrap();
        assert_eq!(parsed, DisconnectRequest::new(6));
    }

    #[test]
    fn fixture_disconnect_replies() {
        let ok = load_message("disconnect_reply_ok.json");
        assert_eq!(ok.event, Event::Other);
        assert_eq!(ok.id.get(), Some(6));
        assert!(ok.error.is_none());

        let failed = load_message("disconnect_reply_error.json");
        assert_eq!(failed.id.get(), Some(6));
        let err = DisconnectError::from_wire(failed.error.as_ref().unwrap());
        assert_eq!(err, DisconnectError::BadRequest);
    }

    #[test]
    fn fixture_bad_id_keeps_event() {
        let msg = load_message("bad_id_event.json");
        assert_eq!(msg.event, Event::Disconnect);
        assert!(msg.id.is_absent());
    }
}
