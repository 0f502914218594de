fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use filesend_client::testing::{MockServer, multipart_parts};
    use filesend_client::{Endpoints, FileSender, SendOptions};
    use filesend_protocol::{MetadataBag, TransferResult, extract_file_ref};
    use filesend_transfer::FileDescriptor;
    use serde::Deserialize;
    use serde_json::Value;

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and compares
    /// the JSON values.
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  fixture: {fixture}\n  rust:    {reserialized}"
        );
        parsed
    }

    fn sender(server: &MockServer) -> FileSender {
        FileSender::new(
            Default::default(),
            filesend_client::CredentialResolver::none(),
            std::sync::Arc::new(server.url()),
        )
    }

    fn endpoints() -> Endpoints {
        Endpoints::new("/a/", "/d/")
    }

    // --- Response normalization ---

    #[derive(Deserialize)]
    struct ResponseCase {
        case: String,
        body: Value,
        file_ref: Option<String>,
    }

    #[test]
    fn fixture_response_bodies() {
        let cases: Vec<ResponseCase> = serde_json::from_value(load_fixture("response_bodies.json"))
            .expect("response_bodies.json has the case shape");
        assert!(!cases.is_empty());

        for c in cases {
            assert_eq!(
                extract_file_ref(&c.body),
                c.file_ref,
                "case {:?}: body {}",
                c.case,
                c.body
            );
        }
    }

    // --- Result shape ---

    #[test]
    fn fixture_transfer_result_ok() {
        let result: TransferResult = roundtrip_test("transfer_result_ok.json");
        assert!(result.ok);
        assert!(result.error.is_none());
    }

    #[test]
    fn fixture_transfer_result_http_status() {
        let result: TransferResult = roundtrip_test("transfer_result_http_status.json");
        assert!(!result.ok);
        assert_eq!(result.http_status, Some(422));
        assert_eq!(result.error.and_then(|e| e.status), Some(422));
    }

    #[test]
    fn fixture_transfer_result_aborted() {
        let result: TransferResult = roundtrip_test("transfer_result_aborted.json");
        assert!(result.is_aborted());
        assert!(result.http_status.is_none());
    }

    #[test]
    fn success_result_matches_fixture() {
        let built = TransferResult::success(201, load_fixture("transfer_result_ok.json")["response_body"].clone());
        assert_eq!(
            serde_json::to_value(&built).unwrap(),
            load_fixture("transfer_result_ok.json")
        );
    }

    // --- Wire contracts ---

    #[tokio::test]
    async fn wire_base64_request_body() {
        let server = MockServer::start(201, r#"{"id": 5}"#).await.unwrap();
        let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
        let file = FileDescriptor::from_bytes("photo.jpg", "image/jpeg", jpeg);
        let meta = MetadataBag::new().with_file("photo").with("caption", "x");

        let result = sender(&server)
            .send_file(&file, SendOptions::new(endpoints()).meta(meta))
            .await;
        assert!(result.ok, "{result:?}");
        assert_eq!(result.file_ref.as_deref(), Some("5"));

        let req = &server.requests()[0];
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/d/");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body_json().unwrap(), load_fixture("base64_request.json"));
    }

    #[tokio::test]
    async fn wire_multipart_document() {
        let server = MockServer::start(200, r#"{"letter_document": "/media/l.pdf"}"#)
            .await
            .unwrap();
        let file = FileDescriptor::from_bytes("report.pdf", "application/pdf", b"%PDF-1.4\n".to_vec());
        let meta = MetadataBag::new()
            .with("visit_id", 31)
            .with("approved", true)
            .with("remarks", Option::<String>::None);

        let result = sender(&server)
            .send_file(&file, SendOptions::new(endpoints()).meta(meta))
            .await;
        assert!(result.ok);
        assert_eq!(result.file_ref.as_deref(), Some("/media/l.pdf"));

        let req = &server.requests()[0];
        assert_eq!(req.path, "/d/");
        let parts = multipart_parts(req).await;
        let names: Vec<_> = parts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["visit_id", "approved", "letter_document"]);
        assert_eq!(parts[0].text(), "31");
        assert_eq!(parts[1].text(), "true");
        assert_eq!(parts[2].filename.as_deref(), Some("report.pdf"));
        assert_eq!(parts[2].data, b"%PDF-1.4\n");
    }

    #[tokio::test]
    async fn wire_multipart_audio() {
        let server = MockServer::start(201, r#"{"recorded_call": "calls/2026/10/c.mp3"}"#)
            .await
            .unwrap();
        let file = FileDescriptor::from_bytes("voice.mp3", "audio/mpeg", vec![0x49, 0x44, 0x33]);

        let result = sender(&server)
            .send_file(&file, SendOptions::new(endpoints()))
            .await;
        assert!(result.ok);
        assert_eq!(result.file_ref.as_deref(), Some("calls/2026/10/c.mp3"));

        let req = &server.requests()[0];
        assert_eq!(req.path, "/a/");
        assert_eq!(req.header("accept"), Some("application/json"));
        let parts = multipart_parts(req).await;
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, "recorded_call");
        assert_eq!(parts[0].content_type.as_deref(), Some("audio/mpeg"));
    }

    #[tokio::test]
    async fn wire_error_result_shape() {
        let server = MockServer::start(422, r#"{"caption": ["This field is required."]}"#)
            .await
            .unwrap();
        let file = FileDescriptor::from_bytes("photo.png", "image/png", vec![0x89, b'P', b'N', b'G']);

        let result = sender(&server)
            .send_file(&file, SendOptions::new(endpoints()))
            .await;
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            load_fixture("transfer_result_http_status.json")
        );
    }
}
