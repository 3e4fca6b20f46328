use ssrmix_core::codec;
use ssrmix_core::meta::UsageInfo;
use ssrmix_core::sink::{SinkParams, SubscriptionSink};
use ssrmix_core::sink_factory::{Backend, open_sink};
use ssrmix_core::sink_fs::FsSink;

fn usage(expire: i64) -> UsageInfo {
    UsageInfo {
        upload: 0.0,
        download: 1024.0,
        total: 4096.0,
        expire,
    }
}

#[test]
fn writes_payload_and_userinfo() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FsSink::new(SinkParams {
        root: dir.path().join("out"),
        filename: "subscribe".into(),
    })
    .unwrap();

    let receipt = sink.push("cGF5bG9hZA==", &usage(7)).unwrap();
    assert!(!receipt.unchanged);
    assert_eq!(receipt.bytes, 12);
    assert_eq!(receipt.digest.len(), 64);

    assert_eq!(
        std::fs::read_to_string(sink.payload_path()).unwrap(),
        "cGF5bG9hZA=="
    );
    let header = std::fs::read_to_string(sink.userinfo_path()).unwrap();
    assert_eq!(
        codec::decode(&header).unwrap(),
        "upload=0; download=1024; total=4096; expire=7"
    );
}

#[test]
fn identical_payload_is_reported_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let sink = open_sink(
        Backend::Fs,
        SinkParams {
            root: dir.path().to_path_buf(),
            filename: "maying".into(),
        },
    )
    .unwrap();

    let first = sink.push("same", &usage(1)).unwrap();
    let second = sink.push("same", &usage(2)).unwrap();
    let third = sink.push("different", &usage(3)).unwrap();

    assert!(!first.unchanged);
    assert!(second.unchanged);
    assert_eq!(first.digest, second.digest);
    assert!(!third.unchanged);
    assert_ne!(third.digest, first.digest);

    let header = std::fs::read_to_string(dir.path().join("maying.userinfo")).unwrap();
    assert!(codec::decode(&header).unwrap().ends_with("expire=3"));
}

#[test]
fn header_is_written_before_payload() {
    let dir = tempfile::tempdir().unwrap();
    // a directory where the payload file should go makes the payload step fail
    std::fs::create_dir(dir.path().join("blocked")).unwrap();
    let sink = FsSink::new(SinkParams {
        root: dir.path().to_path_buf(),
        filename: "blocked".into(),
    })
    .unwrap();

    assert!(sink.push("payload", &usage(9)).is_err());
    let header = std::fs::read_to_string(sink.userinfo_path()).unwrap();
    assert!(codec::decode(&header).unwrap().ends_with("expire=9"));
    assert!(sink.payload_path().is_dir());
}
