//! Integration tests for the Selah library
//!
//! Tests the path from a song source through the viewer to the transposed sheet.

use std::sync::{Arc, Mutex};

use selah::{
    parse_sheet, slugify, transpose_text, FileSource, LoadState, MemorySource, PitchClass,
    Snapshot, SnapshotEvent, Song, SongSource, Viewer,
};

const OUSADO_AMOR: &str = "\
Tom: G

G                 D/F#
  Ousado amor que me buscou
Em              C
  Que me encontrou, que me amou
";

fn shared_viewer() -> Arc<Mutex<Viewer>> {
    Arc::new(Mutex::new(Viewer::default()))
}

fn feed(viewer: &Arc<Mutex<Viewer>>) -> selah::source::Listener {
    let viewer = Arc::clone(viewer);
    Box::new(move |event: SnapshotEvent| viewer.lock().unwrap().handle(event))
}

fn database() -> Snapshot {
    let sheet = parse_sheet(OUSADO_AMOR).unwrap();
    let mut song = sheet.into_song("Ousado Amor", 500);
    song.artist = Some("Isaías Saad".to_string());
    let mut snapshot = Snapshot::new();
    snapshot.insert(song.slug(), song);
    snapshot
}

#[test]
fn test_subscribe_select_and_transpose() {
    let source = MemorySource::new();
    let viewer = shared_viewer();
    let subscription = source.subscribe("cifras", feed(&viewer));

    assert_eq!(viewer.lock().unwrap().state(), &LoadState::Loading);
    source.publish("cifras", Some(database()));

    let mut viewer = viewer.lock().unwrap();
    assert_eq!(viewer.state(), &LoadState::Ready);
    viewer.set_query("isaías");
    assert_eq!(viewer.results().len(), 1);

    assert!(viewer.select_by_id("ousado-amor-isaias-saad"));
    assert_eq!(viewer.key(), PitchClass::G);

    viewer.set_key(PitchClass::A);
    let rendered = viewer.rendered_sheet();
    assert!(rendered.contains("A                 E/G#"));
    assert!(rendered.contains("F#m              D"));
    assert!(rendered.contains("Ousado amor que me buscou"));
    drop(rendered);
    drop(viewer);

    subscription.unsubscribe();
    assert_eq!(source.listener_count(), 0);
}

#[test]
fn test_snapshot_replacement_is_wholesale() {
    let source = MemorySource::new();
    let viewer = shared_viewer();
    let _subscription = source.subscribe("cifras", feed(&viewer));

    source.publish("cifras", Some(database()));
    assert_eq!(viewer.lock().unwrap().catalog().len(), 1);

    source.publish("cifras", None);
    let viewer = viewer.lock().unwrap();
    assert_eq!(viewer.state(), &LoadState::Ready);
    assert!(viewer.catalog().is_empty());
}

#[test]
fn test_load_failure_reaches_viewer() {
    let source = MemorySource::new();
    let viewer = shared_viewer();
    let _subscription = source.subscribe("cifras", feed(&viewer));

    source.fail("cifras", "Permission denied");
    assert_eq!(
        viewer.lock().unwrap().state(),
        &LoadState::Failed("Permission denied".to_string())
    );
}

#[test]
fn test_file_source_feeds_viewer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.json");
    std::fs::write(
        &path,
        r#"{"cifras": {"oceans": {"titulo": "Oceans", "tom_original": "D", "cifra_original": "D A Bm G"}}}"#,
    )
    .unwrap();

    let viewer = shared_viewer();
    let _subscription = FileSource::new(&path).subscribe("cifras", feed(&viewer));

    let mut viewer = viewer.lock().unwrap();
    assert!(viewer.select_by_id("oceans"));
    viewer.set_key(PitchClass::C);
    assert_eq!(viewer.rendered_sheet(), "C G Am F");
}

#[test]
fn test_identity_for_every_key() {
    let text = "Bb  Eb/G  Cm7  F  |  Ab° Dbmaj7";
    for key in PitchClass::ALL {
        assert_eq!(transpose_text(text, Some(key.name()), Some(key.name())), text);
    }
}

#[test]
fn test_concrete_cases() {
    assert_eq!(transpose_text("C G Am F", Some("C"), Some("D")), "D A Bm G");
    assert_eq!(transpose_text("C G Am F", Some("C"), Some("C")), "C G Am F");
    assert_eq!(transpose_text("G/B", Some("C"), Some("D")), "A/C#");
    assert_eq!(transpose_text("C G", Some(""), Some("D")), "C G");
    assert_eq!(transpose_text("A cat sat", Some("C"), Some("D")), "B cat sat");
}

#[test]
fn test_slug_of_imported_song() {
    let song = Song {
        title: "Águas Purificadoras".to_string(),
        artist: Some("Diante do Trono".to_string()),
        ..Song::default()
    };
    assert_eq!(song.slug(), slugify("Águas Purificadoras", "Diante do Trono"));
    assert_eq!(song.slug(), "aguas-purificadoras-diante-do-trono");
}
