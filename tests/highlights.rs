use std::num::NonZeroU32;

use psalms_reader::{
    Corpus, HighlightColor, HighlightQuery, HighlightStore, KeyValueStore, SqliteStore, VerseRef,
};

fn vref(chapter: u32, verse: u32) -> VerseRef {
    VerseRef::checked(chapter, verse).unwrap()
}

#[test]
fn highlights_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("highlights.sqlite");

    {
        let store = HighlightStore::new(SqliteStore::open(&path).unwrap());
        store.set_highlight(vref(23, 1), &"Red".into()).unwrap();
        store.set_highlight(vref(23, 1), &"Blue".into()).unwrap();
        store.set_highlight(vref(90, 1), &"Green".into()).unwrap();
        store.set_highlight(vref(121, 1), &"Orange".into()).unwrap();
        store.remove_highlight(vref(121, 1)).unwrap();
    }

    let store = HighlightStore::new(SqliteStore::open(&path).unwrap());
    assert_eq!(
        store.get_highlight(vref(23, 1)).unwrap(),
        Some(HighlightColor::from("Blue"))
    );
    assert_eq!(store.get_highlight(vref(121, 1)).unwrap(), None);

    let all = store.all_highlights().unwrap();
    assert_eq!(all.keys().copied().collect::<Vec<_>>(), vec![vref(23, 1), vref(90, 1)]);
}

#[test]
fn library_view_over_a_shared_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highlights.sqlite");

    let kv = SqliteStore::open(&path).unwrap();
    // Other settings and a legacy row share the table with highlights.
    kv.set("settings-font-size", "17").unwrap();
    kv.set("psalm-abc:1", "Red").unwrap();
    let store = HighlightStore::new(kv);
    store.set_highlight(vref(23, 1), &"Red".into()).unwrap();
    store.set_highlight(vref(23, 5), &"Red".into()).unwrap();
    store.set_highlight(vref(90, 1), &"Blue".into()).unwrap();
    store.set_highlight(vref(999, 1), &"Red".into()).unwrap();

    let corpus = Corpus::bundled().unwrap();
    let query = HighlightQuery::new(&store, &corpus);

    let groups = query.list_by_color().unwrap();
    let summary: Vec<(&str, Vec<VerseRef>)> = groups
        .iter()
        .map(|group| {
            (
                group.color.as_str(),
                group.verses.iter().map(|verse| verse.verse_ref).collect(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Red", vec![vref(23, 1), vref(23, 5)]),
            ("Blue", vec![vref(90, 1)]),
        ]
    );

    let chapter = query
        .resolve_chapter_highlights(NonZeroU32::new(23).unwrap())
        .unwrap();
    assert_eq!(chapter.len(), 2);
}
