use flickstash_catalog::{Favorite, ItemKind};
use flickstash_service::{
    dedup_by_base_name, favorites_of_kind, paginate, VirtualCategory, RECENT_DEDUP_CAP,
};

fn favorite(item_id: &str, kind: Option<ItemKind>) -> Favorite {
    Favorite {
        id: format!("fav-{item_id}"),
        profile_id: "prof".to_string(),
        playlist_id: "p1".to_string(),
        item_id: item_id.to_string(),
        kind,
        name: format!("Item {item_id}"),
        stream_url: None,
        cover_url: None,
        category_id: None,
        date_added: "1700000000".to_string(),
    }
}

#[test]
fn virtual_ids_parse_and_roundtrip() {
    for id in ["all", "favorites", "recent", "recently_watched"] {
        let v = VirtualCategory::from_category_id(id).unwrap();
        assert_eq!(v.as_str(), id);
    }
    assert!(VirtualCategory::from_category_id("action").is_none());
}

#[test]
fn dedup_keeps_the_first_variant_seen() {
    // Newest-first input: the kept entry is the most recent variant.
    let names = vec![
        "FR| The Heist 4K".to_string(),
        "The Heist".to_string(),
        "EN| The Heist HD".to_string(),
        "Other Film".to_string(),
    ];
    let kept = dedup_by_base_name(names, |n| n.as_str());
    assert_eq!(kept, vec!["FR| The Heist 4K".to_string(), "Other Film".to_string()]);
}

#[test]
fn dedup_caps_the_view() {
    let names: Vec<String> = (0..200).map(|i| format!("Unique Film {i}")).collect();
    let kept = dedup_by_base_name(names, |n| n.as_str());
    assert_eq!(kept.len(), RECENT_DEDUP_CAP);
}

#[test]
fn paginate_slices_with_has_more() {
    let items: Vec<u32> = (0..10).collect();

    let first = paginate(&items, 0, 4);
    assert_eq!(first.items, vec![0, 1, 2, 3]);
    assert!(first.has_more);
    assert_eq!(first.total_count, 10);

    let last = paginate(&items, 8, 4);
    assert_eq!(last.items, vec![8, 9]);
    assert!(!last.has_more);

    let past_end = paginate(&items, 40, 4);
    assert!(past_end.items.is_empty());
    assert!(!past_end.has_more);
    assert_eq!(past_end.total_count, 10);
}

#[test]
fn untagged_favorites_count_as_movies_only() {
    let favorites = vec![
        favorite("m1", Some(ItemKind::Movie)),
        favorite("s1", Some(ItemKind::Series)),
        favorite("old", None),
    ];

    let movies = favorites_of_kind(favorites.clone(), ItemKind::Movie);
    let ids: Vec<&str> = movies.iter().map(|f| f.item_id.as_str()).collect();
    assert_eq!(ids, vec!["m1", "old"]);

    let series = favorites_of_kind(favorites, ItemKind::Series);
    let ids: Vec<&str> = series.iter().map(|f| f.item_id.as_str()).collect();
    assert_eq!(ids, vec!["s1"]);
}
