use moodtape::{
    llm::prompt::{build_prompt, profile_context},
    types::{PlaylistEntry, Profile, ProfileEntry},
};

// Helper function to create a profile entry
fn create_test_entry(id: &str, name: &str, context: &str) -> ProfileEntry {
    ProfileEntry {
        id: id.to_string(),
        name: name.to_string(),
        uri: format!("spotify:x:{}", id),
        context: context.to_string(),
    }
}

#[test]
fn test_empty_sections_are_left_out() {
    let mut profile = Profile::default();
    profile
        .top_artists
        .insert("a1".to_string(), create_test_entry("a1", "Grouper", ""));

    let context = profile_context(&profile, "Sam");

    assert!(context.starts_with("Sam's music profile\n"));
    assert!(context.contains("Favorite Artists\n- Grouper\n"));
    assert!(!context.contains("Playlists"));
    assert!(!context.contains("Favorite Songs"));
}

#[test]
fn test_playlists_and_songs_are_rendered() {
    let mut profile = Profile::default();
    profile.playlists.insert(
        "p1".to_string(),
        PlaylistEntry {
            id: "p1".to_string(),
            name: "Night drive".to_string(),
            uri: "spotify:playlist:p1".to_string(),
            description: String::new(),
            sampled_tracks: vec!["Nightcall - Kavinsky".to_string()],
        },
    );
    profile
        .top_tracks
        .insert("t1".to_string(), create_test_entry("t1", "Untitled", ""));

    let context = profile_context(&profile, "Sam");

    // No description means no Vibe suffix
    assert!(context.contains("Sam's Playlists\n- Night drive\n    * Nightcall - Kavinsky\n"));
    assert!(context.contains("Favorite Songs\n- Untitled\n"));
}

#[test]
fn test_prompt_ends_with_schema() {
    let prompt = build_prompt(&Profile::default(), "Sam", "  sleepy ");

    assert!(prompt.contains("\"sleepy\""));
    assert!(prompt.contains("exactly 4 objects"));
    assert!(prompt.trim_end().ends_with('}'));
}
