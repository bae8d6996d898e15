use std::fmt::Write;

use crate::{llm::schema::RECOMMENDATION_COUNT, types::Profile};

const OUTPUT_INSTRUCTIONS: &str = r#"INSTRUCTIONS:
1. Understand the feeling and the rhythm the listener needs right now.
2. Recommend 2 songs that suit the listener's profile and 2 new songs for discovery.
3. For "uri", give the Spotify track URI (spotify:track:<id>) only if you are certain of it. If you do not know it, leave it as an empty string. Never invent one.
4. ANSWER ONLY IN JSON. Do not write anything before or after the JSON object, which must have exactly this form:

{
  "detected_mood": "Description of the mood in 2-3 words",
  "recommendations": [
    {
      "title": "Song name",
      "artist": "Artist name",
      "uri": "",
      "reason": "Why this song fits the mood"
    }
  ]
}
"#;

/// Renders the instruction text handed to the model.
///
/// The wording can change freely; the output schema at the end is what
/// `schema::validate` checks.
pub fn build_prompt(profile: &Profile, listener: &str, mood: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "You are an AI Music Curator. Your goal is to recommend {} songs based on the mood of {} AND their music taste.\n",
        RECOMMENDATION_COUNT, listener
    );
    out.push_str(&profile_context(profile, listener));

    let _ = writeln!(out, "\nThe listener's request/mood is: \"{}\"\n", mood.trim());
    let _ = writeln!(
        out,
        "The \"recommendations\" array must contain exactly {} objects.\n",
        RECOMMENDATION_COUNT
    );
    out.push_str(OUTPUT_INSTRUCTIONS);
    out
}

/// Profile section of the prompt. Empty collections are left out.
pub fn profile_context(profile: &Profile, listener: &str) -> String {
    let mut out = format!("{}'s music profile\n", listener);

    if !profile.top_artists.is_empty() {
        out.push_str("\nFavorite Artists\n");
        for artist in profile.top_artists.values() {
            let _ = writeln!(out, "- {}", artist.name);
        }
    }

    if !profile.playlists.is_empty() {
        let _ = writeln!(out, "\n{}'s Playlists", listener);
        for playlist in profile.playlists.values() {
            let description = playlist.description.trim();
            if description.is_empty() {
                let _ = writeln!(out, "- {}", playlist.name);
            } else {
                let _ = writeln!(out, "- {} - Vibe: {}", playlist.name, description);
            }
            for track in &playlist.sampled_tracks {
                let _ = writeln!(out, "    * {}", track);
            }
        }
    }

    if !profile.top_tracks.is_empty() {
        out.push_str("\nFavorite Songs\n");
        for track in profile.top_tracks.values() {
            if track.context.is_empty() {
                let _ = writeln!(out, "- {}", track.name);
            } else {
                let _ = writeln!(out, "- {} by {}", track.name, track.context);
            }
        }
    }

    out
}
