//! Built-in platform definitions (public profile pages only).
//!
//! Every platform is a body rule: a 404 is "not found", and so is a
//! redirect to a sign-in or sign-up page or a page that reads like an error,
//! even when it is served with a 200.

use super::{DetectionRule, PlatformDefinition, RateLimit};

/// Error-page phrases shared by every platform.
const GENERIC_NOT_FOUND_MARKERS: [&str; 6] = [
    "page not found",
    "doesn't exist",
    "couldn't find",
    "does not exist",
    "no such user",
    "user not found",
];

/// Redirect targets that mean the profile page was not served.
const GENERIC_NOT_FOUND_URL_MARKERS: [&str; 5] = ["/login", "signin", "auth", "join", "register"];

fn platform(
    name: &str,
    url_template: &str,
    not_found_markers: &[&str],
    found_markers: &[&str],
    per_second: u32,
) -> PlatformDefinition {
    let mut body_markers = owned(&GENERIC_NOT_FOUND_MARKERS);
    body_markers.extend(owned(not_found_markers));

    PlatformDefinition {
        name: name.to_string(),
        url_template: url_template.to_string(),
        detection_rule: DetectionRule::BodyPattern {
            not_found_markers: body_markers,
            found_markers: owned(found_markers),
            found_status: 200,
            not_found_status: Some(404),
            min_body_len: 0,
            not_found_url_markers: owned(&GENERIC_NOT_FOUND_URL_MARKERS),
        },
        rate_limit: RateLimit::per_second(per_second),
    }
}

fn owned(markers: &[&str]) -> Vec<String> {
    markers.iter().map(|m| m.to_string()).collect()
}

/// Get all built-in platform definitions, in report order.
pub(super) fn platform_definitions() -> Vec<PlatformDefinition> {
    vec![
        platform("GitHub", "https://github.com/{username}", &[], &[], 2),
        platform(
            "Twitter",
            "https://twitter.com/{username}",
            &["this account doesn't exist", "this account doesn\u{2019}t exist"],
            &[],
            1,
        ),
        platform(
            "Instagram",
            "https://instagram.com/{username}",
            &["sorry, this page isn't available"],
            &[],
            1,
        ),
        platform(
            "Reddit",
            "https://reddit.com/user/{username}",
            &["sorry, nobody on reddit goes by that name"],
            &[],
            1,
        ),
        platform("YouTube", "https://youtube.com/@{username}", &[], &[], 2),
        platform(
            "TikTok",
            "https://tiktok.com/@{username}",
            &["couldn\u{2019}t find this account"],
            &[],
            1,
        ),
        platform(
            "Twitch",
            "https://twitch.tv/{username}",
            &["sorry. unless you've got a time machine, that content is unavailable"],
            &[],
            1,
        ),
        platform("GitLab", "https://gitlab.com/{username}", &[], &[], 2),
        platform("Keybase", "https://keybase.io/{username}", &[], &[], 2),
        platform("Dev.to", "https://dev.to/{username}", &[], &[], 2),
        platform("Medium", "https://medium.com/@{username}", &[], &[], 1),
        platform(
            "Pinterest",
            "https://pinterest.com/{username}",
            &["sorry! we couldn't find"],
            &[],
            1,
        ),
        platform("Flickr", "https://flickr.com/people/{username}", &[], &[], 1),
        platform(
            "Steam",
            "https://steamcommunity.com/id/{username}",
            &["the specified profile could not be found"],
            &[],
            1,
        ),
        platform("Spotify", "https://open.spotify.com/user/{username}", &[], &[], 1),
        // t.me serves a generic landing page for unknown names
        platform("Telegram", "https://t.me/{username}", &[], &["tgme_page_title"], 1),
        platform("Wikipedia", "https://en.wikipedia.org/wiki/User:{username}", &[], &[], 2),
        platform("Bitbucket", "https://bitbucket.org/{username}", &[], &[], 1),
        platform(
            "HackerNews",
            "https://news.ycombinator.com/user?id={username}",
            &[],
            &[],
            1,
        ),
        platform("Pastebin", "https://pastebin.com/u/{username}", &[], &[], 1),
        platform("Replit", "https://replit.com/@{username}", &[], &[], 1),
    ]
}
