//! URL classification properties

use media_dw::classifier::{detect_platform, extract_native_id, validate, Platform, Strategy};
use proptest::prelude::*;

#[test]
fn detection_table() {
    let cases = [
        ("https://www.youtube.com/watch?v=dQw4w9WgXcQ", Some(Platform::YouTube)),
        ("https://youtu.be/dQw4w9WgXcQ", Some(Platform::YouTube)),
        ("https://m.youtube.com/shorts/abc", Some(Platform::YouTube)),
        ("https://www.instagram.com/p/Cx1/", Some(Platform::Instagram)),
        ("https://vm.tiktok.com/ZM123/", Some(Platform::TikTok)),
        ("https://x.com/user/status/42", Some(Platform::Twitter)),
        ("https://twitter.com/user/status/42", Some(Platform::Twitter)),
        ("https://www.facebook.com/watch?v=10", Some(Platform::Facebook)),
        ("https://www.reddit.com/r/videos/comments/1", Some(Platform::Reddit)),
        ("https://www.twitch.tv/videos/1", Some(Platform::Twitch)),
        ("https://vimeo.com/1", None),
    ];
    for (url, expected) in cases {
        assert_eq!(detect_platform(url), expected, "{}", url);
    }
}

#[test]
fn only_instagram_is_specialized() {
    for platform in Platform::SUPPORTED {
        let expected = if platform == Platform::Instagram {
            Strategy::Specialized
        } else {
            Strategy::Generic
        };
        assert_eq!(platform.strategy(), expected);
    }
    assert_eq!(Platform::Other.strategy(), Strategy::Generic);
}

#[test]
fn native_ids() {
    assert_eq!(
        extract_native_id("https://www.instagram.com/tv/B_x-1/?igshid=1", Platform::Instagram),
        Some("B_x-1".to_string())
    );
    assert_eq!(
        extract_native_id("https://www.tiktok.com/@a/video/7012345", Platform::TikTok),
        Some("7012345".to_string())
    );
    assert_eq!(
        extract_native_id("https://x.com/a/status/99?s=20", Platform::Twitter),
        Some("99".to_string())
    );
    assert_eq!(extract_native_id("https://www.reddit.com/r/a", Platform::Reddit), None);
}

proptest! {
    #[test]
    fn strings_without_scheme_are_invalid(s in "[a-z0-9./?=&-]{0,40}") {
        prop_assume!(!s.starts_with("http"));
        prop_assert!(!validate(&s));
    }

    #[test]
    fn simple_https_urls_are_valid(host in "[a-z][a-z0-9]{0,20}", tld in "[a-z]{2,6}", path in "[a-zA-Z0-9/_-]{0,30}") {
        let url = format!("https://{}.{}/{}", host, tld, path);
        prop_assert!(validate(&url), "{}", url);
    }
}

proptest! {
    #[test]
    fn youtube_ids_round_trip(id in "[A-Za-z0-9_-]{11}") {
        let urls = [
            format!("https://www.youtube.com/watch?v={}", id),
            format!("https://www.youtube.com/watch?feature=share&v={}", id),
            format!("https://youtu.be/{}", id),
            format!("https://youtube.com/shorts/{}", id),
        ];
        for url in urls {
            prop_assert_eq!(extract_native_id(&url, Platform::YouTube), Some(id.clone()), "{}", url);
        }
    }

    #[test]
    fn instagram_shortcodes_round_trip(code in "[A-Za-z0-9_-]{1,12}") {
        for kind in ["p", "reel", "tv"] {
            let url = format!("https://www.instagram.com/{}/{}/?igsh=abc", kind, code);
            prop_assert_eq!(extract_native_id(&url, Platform::Instagram), Some(code.clone()), "{}", url);
        }
    }

    #[test]
    fn numeric_ids_round_trip(id in "[0-9]{1,19}") {
        let tiktok = format!("https://www.tiktok.com/@someone/video/{}?lang=en", id);
        prop_assert_eq!(extract_native_id(&tiktok, Platform::TikTok), Some(id.clone()));

        let tweet = format!("https://x.com/someone/status/{}", id);
        prop_assert_eq!(extract_native_id(&tweet, Platform::Twitter), Some(id.clone()));
    }
}
