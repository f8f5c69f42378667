/// User-agent substrings that identify automated traffic.
const BOT_SIGNATURES: [&str; 5] = ["bot", "crawler", "spider", "slurp", "mediapartners"];

/// Returns true if the user-agent looks like a bot.
///
/// Case-insensitive substring match; bot visits are silently dropped
/// before they reach the ingestion queue.
pub fn is_bot(user_agent: &str) -> bool {
    let ua = user_agent.to_lowercase();
    BOT_SIGNATURES.iter().any(|sig| ua.contains(sig))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_crawlers() {
        assert!(is_bot("Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)"));
        assert!(is_bot("Mozilla/5.0 (compatible; bingbot/2.0)"));
        assert!(is_bot("Screaming Frog SEO Spider/18.0"));
        assert!(is_bot("Slurp/3.0 (slurp@inktomi.com)"));
        assert!(is_bot("Mediapartners-Google"));
        assert!(is_bot("some-web-CRAWLER/1.0"));
    }

    #[test]
    fn is_case_insensitive() {
        assert!(is_bot("GoogleBOT"));
        assert!(is_bot("SPIDER"));
    }

    #[test]
    fn passes_real_browsers() {
        assert!(!is_bot(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        ));
        assert!(!is_bot(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15"
        ));
        assert!(!is_bot("Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0"));
        assert!(!is_bot(""));
    }
}
