//! Argument inference heuristics for simulated tool calls.
//!
//! When the agent runs without a completion provider it still has to call
//! tools with plausible arguments. These strategy functions pull prices,
//! quantities, product names, and audience hints straight out of the
//! vendor's message so simulated runs stay grounded in what was asked.
//!
//! Each heuristic is a pure function over the raw message text. Callers own
//! the defaults: every extractor returns `None` (or a catch-all label) when
//! the message gives nothing to work with.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches any number, capturing an optional `$` prefix and `%` suffix so
/// prices can be told apart from percentages.
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\$)?\s*(\d+(?:\.\d+)?)(\s*%)?").unwrap());

static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*(?:x\b|units?\b|items?\b|pieces?\b|pcs\b|pairs?\b)").unwrap()
});

static DISCOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:%|percent\b)").unwrap());

/// Captures the phrase following a product-introducing preposition, up to
/// sentence punctuation.
static PRODUCT_PHRASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:for|about|regarding|of|on)\s+([^,.?!\n]+)").unwrap());

const LEADING_ARTICLES: [&str; 6] = ["a", "an", "the", "my", "our", "some"];
const TRAILING_FILLER: [&str; 3] = ["please", "thanks", "asap"];

/// Extracts a price from the message.
///
/// A `$`-prefixed amount always wins. Otherwise the first number that is not
/// a percentage is taken.
pub fn extract_price(input: &str) -> Option<f64> {
    let mut plain = None;
    for captures in NUMBER_RE.captures_iter(input) {
        let number = captures.get(2).and_then(|m| m.as_str().parse::<f64>().ok());
        let Some(number) = number else { continue };
        if captures.get(1).is_some() {
            return Some(number);
        }
        if captures.get(3).is_none() && plain.is_none() {
            plain = Some(number);
        }
    }
    plain
}

/// Extracts a quantity from phrases like "2 units" or "3x".
pub fn extract_quantity(input: &str) -> Option<u32> {
    QUANTITY_RE
        .captures(input)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Extracts a discount percentage from phrases like "10% off" or "15 percent".
pub fn extract_discount(input: &str) -> Option<f64> {
    DISCOUNT_RE
        .captures(input)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Extracts a product name from the message.
///
/// Tries the phrase after a preposition first ("stock for running shoes"),
/// then falls back to a run of capitalized words ("Is Ultraboost Sneaker in
/// stock"). Leading articles and trailing pleasantries are stripped.
pub fn extract_product_name(input: &str) -> Option<String> {
    if let Some(captures) = PRODUCT_PHRASE_RE.captures(input) {
        let phrase = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        let cleaned = strip_trailing_filler(strip_leading_articles(phrase)).trim();
        if !cleaned.is_empty() {
            return Some(cleaned.to_string());
        }
    }
    capitalized_run(input)
}

/// Picks a messaging channel hinted at by the message, defaulting to in-app.
pub fn infer_channel(input: &str) -> &'static str {
    let lowered = input.to_lowercase();
    if lowered.contains("whatsapp") {
        "whatsapp"
    } else if lowered.contains("sms") || lowered.contains("text") {
        "sms"
    } else if lowered.contains("email") || lowered.contains("mail") {
        "email"
    } else {
        "in_app"
    }
}

/// Picks a delivery zone hinted at by the message, defaulting to domestic.
pub fn infer_zone(input: &str) -> &'static str {
    let lowered = input.to_lowercase();
    let international = ["international", "overseas", "abroad"];
    if international.iter().any(|marker| lowered.contains(marker)) {
        "international"
    } else if lowered.contains("regional") {
        "regional"
    } else {
        "domestic"
    }
}

/// Picks a broadcast audience hinted at by the message, defaulting to all
/// customers.
pub fn infer_audience(input: &str) -> &'static str {
    let lowered = input.to_lowercase();
    if lowered.contains("vip") || lowered.contains("loyal") {
        "vip_customers"
    } else if lowered.contains("recent") || lowered.contains("new customer") {
        "recent_customers"
    } else {
        "all_customers"
    }
}

fn strip_leading_articles(phrase: &str) -> &str {
    let mut rest = phrase.trim();
    while let Some(word) = rest.split_whitespace().next() {
        if LEADING_ARTICLES.contains(&word.to_lowercase().as_str()) {
            rest = rest[word.len()..].trim_start();
        } else {
            break;
        }
    }
    rest
}

fn strip_trailing_filler(phrase: &str) -> &str {
    let mut rest = phrase.trim_end();
    while let Some(word) = rest.split_whitespace().last() {
        if TRAILING_FILLER.contains(&word.to_lowercase().as_str()) {
            rest = rest[..rest.len() - word.len()].trim_end();
        } else {
            break;
        }
    }
    rest
}

/// Collects the first run of capitalized words, skipping the sentence opener.
fn capitalized_run(input: &str) -> Option<String> {
    let mut run: Vec<&str> = Vec::new();
    for (position, word) in input.split_whitespace().enumerate() {
        let cleaned = word.trim_matches(|c: char| !c.is_alphanumeric());
        let starts_upper = cleaned.chars().next().map_or(false, |c| c.is_uppercase());
        if position > 0 && starts_upper {
            run.push(cleaned);
        } else if !run.is_empty() {
            break;
        }
    }
    if run.is_empty() {
        None
    } else {
        Some(run.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollar_amount_wins_over_other_numbers() {
        assert_eq!(extract_price("ship 3 units for $25 with 10% off"), Some(25.0));
    }

    #[test]
    fn plain_number_used_when_no_dollar_sign() {
        assert_eq!(extract_price("base price 100 with 10% discount"), Some(100.0));
        assert_eq!(extract_price("it costs 49.99 per unit"), Some(49.99));
    }

    #[test]
    fn percentages_are_not_prices() {
        assert_eq!(extract_price("give 7.5% off"), None);
    }

    #[test]
    fn no_numbers_means_no_price() {
        assert_eq!(extract_price("what would this cost"), None);
    }

    #[test]
    fn quantity_reads_unit_phrases() {
        assert_eq!(extract_quantity("order 2 units of the widget"), Some(2));
        assert_eq!(extract_quantity("we need 3x for the demo"), Some(3));
        assert_eq!(extract_quantity("send 5 pairs"), Some(5));
    }

    #[test]
    fn bare_numbers_are_not_quantities() {
        assert_eq!(extract_quantity("the price is $100"), None);
    }

    #[test]
    fn discount_reads_percent_signs_and_words() {
        assert_eq!(extract_discount("apply a 10% discount"), Some(10.0));
        assert_eq!(extract_discount("take 7.5 % off"), Some(7.5));
        assert_eq!(extract_discount("give them 15 percent"), Some(15.0));
    }

    #[test]
    fn no_percentage_means_no_discount() {
        assert_eq!(extract_discount("the price is $100"), None);
    }

    #[test]
    fn product_name_follows_preposition() {
        assert_eq!(
            extract_product_name("Can you check stock for running shoes?"),
            Some("running shoes".to_string())
        );
    }

    #[test]
    fn product_name_drops_leading_articles() {
        assert_eq!(
            extract_product_name("tell me about the blue widget"),
            Some("blue widget".to_string())
        );
    }

    #[test]
    fn product_name_drops_trailing_filler() {
        assert_eq!(
            extract_product_name("check availability for canvas totes please"),
            Some("canvas totes".to_string())
        );
    }

    #[test]
    fn product_name_falls_back_to_capitalized_run() {
        assert_eq!(
            extract_product_name("Is Ultraboost Sneaker in stock"),
            Some("Ultraboost Sneaker".to_string())
        );
    }

    #[test]
    fn product_name_absent_when_nothing_matches() {
        assert_eq!(extract_product_name("anything available"), None);
    }

    #[test]
    fn channel_hints_map_to_known_channels() {
        assert_eq!(infer_channel("send an SMS blast"), "sms");
        assert_eq!(infer_channel("email the regulars"), "email");
        assert_eq!(infer_channel("ping them via WhatsApp"), "whatsapp");
        assert_eq!(infer_channel("let customers know"), "in_app");
    }

    #[test]
    fn zone_hints_map_to_known_zones() {
        assert_eq!(infer_zone("shipping overseas"), "international");
        assert_eq!(infer_zone("regional delivery window"), "regional");
        assert_eq!(infer_zone("how long will delivery take"), "domestic");
    }

    #[test]
    fn audience_hints_map_to_known_segments() {
        assert_eq!(infer_audience("notify VIP customers"), "vip_customers");
        assert_eq!(infer_audience("message recent buyers"), "recent_customers");
        assert_eq!(infer_audience("tell everyone"), "all_customers");
    }
}
