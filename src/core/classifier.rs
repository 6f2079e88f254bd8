use crate::domain::model::{Observation, StockStatus};
use scraper::{Html, Selector};
use sha2::{Digest, Sha256};

pub const OUT_OF_STOCK_PHRASES: &[&str] = &[
    "out of stock",
    "sold out",
    "unavailable",
    "not available",
    "coming soon",
];

pub const IN_STOCK_PHRASES: &[&str] = &[
    "add to cart",
    "buy now",
    "purchase",
    "add to basket",
    "order now",
    "in stock",
];

const PURCHASE_WORDS: &[&str] = &["buy", "purchase", "add to cart", "order"];

const PURCHASE_CONTROLS: &str = "button, input, a";

/// Classify a product page. Never fails: anything unexpected ends up as `Unknown`.
pub fn classify(html: &str) -> Observation {
    let document = Html::parse_document(html);

    let page_text = normalize_text(document.root_element().text());
    let raw_signal = format!("{:x}", Sha256::digest(page_text.as_bytes()));

    let out_of_stock_phrase = find_phrase(&page_text, OUT_OF_STOCK_PHRASES);
    let in_stock_phrase = find_phrase(&page_text, IN_STOCK_PHRASES);
    let enabled_purchase_controls = count_enabled_purchase_controls(&document);

    let status = if in_stock_phrase.is_some()
        && enabled_purchase_controls > 0
        && out_of_stock_phrase.is_none()
    {
        StockStatus::InStock
    } else if out_of_stock_phrase.is_some() {
        StockStatus::OutOfStock
    } else {
        StockStatus::Unknown
    };

    tracing::debug!(
        "Classified page as {} (out-of-stock phrase: {:?}, in-stock phrase: {:?}, enabled controls: {})",
        status,
        out_of_stock_phrase,
        in_stock_phrase,
        enabled_purchase_controls
    );

    Observation {
        status,
        raw_signal,
        out_of_stock_phrase,
        in_stock_phrase,
        enabled_purchase_controls,
    }
}

// 壓縮空白並轉小寫，讓跨行的片語也能比對
fn normalize_text<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    let mut text = String::new();
    for word in fragments.flat_map(str::split_whitespace) {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&word.to_lowercase());
    }
    text
}

fn find_phrase(text: &str, phrases: &[&'static str]) -> Option<&'static str> {
    phrases.iter().copied().find(|phrase| text.contains(phrase))
}

fn count_enabled_purchase_controls(document: &Html) -> usize {
    let Ok(selector) = Selector::parse(PURCHASE_CONTROLS) else {
        tracing::warn!("Invalid purchase control selector: {}", PURCHASE_CONTROLS);
        return 0;
    };

    document
        .select(&selector)
        .filter(|element| {
            let mut label = normalize_text(element.text());
            if let Some(value) = element.value().attr("value") {
                label.push(' ');
                label.push_str(&value.to_lowercase());
            }
            PURCHASE_WORDS.iter().any(|word| label.contains(word))
        })
        .filter(|element| element.value().attr("disabled").is_none())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_stock_page() {
        let html = r#"
            <html><body>
              <h1>Widget Pro</h1>
              <p>In stock, ships tomorrow</p>
              <button class="cta">Add to cart</button>
            </body></html>
        "#;

        let observation = classify(html);
        assert_eq!(observation.status, StockStatus::InStock);
        assert_eq!(observation.in_stock_phrase, Some("add to cart"));
        assert_eq!(observation.enabled_purchase_controls, 1);
    }

    #[test]
    fn test_sold_out_page() {
        let html = r#"
            <html><body>
              <h1>Widget Pro</h1>
              <span class="badge">Sold Out</span>
              <button disabled>Add to cart</button>
            </body></html>
        "#;

        let observation = classify(html);
        assert_eq!(observation.status, StockStatus::OutOfStock);
        assert_eq!(observation.out_of_stock_phrase, Some("sold out"));
        assert_eq!(observation.enabled_purchase_controls, 0);
    }

    #[test]
    fn test_out_of_stock_phrase_wins_over_enabled_button() {
        let html = r#"
            <body>
              <p>Currently unavailable</p>
              <a href="/cart">Buy now</a>
            </body>
        "#;

        assert_eq!(classify(html).status, StockStatus::OutOfStock);
    }

    #[test]
    fn test_in_stock_phrase_without_enabled_control_is_unknown() {
        let html = r#"<body><p>In stock at selected stores</p></body>"#;
        assert_eq!(classify(html).status, StockStatus::Unknown);
    }

    #[test]
    fn test_input_value_counts_as_purchase_control() {
        let html = r#"
            <body>
              <p>Order now while supplies last</p>
              <input type="submit" value="Purchase">
            </body>
        "#;

        let observation = classify(html);
        assert_eq!(observation.enabled_purchase_controls, 1);
        assert_eq!(observation.status, StockStatus::InStock);
    }

    #[test]
    fn test_phrase_split_across_lines_is_detected() {
        let html = "<body><p>Out\n    of   stock</p></body>";
        assert_eq!(classify(html).status, StockStatus::OutOfStock);
    }

    #[test]
    fn test_garbage_degrades_to_unknown() {
        let observation = classify("<<<not html at all>>> {\"json\": true}");
        assert_eq!(observation.status, StockStatus::Unknown);
        assert_eq!(observation.raw_signal.len(), 64);
    }

    #[test]
    fn test_raw_signal_ignores_markup_and_whitespace() {
        let a = classify("<p>Sold   out</p>");
        let b = classify("<div>sold\nOUT</div>");
        assert_eq!(a.raw_signal, b.raw_signal);

        let c = classify("<p>Add to cart</p>");
        assert_ne!(a.raw_signal, c.raw_signal);
    }
}
