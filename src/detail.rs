use crate::fetcher::Fetch;
use crate::models::{ListingItem, Outcome};
use crate::parser;

/// Fetches one detail page and extracts it. Exactly one fetch per call.
pub fn fetch_and_extract(fetcher: &dyn Fetch, item: &ListingItem) -> Outcome {
    let html = match fetcher.fetch(&item.url) {
        Ok(html) => html,
        Err(e) => {
            return Outcome::Failure {
                url: item.url.clone(),
                error: e.to_string(),
            };
        }
    };

    match parser::extract_html(&html, &item.url) {
        Outcome::Success(mut record) => {
            record.category = item.category.clone();
            Outcome::Success(record)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::FakeFetcher;

    const PAGE: &str = r#"<html><body>
        <h1 class="elementor-heading-title">Cola</h1>
        <div id="product-nutritional-information"><div class="detailed">
          <div class="detailed-row values"><div>Sugar</div><div>10 g</div><div>40 g</div></div>
        </div></div></body></html>"#;

    fn item(url: &str) -> ListingItem {
        ListingItem {
            url: url.into(),
            category: "Cold Drinks".into(),
        }
    }

    #[test]
    fn success_carries_listing_category() {
        let fetcher = FakeFetcher::default().with_page("https://x.test/cola", PAGE);
        let Outcome::Success(record) = fetch_and_extract(&fetcher, &item("https://x.test/cola"))
        else {
            panic!("expected success");
        };
        assert_eq!(record.category, "Cold Drinks");
        assert_eq!(record.attributes.get("Sugar"), Some("40 g"));
    }

    #[test]
    fn transport_failure_is_reported_once() {
        let fetcher = FakeFetcher::default()
            .with_page("https://x.test/cola", PAGE)
            .failing("https://x.test/cola");
        let outcome = fetch_and_extract(&fetcher, &item("https://x.test/cola"));
        assert!(matches!(outcome, Outcome::Failure { ref url, .. } if url == "https://x.test/cola"));
        assert_eq!(fetcher.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn page_without_nutrition_is_skipped() {
        let fetcher = FakeFetcher::default().with_page("https://x.test/jobs", "<html></html>");
        let outcome = fetch_and_extract(&fetcher, &item("https://x.test/jobs"));
        assert!(matches!(outcome, Outcome::Skip { .. }));
    }
}
