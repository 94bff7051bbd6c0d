use std::sync::LazyLock;

use log::{debug, info};
use scraper::{Html, Selector};
use url::Url;

use crate::error::{Result, ScrapeError};
use crate::fetcher::Fetch;
use crate::models::{ListingItem, UNKNOWN_CATEGORY};

const CATEGORY_PREFIX: &str = "product_category-";

static ENTRY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("article.ee-post").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Fetches the listing page and returns its entries in document order.
pub fn discover(fetcher: &dyn Fetch, listing_url: &str) -> Result<Vec<ListingItem>> {
    let base = Url::parse(listing_url)
        .map_err(|e| ScrapeError::Parse(format!("invalid listing url {listing_url}: {e}")))?;
    let html = fetcher.fetch(listing_url)?;
    let items = parse_listing(&html, Some(&base));
    info!("Found {} products.", items.len());
    Ok(items)
}

/// Entries without a link are left out. Relative links are resolved against `base`.
pub fn parse_listing(html: &str, base: Option<&Url>) -> Vec<ListingItem> {
    let doc = Html::parse_document(html);

    doc.select(&ENTRY)
        .filter_map(|entry| {
            let href = entry.select(&LINK).next()?.value().attr("href")?;
            let url = resolve(base, href);
            let category = category_from_classes(entry.value().classes());
            debug!("listing entry {url} ({category})");
            Some(ListingItem { url, category })
        })
        .collect()
}

fn resolve(base: Option<&Url>, href: &str) -> String {
    base.and_then(|b| b.join(href).ok())
        .map(String::from)
        .unwrap_or_else(|| href.to_string())
}

/// The first `product_category-*` class, humanized; `"Unknown"` if there is none.
pub fn category_from_classes<'a>(mut classes: impl Iterator<Item = &'a str>) -> String {
    classes
        .find_map(|cls| cls.strip_prefix(CATEGORY_PREFIX))
        .map(humanize)
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
}

/// `cold-drinks` -> `Cold Drinks`. Letters following a non-letter start a word.
pub fn humanize(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    let mut word_start = true;
    for ch in slug.chars() {
        let ch = if ch == '-' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(ch);
            word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::FakeFetcher;

    const LISTING: &str = r#"
        <html><body>
          <article class="ee-post product_category-cold-drinks">
            <a href="https://mcdonalds.ee/toode/cola/">Cola</a>
          </article>
          <article class="ee-post">
            <a href="/toode/info/">Info</a>
          </article>
          <article class="ee-post product_category-burgers">
            <span>no link here</span>
          </article>
          <div class="ee-post product_category-desserts">
            <a href="/toode/not-an-article/">x</a>
          </div>
        </body></html>
    "#;

    #[test]
    fn category_is_humanized() {
        let cats = ["ee-post", "product_category-cold-drinks"];
        assert_eq!(category_from_classes(cats.into_iter()), "Cold Drinks");
    }

    #[test]
    fn missing_category_is_unknown() {
        assert_eq!(category_from_classes(["ee-post"].into_iter()), "Unknown");
    }

    #[test]
    fn humanize_capitalizes_each_word() {
        assert_eq!(humanize("mcCAFE-hot-drinks"), "Mccafe Hot Drinks");
        assert_eq!(humanize("happy-meal"), "Happy Meal");
    }

    #[test]
    fn entries_keep_document_order_and_skip_linkless() {
        let base = Url::parse("https://mcdonalds.ee/meie-menuu/").unwrap();
        let items = parse_listing(LISTING, Some(&base));
        assert_eq!(
            items,
            vec![
                ListingItem {
                    url: "https://mcdonalds.ee/toode/cola/".into(),
                    category: "Cold Drinks".into(),
                },
                ListingItem {
                    url: "https://mcdonalds.ee/toode/info/".into(),
                    category: "Unknown".into(),
                },
            ]
        );
    }

    #[test]
    fn empty_listing_is_not_an_error() {
        let fetcher = FakeFetcher::default().with_page("https://x.test/menu/", "<html></html>");
        let items = discover(&fetcher, "https://x.test/menu/").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn unreachable_listing_is_a_transport_error() {
        let err = discover(&FakeFetcher::default(), "https://x.test/menu/").unwrap_err();
        assert!(err.is_transport());
    }
}
