use std::sync::LazyLock;

use log::{debug, warn};
use scraper::{ElementRef, Html, Selector};

use crate::models::{
    Attributes, ExtractedRecord, NutritionRow, Outcome, UNKNOWN_CATEGORY, UNKNOWN_NAME,
};

const UPLOAD_MARKER: &str = "wp-content/uploads";
const LOGO_MARKER: &str = "GoldenArches";
const RELATED_SECTION_ID: &str = "related";

fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

static PRIMARY_HEADING: LazyLock<Selector> = LazyLock::new(|| sel("h1.elementor-heading-title"));
static SECONDARY_HEADING: LazyLock<Selector> =
    LazyLock::new(|| sel("h2.ee-post__title__heading"));
static ATTACHMENT_IMAGE: LazyLock<Selector> = LazyLock::new(|| sel("img.attachment-full"));
static WIDGET_IMAGE: LazyLock<Selector> = LazyLock::new(|| sel(".elementor-widget-image img"));
static ANY_IMAGE: LazyLock<Selector> = LazyLock::new(|| sel("img"));
static NUTRITION: LazyLock<Selector> =
    LazyLock::new(|| sel("#product-nutritional-information .detailed"));
static NUTRITION_ROW: LazyLock<Selector> = LazyLock::new(|| sel(".detailed-row.values"));
static CELL: LazyLock<Selector> = LazyLock::new(|| sel("div"));

type NameStrategy = fn(&Html) -> Option<String>;
type ImageStrategy = for<'a> fn(&'a Html) -> Option<ElementRef<'a>>;

/// Tried in order; the first heading found names the product.
const NAME_CHAIN: [NameStrategy; 2] = [primary_heading, secondary_heading];

/// Tried in order; the first tier that finds an image decides, even if it has no `src`.
const IMAGE_CHAIN: [ImageStrategy; 3] = [attachment_image, widget_image, upload_scan];

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn primary_heading(doc: &Html) -> Option<String> {
    doc.select(&PRIMARY_HEADING).next().map(text_of)
}

fn secondary_heading(doc: &Html) -> Option<String> {
    doc.select(&SECONDARY_HEADING).next().map(text_of)
}

fn attachment_image(doc: &Html) -> Option<ElementRef<'_>> {
    doc.select(&ATTACHMENT_IMAGE).next()
}

fn widget_image(doc: &Html) -> Option<ElementRef<'_>> {
    doc.select(&WIDGET_IMAGE).next()
}

/// First uploaded image outside the related-products section that is not the logo.
fn upload_scan(doc: &Html) -> Option<ElementRef<'_>> {
    doc.select(&ANY_IMAGE).find(|img| {
        !in_related_section(*img)
            && img
                .value()
                .attr("src")
                .is_some_and(|src| src.contains(UPLOAD_MARKER) && !src.contains(LOGO_MARKER))
    })
}

fn in_related_section(el: ElementRef<'_>) -> bool {
    el.ancestors().filter_map(ElementRef::wrap).any(|a| {
        a.value().name() == "section" && a.value().id() == Some(RELATED_SECTION_ID)
    })
}

pub fn resolve_name(doc: &Html) -> String {
    NAME_CHAIN
        .iter()
        .find_map(|strategy| strategy(doc))
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

pub fn resolve_image(doc: &Html) -> String {
    IMAGE_CHAIN
        .iter()
        .find_map(|strategy| strategy(doc))
        .and_then(|img| img.value().attr("src"))
        .unwrap_or_default()
        .to_string()
}

/// `None` when the page has no nutrition container at all.
pub fn resolve_nutrition(doc: &Html) -> Option<Attributes> {
    let container = doc.select(&NUTRITION).next()?;
    Some(container.select(&NUTRITION_ROW).filter_map(nutrition_row).collect())
}

/// Label from the first cell, per-portion value from the third. The per-100g cell is dropped.
fn nutrition_row(row: ElementRef<'_>) -> Option<NutritionRow> {
    let cells: Vec<_> = row.select(&CELL).collect();
    if cells.len() < 3 {
        return None;
    }
    let label = cells[0].text().collect::<String>();
    Some(NutritionRow {
        label: label.split_whitespace().collect::<Vec<_>>().join(" "),
        value: text_of(cells[2]),
    })
}

/// Extracts a record from a detail page. The category is left as `"Unknown"`
/// for the caller to fill in.
pub fn extract(doc: &Html, source_url: &str) -> Outcome {
    let name = resolve_name(doc);
    let image = resolve_image(doc);

    match image.rsplit('/').next().filter(|f| !f.is_empty()) {
        Some(file) => debug!("  -> Image: {file}"),
        None => debug!("  -> No image found"),
    }

    let Some(attributes) = resolve_nutrition(doc) else {
        debug!("[SKIP] No nutrition data for {name}");
        return Outcome::Skip {
            url: source_url.to_string(),
            reason: format!("no nutrition data for {name}"),
        };
    };

    if attributes.is_empty() {
        warn!("nutrition section without rows on {source_url}");
    } else {
        debug!("{} nutrition rows for {name}", attributes.len());
    }

    Outcome::Success(ExtractedRecord {
        name,
        image,
        url: source_url.to_string(),
        category: UNKNOWN_CATEGORY.to_string(),
        attributes,
    })
}

pub fn extract_html(html: &str, source_url: &str) -> Outcome {
    extract(&Html::parse_document(html), source_url)
}
