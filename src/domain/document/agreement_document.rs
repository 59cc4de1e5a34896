//! Agreement document rendering.
//!
//! Lays the signed (or about to be signed) session out as paginated text
//! blocks. Rendering is pure; writing the result somewhere is the job of a
//! `DocumentExporter`.

use serde::Serialize;

use super::layout::{wrap, PageLayout};
use crate::domain::discovery::DiscoverySession;
use crate::domain::foundation::Timestamp;

const TITLE_SIZE: f64 = 18.0;
const HEADING_SIZE: f64 = 14.0;
const SUBTITLE_SIZE: f64 = 12.0;
const BODY_SIZE: f64 = 11.0;
const FINE_PRINT_SIZE: f64 = 9.0;

const BLANK_SIGNATURE: &str = "___________________";
const NO_VALUE_NO_FEE: &str =
    "If no measurable value is created, no payment is due. Either party may exit at any time.";

/// Wrapped lines placed at a vertical offset on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedBlock {
    pub y: f64,
    pub font_size: f64,
    pub bold: bool,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub blocks: Vec<PlacedBlock>,
}

impl Page {
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A rendered document ready for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDocument {
    pub file_name: String,
    pub pages: Vec<Page>,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text, pages separated by form feeds.
    pub fn to_text(&self) -> String {
        self.pages
            .iter()
            .map(Page::text)
            .collect::<Vec<_>>()
            .join("\n\x0c\n")
    }
}

/// Accumulates blocks, starting a new page when the next block would
/// overflow the page limit.
struct DocumentBuilder {
    layout: PageLayout,
    y: f64,
    pages: Vec<Page>,
}

impl DocumentBuilder {
    fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            y: layout.margin,
            pages: vec![Page::default()],
        }
    }

    fn line(&mut self, text: &str, font_size: f64, bold: bool) {
        let lines = wrap(text, self.layout.chars_per_line(font_size));
        let count = lines.len();
        if self.y + PageLayout::required_height(count, font_size) > self.layout.page_limit {
            self.pages.push(Page::default());
            self.y = self.layout.margin;
        }
        if let Some(page) = self.pages.last_mut() {
            page.blocks.push(PlacedBlock {
                y: self.y,
                font_size,
                bold,
                lines,
            });
        }
        self.y += PageLayout::advance(count, font_size);
    }

    fn body(&mut self, text: &str) {
        self.line(text, BODY_SIZE, false);
    }

    fn heading(&mut self, text: &str) {
        self.line(text, HEADING_SIZE, true);
    }

    fn space(&mut self, mm: f64) {
        self.y += mm;
    }

    fn finish(self, file_name: String) -> RenderedDocument {
        RenderedDocument {
            file_name,
            pages: self.pages,
        }
    }
}

/// `{brand}-Agreement-{business name}` with every whitespace run replaced
/// by a single dash.
pub fn agreement_file_name(brand: &str, business_name: &str) -> String {
    format!(
        "{}-Agreement-{}",
        dash_whitespace(brand),
        dash_whitespace(business_name)
    )
}

fn dash_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push('-');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Renders the agreement for `session` dated `date`.
pub fn render_agreement(
    session: &DiscoverySession,
    brand: &str,
    date: &Timestamp,
    layout: PageLayout,
) -> RenderedDocument {
    let snapshot = session.business_snapshot();
    let agreement = session.agreement();
    let date_label = date.date_label();
    let mut doc = DocumentBuilder::new(layout);

    doc.line(&format!("{} - Discovery Agreement", brand), TITLE_SIZE, true);
    doc.space(4.0);
    doc.line(
        &format!("Prepared for: {}", snapshot.business_name),
        SUBTITLE_SIZE,
        false,
    );
    doc.body(&format!("Date: {}", date_label));
    doc.line(&format!("Session ID: {}", session.id()), FINE_PRINT_SIZE, false);
    doc.space(8.0);

    doc.heading("Business Overview");
    doc.body(&format!("Industry: {}", snapshot.industry));
    doc.body(&format!(
        "Team size: {}",
        snapshot.team_size.map(|t| t.label()).unwrap_or_default()
    ));
    if let Some(range) = snapshot.revenue_range.filter(|r| r.is_disclosed()) {
        doc.body(&format!("Revenue range: {}", range.label()));
    }
    doc.space(8.0);

    doc.heading("What We'll Build");
    for (i, opp) in session.automation_opportunities().iter().enumerate() {
        doc.line(&format!("{}. {}", i + 1, opp.title), BODY_SIZE, true);
        doc.body(&opp.description);
        doc.space(4.0);
    }
    doc.space(4.0);

    doc.heading("Success Metrics");
    for metric in &agreement.metrics {
        doc.line(&format!("- {}", metric.name), BODY_SIZE, true);
        doc.body(&format!("  {}", metric.description));
        doc.body(&format!("  Data source: {}", metric.data_source));
        doc.body(&format!("  Target: {}", metric.target_improvement));
        doc.space(2.0);
    }
    doc.space(4.0);

    doc.heading("Agreement Terms");
    doc.body(&format!(
        "Value-share: {} of measurable value created",
        agreement.value_share_percent
    ));
    doc.body(&format!("Baseline period: {} days", agreement.baseline_days));
    doc.body(&format!("Measurement period: {} days", agreement.measurement_days));
    doc.body(&format!("First invoice: Day {}", agreement.first_invoice_day()));
    doc.space(4.0);
    doc.body(NO_VALUE_NO_FEE);
    doc.space(12.0);

    doc.heading("Agreed By");
    doc.space(4.0);
    let client = if agreement.client_name.trim().is_empty() {
        BLANK_SIGNATURE
    } else {
        agreement.client_name.as_str()
    };
    doc.body(&format!("Client: {}", client));
    doc.space(8.0);
    doc.body(&format!("{}: {}", brand, BLANK_SIGNATURE));
    doc.space(8.0);
    doc.body(&format!("Date: {}", date_label));

    doc.finish(agreement_file_name(brand, &snapshot.business_name))
}
