//! Letter-size invoice pages on top of `pdf-writer`, using the standard Helvetica
//! fonts so no font files need to be embedded.

pub mod invoice;

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> Name<'static> {
        match self {
            Font::Regular => Name(b"F1"),
            Font::Bold => Name(b"F2"),
        }
    }

    fn base_font(self) -> Name<'static> {
        match self {
            Font::Regular => Name(b"Helvetica"),
            Font::Bold => Name(b"Helvetica-Bold"),
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            Font::Regular => &HELVETICA_WIDTHS,
            Font::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }
}

// Advance widths for ASCII 32..=126 from the standard font metrics, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p..~
];

/// Rendered width of `text` in points.
pub fn text_width(text: &str, size: f32, font: Font) -> f32 {
    let widths = font.widths();
    let units: u32 = text
        .chars()
        .map(|c| match c as u32 {
            code @ 32..=126 => widths[(code - 32) as usize] as u32,
            _ => 556,
        })
        .sum();

    units as f32 * size / 1000.0
}

/// Shortens `text` with a trailing ellipsis until it fits in `max_width`.
pub fn fit_text(text: &str, max_width: f32, size: f32, font: Font) -> String {
    if text_width(text, size, font) <= max_width {
        return text.to_string();
    }

    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate = format!("{}...", chars.iter().collect::<String>().trim_end());
        if text_width(&candidate, size, font) <= max_width {
            return candidate;
        }
    }

    String::new()
}

/// WinAnsiEncoding bytes for `text`; characters outside Latin-1 become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{a0}'..='\u{ff}' => c as u8,
            _ => b'?',
        })
        .collect()
}

pub struct Page {
    content: Content,
}

impl Page {
    fn new() -> Self {
        Self {
            content: Content::new(),
        }
    }

    pub fn text(&mut self, x: f32, y: f32, size: f32, font: Font, text: &str) {
        let encoded = win_ansi(text);
        self.content.begin_text();
        self.content.set_font(font.resource(), size);
        self.content.next_line(x, y);
        self.content.show(Str(&encoded));
        self.content.end_text();
    }

    /// Draws `text` so that it ends at `right`.
    pub fn text_right(&mut self, right: f32, y: f32, size: f32, font: Font, text: &str) {
        let x = right - text_width(text, size, font);
        self.text(x, y, size, font, text);
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) {
        self.content.set_line_width(width);
        self.content.move_to(x1, y1);
        self.content.line_to(x2, y2);
        self.content.stroke();
    }

    /// Fills a rectangle in a gray level (0 black, 1 white).
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, gray: f32) {
        self.content.save_state();
        self.content.set_fill_gray(gray);
        self.content.rect(x, y, width, height);
        self.content.fill_nonzero();
        self.content.restore_state();
    }
}

pub struct PdfDocument {
    title: String,
    pages: Vec<Page>,
}

impl PdfDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pages: Vec::new(),
        }
    }

    pub fn add_page(&mut self) -> &mut Page {
        self.pages.push(Page::new());
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Objects: 1 catalog, 2 page tree, 3-4 fonts, 5 info, then a page and its
    /// content stream per page.
    pub fn to_bytes(self) -> Vec<u8> {
        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let info_id = Ref::new(5);
        let font_ids = [(Font::Regular, Ref::new(3)), (Font::Bold, Ref::new(4))];
        let page_ids: Vec<(Ref, Ref)> = (0..self.pages.len() as i32)
            .map(|i| (Ref::new(6 + 2 * i), Ref::new(7 + 2 * i)))
            .collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().map(|(page_id, _)| *page_id))
            .count(page_ids.len() as i32);

        for (font, font_id) in font_ids {
            pdf.type1_font(font_id)
                .base_font(font.base_font())
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        for (page, (page_id, content_id)) in self.pages.into_iter().zip(page_ids) {
            let mut writer = pdf.page(page_id);
            writer.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
            writer.parent(page_tree_id);
            writer.contents(content_id);
            writer
                .resources()
                .fonts()
                .pair(Font::Regular.resource(), font_ids[0].1)
                .pair(Font::Bold.resource(), font_ids[1].1);
            writer.finish();

            pdf.stream(content_id, &page.content.finish());
        }

        pdf.document_info(info_id)
            .title(TextStr(&self.title))
            .producer(TextStr("haulbook"));

        pdf.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|window| window == needle)
    }

    #[test]
    fn encodes_latin1_for_win_ansi_fonts() {
        assert_eq!(win_ansi("a(b)c"), b"a(b)c".to_vec());
        assert_eq!(win_ansi("Café"), b"Caf\xe9".to_vec());
        assert_eq!(win_ansi("→"), b"?".to_vec());
    }

    #[test]
    fn measures_and_fits_text() {
        assert_eq!(text_width("0000", 10.0, Font::Regular), 22.24);
        assert!(text_width("Wide", 10.0, Font::Bold) > text_width("Wide", 10.0, Font::Regular));
        assert_eq!(text_width("$", 10.0, Font::Bold), text_width("$", 10.0, Font::Regular));

        let fitted = fit_text("Crushed limestone delivery to the north pit", 80.0, 9.0, Font::Regular);
        assert!(fitted.ends_with("..."));
        assert!(text_width(&fitted, 9.0, Font::Regular) <= 80.0);
        assert_eq!(fit_text("Short", 80.0, 9.0, Font::Regular), "Short");
    }

    #[test]
    fn writes_every_page_with_both_fonts() {
        let mut doc = PdfDocument::new("Test draft");
        doc.add_page().text(50.0, 700.0, 12.0, Font::Bold, "Hello");
        let page = doc.add_page();
        page.line(50.0, 690.0, 560.0, 690.0, 0.5);
        page.fill_rect(50.0, 600.0, 100.0, 20.0, 0.9);
        assert_eq!(doc.page_count(), 2);

        let bytes = doc.to_bytes();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, b"%%EOF"));
        assert!(contains(&bytes, b"/Count 2"));
        assert!(contains(&bytes, b"/Helvetica-Bold"));
        assert!(contains(&bytes, b"/WinAnsiEncoding"));
        assert!(contains(&bytes, b"(Hello)"));
    }
}
