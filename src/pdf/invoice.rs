use crate::config::InvoiceIssuer;
use crate::database::models::{InvoiceDetail, InvoiceLine};

use super::{Font, Page, PdfDocument, fit_text};

const LEFT: f32 = 50.0;
const RIGHT: f32 = 562.0;
const ROW_HEIGHT: f32 = 16.0;
const TABLE_BOTTOM: f32 = 80.0;
const TOTALS_HEIGHT: f32 = 100.0;
const BODY_SIZE: f32 = 9.0;

struct Column {
    title: &'static str,
    x: f32,
    width: f32,
    right_aligned: bool,
}

const COLUMNS: [Column; 7] = [
    Column { title: "Date", x: LEFT, width: 60.0, right_aligned: false },
    Column { title: "Description", x: 115.0, width: 175.0, right_aligned: false },
    Column { title: "Unit", x: 295.0, width: 45.0, right_aligned: false },
    Column { title: "Driver", x: 345.0, width: 80.0, right_aligned: false },
    Column { title: "Qty", x: 465.0, width: 35.0, right_aligned: true },
    Column { title: "Rate", x: 510.0, width: 45.0, right_aligned: true },
    Column { title: "Amount", x: RIGHT, width: 60.0, right_aligned: true },
];

/// `$1,234.56`, with a leading minus for negative amounts.
pub fn format_money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (index, digit) in dollars.chars().enumerate() {
        if index > 0 && (dollars.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

fn format_quantity(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn format_percent(value: f64) -> String {
    format!("{}%", format_quantity(value))
}

fn draw_letterhead(page: &mut Page, issuer: &InvoiceIssuer, detail: &InvoiceDetail) {
    let invoice = &detail.invoice;

    page.text(LEFT, 742.0, 18.0, Font::Bold, &issuer.name);
    let contact = [
        issuer.address.clone(),
        issuer.phone.clone(),
        issuer.email.clone(),
        issuer.tax_number.as_ref().map(|n| format!("Tax No. {}", n)),
    ];
    let mut y = 726.0;
    for value in contact.into_iter().flatten() {
        page.text(LEFT, y, 10.0, Font::Regular, &value);
        y -= 13.0;
    }

    page.text_right(RIGHT, 742.0, 20.0, Font::Bold, "INVOICE");
    let facts = [
        format!("Invoice #: {}", invoice.invoice_number),
        format!("Date: {}", invoice.invoice_date),
        format!("Period: {} to {}", invoice.period_start, invoice.period_end),
        format!("Status: {}", invoice.status.as_str().to_uppercase()),
    ];
    let mut y = 722.0;
    for fact in &facts {
        page.text_right(RIGHT, y, 10.0, Font::Regular, fact);
        y -= 14.0;
    }

    page.text(LEFT, 640.0, 11.0, Font::Bold, "Bill To");
    page.text(LEFT, 626.0, 10.0, Font::Regular, &invoice.billed_to);
    let mut y = 612.0;
    if let Some(email) = &invoice.billed_email {
        page.text(LEFT, y, 10.0, Font::Regular, email);
        y -= 14.0;
    }
    page.text(
        LEFT,
        y,
        10.0,
        Font::Regular,
        &format!("Dispatcher: {}", detail.dispatcher_name),
    );
}

fn draw_table_header(page: &mut Page, y: f32) {
    page.fill_rect(LEFT - 4.0, y - 5.0, RIGHT - LEFT + 8.0, ROW_HEIGHT, 0.88);
    for column in &COLUMNS {
        if column.right_aligned {
            page.text_right(column.x, y, BODY_SIZE, Font::Bold, column.title);
        } else {
            page.text(column.x, y, BODY_SIZE, Font::Bold, column.title);
        }
    }
}

fn draw_line(page: &mut Page, y: f32, line: &InvoiceLine) {
    let cells = [
        line.job_date.format("%Y-%m-%d").to_string(),
        line.description.clone(),
        line.unit_number.clone(),
        line.driver_name.clone(),
        format_quantity(line.quantity),
        format_money(line.rate),
        format_money(line.amount),
    ];

    for (column, cell) in COLUMNS.iter().zip(&cells) {
        let cell = fit_text(cell, column.width, BODY_SIZE, Font::Regular);
        if column.right_aligned {
            page.text_right(column.x, y, BODY_SIZE, Font::Regular, &cell);
        } else {
            page.text(column.x, y, BODY_SIZE, Font::Regular, &cell);
        }
    }
}

fn continuation_page(doc: &mut PdfDocument, invoice_number: &str) -> f32 {
    let page = doc.add_page();
    page.text(
        LEFT,
        742.0,
        12.0,
        Font::Bold,
        &format!("Invoice {} (continued)", invoice_number),
    );
    draw_table_header(page, 712.0);
    712.0 - ROW_HEIGHT - 4.0
}

fn draw_totals(page: &mut Page, mut y: f32, detail: &InvoiceDetail) {
    let invoice = &detail.invoice;
    page.line(360.0, y + 12.0, RIGHT, y + 12.0, 0.75);

    let rows = [
        ("Subtotal".to_string(), format_money(invoice.subtotal), Font::Regular),
        (
            format!("Commission ({})", format_percent(invoice.commission_percent)),
            format_money(-invoice.commission),
            Font::Regular,
        ),
        (
            format!("Tax ({})", format_percent(invoice.tax_percent)),
            format_money(invoice.tax),
            Font::Regular,
        ),
        ("Total".to_string(), format_money(invoice.total), Font::Bold),
    ];

    for (label, value, font) in &rows {
        let size = if *font == Font::Bold { 11.0 } else { 10.0 };
        page.text(370.0, y, size, *font, label);
        page.text_right(RIGHT, y, size, *font, value);
        y -= ROW_HEIGHT;
    }

    if let Some(notes) = &invoice.notes {
        let notes = fit_text(&format!("Notes: {}", notes), RIGHT - LEFT, 9.0, Font::Regular);
        page.text(LEFT, y - 4.0, 9.0, Font::Regular, &notes);
    }
}

/// Lays out an invoice across as many Letter pages as its lines need.
pub fn render_invoice(issuer: &InvoiceIssuer, detail: &InvoiceDetail) -> Vec<u8> {
    let invoice_number = detail.invoice.invoice_number.as_str();
    let mut doc = PdfDocument::new(format!("Invoice {}", invoice_number));

    let page = doc.add_page();
    draw_letterhead(page, issuer, detail);
    draw_table_header(page, 560.0);
    let mut y = 560.0 - ROW_HEIGHT - 4.0;

    for line in &detail.lines {
        if y < TABLE_BOTTOM {
            y = continuation_page(&mut doc, invoice_number);
        }
        if let Some(page) = doc.pages_mut().last_mut() {
            draw_line(page, y, line);
        }
        y -= ROW_HEIGHT;
    }

    if y - TOTALS_HEIGHT < TABLE_BOTTOM - ROW_HEIGHT {
        let page = doc.add_page();
        page.text(
            LEFT,
            742.0,
            12.0,
            Font::Bold,
            &format!("Invoice {} (continued)", invoice_number),
        );
        y = 712.0;
    } else {
        y -= 8.0;
    }
    if let Some(page) = doc.pages_mut().last_mut() {
        draw_totals(page, y, detail);
    }

    let count = doc.page_count();
    for (index, page) in doc.pages_mut().iter_mut().enumerate() {
        page.line(LEFT, 48.0, RIGHT, 48.0, 0.5);
        page.text(LEFT, 34.0, 8.0, Font::Regular, &issuer.name);
        page.text_right(
            RIGHT,
            34.0,
            8.0,
            Font::Regular,
            &format!("Page {} of {}", index + 1, count),
        );
    }

    doc.to_bytes()
}
