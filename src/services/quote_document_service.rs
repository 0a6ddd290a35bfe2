use std::fmt::Write;

use crate::models::{
    catalog::BankAccount,
    quote::{Money, PricingOption, QuoteCalculation},
};

const DATE_FORMAT: &str = "%d %b %Y";

/// Render-time extras that are not part of the pricing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentContext<'a> {
    pub reference: &'a str,
    pub client_name: &'a str,
    pub inclusions: &'a [String],
    pub bank_account: Option<&'a BankAccount>,
}

/// A column of the pricing table. Built once per render, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Category,
    Option { index: usize, label: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaxRow {
    Adult,
    ChildWithBed,
    ChildNoBed,
    Infant,
    GroupTotal,
}

/// Whole amounts print without decimals, anything else with two.
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn format_money(money: &Money) -> String {
    format!(
        "AED {} / USD {}",
        format_amount(money.aed),
        format_amount(money.usd)
    )
}

pub fn columns(calc: &QuoteCalculation) -> Vec<Column> {
    let mut columns = vec![Column::Category];
    columns.extend(
        calc.options
            .iter()
            .enumerate()
            .map(|(index, option)| Column::Option {
                index,
                label: option.label.clone(),
            }),
    );
    columns
}

pub fn rows(calc: &QuoteCalculation) -> Vec<PaxRow> {
    let pax = &calc.pax;
    let mut rows = vec![PaxRow::Adult];
    if pax.cwb > 0 {
        rows.push(PaxRow::ChildWithBed);
    }
    if pax.cnb > 0 {
        rows.push(PaxRow::ChildNoBed);
    }
    if pax.infants > 0 {
        rows.push(PaxRow::Infant);
    }
    rows.push(PaxRow::GroupTotal);
    rows
}

fn row_label(calc: &QuoteCalculation, row: PaxRow) -> String {
    let pax = &calc.pax;
    match row {
        PaxRow::Adult => format!("Adult (x{})", pax.adults),
        PaxRow::ChildWithBed => format!("Child with bed (x{})", pax.cwb),
        PaxRow::ChildNoBed => format!("Child no bed (x{})", pax.cnb),
        PaxRow::Infant => format!("Infant (x{})", pax.infants),
        PaxRow::GroupTotal => "Total".to_string(),
    }
}

fn option_cell(calc: &QuoteCalculation, option: &PricingOption, row: PaxRow) -> String {
    match row {
        PaxRow::Adult => format_money(&option.adult),
        PaxRow::ChildWithBed => option.cwb.as_ref().map(format_money).unwrap_or_default(),
        PaxRow::ChildNoBed => option.cnb.as_ref().map(format_money).unwrap_or_default(),
        PaxRow::Infant => match &calc.visa {
            Some(visa) => format!("Visa only USD {}", format_amount(visa.infant_usd)),
            None => "Free".to_string(),
        },
        PaxRow::GroupTotal => format_money(&option.group_total),
    }
}

fn cell(calc: &QuoteCalculation, column: &Column, row: PaxRow) -> String {
    match column {
        Column::Category => row_label(calc, row),
        Column::Option { index, .. } => calc
            .options
            .get(*index)
            .map(|option| option_cell(calc, option, row))
            .unwrap_or_default(),
    }
}

fn render_table(calc: &QuoteCalculation) -> String {
    let columns = columns(calc);
    let mut html = String::from("<table class=\"pricing\">\n<thead><tr>");
    for column in &columns {
        let heading = match column {
            Column::Category => "Per person",
            Column::Option { label, .. } => label.as_str(),
        };
        let _ = write!(html, "<th>{}</th>", escape_html(heading));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in rows(calc) {
        let class = if row == PaxRow::GroupTotal {
            " class=\"total\""
        } else {
            ""
        };
        let _ = write!(html, "<tr{}>", class);
        for column in &columns {
            let _ = write!(html, "<td>{}</td>", escape_html(&cell(calc, column, row)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

/// HTML quote block for on-screen preview, PDF export and print.
pub fn render_html(calc: &QuoteCalculation, ctx: &DocumentContext<'_>) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"quote\">\n");
    html.push_str(
        "<style>.quote{font-family:Arial,sans-serif;color:#222}\
         .quote table{border-collapse:collapse;width:100%}\
         .quote th,.quote td{border:1px solid #ccc;padding:6px;text-align:left}\
         .quote tr.total td{font-weight:bold}</style>\n",
    );

    if !ctx.reference.is_empty() {
        let _ = writeln!(html, "<p class=\"reference\">Ref: {}</p>", escape_html(ctx.reference));
    }
    if !ctx.client_name.is_empty() {
        let _ = writeln!(html, "<h2>Quotation for {}</h2>", escape_html(ctx.client_name));
    }

    let _ = writeln!(
        html,
        "<p>{} - {} ({:02} Nights)</p>",
        calc.stay.check_in.format(DATE_FORMAT),
        calc.stay.check_out.format(DATE_FORMAT),
        calc.nights
    );
    let _ = writeln!(html, "<p>{}</p>", escape_html(&calc.pax.summary()));
    let _ = writeln!(html, "<p>Hotel: {}</p>", escape_html(&calc.hotel_name));

    html.push_str(&render_table(calc));

    if !calc.tours.is_empty() {
        html.push_str("<h3>Tours</h3>\n<ul>\n");
        for tour in &calc.tours {
            let _ = writeln!(html, "<li>{}</li>", escape_html(&tour.name));
        }
        html.push_str("</ul>\n");
    }

    if !ctx.inclusions.is_empty() {
        html.push_str("<h3>Inclusions</h3>\n<ul>\n");
        for inclusion in ctx.inclusions {
            let _ = writeln!(html, "<li>{}</li>", escape_html(inclusion));
        }
        html.push_str("</ul>\n");
    }

    let mut notes = Vec::new();
    if let Some(visa) = &calc.visa {
        notes.push(format!(
            "UAE visa included: AED {} per adult, AED {} per child",
            format_amount(visa.adult_aed),
            format_amount(visa.child_aed)
        ));
        if calc.pax.infants > 0 {
            notes.push(format!(
                "Infant visa charged separately at USD {} each",
                format_amount(visa.infant_usd)
            ));
        }
    }
    if let Some(transfer) = &calc.airport_transfer {
        notes.push(format!(
            "Return airport transfer included (AED {} per adult)",
            format_amount(transfer.per_adult_aed)
        ));
    }
    notes.push(format!(
        "Rates in USD at AED {} per USD",
        format_amount(calc.exchange_rate)
    ));
    html.push_str("<ul class=\"notes\">\n");
    for note in notes {
        let _ = writeln!(html, "<li>{}</li>", escape_html(&note));
    }
    html.push_str("</ul>\n");

    if let Some(account) = ctx.bank_account {
        html.push_str("<div class=\"bank\">\n<h3>Bank details</h3>\n");
        let mut lines = vec![
            format!("Bank: {}", account.bank_name),
            format!("Account name: {}", account.account_name),
            format!("Account number: {}", account.account_number),
        ];
        if let Some(iban) = &account.iban {
            lines.push(format!("IBAN: {}", iban));
        }
        if let Some(swift) = &account.swift {
            lines.push(format!("SWIFT: {}", swift));
        }
        lines.push(format!("Currency: {}", account.currency));
        for line in lines {
            let _ = writeln!(html, "<p>{}</p>", escape_html(&line));
        }
        html.push_str("</div>\n");
    }

    html.push_str("</div>\n");
    html
}

fn child_totals(option: &PricingOption) -> Vec<String> {
    option
        .cwb
        .iter()
        .chain(option.cnb.iter())
        .map(|money| format_amount(money.aed))
        .collect()
}

/// Plain-text AED breakdown for the clipboard.
pub fn render_breakdown(calc: &QuoteCalculation) -> String {
    let mut lines = vec![
        format!(
            "{} - {}",
            calc.stay.check_in.format(DATE_FORMAT),
            calc.stay.check_out.format(DATE_FORMAT)
        ),
        format!("{:02} Nights", calc.nights),
        calc.pax.summary(),
    ];

    if calc.extra_bed_required {
        lines.push(format!(
            "{} - {} sell | {} EB",
            calc.hotel_name,
            format_amount(calc.hotel_rate),
            format_amount(calc.extra_bed_rate)
        ));
    } else {
        lines.push(format!(
            "{} - {} sell",
            calc.hotel_name,
            format_amount(calc.hotel_rate)
        ));
    }

    for tour in &calc.tours {
        lines.push(format!("{} - {}", tour.name, format_amount(tour.per_person)));
    }

    if let Some(visa) = &calc.visa {
        if calc.pax.has_children() {
            lines.push(format!(
                "Visa - {}/{}",
                format_amount(visa.adult_aed),
                format_amount(visa.child_aed)
            ));
        } else {
            lines.push(format!("Visa - {}", format_amount(visa.adult_aed)));
        }
    }

    if let Some(transfer) = &calc.airport_transfer {
        lines.push(format!(
            "Airport Transfer - {}",
            format_amount(transfer.per_adult_aed)
        ));
    }

    let labelled = calc.options.len() > 1;
    for option in &calc.options {
        let mut figures = vec![format_amount(option.adult.aed)];
        figures.extend(child_totals(option));
        if labelled {
            lines.push(format!("Total ({}) - {}", option.label, figures.join("/")));
        } else {
            lines.push(format!("Total - {}", figures.join("/")));
        }
    }

    lines.join("\n")
}
