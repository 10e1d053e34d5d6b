//! HTML rendering of a [`ViewModel`].
//!
//! `render_page` is the full dashboard, `render_table` the fragment the page
//! polls from `/data`. Both take the view model as-is.

use crate::config;
use crate::processor::{ViewModel, ViewRow};

/// Full dashboard page
pub fn render_page(view: &ViewModel) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>NIFTY Option Chain</title>
<link rel="stylesheet" href="/styles.css">
</head>
<body>
<header><h1>NIFTY Option Chain</h1></header>
<main>
<div id="option-chain">
{table}
</div>
</main>
<script>
setInterval(function () {{
  fetch("/data")
    .then(function (res) {{ return res.ok ? res.text() : null; }})
    .then(function (html) {{
      if (html !== null) {{ document.getElementById("option-chain").innerHTML = html; }}
    }})
    .catch(function () {{}});
}}, {interval_ms});
</script>
</body>
</html>
"#,
        table = render_table(view),
        interval_ms = config::REFRESH_INTERVAL_SECS * 1000,
    )
}

/// Summary cards plus the option-chain table, without the page shell
pub fn render_table(view: &ViewModel) -> String {
    let mut html = String::with_capacity(12 * 1024);

    render_summary(&mut html, view);

    if view.is_empty() {
        html.push_str("<p class=\"no-data\">No option chain data available.</p>\n");
        return html;
    }

    html.push_str(
        "<table class=\"option-chain\">\n<thead>\n\
         <tr><th colspan=\"5\">CALLS</th><th></th><th colspan=\"5\">PUTS</th></tr>\n\
         <tr><th>OI</th><th>Chg in OI</th><th>Volume</th><th>IV</th><th>LTP</th>\
         <th>Strike</th>\
         <th>LTP</th><th>IV</th><th>Volume</th><th>Chg in OI</th><th>OI</th></tr>\n\
         </thead>\n<tbody>\n",
    );

    for row in &view.rows {
        render_row(&mut html, row);
    }

    html.push_str("</tbody>\n");

    if let Some(totals) = &view.totals {
        html.push_str(&format!(
            "<tfoot><tr class=\"totals\"><td>{}</td><td>{}</td><td colspan=\"3\"></td>\
             <td>Total</td>\
             <td colspan=\"3\"></td><td>{}</td><td>{}</td></tr></tfoot>\n",
            format_int(totals.call_oi),
            format_int(totals.call_change_oi),
            format_int(totals.put_change_oi),
            format_int(totals.put_oi),
        ));
    }

    html.push_str("</table>\n");
    html
}

fn render_summary(html: &mut String, view: &ViewModel) {
    let Some(derived) = &view.derived else {
        return;
    };
    let market = &derived.market;

    html.push_str("<section class=\"summary\">\n");
    for (label, value) in [
        ("Spot", format_price(market.current_price)),
        ("Open", format_price(market.open)),
        ("High", format_price(market.high)),
        ("Prev Close", format_price(market.prev_close)),
        ("PCR", escape(&derived.pcr)),
        ("Support", escape(&derived.support)),
        ("Resistance", escape(&derived.resistance)),
    ] {
        html.push_str(&format!(
            "<div class=\"card\"><span class=\"label\">{}</span><span class=\"value\">{}</span></div>\n",
            label, value
        ));
    }
    if let Some(ts) = &view.timestamp {
        html.push_str(&format!("<p class=\"as-of\">As of {}</p>\n", escape(ts)));
    }
    html.push_str("</section>\n");
}

fn render_row(html: &mut String, row: &ViewRow) {
    let class = if row.is_current_strike { " class=\"current-strike\"" } else { "" };
    let ce = &row.call;
    let pe = &row.put;

    html.push_str(&format!(
        "<tr{class}>\
         <td{}>{}</td><td{}>{}</td><td>{}</td><td>{}</td><td>{}</td>\
         <td class=\"strike\">{}</td>\
         <td>{}</td><td>{}</td><td>{}</td><td{}>{}</td><td{}>{}</td></tr>\n",
        cell_class(ce.is_highest_oi, "highest-oi"),
        format_int(ce.base.open_interest),
        cell_class(ce.is_highest_change_oi, "highest-change-oi"),
        format_int(ce.base.change_in_oi),
        format_opt_int(ce.base.volume),
        format_opt_decimal(ce.base.iv),
        format_decimal(ce.base.last_price),
        format_decimal(row.strike_price),
        format_decimal(pe.base.last_price),
        format_opt_decimal(pe.base.iv),
        format_opt_int(pe.base.volume),
        cell_class(pe.is_highest_change_oi, "highest-change-oi"),
        format_int(pe.base.change_in_oi),
        cell_class(pe.is_highest_oi, "highest-oi"),
        format_int(pe.base.open_interest),
    ));
}

fn cell_class(flag: bool, class: &str) -> String {
    if flag {
        format!(" class=\"{}\"", class)
    } else {
        String::new()
    }
}

fn format_int(value: f64) -> String {
    format!("{:.0}", value)
}

fn format_decimal(value: f64) -> String {
    format!("{:.2}", value)
}

fn format_opt_int(value: Option<f64>) -> String {
    value.map(format_int).unwrap_or_else(|| "-".to_string())
}

fn format_opt_decimal(value: Option<f64>) -> String {
    value.map(format_decimal).unwrap_or_else(|| "-".to_string())
}

fn format_price(value: Option<f64>) -> String {
    value
        .map(format_decimal)
        .unwrap_or_else(|| config::NOT_AVAILABLE.to_string())
}

/// Minimal HTML escaping for text nodes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
