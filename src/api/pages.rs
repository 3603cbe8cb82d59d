//! Server-side HTML for the dashboard pages.
//!
//! Every interpolated value goes through [`escape`].

use std::fmt::Write;

use crate::api::handlers::StatusResponse;
use crate::models::history::HistoryEntry;

const PLACEHOLDER: &str = "—";

pub fn escape(input: &str) -> String {
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

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="ru">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<nav><a href="/">Dashboard</a> | <a href="/history">History</a></nav>
{body}
</body>
</html>"#,
        title = escape(title),
        body = body,
    )
}

fn opt_number(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn opt_float(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1}", v)).unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn dashboard(status: &StatusResponse) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<section class="summary">
<p class="status" title="{status}">{indicator}</p>
<p class="mileage">Mileage: <strong>{mileage}</strong> km</p>
<p class="updated">Updated: {updated}</p>
</section>
"#,
        status = status.status,
        indicator = status.indicator,
        mileage = opt_number(status.mileage),
        updated = escape(status.updated_at.as_deref().unwrap_or(PLACEHOLDER)),
    );

    let obd = status.obd.clone().unwrap_or_default();
    let common = status.common.clone().unwrap_or_default();
    let _ = write!(
        body,
        r#"<section class="vehicle">
<p class="fuel">Fuel: {litres} l ({percent}%)</p>
<p class="battery">Battery: {battery} V</p>
<p class="temperature">Engine: {etemp} °C, cabin: {ctemp} °C</p>
"#,
        litres = opt_float(obd.fuel_litres),
        percent = opt_number(obd.fuel_percent),
        battery = opt_float(common.battery),
        etemp = opt_number(common.etemp),
        ctemp = opt_number(common.ctemp),
    );
    for entry in &status.balance {
        let _ = writeln!(
            body,
            "<p class=\"balance\">Balance: {} {}</p>",
            opt_number(entry.value),
            escape(entry.currency.as_deref().unwrap_or("")),
        );
    }
    body.push_str("</section>\n");

    body.push_str(
        "<table class=\"services\">\n<tr><th>Service</th><th>Last, km</th><th>Interval, km</th><th>Remaining, km</th></tr>\n",
    );
    for service in &status.services {
        let class = if service.is_overdue() { " class=\"overdue\"" } else { "" };
        let _ = writeln!(
            body,
            "<tr{class}><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&service.description),
            service.latest_action_km,
            service.range_km,
            service.remain_km,
        );
    }
    body.push_str("</table>\n");

    layout("StarLine dashboard", &body)
}

pub fn history(
    entries: &[HistoryEntry],
    service_names: &[String],
    mileage: Option<i64>,
    today: &str,
) -> String {
    let mut body = String::new();

    body.push_str(
        "<table class=\"history\">\n<tr><th>Date</th><th>Mileage</th><th>Service</th><th>Description</th><th>Cost</th></tr>\n",
    );
    for entry in entries {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&entry.date),
            entry.mileage,
            escape(&entry.service),
            escape(&entry.description),
            entry.cost,
        );
    }
    body.push_str("</table>\n");

    let mut options = String::new();
    for name in service_names {
        let _ = writeln!(options, "<option value=\"{0}\">", escape(name));
    }

    let _ = write!(
        body,
        r#"<form method="post" action="/history/add">
<input name="date" value="{today}" pattern="\d{{2}}\.\d{{2}}\.\d{{4}}" required>
<input name="mileage" type="number" min="0" max="2000000" value="{mileage}" required>
<input name="service" list="service-names" maxlength="100" required>
<datalist id="service-names">
{options}</datalist>
<input name="description" maxlength="500">
<input name="cost" type="number" min="0" max="2000000" required>
<button type="submit">Add</button>
</form>
"#,
        today = escape(today),
        mileage = mileage.map(|m| m.to_string()).unwrap_or_default(),
        options = options,
    );

    layout("Service history", &body)
}
