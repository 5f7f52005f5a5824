//! Embedded minijinja environment shared by all handlers.

use std::sync::OnceLock;

use minijinja::{Environment, Value};

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// All page templates, compiled into the binary.
const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/layout.html")),
    ("portfolio.html", include_str!("../../templates/portfolio.html")),
    ("buy.html", include_str!("../../templates/buy.html")),
    ("sell.html", include_str!("../../templates/sell.html")),
    ("quote.html", include_str!("../../templates/quote.html")),
    ("quoted.html", include_str!("../../templates/quoted.html")),
    ("history.html", include_str!("../../templates/history.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("register.html", include_str!("../../templates/register.html")),
    ("transfer.html", include_str!("../../templates/transfer.html")),
    ("apology.html", include_str!("../../templates/apology.html")),
];

/// The shared template environment, built once at first use.
pub fn env() -> &'static Environment<'static> {
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.add_filter("usd", usd);
        for (name, source) in TEMPLATES {
            env.add_template(name, source)
                .unwrap_or_else(|e| panic!("template {} failed to parse: {}", name, e));
        }
        env
    })
}

/// Render a named template to HTML.
pub fn render(name: &str, ctx: Value) -> Result<String, minijinja::Error> {
    env().get_template(name)?.render(ctx)
}

/// `usd` filter: format a number as dollars and cents with thousands
/// separators.
///
/// Decimal context values arrive as strings, so this parses from the
/// value's string form rather than demanding a float.
fn usd(value: Value) -> Result<String, minijinja::Error> {
    let amount: f64 = value.to_string().parse().map_err(|_| {
        minijinja::Error::new(
            minijinja::ErrorKind::InvalidOperation,
            "usd expects a numeric value",
        )
    })?;

    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = group_thousands(cents / 100);
    let sign = if negative { "-" } else { "" };
    Ok(format!("{}${}.{:02}", sign, dollars, cents % 100))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_usd_formatting() {
        let fmt = |v: Value| usd(v).unwrap();

        assert_eq!(fmt(Value::from(0.0)), "$0.00");
        assert_eq!(fmt(Value::from(10000)), "$10,000.00");
        assert_eq!(fmt(Value::from(1234567.891)), "$1,234,567.89");
        assert_eq!(fmt(Value::from(-42.5)), "-$42.50");
        // Decimals reach the filter as their string serialization.
        assert_eq!(fmt(Value::from("250.50")), "$250.50");
        assert!(usd(Value::from("not a number")).is_err());
    }

    #[test]
    fn test_all_templates_parse_and_apology_renders() {
        let html = render(
            "apology.html",
            context! { status => 403, message => "must provide symbol" },
        )
        .unwrap();

        assert!(html.contains("403"));
        assert!(html.contains("must provide symbol"));
    }
}
