//! CLI output formatting utilities.

use crate::geo::NearbyOutlet;
use crate::store::Outlet;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print one outlet with its address and hours.
    pub fn outlet(outlet: &Outlet) {
        println!(
            "  {} {} ({})",
            style("*").cyan(),
            style(&outlet.name).bold(),
            style(format!("#{}", outlet.id)).dim()
        );
        println!("     {}", outlet.address().unwrap_or("N/A"));
        if let Some(hours) = outlet.hours() {
            println!("     {}", style(preview(hours, 80)).dim());
        }
    }

    /// Print a nearby outlet with its distance.
    pub fn nearby(result: &NearbyOutlet) {
        println!(
            "  {} {} {}",
            style("*").cyan(),
            style(&result.outlet.name).bold(),
            style(format_distance(result.distance_km)).green()
        );
        println!("     {}", result.outlet.address().unwrap_or("N/A"));
        if let Some(link) = result.outlet.waze_link.as_deref() {
            println!("     {}", style(link).dim());
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(template);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Format a distance as metres below 1 km, kilometres otherwise.
fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else {
        format!("{:.2} km", km)
    }
}

/// Single-line preview, cut on a char boundary.
fn preview(text: &str, max_chars: usize) -> String {
    let text = text.replace('\n', " ");
    if text.chars().count() <= max_chars {
        text
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
