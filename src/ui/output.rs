use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::ROCKET, text.style(theme().header));
}

pub fn status(icon: &str, label: &str, value: &str) {
    println!("{} {}: {}", icon, label.style(theme().dim), value);
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info),
        label.style(theme().dim),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim).to_string()
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted).to_string()
}

/// One narrator of a chain, indented under the previous one
pub fn chain_step(position: i64, name: &str, grade: Option<&str>) {
    let arrow = if position > 1 { "└─" } else { "  " };
    match grade {
        Some(grade) => println!(
            "  {} {} {} {}",
            arrow.style(theme().muted),
            position.style(theme().info),
            name.style(theme().accent),
            format!("({grade})").style(theme().dim)
        ),
        None => println!(
            "  {} {} {}",
            arrow.style(theme().muted),
            position.style(theme().info),
            name.style(theme().accent)
        ),
    }
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim), value);
}
