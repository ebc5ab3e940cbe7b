use crate::search::SearchHit;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::ROCKET, text.style(theme().header.clone()));
}

pub fn status(icon: &str, label: &str, value: &str) {
    println!("{} {}: {}", icon, label.style(theme().dim.clone()), value);
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted.clone()).to_string()
}

/// One search hit on one line: icon, id, kind, name and the diagram it is on
pub fn hit(hit: &SearchHit) {
    let location = match hit {
        SearchHit::Diagram { .. } => String::new(),
        _ => muted(&format!(" (on D{:04})", hit.diagram_id().0)),
    };
    println!(
        "{} {} {} {}{}",
        Icons::for_hit(hit),
        hit.entity_id().to_string().style(theme().id.clone()),
        hit.type_name().style(theme().kind.clone()),
        hit.name(),
        location
    );
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim.clone()), value);
}
