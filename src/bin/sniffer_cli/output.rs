//! Human-readable and JSON output for sniffed displays.

use serde::Serialize;
use sniffer_types::{DisplayData, DisplayUpdate, NetworkSettings, StaticDisplay};

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum JsonEvent<'a> {
    Published {
        input: &'a str,
        generation: u64,
        displays: &'a [StaticDisplay],
    },
    Update(&'a DisplayUpdate),
}

pub fn format_display(display: &StaticDisplay) -> String {
    let mut out = String::new();
    let deprecated = if display.meta.deprecated {
        " \x1b[33m(deprecated)\x1b[0m"
    } else {
        ""
    };
    out.push_str(&format!(
        "\x1b[1m{}\x1b[0m{} \x1b[2m[{}]\x1b[0m\n",
        display.meta.interpreted_as, deprecated, display.meta.id
    ));

    match &display.data {
        DisplayData::Pending => out.push_str("  \x1b[2mloading…\x1b[0m\n"),
        DisplayData::Fields(fields) => {
            let width = fields.iter().map(|f| f.label.chars().count()).max().unwrap_or(0);
            for field in fields {
                let value = if field.link.is_some() {
                    format!("\x1b[36m{}\x1b[0m", field.value)
                } else {
                    field.value.clone()
                };
                out.push_str(&format!("  {:<width$}  {}\n", field.label, value, width = width));
            }
        }
        DisplayData::NotFound(message) => {
            out.push_str(&format!("  \x1b[33m{}\x1b[0m\n", message));
        }
        DisplayData::Error(message) => {
            out.push_str(&format!("  \x1b[31m✗ {}\x1b[0m\n", message));
        }
    }
    out
}

pub fn print_published(input: &str, generation: u64, displays: &[StaticDisplay], json: bool) {
    if json {
        print_json(&JsonEvent::Published {
            input,
            generation,
            displays,
        });
        return;
    }
    if displays.is_empty() {
        println!("\x1b[31m✗ No interpretations for '{}'\x1b[0m", input);
        return;
    }
    println!(
        "\x1b[32m✓ {} interpretation(s) for '{}'\x1b[0m\n",
        displays.len(),
        input
    );
    for display in displays {
        println!("{}", format_display(display));
    }
}

pub fn print_update(update: &DisplayUpdate, json: bool) {
    if json {
        print_json(&JsonEvent::Update(update));
    } else {
        println!("{}", format_display(&update.display));
    }
}

pub fn print_networks(networks: &[&NetworkSettings], json: bool) {
    if json {
        match serde_json::to_string(networks) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("Failed to serialize networks: {}", e),
        }
        return;
    }
    println!("\x1b[1mConfigured networks:\x1b[0m");
    for network in networks {
        let names = if network.names_supported { " (names)" } else { "" };
        println!("  {:<14} {:?}{}  {}", network.name, network.kind, names, network.url);
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{}", line),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}
