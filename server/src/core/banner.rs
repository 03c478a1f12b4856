//! Startup banner and URL display

use super::constants::{APP_NAME, DOCS_PATH, OPENAPI_PATH, USERS_PATH};

/// Label column width, "OpenAPI:" plus padding
const W: usize = 10;

/// Format a URL as an OSC 8 terminal hyperlink when the terminal supports it
fn terminal_link(url: &str) -> String {
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        format!("\x1b]8;;{}\x07\x1b[36m{}\x1b[0m\x1b]8;;\x07", url, url)
    } else {
        format!("\x1b[36m{}\x1b[0m", url)
    }
}

fn is_all_interfaces(host: &str) -> bool {
    host == "0.0.0.0" || host == "::" || host == "[::]"
}

/// Print the startup banner with URLs
pub fn print_banner(host: &str, port: u16, alias_style: &str, sort_param: &str) {
    let display_host = if is_all_interfaces(host) {
        "localhost"
    } else {
        host
    };
    let base = format!("http://{}:{}", display_host, port);

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m \x1b[90mv{}\x1b[0m",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    println!();

    for (label, path) in [
        ("Users:", USERS_PATH),
        ("OpenAPI:", OPENAPI_PATH),
        ("Docs:", DOCS_PATH),
    ] {
        println!(
            "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
            label,
            terminal_link(&format!("{}{}", base, path))
        );
    }

    if host == "127.0.0.1" || host == "localhost" {
        println!(
            "  \x1b[90m➜  {:<W$} use --host 0.0.0.0 to expose\x1b[0m",
            "Network:"
        );
    } else if is_all_interfaces(host) {
        if let Ok(interfaces) = local_ip_address::list_afinet_netifas() {
            for (_, ip) in interfaces
                .iter()
                .filter(|(_, ip)| ip.is_ipv4() && !ip.is_loopback())
            {
                println!(
                    "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
                    "Network:",
                    terminal_link(&format!("http://{}:{}", ip, port))
                );
            }
        }
    } else {
        println!(
            "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
            "Network:",
            terminal_link(&format!("http://{}:{}", host, port))
        );
    }

    println!(
        "  \x1b[90m➜  {:<W$} aliases={} sort={}\x1b[0m",
        "Filters:", alias_style, sort_param
    );
    println!();
}
