use console::{measure_text_width, Style};

fn purple() -> Style {
    Style::new().color256(135)
}

fn light_purple() -> Style {
    Style::new().color256(177)
}

fn dim() -> Style {
    Style::new().color256(244)
}

pub fn header(title: &str) -> String {
    purple().bold().apply_to(title).to_string()
}

pub fn step(msg: &str) -> String {
    format!("{}{}", purple().apply_to("→ "), msg)
}

pub fn success(msg: &str) -> String {
    Style::new().green().bold().apply_to(format!("✓ {}", msg)).to_string()
}

pub fn error(msg: &str) -> String {
    Style::new().red().bold().apply_to(format!("✗ {}", msg)).to_string()
}

pub fn subtle(msg: &str) -> String {
    dim().italic().apply_to(msg).to_string()
}

pub fn label(msg: &str) -> String {
    dim().apply_to(msg).to_string()
}

pub fn highlight(msg: &str) -> String {
    light_purple().bold().apply_to(msg).to_string()
}

pub fn field(name: &str, value: &str) -> String {
    format!(
        "{}{}",
        label(&format!("{}: ", name)),
        Style::new().white().bold().apply_to(value)
    )
}

/// Draws a rounded border around `content`, padded one line and two
/// columns on each side.
pub fn result_box(content: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let inner = lines.iter().map(|l| measure_text_width(l)).max().unwrap_or(0);
    let border = Style::new().color256(93);
    let rule = "─".repeat(inner + 4);
    let blank = format!(
        "{}{}{}",
        border.apply_to("│"),
        " ".repeat(inner + 4),
        border.apply_to("│")
    );

    let mut out = format!("{}\n{}\n", border.apply_to(format!("╭{}╮", rule)), blank);
    for line in lines {
        let pad = inner - measure_text_width(line);
        out.push_str(&format!(
            "{}  {}{}  {}\n",
            border.apply_to("│"),
            line,
            " ".repeat(pad),
            border.apply_to("│")
        ));
    }
    out.push_str(&format!("{}\n{}", blank, border.apply_to(format!("╰{}╯", rule))));
    out
}
