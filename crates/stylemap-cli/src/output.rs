//! Plain-terminal rendering of scans and swatch plans.

use std::io::{self, Write};

use console::Style;
use stylemap::swatch::CardBody;
use stylemap::{GroupNode, ScanResult, SwatchPlan};

/// Writes the group tree, one node per line, indented by depth.
pub fn write_tree(out: &mut impl Write, scan: &ScanResult) -> io::Result<()> {
    if scan.groups.is_empty() {
        return writeln!(out, "{}", Style::new().dim().apply_to("no styles or variables found"));
    }
    for bucket in &scan.groups {
        write_node(out, bucket, 0)?;
    }
    Ok(())
}

fn write_node(out: &mut impl Write, node: &GroupNode, depth: usize) -> io::Result<()> {
    let label = if depth == 0 {
        Style::new().bold().apply_to(node.display_label())
    } else {
        Style::new().apply_to(node.display_label())
    };
    writeln!(
        out,
        "{:indent$}{} {} {}",
        "",
        label,
        Style::new().cyan().apply_to(format!("({})", node.leaf_count)),
        Style::new().dim().apply_to(&node.id),
        indent = depth * 2
    )?;
    for child in &node.children {
        write_node(out, child, depth + 1)?;
    }
    Ok(())
}

/// Writes each swatch column with its cards, then the text specimens.
pub fn write_plan(out: &mut impl Write, plan: &SwatchPlan) -> io::Result<()> {
    let title = Style::new().bold();
    let dim = Style::new().dim();

    for column in &plan.columns {
        writeln!(out, "{}", title.apply_to(&column.title))?;
        for card in &column.cards {
            writeln!(out, "  {:<24} {}", card.name, dim.apply_to(describe(&card.body)))?;
        }
    }
    for column in &plan.text_columns {
        writeln!(out, "{}", title.apply_to(&column.title))?;
        for specimen in &column.specimens {
            writeln!(out, "  {}", specimen.lines.join(" | "))?;
        }
    }
    writeln!(out, "{}", dim.apply_to(format!("{} cards", plan.card_count())))
}

fn describe(body: &CardBody) -> String {
    match body {
        CardBody::Color {
            hex,
            oklch,
            opacity,
            ..
        } => {
            if *opacity < 1.0 {
                format!("{} {} {:.0}%", hex, oklch, opacity * 100.0)
            } else {
                format!("{} {}", hex, oklch)
            }
        }
        CardBody::Gradient { stops } => stops.join(", "),
        CardBody::Image => "image".to_string(),
        CardBody::Effect { effect_type, params } if params.is_empty() => effect_type.clone(),
        CardBody::Effect { effect_type, params } => format!("{} ({})", effect_type, params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylemap::{DocumentSnapshot, Session};

    fn render_tree(scan: &ScanResult) -> String {
        let mut out = Vec::new();
        write_tree(&mut out, scan).unwrap();
        console::strip_ansi_codes(&String::from_utf8(out).unwrap()).into_owned()
    }

    #[test]
    fn test_empty_scan() {
        let text = render_tree(&ScanResult::default());
        assert_eq!(text.trim(), "no styles or variables found");
    }

    #[test]
    fn test_tree_indents_children() {
        let doc = DocumentSnapshot::from_json(
            r#"{ "paintStyles": [
                { "id": "P:1", "name": "surface/card",
                  "paints": [{ "type": "SOLID", "color": { "r": 1, "g": 1, "b": 1 } }] }
            ] }"#,
        )
        .unwrap();
        let mut session = Session::new(doc);
        let text = render_tree(&session.scan());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines, ["Paint (1) paint", "  surface (1) paint__surface"]);
    }

    #[test]
    fn test_describe_bodies() {
        assert_eq!(
            describe(&CardBody::Effect {
                effect_type: "Drop Shadow".into(),
                params: "radius: 4, x: 0, y: 2, spread: 0".into(),
            }),
            "Drop Shadow (radius: 4, x: 0, y: 2, spread: 0)"
        );
        assert_eq!(
            describe(&CardBody::Effect {
                effect_type: "Mystery".into(),
                params: String::new(),
            }),
            "Mystery"
        );
        assert_eq!(describe(&CardBody::Image), "image");
    }
}
