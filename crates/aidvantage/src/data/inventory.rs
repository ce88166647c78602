//! Freeform inventory paste: one resource per line,
//! `name, category, unit, quantity, tag;tag`.

use super::loader::parse_tag_list;
use crate::domain::{DisasterTag, ResourceId, ResourceRecord};
use std::sync::atomic::{AtomicU64, Ordering};

static PARSED_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_parsed_id() -> ResourceId {
    let id = PARSED_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ResourceId(format!("parsed-{id:06}"))
}

/// Parses pasted inventory lines. Missing fields fall back to defaults rather
/// than failing, so the result is always as long as the non-blank input.
pub fn parse_inventory(text: &str) -> Vec<ResourceRecord> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| parse_line(index, line))
        .collect()
}

fn parse_line(index: usize, line: &str) -> ResourceRecord {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    let field = |position: usize| parts.get(position).copied().filter(|p| !p.is_empty());

    let name = field(0)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Resource {}", index + 1));
    let category = field(1).unwrap_or("General").to_string();
    let unit = field(2).unwrap_or("units").to_string();
    let available_qty = field(3)
        .and_then(leading_quantity)
        .filter(|qty| *qty > 0)
        .unwrap_or(1);
    let disaster_tags = match field(4).map(parse_tag_list) {
        Some(tags) if !tags.is_empty() => tags,
        _ => vec![DisasterTag::GeneralEmergency],
    };

    ResourceRecord {
        id: next_parsed_id(),
        name,
        category,
        unit,
        available_qty,
        disaster_tags,
    }
}

/// Reads the number a quantity cell starts with, so `40 units` is 40 and
/// `12.5` is 12. Negative or non-numeric cells yield `None`.
fn leading_quantity(raw: &str) -> Option<u64> {
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

/// Renders resources in the same line format `parse_inventory` accepts.
pub fn export_inventory_csv(resources: &[ResourceRecord]) -> String {
    resources
        .iter()
        .map(|resource| {
            let tags: Vec<&str> = resource
                .disaster_tags
                .iter()
                .map(DisasterTag::as_str)
                .collect();
            format!(
                "{},{},{},{},{}",
                resource.name,
                resource.category,
                resource.unit,
                resource.available_qty,
                tags.join(";")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    #[test]
    fn parses_full_lines_and_skips_blanks() {
        let text = "Generators, Equipment, units, 40, power_outage;extreme_heat\n\n  \nSandbags,Relief,bags,900,general_emergency\n";
        let parsed = parse_inventory(text);

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "Generators");
        assert_eq!(parsed[0].available_qty, 40);
        assert_eq!(
            parsed[0].disaster_tags,
            vec![DisasterTag::PowerOutage, DisasterTag::ExtremeHeat]
        );
        assert!(parsed[0].id.0.starts_with("parsed-"));
        assert_ne!(parsed[0].id, parsed[1].id);
    }

    #[test]
    fn quantity_reads_leading_number() {
        let parsed = parse_inventory(
            "Water,Supplies,cases,40 units\nCots,Shelter,cots,12.5\nTarps,Shelter,rolls,-5\nFans,Equipment,units,+7",
        );
        let quantities: Vec<u64> = parsed.iter().map(|r| r.available_qty).collect();
        assert_eq!(quantities, vec![40, 12, 1, 7]);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let parsed = parse_inventory(",,,not-a-number\nBlankets");

        assert_eq!(parsed[0].name, "Resource 1");
        assert_eq!(parsed[0].category, "General");
        assert_eq!(parsed[0].unit, "units");
        assert_eq!(parsed[0].available_qty, 1);
        assert_eq!(parsed[0].disaster_tags, vec![DisasterTag::GeneralEmergency]);
        assert_eq!(parsed[1].name, "Blankets");
    }

    #[test]
    fn export_matches_inventory_line_format() {
        let exported = export_inventory_csv(&fixtures::resources()[..1]);
        assert_eq!(
            exported,
            "Cooling Centers,Shelter,capacity,5000,extreme_heat;power_outage"
        );

        let reparsed = parse_inventory(&exported);
        assert_eq!(reparsed[0].available_qty, 5000);
        assert_eq!(reparsed[0].disaster_tags, fixtures::resources()[0].disaster_tags);
    }
}
