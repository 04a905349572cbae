use super::hierarchy::WarrantyNode;
use super::status::{classify_stored, ExpirationStatus};
use crate::storage::Warranty;
use chrono::NaiveDate;
use std::collections::HashMap;

/// List filter control. Two-way split: `Active` means "not expired" and
/// includes records the three-way badge classifier marks expiring-soon.
/// Distinct from [`ExpirationStatus`] on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Expired,
}

impl StatusFilter {
    pub fn parse(value: &str) -> Self {
        match value {
            "active" => Self::Active,
            "expired" => Self::Expired,
            _ => Self::All,
        }
    }
}

fn is_expired(warranty: &Warranty, today: NaiveDate) -> bool {
    classify_stored(warranty.expiration_date.as_deref(), today) == Some(ExpirationStatus::Expired)
}

fn matches_search(warranty: &Warranty, property_name: Option<&str>, needle: &str) -> bool {
    let mut haystacks = vec![warranty.product_name.as_str()];
    if let Some(vendor) = &warranty.vendor {
        haystacks.push(vendor);
    }
    if let Some(manufacturer) = &warranty.manufacturer {
        haystacks.push(manufacturer);
    }
    if let Some(name) = property_name {
        haystacks.push(name);
    }
    haystacks
        .iter()
        .any(|h| h.to_lowercase().contains(needle))
}

/// Apply the list presentation policy to assembled warranty nodes: status
/// filter and text search on the top-level record (sub-warranties ride along
/// with their parent), then display order — non-expired before expired,
/// ascending by expiration date within each group. Records without an
/// expiration date count as non-expired and sort after dated ones.
pub fn present(
    mut nodes: Vec<WarrantyNode>,
    filter: StatusFilter,
    search: Option<&str>,
    property_names: &HashMap<String, String>,
    today: NaiveDate,
) -> Vec<WarrantyNode> {
    nodes.retain(|node| match filter {
        StatusFilter::All => true,
        StatusFilter::Active => !is_expired(&node.warranty, today),
        StatusFilter::Expired => is_expired(&node.warranty, today),
    });

    if let Some(query) = search {
        let needle = query.trim().to_lowercase();
        if !needle.is_empty() {
            nodes.retain(|node| {
                let property_name = node
                    .warranty
                    .property_id
                    .as_deref()
                    .and_then(|id| property_names.get(id))
                    .map(String::as_str);
                matches_search(&node.warranty, property_name, &needle)
            });
        }
    }

    nodes.sort_by_key(|node| {
        let expired = is_expired(&node.warranty, today);
        let date = node
            .warranty
            .expiration_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, super::DATE_FORMAT).ok())
            .unwrap_or(NaiveDate::MAX);
        (expired, date)
    });

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warranty::assemble;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn warranty(id: &str, expiration: Option<&str>) -> Warranty {
        Warranty {
            id: id.to_string(),
            property_id: None,
            parent_warranty_id: None,
            product_name: format!("product-{id}"),
            vendor: None,
            manufacturer: None,
            contact_info: None,
            purchased_from: None,
            cost: None,
            purchase_date: None,
            duration: "1_year".to_string(),
            custom_duration_days: None,
            expiration_date: expiration.map(|e| e.to_string()),
            attachments: vec![],
            notes: None,
            created_by: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn ids(nodes: &[WarrantyNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.warranty.id.as_str()).collect()
    }

    #[test]
    fn test_active_filter_keeps_expiring_soon() {
        let today = date("2024-06-01");
        // expiring-soon on the badge, but "not expired" for the filter
        let nodes = assemble(vec![
            warranty("soon", Some("2024-06-10")),
            warranty("gone", Some("2024-05-01")),
            warranty("far", Some("2025-06-01")),
        ]);

        let filtered = present(nodes, StatusFilter::Active, None, &HashMap::new(), today);
        assert_eq!(ids(&filtered), vec!["soon", "far"]);
    }

    #[test]
    fn test_expired_filter() {
        let today = date("2024-06-01");
        let nodes = assemble(vec![
            warranty("soon", Some("2024-06-10")),
            warranty("gone", Some("2024-05-01")),
        ]);

        let filtered = present(nodes, StatusFilter::Expired, None, &HashMap::new(), today);
        assert_eq!(ids(&filtered), vec!["gone"]);
    }

    #[test]
    fn test_display_sort_groups_then_date() {
        let today = date("2024-06-01");
        let nodes = assemble(vec![
            warranty("expired_late", Some("2024-05-20")),
            warranty("active_late", Some("2025-01-01")),
            warranty("expired_early", Some("2024-01-01")),
            warranty("active_early", Some("2024-07-01")),
            warranty("undated", None),
        ]);

        let sorted = present(nodes, StatusFilter::All, None, &HashMap::new(), today);
        assert_eq!(
            ids(&sorted),
            vec![
                "active_early",
                "active_late",
                "undated",
                "expired_early",
                "expired_late"
            ]
        );
    }

    #[test]
    fn test_search_matches_fields_case_insensitive() {
        let today = date("2024-06-01");
        let mut dyson = warranty("w1", None);
        dyson.product_name = "Vacuum".to_string();
        dyson.manufacturer = Some("Dyson".to_string());
        let mut other = warranty("w2", None);
        other.product_name = "Dishwasher".to_string();
        other.vendor = Some("Home Depot".to_string());

        let nodes = assemble(vec![dyson, other]);
        let found = present(
            nodes.clone(),
            StatusFilter::All,
            Some("DYSON"),
            &HashMap::new(),
            today,
        );
        assert_eq!(ids(&found), vec!["w1"]);

        let found = present(
            nodes,
            StatusFilter::All,
            Some("depot"),
            &HashMap::new(),
            today,
        );
        assert_eq!(ids(&found), vec!["w2"]);
    }

    #[test]
    fn test_search_matches_linked_property_name() {
        let today = date("2024-06-01");
        let mut w = warranty("w1", None);
        w.property_id = Some("p1".to_string());
        let nodes = assemble(vec![w, warranty("w2", None)]);

        let mut names = HashMap::new();
        names.insert("p1".to_string(), "Lakeside Cabin".to_string());

        let found = present(nodes, StatusFilter::All, Some("lakeside"), &names, today);
        assert_eq!(ids(&found), vec!["w1"]);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let today = date("2024-06-01");
        let nodes = assemble(vec![warranty("w1", None)]);
        let found = present(nodes, StatusFilter::All, Some("   "), &HashMap::new(), today);
        assert_eq!(ids(&found), vec!["w1"]);
    }

    #[test]
    fn test_sub_warranties_ride_along_with_parent() {
        let today = date("2024-06-01");
        let mut child = warranty("sub", Some("2024-05-01"));
        child.parent_warranty_id = Some("root".to_string());
        let nodes = assemble(vec![warranty("root", Some("2024-06-10")), child]);

        // parent is not expired, so the expired child stays attached
        let filtered = present(nodes, StatusFilter::Active, None, &HashMap::new(), today);
        assert_eq!(ids(&filtered), vec!["root"]);
        assert_eq!(filtered[0].sub_warranties.len(), 1);
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!(StatusFilter::parse("active"), StatusFilter::Active);
        assert_eq!(StatusFilter::parse("expired"), StatusFilter::Expired);
        assert_eq!(StatusFilter::parse("all"), StatusFilter::All);
        assert_eq!(StatusFilter::parse("bogus"), StatusFilter::All);
    }
}
