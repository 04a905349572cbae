use crate::storage::Warranty;
use serde::Serialize;
use std::collections::HashMap;

/// A top-level warranty with its directly attached sub-warranties.
#[derive(Debug, Clone, Serialize)]
pub struct WarrantyNode {
    #[serde(flatten)]
    pub warranty: Warranty,
    pub sub_warranties: Vec<Warranty>,
}

/// Group a flat record list into roots with one level of sub-warranties.
///
/// Single pass: records without a parent reference become roots in encounter
/// order; records with a parent reference attach to their root in encounter
/// order. A child whose parent id is not among the roots is dropped from the
/// output without being reported.
pub fn assemble(records: Vec<Warranty>) -> Vec<WarrantyNode> {
    let mut roots: Vec<WarrantyNode> = Vec::new();
    let mut children: Vec<Warranty> = Vec::new();

    for record in records {
        if record.parent_warranty_id.is_none() {
            roots.push(WarrantyNode {
                warranty: record,
                sub_warranties: Vec::new(),
            });
        } else {
            children.push(record);
        }
    }

    let index: HashMap<String, usize> = roots
        .iter()
        .enumerate()
        .map(|(i, node)| (node.warranty.id.clone(), i))
        .collect();

    for child in children {
        let parent_id = child.parent_warranty_id.as_deref().unwrap_or_default();
        if let Some(&i) = index.get(parent_id) {
            roots[i].sub_warranties.push(child);
        }
    }

    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warranty(id: &str, parent: Option<&str>) -> Warranty {
        Warranty {
            id: id.to_string(),
            property_id: None,
            parent_warranty_id: parent.map(|p| p.to_string()),
            product_name: format!("product-{id}"),
            vendor: None,
            manufacturer: None,
            contact_info: None,
            purchased_from: None,
            cost: None,
            purchase_date: None,
            duration: "1_year".to_string(),
            custom_duration_days: None,
            expiration_date: None,
            attachments: vec![],
            notes: None,
            created_by: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_groups_children_under_roots() {
        let nodes = assemble(vec![
            warranty("w1", None),
            warranty("w2", Some("w1")),
            warranty("w3", None),
            warranty("w4", Some("w1")),
        ]);

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].warranty.id, "w1");
        assert_eq!(nodes[1].warranty.id, "w3");
        let subs: Vec<&str> = nodes[0]
            .sub_warranties
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(subs, vec!["w2", "w4"]);
        assert!(nodes[1].sub_warranties.is_empty());
    }

    #[test]
    fn test_orphan_children_are_dropped() {
        let nodes = assemble(vec![
            warranty("w1", None),
            warranty("w2", Some("missing")),
        ]);

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].warranty.id, "w1");
        assert!(nodes[0].sub_warranties.is_empty());
    }

    #[test]
    fn test_child_before_parent_in_input_still_attaches() {
        let nodes = assemble(vec![warranty("w2", Some("w1")), warranty("w1", None)]);

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].sub_warranties.len(), 1);
        assert_eq!(nodes[0].sub_warranties[0].id, "w2");
    }

    #[test]
    fn test_root_and_child_sets_invariant_under_permutation() {
        let records = vec![
            warranty("a", None),
            warranty("b", Some("a")),
            warranty("c", None),
            warranty("d", Some("c")),
            warranty("e", Some("a")),
        ];
        let mut reversed = records.clone();
        reversed.reverse();

        let mut ids = |nodes: Vec<WarrantyNode>| -> Vec<(String, Vec<String>)> {
            let mut out: Vec<(String, Vec<String>)> = nodes
                .into_iter()
                .map(|n| {
                    let mut subs: Vec<String> =
                        n.sub_warranties.into_iter().map(|w| w.id).collect();
                    subs.sort();
                    (n.warranty.id, subs)
                })
                .collect();
            out.sort();
            out
        };

        assert_eq!(ids(assemble(records)), ids(assemble(reversed)));
    }

    #[test]
    fn test_grandchildren_are_dropped() {
        // w3 points at w2, which is itself a child: only one grouping level
        let nodes = assemble(vec![
            warranty("w1", None),
            warranty("w2", Some("w1")),
            warranty("w3", Some("w2")),
        ]);

        assert_eq!(nodes.len(), 1);
        let subs: Vec<&str> = nodes[0]
            .sub_warranties
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(subs, vec!["w2"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(assemble(vec![]).is_empty());
    }
}
