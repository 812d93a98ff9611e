//! The two intake flows and the category-dependent variety table.

use super::field::{FormField, InputKind};

/// Key of the field whose value drives the variety option set.
pub const CATEGORY_FIELD_KEY: &str = "category";

/// Key of the field whose options derive from the chosen category.
pub const VARIETY_FIELD_KEY: &str = "variety";

const CATEGORIES: &[&str] = &["Table Potatoes", "Seed Potatoes", "Processing Potatoes"];

/// Returns the valid varieties for a potato category, or an empty slice for
/// an unknown category.
pub fn varieties_for(category: &str) -> &'static [&'static str] {
    match category {
        "Table Potatoes" => &[
            "Kufri Jyoti",
            "Kufri Pukhraj",
            "Kufri Bahar",
            "Kufri Sindhuri",
        ],
        "Seed Potatoes" => &["Kufri Himalini", "Kufri Girdhari", "Kufri Mohan"],
        "Processing Potatoes" => &[
            "Kufri Chipsona-1",
            "Kufri Chipsona-3",
            "Kufri Frysona",
            "Lady Rosetta",
        ],
        _ => &[],
    }
}

/// Questionnaire for users who already operate a cold storage.
pub fn owner_flow() -> Vec<FormField> {
    vec![
        FormField {
            id: "location",
            key: "location",
            question: "Where is your cold storage located?",
            subtext: Some("We use this for climate-aware advice."),
            kind: InputKind::Text,
            placeholder: Some("City, district or state"),
            options: &[],
        },
        FormField {
            id: "capacity",
            key: "capacity_mt",
            question: "What is the holding capacity of your facility?",
            subtext: Some("In metric tonnes (MT)."),
            kind: InputKind::Text,
            placeholder: Some("e.g. 5000"),
            options: &[],
        },
        FormField {
            id: "category",
            key: CATEGORY_FIELD_KEY,
            question: "Which category of potatoes do you store?",
            subtext: None,
            kind: InputKind::SingleSelect,
            placeholder: None,
            options: CATEGORIES,
        },
        FormField {
            id: "variety",
            key: VARIETY_FIELD_KEY,
            question: "Which variety do you mainly store?",
            subtext: Some("Varieties depend on the category you picked."),
            kind: InputKind::SingleSelect,
            placeholder: None,
            // Derived from the category answer at runtime.
            options: &[],
        },
        FormField {
            id: "storage_goal",
            key: "storage_goal",
            question: "What is your main storage goal?",
            subtext: None,
            kind: InputKind::SingleSelect,
            placeholder: None,
            options: &[
                "Long-term table storage",
                "Seed preservation",
                "Processing supply",
                "Trading / short-term",
            ],
        },
        FormField {
            id: "current_problems",
            key: "current_problems",
            question: "Which problems are you facing right now?",
            subtext: Some("Pick everything that applies."),
            kind: InputKind::MultiSelect,
            placeholder: None,
            options: &[
                "Sprouting",
                "Rottage / decay",
                "Weight loss",
                "High electricity bills",
                "Uneven cooling",
                "Humidity control",
            ],
        },
    ]
}

/// Questionnaire for users planning to build a new cold storage.
pub fn builder_flow() -> Vec<FormField> {
    vec![
        FormField {
            id: "location",
            key: "location",
            question: "Where do you plan to build?",
            subtext: Some("We use this for subsidy and climate guidance."),
            kind: InputKind::Text,
            placeholder: Some("City, district or state"),
            options: &[],
        },
        FormField {
            id: "target_capacity",
            key: "target_capacity",
            question: "What capacity are you targeting?",
            subtext: Some("In metric tonnes (MT)."),
            kind: InputKind::Text,
            placeholder: Some("e.g. 10000"),
            options: &[],
        },
        FormField {
            id: "target_users",
            key: "target_users",
            question: "Who will use the facility?",
            subtext: None,
            kind: InputKind::SingleSelect,
            placeholder: None,
            options: &["Farmers", "Traders", "Processors", "Mixed"],
        },
        FormField {
            id: "budget",
            key: "budget",
            question: "What is your budget range?",
            subtext: None,
            kind: InputKind::SingleSelect,
            placeholder: None,
            options: &[
                "Under \u{20b9}1 crore",
                "\u{20b9}1-3 crore",
                "\u{20b9}3-5 crore",
                "Above \u{20b9}5 crore",
            ],
        },
        FormField {
            id: "purpose",
            key: "purpose",
            question: "What is the primary purpose?",
            subtext: None,
            kind: InputKind::SingleSelect,
            placeholder: None,
            options: &[
                "Commercial rental",
                "Own produce storage",
                "Contract storage",
                "Mixed use",
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_varieties() {
        for category in CATEGORIES {
            assert!(
                !varieties_for(category).is_empty(),
                "category '{}' has no varieties",
                category
            );
        }
    }

    #[test]
    fn test_unknown_category_has_no_varieties() {
        assert!(varieties_for("Sweet Potatoes").is_empty());
    }

    #[test]
    fn test_field_descriptors_serialize() {
        let flow = owner_flow();
        let json = serde_json::to_value(&flow[0]).unwrap();
        assert_eq!(json["key"], "location");
        assert_eq!(json["kind"], "text");
    }

    #[test]
    fn test_flows_have_unique_keys() {
        for flow in [owner_flow(), builder_flow()] {
            let mut keys: Vec<_> = flow.iter().map(|f| f.key).collect();
            keys.sort();
            keys.dedup();
            assert_eq!(keys.len(), flow.len());
        }
    }
}
