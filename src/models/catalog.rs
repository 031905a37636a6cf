use serde::{Deserialize, Serialize};

use super::enums::ItemAttribute;

/// One point on an item's ordered response scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalePoint {
    pub value: u8,
    pub label: String,
}

/// One question in the symptom-item catalog: one attribute of one
/// symptom, PRO-CTCAE style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomItem {
    /// Stable identifier, e.g. `"nausea_frequency"`.
    pub id: String,
    /// Symptom term this item belongs to, e.g. `"nausea"`.
    pub symptom: String,
    pub attribute: ItemAttribute,
    pub question: String,
    pub scale: Vec<ScalePoint>,
}

/// Read-only lookup over the full symptom-item catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    items: Vec<SymptomItem>,
}

impl ItemCatalog {
    pub fn new(items: Vec<SymptomItem>) -> Self {
        Self { items }
    }

    pub fn by_id(&self, id: &str) -> Option<&SymptomItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// The item asking about one attribute of one symptom, if the
    /// catalog defines it.
    pub fn find(&self, symptom: &str, attribute: ItemAttribute) -> Option<&SymptomItem> {
        self.items
            .iter()
            .find(|i| i.symptom == symptom && i.attribute == attribute)
    }

    pub fn items_for_symptom<'a>(&'a self, symptom: &'a str) -> impl Iterator<Item = &'a SymptomItem> {
        self.items.iter().filter(move |i| i.symptom == symptom)
    }

    /// Iterate in catalog order. Selector tie-breaks rely on this order
    /// being stable.
    pub fn iter(&self) -> impl Iterator<Item = &SymptomItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(id: &str, symptom: &str, attribute: ItemAttribute) -> SymptomItem {
        SymptomItem {
            id: id.into(),
            symptom: symptom.into(),
            attribute,
            question: format!("Question for {id}"),
            scale: (0..=4)
                .map(|v| ScalePoint {
                    value: v,
                    label: format!("level {v}"),
                })
                .collect(),
        }
    }

    #[test]
    fn find_by_symptom_and_attribute() {
        let catalog = ItemCatalog::new(vec![
            make_item("nausea_frequency", "nausea", ItemAttribute::Frequency),
            make_item("nausea_severity", "nausea", ItemAttribute::Severity),
            make_item("fatigue_severity", "fatigue", ItemAttribute::Severity),
        ]);
        assert_eq!(
            catalog.find("nausea", ItemAttribute::Severity).unwrap().id,
            "nausea_severity"
        );
        assert!(catalog.find("nausea", ItemAttribute::Interference).is_none());
        assert_eq!(catalog.items_for_symptom("nausea").count(), 2);
    }

    #[test]
    fn by_id_misses_return_none() {
        let catalog = ItemCatalog::new(vec![make_item(
            "fever_present",
            "fever",
            ItemAttribute::PresentAbsent,
        )]);
        assert!(catalog.by_id("fever_present").is_some());
        assert!(catalog.by_id("fever_severity").is_none());
    }
}
